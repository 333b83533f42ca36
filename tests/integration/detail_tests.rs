use crate::support::{catalog, detail_url, FakeSite, Frame, Response};
use cardlens::model::{CategorySource, EvolutionStage};
use cardlens::{CardError, CardId, Category};
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

const PIKACHU: &str = include_str!("../fixtures/detail_pikachu.html");
const GOODS: &str = include_str!("../fixtures/detail_goods.html");
const NOT_FOUND: &str = include_str!("../fixtures/not_found.html");

fn id(raw: &str) -> CardId {
    CardId::parse(raw).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_detail_of_pokemon() {
    let site = FakeSite::new();
    site.serve(&detail_url("46326", "SV"), vec![Frame::html(PIKACHU)]);
    let catalog = catalog(&site);
    let start = Instant::now();

    let card = catalog.detail(&id("46326"), None).await.unwrap();

    // navigation throttle, then the content throttle; the page is ready at once
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    assert_eq!(card.card_id.as_str(), "46326");
    assert_eq!(card.name, "ピカチュウ");
    assert_eq!(card.detail_url, detail_url("46326", "SV"));
    assert_eq!(card.hp, Some(70));
    assert_eq!(card.evolution_stage, Some(EvolutionStage::Base));
    assert_eq!(card.card_type.as_deref(), Some("Lightning"));
    assert_eq!(card.weakness.as_deref(), Some("×2"));
    assert_eq!(card.resistance.as_deref(), Some("--"));
    assert_eq!(card.retreat_cost, Some(1));
    assert_eq!(card.set_name.as_deref(), Some("SV1S 021/078"));
    assert_eq!(card.rarity.as_deref(), Some("C"));
    assert_eq!(card.category, Category::Pokemon);
    assert_eq!(card.category_source, CategorySource::Inferred);

    assert_eq!(card.moves.len(), 2);
    assert_eq!(card.moves[0].clean_name, "でんきだま");
    assert_eq!(card.moves[0].damage, Some(20));
    assert_eq!(card.moves[0].effect, "");
    assert_eq!(card.moves[1].clean_name, "まんボルト");
    assert_eq!(card.moves[1].energy_cost, ["lightning", "colorless"]);
    assert_eq!(card.moves[1].damage, Some(90));
    assert!(card.moves[1].effect.contains("トラッシュ"));

    site.activity(|a| assert_eq!(a.pages_closed, 1));
}

#[tokio::test(start_paused = true)]
async fn test_detail_serializes_camel_case() {
    let site = FakeSite::new();
    site.serve(&detail_url("45620", "SV"), vec![Frame::html(GOODS)]);
    let catalog = catalog(&site);

    let card = catalog.detail(&id("45620"), None).await.unwrap();
    assert_eq!(card.category, Category::Goods);
    assert_eq!(card.category_source, CategorySource::Page);

    let value = serde_json::to_value(&card).unwrap();
    assert_eq!(value["cardId"], json!("45620"));
    assert_eq!(value["fullName"], json!("ネストボール"));
    assert_eq!(value["category"], json!("Goods"));
    assert_eq!(value["categorySource"], json!("page"));
    assert_eq!(value["hp"], json!(null));
    assert_eq!(value["moves"], json!([]));
    assert_eq!(value["setCode"], json!(null));
}

#[tokio::test(start_paused = true)]
async fn test_detail_prefers_state_picture() {
    let site = FakeSite::new();
    site.serve(
        &detail_url("46326", "SV"),
        vec![Frame::html(PIKACHU).with_state(json!({
            "names": null,
            "pictures": { "46326": "/assets/images/card_images/large/SV1S/046326_P_PIKACHIXYU_STATE.jpg" }
        }))],
    );
    let catalog = catalog(&site);

    let card = catalog.detail(&id("46326"), None).await.unwrap();
    assert_eq!(
        card.image_url.as_deref(),
        Some("https://www.pokemon-card.com/assets/images/card_images/large/SV1S/046326_P_PIKACHIXYU_STATE.jpg")
    );
}

#[tokio::test(start_paused = true)]
async fn test_detail_not_found_names_card() {
    let site = FakeSite::new();
    site.serve(&detail_url("99999", "SV"), vec![Frame::html(NOT_FOUND)]);
    let catalog = catalog(&site);

    let err = catalog.detail(&id("99999"), None).await.unwrap_err();

    assert!(matches!(err, CardError::NotFound { .. }), "{err:?}");
    assert!(err.to_string().contains("99999"));
    assert_eq!(err.kind().status_code(), 404);
    site.activity(|a| assert_eq!(a.pages_closed, 1));
}

#[tokio::test(start_paused = true)]
async fn test_detail_regulation_segment() {
    let site = FakeSite::new();
    site.serve(&detail_url("46326", ""), vec![Frame::html(PIKACHU)]);
    site.serve(&detail_url("46326", "XY"), vec![Frame::html(PIKACHU)]);
    let catalog = catalog(&site);

    let card = catalog.detail(&id("46326"), Some("")).await.unwrap();
    assert_eq!(card.detail_url, detail_url("46326", ""));

    let card = catalog.detail(&id("46326"), Some("XY")).await.unwrap();
    assert_eq!(card.detail_url, detail_url("46326", "XY"));

    let visited = site.activity(|a| a.visited.clone());
    assert_eq!(visited, [detail_url("46326", ""), detail_url("46326", "XY")]);
}

#[tokio::test(start_paused = true)]
async fn test_detail_either_matches_id_or_fails_classified() {
    let site = FakeSite::new();
    site.serve(&detail_url("46326", "SV"), vec![Frame::html(PIKACHU)]);
    site.route(&detail_url("10000", "SV"), Response::Hang);
    site.route(
        &detail_url("20000", "SV"),
        Response::Fail("net::ERR_INTERNET_DISCONNECTED".into()),
    );
    let catalog = catalog(&site);

    for raw in ["46326", "10000", "20000", "30000"] {
        match catalog.detail(&id(raw), None).await {
            Ok(card) => assert_eq!(card.card_id.as_str(), raw),
            Err(CardError::NotFound { .. } | CardError::Timeout(_) | CardError::Network(_)) => {}
            Err(other) => panic!("unexpected error for {raw}: {other:?}"),
        }
    }

    site.activity(|a| {
        assert_eq!(a.pages_opened, 4);
        assert_eq!(a.pages_closed, 4);
    });
}

#[tokio::test(start_paused = true)]
async fn test_detail_waits_for_late_render() {
    let site = FakeSite::new();
    site.serve(
        &detail_url("46326", "SV"),
        vec![Frame::html("<html><body><div id=\"app\"></div></body></html>"), Frame::html(PIKACHU)],
    );
    let catalog = catalog(&site);
    let start = Instant::now();

    let card = catalog.detail(&id("46326"), None).await.unwrap();

    // one empty probe and one poll gap before the page rendered
    assert_eq!(start.elapsed(), Duration::from_secs(3));
    assert_eq!(card.hp, Some(70));
}
