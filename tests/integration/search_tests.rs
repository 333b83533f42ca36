use crate::support::{catalog, catalog_with, FakeSite, Frame, Response, SEARCH_URL};
use cardlens::config::Config;
use cardlens::{CardError, Category, SearchQuery};
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

const FORM: &str = include_str!("../fixtures/search_form.html");
const RESULTS_STATE: &str = include_str!("../fixtures/search_results_state.html");
const RESULTS_DOM: &str = include_str!("../fixtures/search_results_dom.html");
const NO_RESULTS: &str = include_str!("../fixtures/search_no_results.html");
const NOT_FOUND: &str = include_str!("../fixtures/not_found.html");

fn pikachu_state() -> serde_json::Value {
    json!({
        "names": { "46326": "ピカチュウ" },
        "altNames": { "46326": "ピカチュウ" },
        "pictures": { "46326": "/assets/images/card_images/large/SV1S/046326_P_PIKACHIXYU.jpg" }
    })
}

#[tokio::test(start_paused = true)]
async fn test_search_reads_embedded_state() {
    let site = FakeSite::new();
    site.serve(
        SEARCH_URL,
        vec![
            Frame::html(FORM),
            Frame::html(RESULTS_STATE).with_state(pikachu_state()),
        ],
    );
    let catalog = catalog(&site);

    let cards = catalog
        .search(&SearchQuery::by_name("ピカチュウ"))
        .await
        .expect("search should succeed");

    assert_eq!(cards.len(), 1);
    let card = &cards[0];
    assert_eq!(card.card_id.as_str(), "46326");
    assert!(!card.name.is_empty());
    assert!(Category::ALL.contains(&card.category));
    assert_eq!(card.category, Category::Pokemon);
    assert_eq!(
        card.image_url.as_deref(),
        Some("https://www.pokemon-card.com/assets/images/card_images/large/SV1S/046326_P_PIKACHIXYU.jpg")
    );

    // The query went through the form: name entered, then the button clicked
    let scripts = site.activity(|a| a.scripts.clone());
    assert_eq!(scripts.len(), 2);
    assert!(scripts[0].contains("ピカチュウ"));
    assert!(scripts[0].contains(r#"input[placeholder*=\"カード名\"]"#));
    assert!(scripts[1].contains(r#"button[type=\"submit\"]"#));

    site.activity(|a| {
        assert_eq!(a.pages_opened, 1);
        assert_eq!(a.pages_closed, 1);
    });
}

#[tokio::test(start_paused = true)]
async fn test_search_polls_until_results_render() {
    let site = FakeSite::new();
    site.serve(
        SEARCH_URL,
        vec![
            Frame::html(FORM),
            Frame::html(NO_RESULTS),
            Frame::html(NO_RESULTS),
            Frame::html(RESULTS_DOM),
        ],
    );
    let catalog = catalog(&site);
    let start = Instant::now();

    let cards = catalog
        .search(&SearchQuery::by_name("ボール"))
        .await
        .expect("search should succeed");

    // navigation throttle + content throttle + results throttle + two poll gaps
    assert_eq!(start.elapsed(), Duration::from_secs(5));

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].card_id.as_str(), "45620");
    assert_eq!(cards[0].name, "ネストボール");
    assert_eq!(cards[0].category, Category::Goods);
    assert_eq!(
        cards[0].image_url.as_deref(),
        Some("https://www.pokemon-card.com/assets/images/card_images/large/SV1S/045620_T_NESUTOBORU.jpg")
    );

    assert_eq!(cards[1].card_id.as_str(), "45632");
    assert_eq!(cards[1].name, "博士の研究");
    assert_eq!(cards[1].full_name, "博士の研究(フトゥー博士)");
    assert_eq!(cards[1].category, Category::Supporter);
    assert_eq!(
        cards[1].detail_url,
        "https://www.pokemon-card.com/card-search/details.php/card/45632/regu/SV/"
    );
}

#[tokio::test(start_paused = true)]
async fn test_search_without_matches_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let screenshot = dir.path().join("empty.png");

    let site = FakeSite::new();
    site.serve(SEARCH_URL, vec![Frame::html(FORM), Frame::html(NO_RESULTS)]);

    let mut config = Config::default();
    config.diagnostics.screenshot_on_empty = Some(screenshot.clone());
    let catalog = catalog_with(&site, config);
    let start = Instant::now();

    let cards = catalog
        .search(&SearchQuery::by_name("存在しないカード"))
        .await
        .expect("an empty result is not an error");

    assert!(cards.is_empty());
    // 3s of throttling, then five polls with four gaps and none after the last
    assert_eq!(start.elapsed(), Duration::from_secs(7));
    assert!(screenshot.exists());

    let scripts = site.activity(|a| a.scripts.clone());
    assert!(scripts.iter().any(|s| s.contains("bodyText")));
    site.activity(|a| assert_eq!(a.pages_closed, 1));
}

#[tokio::test(start_paused = true)]
async fn test_search_never_reports_not_found() {
    let site = FakeSite::new();
    site.serve(SEARCH_URL, vec![Frame::html(NOT_FOUND)]);
    let catalog = catalog(&site);

    let cards = catalog
        .search(&SearchQuery::by_name("ピカチュウ"))
        .await
        .expect("a missing search page degrades to no results");

    assert!(cards.is_empty());
    site.activity(|a| assert_eq!(a.pages_closed, 1));
}

#[tokio::test(start_paused = true)]
async fn test_search_timeout() {
    let site = FakeSite::new();
    site.route(SEARCH_URL, Response::Hang);
    let catalog = catalog(&site);
    let start = Instant::now();

    let err = catalog
        .search(&SearchQuery::by_name("ピカチュウ"))
        .await
        .unwrap_err();

    assert!(matches!(err, CardError::Timeout(_)), "{err:?}");
    assert_eq!(start.elapsed(), Duration::from_secs(31));
    site.activity(|a| assert_eq!(a.pages_closed, 1));
}

#[tokio::test(start_paused = true)]
async fn test_search_failure_classification() {
    let site = FakeSite::new();
    let catalog = catalog(&site);
    let query = SearchQuery::by_name("ピカチュウ");

    site.route(
        SEARCH_URL,
        Response::Fail("net::ERR_CONNECTION_REFUSED at https://www.pokemon-card.com/card-search/".into()),
    );
    let err = catalog.search(&query).await.unwrap_err();
    assert!(matches!(err, CardError::Network(_)), "{err:?}");

    site.route(
        SEARCH_URL,
        Response::Fail("Navigation timeout of 30000 ms exceeded".into()),
    );
    let err = catalog.search(&query).await.unwrap_err();
    assert!(matches!(err, CardError::Timeout(_)), "{err:?}");

    site.route(SEARCH_URL, Response::Fail("Execution context was destroyed".into()));
    let err = catalog.search(&query).await.unwrap_err();
    assert!(matches!(err, CardError::Other(_)), "{err:?}");
    assert_eq!(err.to_string(), "Execution context was destroyed");

    site.activity(|a| {
        assert_eq!(a.pages_opened, 3);
        assert_eq!(a.pages_closed, 3);
    });
}

#[tokio::test(start_paused = true)]
async fn test_search_by_category_selects_site_token() {
    let site = FakeSite::new();
    site.serve(SEARCH_URL, vec![Frame::html(FORM), Frame::html(RESULTS_DOM)]);
    let catalog = catalog(&site);

    let query = SearchQuery {
        category: Some("サポート".to_string()),
        ..SearchQuery::default()
    };
    let cards = catalog.search(&query).await.unwrap();
    assert_eq!(cards.len(), 2);

    let scripts = site.activity(|a| a.scripts.clone());
    assert!(scripts[0].contains(r#"select[name=\"card_type\"]"#));
    assert!(scripts[0].contains(r#"["support","サポート"]"#));
}
