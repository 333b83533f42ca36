use crate::support::{catalog, catalog_with, detail_url, FakeSite, Frame};
use cardlens::config::{parse_config, DEFAULT_USER_AGENT};
use cardlens::{CardError, CardId, SearchQuery};

const PIKACHU: &str = include_str!("../fixtures/detail_pikachu.html");

#[tokio::test(start_paused = true)]
async fn test_engine_is_shared_until_shutdown() {
    let site = FakeSite::new();
    site.serve(&detail_url("46326", "SV"), vec![Frame::html(PIKACHU)]);
    let catalog = catalog(&site);
    let id = CardId::parse("46326").unwrap();

    assert!(!catalog.session().is_running().await);
    catalog.detail(&id, None).await.unwrap();
    catalog.detail(&id, None).await.unwrap();
    assert!(catalog.session().is_running().await);
    site.activity(|a| {
        assert_eq!(a.launches, 1);
        assert_eq!(a.pages_opened, 2);
    });

    catalog.shutdown().await.unwrap();
    catalog.shutdown().await.unwrap();
    assert!(!catalog.session().is_running().await);
    site.activity(|a| assert_eq!(a.shutdowns, 1));

    catalog.detail(&id, None).await.unwrap();
    site.activity(|a| assert_eq!(a.launches, 2));
}

#[tokio::test(start_paused = true)]
async fn test_launch_failure_is_network_error() {
    let site = FakeSite::new();
    site.fail_launch("Could not auto detect a chrome executable");
    let catalog = catalog(&site);

    let err = catalog
        .search(&SearchQuery::by_name("ピカチュウ"))
        .await
        .unwrap_err();

    assert!(matches!(err, CardError::Network(_)), "{err:?}");
    assert_eq!(err.kind().code(), "NETWORK_ERROR");
    site.activity(|a| assert_eq!(a.pages_opened, 0));
}

#[tokio::test(start_paused = true)]
async fn test_pages_carry_configured_user_agent() {
    let site = FakeSite::new();
    site.serve(&detail_url("46326", "SV"), vec![Frame::html(PIKACHU)]);
    let id = CardId::parse("46326").unwrap();

    catalog(&site).detail(&id, None).await.unwrap();

    let config = parse_config(
        r#"
[browser]
user-agent = "cardlens-test/1.0"

[timing]
request-delay-ms = 0
"#,
    )
    .unwrap();
    catalog_with(&site, config).detail(&id, None).await.unwrap();

    let agents = site.activity(|a| a.user_agents.clone());
    assert_eq!(agents, [DEFAULT_USER_AGENT, "cardlens-test/1.0"]);
}
