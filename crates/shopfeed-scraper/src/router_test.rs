use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::fetch::LaunchOptions;

/// A browser that is never there.
struct NoBrowser;

#[async_trait]
impl BrowserSession for NoBrowser {
    async fn launch(_options: &LaunchOptions) -> Result<Self, ScraperError> {
        Err(ScraperError::BrowserUnavailable {
            reason: "no chrome in test".to_owned(),
        })
    }

    async fn navigate(&mut self, _url: &str) -> Result<(), ScraperError> {
        unreachable!()
    }

    async fn wait_for(&mut self, _selector: &str, _timeout: Duration) -> bool {
        unreachable!()
    }

    async fn scroll_height(&mut self) -> Result<i64, ScraperError> {
        unreachable!()
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
        unreachable!()
    }

    async fn content(&mut self) -> Result<String, ScraperError> {
        unreachable!()
    }

    async fn close(self) {}
}

fn scraper() -> Scraper {
    Scraper::new(ScraperConfig::default().without_delays())
}

fn request(url: &str) -> ScrapeRequest {
    ScrapeRequest {
        url: Some(url.to_owned()),
        ..ScrapeRequest::default()
    }
}

fn shopee_template(server: &MockServer) -> Template {
    Template {
        requires_render: false,
        ..registry::resolve("shopee")
            .with_api_endpoint(format!("{}/api/v4/search/search_items", server.uri()))
    }
}

const SHOPEE_LISTING: &str = r#"
    <div data-sqe="item"><div data-sqe="name">Gel Pen Blue</div><div data-sqe="price">฿25</div></div>
    <div data-sqe="item"><div data-sqe="name">Gel Pen Red</div><div data-sqe="price">฿25</div></div>
"#;

fn shopee_items(count: usize) -> serde_json::Value {
    let items: Vec<_> = (1..=count)
        .map(|i| {
            json!({"item_basic": {
                "itemid": i, "shopid": 77, "name": format!("Pen {i}"), "price": 2_500_000
            }})
        })
        .collect();
    json!({ "items": items })
}

// -----------------------------------------------------------------------
// request validation
// -----------------------------------------------------------------------

#[tokio::test]
async fn missing_url_is_a_configuration_error() {
    let err = scraper().scrape(&ScrapeRequest::default()).await.unwrap_err();
    assert!(matches!(err, ScraperError::MissingTargetUrl));
    assert!(err.is_configuration());
}

#[tokio::test]
async fn blank_url_is_missing() {
    let err = scraper().scrape(&request("   ")).await.unwrap_err();
    assert!(matches!(err, ScraperError::MissingTargetUrl));
}

#[tokio::test]
async fn unparseable_url_is_invalid() {
    let err = scraper().scrape(&request("not a url")).await.unwrap_err();
    assert!(matches!(err, ScraperError::InvalidUrl { .. }));
}

#[tokio::test]
async fn non_http_url_is_invalid() {
    let err = scraper()
        .scrape(&request("ftp://files.example.com/list"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::InvalidUrl { .. }));
}

#[tokio::test]
async fn template_without_selectors_is_unusable() {
    let template = Template {
        key: "empty",
        ..Template::BASE
    };
    let err = scraper()
        .scrape_with_template(template, &request("https://shop.example.com/"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::UnusableTemplate { ref key } if key == "empty"));
}

// -----------------------------------------------------------------------
// attempt plan
// -----------------------------------------------------------------------

#[tokio::test]
async fn empty_api_result_falls_back_to_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/search/search_items"))
        .and(query_param("keyword", "pen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SHOPEE_LISTING))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = scraper()
        .scrape_with_template(
            shopee_template(&server),
            &request(&format!("{}/search?keyword=pen", server.uri())),
        )
        .await
        .unwrap();

    assert_eq!(outcome.products.len(), 2);
    assert_eq!(outcome.strategy, Some(Strategy::Static));
    assert_eq!(outcome.template, "shopee");
}

#[tokio::test]
async fn api_result_is_authoritative() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/search/search_items"))
        .and(query_param("newest", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shopee_items(3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/search/search_items"))
        .and(query_param("newest", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SHOPEE_LISTING))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = scraper()
        .scrape_with_template(
            shopee_template(&server),
            &request(&format!("{}/search?q=pen", server.uri())),
        )
        .await
        .unwrap();

    assert_eq!(outcome.products.len(), 3);
    assert_eq!(outcome.strategy, Some(Strategy::Api(ApiKind::ShopeeSearch)));
    assert_eq!(outcome.pages_fetched, 2);
}

#[tokio::test]
async fn api_results_are_truncated_to_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/search/search_items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shopee_items(5)))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new(ScraperConfig {
        api_result_limit: 3,
        ..ScraperConfig::default().without_delays()
    });
    let outcome = scraper
        .scrape_with_template(
            shopee_template(&server),
            &ScrapeRequest {
                keyword: Some("pen".to_owned()),
                ..request(&format!("{}/search", server.uri()))
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.products.len(), 3);
    assert_eq!(outcome.products[2].name, "Pen 3");
}

#[tokio::test]
async fn api_is_skipped_without_keyword() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/search/search_items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shopee_items(1)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shop/stationery"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SHOPEE_LISTING))
        .mount(&server)
        .await;

    let outcome = scraper()
        .scrape_with_template(
            shopee_template(&server),
            &request(&format!("{}/shop/stationery", server.uri())),
        )
        .await
        .unwrap();

    assert_eq!(outcome.strategy, Some(Strategy::Static));
}

#[tokio::test]
async fn missing_browser_falls_back_to_static() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/category"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="product-card"><h3>Stapler</h3><span class="price">฿120</span></div>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = scraper()
        .run::<NoBrowser>(
            registry::resolve("bigc"),
            &request(&format!("{}/category", server.uri())),
        )
        .await
        .unwrap();

    assert_eq!(outcome.products.len(), 1);
    assert_eq!(outcome.strategy, Some(Strategy::Static));
}

#[tokio::test]
async fn force_render_without_browser_still_scrapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="product"><h3>Tape</h3><span class="price">35</span></div>"#,
        ))
        .mount(&server)
        .await;

    let outcome = scraper()
        .run::<NoBrowser>(
            registry::resolve("generic"),
            &ScrapeRequest {
                force_render: true,
                ..request(&format!("{}/", server.uri()))
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.strategy, Some(Strategy::Static));
    assert_eq!(outcome.products[0].name, "Tape");
}

#[tokio::test]
async fn all_empty_plan_is_an_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let outcome = scraper()
        .scrape(&ScrapeRequest {
            template: Some("generic".to_owned()),
            ..request(&format!("{}/empty", server.uri()))
        })
        .await
        .unwrap();

    assert!(outcome.products.is_empty());
    assert!(outcome.strategy.is_none());
    assert_eq!(outcome.pages_fetched, 1);
}

#[tokio::test]
async fn unreachable_source_is_an_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = scraper()
        .scrape(&ScrapeRequest {
            template: Some("generic".to_owned()),
            ..request(&format!("{}/down", server.uri()))
        })
        .await
        .unwrap();

    assert!(outcome.products.is_empty());
    assert_eq!(outcome.pages_fetched, 0);
}

#[tokio::test]
async fn page_override_bounds_html_traversal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/list/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="product-item"><h3>Pen</h3><span class="price">฿10</span></div>
               <a class="page-next" href="more/">next</a>"#,
        ))
        .expect(2)
        .mount(&server)
        .await;

    let outcome = scraper()
        .scrape(&ScrapeRequest {
            template: Some("lnw".to_owned()),
            max_pages: Some(2),
            ..request(&format!("{}/list/", server.uri()))
        })
        .await
        .unwrap();

    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.products.len(), 2);
}

#[test]
fn strategy_display() {
    assert_eq!(Strategy::Api(ApiKind::LazadaCatalog).to_string(), "api:lazada-catalog");
    assert_eq!(Strategy::Rendered.to_string(), "rendered");
    assert_eq!(Strategy::Static.to_string(), "static");
}
