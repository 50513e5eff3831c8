use std::path::Path;
use std::time::{Duration, Instant};

use magsav_scripts::config::Config;
use magsav_scripts::image_scraper::ImageScraper;
use magsav_scripts::sources::ManufacturerProfile;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scraper_for(server: &MockServer, medias: &Path) -> ImageScraper {
    let base = server.uri();
    ImageScraper::new(medias, &Config::default())
        .unwrap()
        .with_manufacturer(
            "acme",
            ManufacturerProfile::new(&base, "/search?q={query}", &["img.product-image"]),
        )
        .with_search_template(&format!("{}/images?q={{query}}", base))
        .with_delay(Duration::ZERO)
}

async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(server)
        .await;
}

async fn mount_body(server: &MockServer, route: &str, size: usize, mime: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x42u8; size], mime))
        .mount(server)
        .await;
}

#[tokio::test]
async fn small_and_non_image_downloads_are_not_saved() {
    let server = MockServer::start().await;
    let medias = tempdir().unwrap();

    mount_html(&server, "/search", r#"
        <img class="product-image" src="/img/tiny.png">
        <img class="product-image" src="/img/page.jpg">
        <img class="product-image" src="/img/good.png">"#.to_string()).await;
    mount_html(&server, "/images", "<html><body></body></html>".to_string()).await;
    mount_body(&server, "/img/tiny.png", 100, "image/png").await;
    mount_body(&server, "/img/page.jpg", 4096, "text/html").await;
    mount_body(&server, "/img/good.png", 2048, "image/png").await;

    let scraper = scraper_for(&server, medias.path());
    let result = scraper.scrape_product_images("Amplificateur 240", "Acme", "PROD001", 3).await;

    assert!(result.success);
    assert_eq!(result.product_uid, "PROD001");
    assert_eq!(result.scraped_images.len(), 1);
    assert_eq!(result.scraped_images[0].filename, "PROD001_scraped.png");
    assert_eq!(result.scraped_images[0].source, "Acme_official");
    assert_eq!(result.scraped_images[0].source_url, format!("{}/img/good.png", server.uri()));
    assert_eq!(result.errors.len(), 2);

    let scraped = scraper.scraped_path();
    assert_eq!(scraped, medias.path().join("scraped"));
    assert_eq!(std::fs::read(scraped.join("PROD001_scraped.png")).unwrap().len(), 2048);
    assert_eq!(std::fs::read_dir(scraped).unwrap().count(), 1);
    assert!(scraper.photos_path().is_dir());
}

#[tokio::test]
async fn downloads_stop_at_max_images() {
    let server = MockServer::start().await;
    let medias = tempdir().unwrap();

    mount_html(&server, "/search", r#"
        <img class="product-image" src="/img/1.jpg">
        <img class="product-image" src="/img/2.jpg">
        <img class="product-image" src="/img/3.jpg">"#.to_string()).await;
    mount_body(&server, "/img/1.jpg", 2048, "image/jpeg").await;
    mount_body(&server, "/img/2.jpg", 2048, "image/jpeg").await;
    Mock::given(method("GET"))
        .and(path("/img/3.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 2048], "image/jpeg"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scraper = scraper_for(&server, medias.path());
    let result = scraper.scrape_product_images("MG10", "acme", "X1", 2).await;

    let names: Vec<&str> = result.scraped_images.iter().map(|i| i.filename.as_str()).collect();
    assert_eq!(names, vec!["X1_scraped.jpg", "X1_scraped_1.jpg"]);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn failing_manufacturer_page_falls_back_to_generic_search() {
    let server = MockServer::start().await;
    let medias = tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_html(&server, "/images", format!(
        r#"<img src="https://encrypted-tbn0.gstatic.com/images?q=1"><img src="{0}/g/1.webp"><img src="/g/relative.jpg">"#,
        server.uri()
    )).await;
    mount_body(&server, "/g/1.webp", 5000, "image/webp").await;

    let scraper = scraper_for(&server, medias.path());
    let result = scraper.scrape_product_images("S1 Pro", "Acme", "", 3).await;

    assert!(result.success);
    assert_eq!(result.product_uid.len(), 8);
    assert_eq!(result.scraped_images.len(), 1);
    assert_eq!(result.scraped_images[0].source, "google_images");
    assert_eq!(result.scraped_images[0].filename, format!("{}_scraped.webp", result.product_uid));
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Acme_official"));
}

#[tokio::test]
async fn unknown_manufacturer_with_no_results_is_a_failure() {
    let server = MockServer::start().await;
    let medias = tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_html(&server, "/images", "<html><body><p>nothing</p></body></html>".to_string()).await;

    let scraper = scraper_for(&server, medias.path());
    let result = scraper.scrape_product_images("Mystery Box", "Nobody", "M1", 3).await;

    assert!(!result.success);
    assert!(result.scraped_images.is_empty());
    assert!(result.errors.is_empty());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["product_uid"], "M1");
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn delay_follows_every_download_attempt() {
    let server = MockServer::start().await;
    let medias = tempdir().unwrap();
    let delay = Duration::from_millis(300);

    mount_html(&server, "/search", r#"
        <img class="product-image" src="/img/tiny.jpg">
        <img class="product-image" src="/img/good.jpg">"#.to_string()).await;
    mount_body(&server, "/img/tiny.jpg", 10, "image/jpeg").await;
    mount_body(&server, "/img/good.jpg", 2048, "image/jpeg").await;

    let scraper = scraper_for(&server, medias.path()).with_delay(delay);
    let started = Instant::now();
    let result = scraper.scrape_product_images("MG10", "Acme", "D1", 1).await;
    let elapsed = started.elapsed();

    assert_eq!(result.scraped_images.len(), 1);
    assert_eq!(result.errors.len(), 1);
    // one pause after the rejected download, one after the saved one
    assert!(elapsed >= delay * 2, "elapsed {:?}", elapsed);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
