//! Library API integration tests
use httpmock::prelude::*;
use sitesift_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

#[test]
fn test_parse_sitemap_fixture() {
    let urls = parse_sitemap(&read_fixture("news_sitemap.xml")).expect("should parse");
    assert_eq!(urls, vec!["https://a.test/1", "https://a.test/2"]);
}

#[test]
fn test_extract_article_fixture() {
    let html = read_fixture("article.html");

    let title = extract_from_html(&html, &ContentSelector::parse("h1.title").unwrap());
    assert_eq!(title, Outcome::Text("Hello World".to_string()));

    let body = extract_from_html(&html, &ContentSelector::parse(".article-body").unwrap());
    assert_eq!(
        body,
        Outcome::Text(
            "The harbour bridge reopened on Wednesday after   six weeks of repairs. \
             Officials said the work finished ahead of schedule."
                .to_string()
        )
    );

    let missing = extract_from_html(&html, &ContentSelector::parse(".missing").unwrap());
    assert_eq!(missing.to_string(), "Content not found");
}

#[test]
fn test_malformed_fixture_does_not_fail() {
    let html = read_fixture("malformed.html");
    let outcome = extract_from_html(&html, &ContentSelector::parse("div.article-body").unwrap());

    match outcome {
        Outcome::Text(text) => assert!(text.starts_with("Unclosed paragraph")),
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_document_api() {
    let doc = Document::parse(&read_fixture("article.html"));
    let title = doc.select_first(&ContentSelector::parse("head > title").unwrap()).unwrap();
    assert_eq!(title.joined_text(), "Harbour bridge reopens after repairs | The Test Gazette");

    let author = doc.select_first(&ContentSelector::parse("span.author").unwrap()).unwrap();
    assert_eq!(author.joined_text(), "Ada Reporter");
}

#[test]
fn test_csv_source_fixture() {
    let file = std::fs::File::open(get_fixture_path("urls.csv")).unwrap();
    assert_eq!(urls_from_csv(file).unwrap(), vec!["https://a.test/1", "https://a.test/2"]);
}

#[test]
fn test_manual_source_fixture() {
    assert_eq!(
        urls_from_manual(&read_fixture("urls.txt")),
        vec!["https://a.test/1", "https://a.test/2"]
    );
}

#[tokio::test]
async fn test_sitemap_to_table_pipeline() {
    let server = MockServer::start();
    let article = read_fixture("article.html");

    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{}</loc></url>
  <url><loc>{}</loc></url>
  <url><loc>{}</loc></url>
</urlset>"#,
        server.url("/articles/1"),
        server.url("/articles/2"),
        server.url("/articles/3"),
    );

    server.mock(|when, then| {
        when.method(GET).path("/sitemap.xml");
        then.status(200).header("content-type", "application/xml").body(sitemap);
    });
    server.mock(|when, then| {
        when.method(GET).path("/articles/1");
        then.status(200).header("content-type", "text/html").body(&article);
    });
    server.mock(|when, then| {
        when.method(GET).path("/articles/2");
        then.status(200).header("content-type", "text/html").body("<html><body>no headline</body></html>");
    });
    server.mock(|when, then| {
        when.method(GET).path("/articles/3");
        then.status(404);
    });

    let runner = ExtractionRunner::new(RunConfig::default()).unwrap();
    let urls = UrlSource::Sitemap(server.url("/sitemap.xml"))
        .resolve(runner.client(), &runner.config().fetch)
        .await
        .expect("sitemap should load");
    assert_eq!(urls.len(), 3);

    let table = runner.run(&urls, "h1.title").await.unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.counts(), OutcomeCounts { text: 1, not_found: 1, error: 1 });

    let csv = String::from_utf8(table.to_csv().unwrap()).unwrap();
    assert!(csv.starts_with("URL,Extracted Content"));
    assert!(csv.contains("Hello World"));
    assert!(csv.contains("Content not found"));
    assert!(csv.contains("Error: "));
}

#[tokio::test]
async fn test_unreachable_sitemap_is_an_error_not_a_panic() {
    let config = FetchConfig::default();
    let client = build_client(&config).unwrap();
    let result = fetch_sitemap_urls(&client, "http://127.0.0.1:1/sitemap.xml", &config).await;

    let err = result.unwrap_err();
    assert!(err.is_fetch());
}

#[tokio::test]
async fn test_unreachable_page_is_error_row() {
    let config = FetchConfig::default();
    let client = build_client(&config).unwrap();
    let outcome = extract_content(&client, "http://127.0.0.1:1/page", "h1", &config).await;

    assert!(outcome.to_string().starts_with("Error: "));
}
