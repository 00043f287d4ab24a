use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sitesift_core::{ContentSelector, Document, ResultTable, extract_from_html, parse_sitemap};
use sitesift_core::{ExtractionResult, Outcome};

fn bench_parse(c: &mut Criterion) {
    let small = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let large = small.repeat(200);

    let mut group = c.benchmark_group("parse");

    group.bench_with_input(BenchmarkId::new("small", "2KB"), &small, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("large", "400KB"), &large, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let selector = ContentSelector::parse("div.article-body").unwrap();

    c.bench_function("extract_from_html", |b| {
        b.iter(|| extract_from_html(black_box(&html), black_box(&selector)))
    });
}

fn bench_sitemap(c: &mut Criterion) {
    let entries: String = (0..1000)
        .map(|i| format!("<url><loc>https://a.test/articles/{}</loc></url>", i))
        .collect();
    let xml = format!(
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    );

    c.bench_function("parse_sitemap_1000", |b| b.iter(|| parse_sitemap(black_box(&xml))));
}

fn bench_export(c: &mut Criterion) {
    let rows: Vec<ExtractionResult> = (0..1000)
        .map(|i| ExtractionResult::new(format!("https://a.test/{}", i), Outcome::Text(format!("Headline, \"{}\"", i))))
        .collect();
    let table = ResultTable::from(rows);

    c.bench_function("to_csv_1000", |b| b.iter(|| black_box(&table).to_csv()));
}

criterion_group!(benches, bench_parse, bench_extract, bench_sitemap, bench_export);
criterion_main!(benches);
