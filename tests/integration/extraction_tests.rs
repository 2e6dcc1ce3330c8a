//! Integration tests for the extraction engine
//!
//! These tests run the built-in and file-based specifications against
//! captured result-page fixtures, end to end.

use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use serp_sift::extract::{Extraction, Extractor};
use serp_sift::sink::{harvest, CapturedPage, MemorySink};
use serp_sift::spec::{builtin, parse_spec, SpecRegistry};
use serp_sift::{SiftError, SpecificationError};
use tracing_subscriber::EnvFilter;

const GOOGLE_PAGE: &str = r#"<html><head><title>shoes - Google Search</title></head><body>
<div id="tads"><ol>
  <li class="ads-ad">
    <h3><a class="ad-title" href="https://www.googleadservices.com/aclk?sa=1">Cheap <b>Shoes</b> Online</a></h3>
    <div class="ads-visurl"><cite>www.shoeshop.example/<b>Shoes</b></cite></div>
    <div class="ads-creative">Free shipping on all orders.</div>
  </li>
  <li class="ads-ad">
    <h3><a class="ad-title" href="https://www.googleadservices.com/aclk?sa=2">Running Shoes</a></h3>
    <div class="ads-visurl"><cite>www.runfast.example</cite></div>
  </li>
  <li class="ads-ad">
    <h3><a class="ad-title" href="https://www.googleadservices.com/aclk?sa=3">Boots &amp; Shoes</a></h3>
    <div class="ads-visurl"><cite>www.bootbarn.example</cite></div>
    <div class="ads-creative">Winter sale.   Up to 50% off</div>
  </li>
</ol></div>
<div id="search"><div class="srg">
  <div class="g"><h3 class="r"><a href="https://en.wikipedia.org/wiki/Shoe">Shoe - Wikipedia</a></h3>
    <div class="s"><cite>https://en.wikipedia.org/wiki/<b>Shoe</b></cite><span class="st">A <em>shoe</em> is an item of footwear.</span></div></div>
  <div class="g"><h3 class="r"><a href="https://shoes.example/">Shoes.example</a></h3>
    <div class="s"><cite>shoes.example</cite><cite>m.shoes.example</cite><span class="st">Shop the latest styles.</span></div></div>
  <div class="g"><div class="s"><span class="st">Orphan snippet without a title</span></div></div>
  <div class="g"><h3 class="r"><a href="https://news.example/shoes">Shoe news</a></h3></div>
</div></div>
<div id="brs"><p><a href="/search?q=cheap+shoes">cheap shoes</a></p><p><a href="/search?q=shoe+store">shoe store</a></p></div>
</body></html>"#;

const BING_PAGE: &str = r#"<html><body><ol id="b_results">
<li class="b_ad"><ul>
  <li><h2><a href="https://bing.example/ad1">Ad One</a></h2>
    <div class="b_attribution"><cite>ad1.example</cite></div>
    <div class="b_caption"><p>Ad one text</p></div></li>
</ul></li>
<li class="b_algo"><h2><a href="https://www.rust-lang.org/">Rust Programming Language</a></h2>
  <div class="b_caption"><div class="b_attribution"><cite>https://www.rust-lang.org</cite></div>
  <p>A language empowering everyone.</p></div></li>
</ol></body></html>"#;

const DUCKDUCKGO_PAGE: &str = r#"<html><body><div class="results">
<div class="result result--ad"><h2 class="result__title"><a class="result__a" href="https://ad.example">Sponsored</a></h2>
  <a class="result__url" href="https://ad.example">ad.example</a><a class="result__snippet">Buy now</a></div>
<div class="result results_links"><h2 class="result__title"><a class="result__a" href="https://www.rust-lang.org/">Rust</a></h2>
  <a class="result__url" href="https://www.rust-lang.org/">www.<b>rust-lang</b>.org</a><a class="result__snippet">Fast and <b>reliable</b>.</a></div>
</div></body></html>"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn specs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("specs")
}

fn assert_dense_ranks(extraction: &Extraction) {
    for category in &extraction.categories {
        let ranks: Vec<u32> = category.records.iter().map(|r| r.rank).collect();
        let expected: Vec<u32> = (1..=category.records.len() as u32).collect();
        assert_eq!(ranks, expected, "ranks of '{}'", category.category);
    }
}

#[test]
fn test_google_ads_skip_rejected_candidate() {
    init_tracing();
    let extractor = Extractor::builtin().unwrap();
    let extraction = extractor.extract(GOOGLE_PAGE, builtin::GOOGLE).unwrap();

    let ads = extraction.records("ads").unwrap();
    assert_eq!(ads.len(), 2);

    assert_eq!(ads[0].rank, 1);
    assert_eq!(ads[0].get("title"), Some("Cheap Shoes Online"));
    assert_eq!(
        ads[0].get("link"),
        Some("https://www.googleadservices.com/aclk?sa=1")
    );
    assert_eq!(
        ads[0].get("visible_url"),
        Some("www.shoeshop.example/<b>Shoes</b>")
    );
    assert_eq!(ads[0].get("creative"), Some("Free shipping on all orders."));

    assert_eq!(ads[1].rank, 2);
    assert_eq!(
        ads[1].get("link"),
        Some("https://www.googleadservices.com/aclk?sa=3")
    );
    assert_eq!(ads[1].get("title"), Some("Boots & Shoes"));
    assert_eq!(ads[1].get("creative"), Some("Winter sale. Up to 50% off"));

    let stats = extraction.stats("ads").unwrap();
    assert_eq!(stats.candidates, 3);
    assert_eq!(stats.rejected, 1);
}

#[test]
fn test_google_organic_ambiguous_field_omitted() {
    init_tracing();
    let extractor = Extractor::builtin().unwrap();
    let extraction = extractor.extract(GOOGLE_PAGE, builtin::GOOGLE).unwrap();

    let organic = extraction.records("organic").unwrap();
    assert_eq!(organic.len(), 3);

    assert_eq!(organic[0].get("title"), Some("Shoe - Wikipedia"));
    assert_eq!(
        organic[0].get("creative"),
        Some("A shoe is an item of footwear.")
    );

    // Two <cite> elements: visible_url is dropped, the rest survives.
    assert_eq!(organic[1].rank, 2);
    assert!(!organic[1].has("visible_url"));
    assert_eq!(organic[1].get("title"), Some("Shoes.example"));
    assert_eq!(organic[1].get("link"), Some("https://shoes.example/"));
    assert_eq!(organic[1].get("creative"), Some("Shop the latest styles."));

    assert_eq!(organic[2].rank, 3);
    assert_eq!(organic[2].get("link"), Some("https://news.example/shoes"));
    assert_eq!(organic[2].len(), 2);

    let stats = extraction.stats("organic").unwrap();
    assert_eq!(stats.candidates, 4);
    assert_eq!(stats.accepted, 3);
    assert_eq!(stats.fields_ambiguous, 1);
}

#[test]
fn test_google_related_searches_lenient() {
    let extractor = Extractor::builtin().unwrap();
    let extraction = extractor.extract(GOOGLE_PAGE, builtin::GOOGLE).unwrap();

    let related = extraction.records("related_searches").unwrap();
    let queries: Vec<_> = related.iter().filter_map(|r| r.get("query")).collect();
    assert_eq!(queries, vec!["cheap shoes", "shoe store"]);
    assert_dense_ranks(&extraction);
}

#[test]
fn test_bing_layout() {
    let extractor = Extractor::builtin().unwrap();
    let extraction = extractor.extract(BING_PAGE, builtin::BING).unwrap();

    let organic = extraction.records("organic").unwrap();
    assert_eq!(organic.len(), 1);
    assert_eq!(organic[0].get("title"), Some("Rust Programming Language"));
    assert_eq!(organic[0].get("visible_url"), Some("https://www.rust-lang.org"));
    assert_eq!(
        organic[0].get("creative"),
        Some("A language empowering everyone.")
    );

    let ads = extraction.records("ads").unwrap();
    assert_eq!(ads.len(), 1);
    assert_eq!(ads[0].get("link"), Some("https://bing.example/ad1"));
    assert_dense_ranks(&extraction);
}

#[test]
fn test_wrong_spec_gives_empty_output_not_error() {
    let extractor = Extractor::builtin().unwrap();
    let extraction = extractor.extract(GOOGLE_PAGE, builtin::YAHOO).unwrap();

    assert_eq!(extraction.record_count(), 0);
    assert!(extraction.records("organic").unwrap().is_empty());
    assert!(extraction.records("ads").unwrap().is_empty());
}

#[test]
fn test_empty_markup_yields_empty_categories() {
    let extractor = Extractor::builtin().unwrap();
    for source_type in [builtin::GOOGLE, builtin::BING, builtin::YAHOO] {
        let extraction = extractor.extract("", source_type).unwrap();
        assert!(!extraction.categories.is_empty());
        for category in &extraction.categories {
            assert!(category.records.is_empty());
            assert_eq!(category.stats.candidates, 0);
        }
    }
}

#[test]
fn test_invalid_selector_fails_at_load() {
    let content = r#"
source-type = "X"

[[category]]
name = "organic"
scope = "div.result"

[[category.field]]
name = "title"
selector = "h3 > a["
"#;
    let err = parse_spec(content).unwrap_err();
    assert!(matches!(err, SpecificationError::InvalidSelector { .. }));

    // The failed spec never reaches the registry, so "X" cannot be extracted.
    let extractor = Extractor::new(SpecRegistry::builtin().unwrap());
    let err = extractor.extract("<div class=\"result\"></div>", "X").unwrap_err();
    assert!(matches!(err, SiftError::UnknownSourceType { .. }));
}

#[test]
fn test_spec_directory_loading() {
    init_tracing();
    let mut registry = SpecRegistry::builtin().unwrap();
    let loaded = registry.load_dir(&specs_dir()).unwrap();
    assert_eq!(loaded, vec!["duckduckgo"]);

    let extractor = Extractor::new(registry);
    let extraction = extractor.extract(DUCKDUCKGO_PAGE, "duckduckgo").unwrap();

    let organic = extraction.records("organic").unwrap();
    assert_eq!(organic.len(), 1);
    assert_eq!(organic[0].get("title"), Some("Rust"));
    assert_eq!(organic[0].get("visible_url"), Some("www.<b>rust-lang</b>.org"));
    assert_eq!(organic[0].get("creative"), Some("Fast and reliable."));

    let ads = extraction.records("ads").unwrap();
    assert_eq!(ads.len(), 1);
    assert_eq!(ads[0].get("title"), Some("Sponsored"));
}

#[test]
fn test_parallel_extraction_shares_specifications() {
    let extractor = Extractor::builtin().unwrap();
    let expected = extractor.extract(GOOGLE_PAGE, builtin::GOOGLE).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| extractor.extract(GOOGLE_PAGE, builtin::GOOGLE).unwrap()))
            .collect();

        for handle in handles {
            let extraction = handle.join().unwrap();
            for category in ["organic", "ads", "related_searches"] {
                assert_eq!(extraction.records(category), expected.records(category));
            }
        }
    });
}

#[test]
fn test_harvest_rows_keyed_by_query_and_rank() {
    init_tracing();
    let extractor = Extractor::builtin().unwrap();
    let page = CapturedPage::new("shoes", builtin::GOOGLE, GOOGLE_PAGE)
        .with_captured_at(Utc.with_ymd_and_hms(2015, 3, 14, 9, 26, 53).unwrap());
    let mut sink = MemorySink::new();

    let summary = harvest(&extractor, &page, &mut sink).unwrap();
    assert_eq!(summary.total(), 7);

    let ads = sink.rows_for("shoes", "ads");
    assert_eq!(ads.len(), 2);
    assert_eq!(ads[0].rank, 1);
    assert_eq!(ads[1].rank, 2);
    assert_eq!(ads[0].date.to_string(), "2015-03-14");
    assert_eq!(
        ads[1].fields.get("link").map(String::as_str),
        Some("https://www.googleadservices.com/aclk?sa=3")
    );

    // Same page again at the same instant collides with stored keys.
    let err = harvest(&extractor, &page, &mut sink).unwrap_err();
    assert!(matches!(err, SiftError::Sink(_)));
}

#[test]
fn test_harvest_engines_share_query_and_timestamp() {
    init_tracing();
    let extractor = Extractor::builtin().unwrap();
    let captured_at = Utc.with_ymd_and_hms(2015, 3, 14, 0, 0, 0).unwrap();
    let mut sink = MemorySink::new();

    let google = CapturedPage::new("rust", builtin::GOOGLE, GOOGLE_PAGE).with_captured_at(captured_at);
    let bing = CapturedPage::new("rust", builtin::BING, BING_PAGE).with_captured_at(captured_at);

    harvest(&extractor, &google, &mut sink).unwrap();
    let summary = harvest(&extractor, &bing, &mut sink).unwrap();
    assert!(summary.total() > 0);
    assert_eq!(sink.batch_count(), 2);

    let organic = sink.rows_for("rust", "organic");
    assert!(organic.iter().any(|r| r.source_type == builtin::BING && r.rank == 1));
    assert!(organic.iter().any(|r| r.source_type == builtin::GOOGLE && r.rank == 1));
}
