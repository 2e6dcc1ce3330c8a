//! Built-in specifications for the supported search engines
//!
//! Each definition is a snapshot of one engine's result-page layout. When an
//! engine changes its markup these rules must be updated by hand; a stale
//! rule shows up as empty categories, not as an error.

use crate::spec::types::{
    AcceptancePolicy, CategoryDefinition, ExtractionMode, FieldDefinition, SpecDefinition,
};

pub const GOOGLE: &str = "google";
pub const BING: &str = "bing";
pub const YAHOO: &str = "yahoo";

/// Returns the definitions of every built-in source type
pub fn builtin_definitions() -> Vec<SpecDefinition> {
    vec![google(), bing(), yahoo()]
}

fn field(name: &str, selector: &str, mode: ExtractionMode) -> FieldDefinition {
    FieldDefinition {
        name: name.to_string(),
        selector: selector.to_string(),
        mode,
    }
}

fn href() -> ExtractionMode {
    ExtractionMode::Attribute("href".to_string())
}

fn require_all(fields: &[&str]) -> AcceptancePolicy {
    AcceptancePolicy::RequireAll(fields.iter().map(|f| f.to_string()).collect())
}

/// Listing categories share one field layout across engines
fn listing(
    name: &str,
    scope: &str,
    anchor: &str,
    visible_url: &str,
    creative: &str,
    acceptance: AcceptancePolicy,
) -> CategoryDefinition {
    CategoryDefinition {
        name: name.to_string(),
        scope: scope.to_string(),
        acceptance,
        fields: vec![
            field("title", anchor, ExtractionMode::Text),
            field("link", anchor, href()),
            field("visible_url", visible_url, ExtractionMode::RawInnerContent),
            field("creative", creative, ExtractionMode::Text),
        ],
    }
}

fn google() -> SpecDefinition {
    // Ad anchors carry a class; the hidden tracking duplicate is styled inline.
    let ad_anchor = r#"a[class]:not([class^="display:none"])"#;

    SpecDefinition {
        source_type: GOOGLE.to_string(),
        categories: vec![
            listing(
                "organic",
                "div.g",
                "h3.r > a",
                "cite",
                "span.st",
                require_all(&["title", "link"]),
            ),
            listing(
                "ads",
                r#"li[class*="ads-ad"]"#,
                ad_anchor,
                "cite",
                r#"div[class*="ads-creative"]"#,
                require_all(&["title", "link", "visible_url", "creative"]),
            ),
            CategoryDefinition {
                name: "related_searches".to_string(),
                scope: "div#brs p".to_string(),
                acceptance: AcceptancePolicy::AnyField,
                fields: vec![field("query", "a", ExtractionMode::Text)],
            },
        ],
    }
}

fn bing() -> SpecDefinition {
    SpecDefinition {
        source_type: BING.to_string(),
        categories: vec![
            listing(
                "organic",
                "li.b_algo",
                "h2 > a",
                "div.b_attribution > cite",
                "div.b_caption > p",
                require_all(&["title", "link"]),
            ),
            listing(
                "ads",
                "li.b_ad > ul > li",
                "h2 > a",
                "div.b_attribution cite",
                "div.b_caption p",
                require_all(&["title", "link", "visible_url", "creative"]),
            ),
        ],
    }
}

fn yahoo() -> SpecDefinition {
    SpecDefinition {
        source_type: YAHOO.to_string(),
        categories: vec![
            listing(
                "organic",
                "div.algo",
                "h3.title > a",
                "div.compTitle span.fz-ms",
                "div.compText > p",
                require_all(&["title", "link"]),
            ),
            listing(
                "ads",
                "ol.searchCenterTopAds > li, ol.searchCenterBottomAds > li",
                "h3.title > a",
                "div.compTitle span.fz-ms",
                "div.compText",
                require_all(&["title", "link", "visible_url", "creative"]),
            ),
        ],
    }
}
