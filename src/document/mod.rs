//! Document model for captured result pages
//!
//! This module wraps raw markup into a queryable tree:
//! - Lenient HTML5 parsing (missing closing tags and similar damage are repaired)
//! - CSS selector queries over the whole document or within one element
//! - Text rendering helpers used by the field resolver

mod text;

pub use text::{normalize_whitespace, visible_text};

use scraper::{ElementRef, Html, Selector};

use crate::ParseError;

/// A parsed, immutable markup tree owned by one extraction call
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses markup into a document tree
    ///
    /// Tree construction follows the HTML5 algorithm, so unclosed tags, stray
    /// end tags and misnested elements are repaired the way a browser would.
    ///
    /// # Example
    ///
    /// ```
    /// use serp_sift::Document;
    /// use scraper::Selector;
    ///
    /// let doc = Document::parse("<ul><li>one<li>two</ul>").unwrap();
    /// let items = doc.select(&Selector::parse("li").unwrap());
    /// assert_eq!(items.len(), 2);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let html = Html::parse_document(raw);

        if !html.errors.is_empty() {
            tracing::trace!("Recovered from {} markup errors", html.errors.len());
        }

        Ok(Self { html })
    }

    /// Parses markup from raw bytes
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - The bytes were valid UTF-8 and were parsed
    /// * `Err(ParseError::Encoding)` - The bytes cannot be tokenized
    pub fn parse_bytes(raw: &[u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(raw).map_err(|e| ParseError::Encoding {
            valid_up_to: e.valid_up_to(),
        })?;
        Self::parse(text)
    }

    /// Returns every element matching `selector`, in document order
    pub fn select<'a>(&'a self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.html.select(selector).collect()
    }
}

/// Returns the descendants of `scope` matching `selector`, in document order
///
/// The scope element itself is never part of the result.
pub fn select_within<'a>(scope: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    scope.select(selector).collect()
}
