//! Visible text rendering for matched elements

use scraper::ElementRef;

/// Elements whose content never renders as text
const NON_RENDERED: &[&str] = &["script", "style", "noscript", "template"];

/// Renders the visible text of an element
///
/// Descendant text nodes are concatenated in document order with markup
/// stripped; `<br>` counts as a space and non-rendered subtrees (scripts,
/// styles) are skipped. The result is whitespace-normalized.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    normalize_whitespace(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            let name = child_element.value().name();
            if name == "br" {
                out.push(' ');
            } else if !NON_RENDERED.contains(&name) {
                collect_text(child_element, out);
            }
        }
    }
}

/// Collapses every whitespace run to a single space and trims both ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
