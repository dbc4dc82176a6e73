//! Template renderer for the studio's single page.
//!
//! The page is one HTML file (`studio/assets/studio.html`) loaded at compile
//! time, with `{{TOKEN}}` placeholders for the limits the server enforces.

use product_studio::canvas::dimensions::{CANVAS_SIZE, DEFAULT_BOX_SIZE, MIN_BOX_SIZE};
use product_studio::service::MAX_PRODUCT_NAME_CHARS;

const TEMPLATE: &str = include_str!("assets/studio.html");

/// Renders the form page with every placeholder filled.
pub fn render_page() -> String {
    let html = TEMPLATE
        .replace("{{MAX_NAME_CHARS}}", &MAX_PRODUCT_NAME_CHARS.to_string())
        .replace("{{MIN_BOX}}",        &MIN_BOX_SIZE.to_string())
        .replace("{{MAX_BOX}}",        &CANVAS_SIZE.to_string())
        .replace("{{DEFAULT_BOX}}",    &DEFAULT_BOX_SIZE.to_string());
    blank_remaining(html)
}

/// Replaces any `{{TOKEN}}` that wasn't substituted with an empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}
