use crate::render::render_page;
use crate::routes::{html_response, HttpResponse};

/// `GET /`
pub fn handle_get() -> HttpResponse {
    html_response(render_page())
}
