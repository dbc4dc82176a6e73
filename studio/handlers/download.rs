use tracing::info;

use crate::routes::{jpeg_download_response, text_response, HttpResponse};
use crate::state::SharedState;

const GONE_MSG: &str = "File not found or already downloaded.";

/// `GET /download/{id}`
///
/// Serves the stored JPEG once as an attachment; unknown, expired and
/// already-served ids get a plain 404.
pub fn handle(id: &str, state: &SharedState) -> HttpResponse {
    match state.download(id) {
        Ok(blob) => {
            info!(id, filename = %blob.filename, bytes = blob.content.len(), "serving download");
            jpeg_download_response(blob.content, &blob.filename)
        }
        Err(_) => text_response(404, GONE_MSG),
    }
}
