use tracing::error;

use product_studio::{ResizeRequest, UploadedImage};

use crate::routes::{error_response, json_response, HttpResponse, Incoming};
use crate::state::SharedState;
use crate::util::multipart::{extract_boundary, file_field, parse_parts, text_field};

// ---------------------------------------------------------------------------
// POST /resize
// ---------------------------------------------------------------------------

pub fn handle_post(incoming: &Incoming, state: &SharedState) -> HttpResponse {
    let request = read_form(incoming);

    match state.handle(request, incoming.client) {
        Ok(body) => json_response(200, &body),
        Err(err) => {
            if err.status_code() >= 500 {
                error!(client = %incoming.client, error = %err, "resize failed");
            }
            error_response(&err)
        }
    }
}

/// Pulls the form fields out of a multipart body. Anything that is not
/// multipart reads as an empty submission.
fn read_form(incoming: &Incoming) -> ResizeRequest {
    if !incoming.content_type.starts_with("multipart/form-data") {
        return ResizeRequest::default();
    }
    let Some(boundary) = extract_boundary(&incoming.content_type) else {
        return ResizeRequest::default();
    };

    let parts = parse_parts(&incoming.body, &boundary);
    let image = file_field(&parts, "image")
        .filter(|part| !part.data.is_empty())
        .map(|part| UploadedImage {
            bytes:        part.data.to_vec(),
            filename:     part.filename.clone().filter(|f| !f.is_empty()),
            content_type: part.content_type.clone(),
        });

    ResizeRequest {
        product_name:     text_field(&parts, "productName"),
        image,
        requested_width:  text_field(&parts, "resizeWidth"),
        requested_height: text_field(&parts, "resizeHeight"),
    }
}
