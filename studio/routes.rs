use std::io::{Cursor, Read};
use std::net::{IpAddr, Ipv4Addr};

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::error;

use product_studio::StudioError;

use crate::handlers;
use crate::state::SharedState;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024; // 25 MB

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(field: &str, value: &str) -> Option<Header> {
    Header::from_bytes(field.as_bytes(), value.as_bytes()).ok()
}

fn bytes_response(status: u16, headers: Vec<Option<Header>>, body: Vec<u8>) -> HttpResponse {
    let len = body.len();
    Response::new(
        StatusCode(status),
        headers.into_iter().flatten().collect(),
        Cursor::new(body),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> HttpResponse {
    bytes_response(
        200,
        vec![header("Content-Type", "text/html; charset=utf-8")],
        body.into_bytes(),
    )
}

pub fn text_response(status: u16, body: &str) -> HttpResponse {
    bytes_response(
        status,
        vec![header("Content-Type", "text/plain; charset=utf-8")],
        body.as_bytes().to_vec(),
    )
}

pub fn json_response<T: Serialize>(status: u16, value: &T) -> HttpResponse {
    match serde_json::to_vec(value) {
        Ok(body) => bytes_response(status, vec![header("Content-Type", "application/json")], body),
        Err(e) => {
            error!(error = %e, "failed to serialize response body");
            error_response(&StudioError::internal(e.to_string()))
        }
    }
}

/// `{ "error": ... }` with the status the error maps to.
pub fn error_response(err: &StudioError) -> HttpResponse {
    let body = err.to_json().to_string().into_bytes();
    let mut headers = vec![header("Content-Type", "application/json")];
    if let Some(retry) = err.retry_after() {
        headers.push(header("Retry-After", &retry.to_string()));
    }
    bytes_response(err.status_code(), headers, body)
}

pub fn jpeg_download_response(body: Vec<u8>, filename: &str) -> HttpResponse {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    bytes_response(
        200,
        vec![
            header("Content-Type", "image/jpeg"),
            header("Content-Disposition", &disposition),
        ],
        body,
    )
}

pub fn not_found() -> HttpResponse {
    text_response(404, "404 Not Found")
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// What the router needs from an incoming request, independent of the
/// transport so it can be built directly in tests.
pub struct Incoming {
    pub method:       Method,
    pub url:          String,
    pub content_type: String,
    pub body:         Vec<u8>,
    pub client:       IpAddr,
}

/// Reads the request, routes it and writes the response back.
pub fn dispatch(mut request: Request, state: SharedState) {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();
    let client = request.remote_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    let mut body: Vec<u8> = Vec::new();
    if *request.method() == Method::Post {
        let limit = MAX_BODY_BYTES as u64 + 1;
        if let Err(e) = request.as_reader().take(limit).read_to_end(&mut body) {
            let resp = error_response(&StudioError::validation(format!("Could not read request body: {}", e)));
            let _ = request.respond(resp);
            return;
        }
    }

    let incoming = Incoming {
        method: request.method().clone(),
        url: request.url().to_owned(),
        content_type,
        body,
        client,
    };

    let response = route(incoming, &state);
    let _ = request.respond(response);
}

/// Maps method and path to a handler.
pub fn route(incoming: Incoming, state: &SharedState) -> HttpResponse {
    let path = match incoming.url.find('?') {
        Some(pos) => incoming.url[..pos].to_owned(),
        None => incoming.url.clone(),
    };

    // Download — dynamic path segment.
    if incoming.method == Method::Get {
        if let Some(id) = path.strip_prefix("/download/") {
            return handlers::download::handle(id, state);
        }
    }

    match (&incoming.method, path.as_str()) {
        (Method::Get,  "/")        => handlers::index::handle_get(),
        (Method::Get,  "/healthz") => text_response(200, "ok"),
        (Method::Post, "/resize")  => {
            if incoming.body.len() > MAX_BODY_BYTES {
                return error_response(&StudioError::validation("Upload exceeds the 25 MB limit."));
            }
            handlers::resize::handle_post(&incoming, state)
        }
        _ => not_found(),
    }
}
