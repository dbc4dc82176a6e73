use std::net::IpAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::canvas::dimensions::NormalizedDimensions;
use crate::canvas::filename::output_filename;
use crate::canvas::letterbox::letterbox_jpeg;
use crate::copy::{generate_copy, CopyGenerator, CopyResult};
use crate::error::StudioError;
use crate::ratelimit::FixedWindowLimiter;
use crate::store::{BlobStore, StoredBlob};

/// Longest accepted product name, in characters, after trimming.
pub const MAX_PRODUCT_NAME_CHARS: usize = 100;

const MISSING_INPUT_MSG: &str = "Enter at least one field: product name or image.";
const NAME_TOO_LONG_MSG: &str = "The product name cannot exceed 100 characters.";

/// An uploaded file as received from the form.
#[derive(Debug, Clone, Default)]
pub struct UploadedImage {
    pub bytes:        Vec<u8>,
    pub filename:     Option<String>,
    pub content_type: Option<String>,
}

/// Fields of one `/resize` submission. Dimensions stay raw text until
/// normalization.
#[derive(Debug, Clone, Default)]
pub struct ResizeRequest {
    pub product_name:     Option<String>,
    pub image:            Option<UploadedImage>,
    pub requested_width:  Option<String>,
    pub requested_height: Option<String>,
}

impl ResizeRequest {
    /// The trimmed product name, if one was actually typed.
    pub fn trimmed_name(&self) -> Option<&str> {
        self.product_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Successful `/resize` body; fields are `null` for branches that did not run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeResponse {
    pub description:    Option<CopyResult>,
    pub image_id:       Option<String>,
    pub preview_base64: Option<String>,
}

/// Result of the image branch.
struct PreparedImage {
    id:      String,
    preview: String,
}

/// Everything the HTTP layer needs: the blob store, the limiter and the copy
/// generator, plus the orchestration between them.
pub struct ResizeService {
    store:     BlobStore,
    limiter:   FixedWindowLimiter,
    generator: Box<dyn CopyGenerator>,
}

impl ResizeService {
    pub fn new(generator: Box<dyn CopyGenerator>) -> Self {
        Self::with_parts(BlobStore::new(), FixedWindowLimiter::default(), generator)
    }

    pub fn with_parts(
        store: BlobStore,
        limiter: FixedWindowLimiter,
        generator: Box<dyn CopyGenerator>,
    ) -> Self {
        ResizeService { store, limiter, generator }
    }

    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    /// Validates, letterboxes the image and drafts copy, in one pass.
    ///
    /// Only requests carrying a product name count against `client`'s limit.
    pub fn handle(&self, request: ResizeRequest, client: IpAddr) -> Result<ResizeResponse, StudioError> {
        let started = Instant::now();
        let name = request.trimmed_name();

        if name.is_some() {
            if let Err(err) = self.limiter.check(client) {
                warn!(%client, "copy rate limit reached");
                return Err(err);
            }
        }

        let image = request.image.as_ref().filter(|img| !img.bytes.is_empty());
        if image.is_none() && name.is_none() {
            return Err(StudioError::validation(MISSING_INPUT_MSG));
        }
        if name.is_some_and(|n| n.chars().count() > MAX_PRODUCT_NAME_CHARS) {
            return Err(StudioError::validation(NAME_TOO_LONG_MSG));
        }

        let prepared = match image {
            Some(upload) => Some(self.prepare_image(&request, upload, name)?),
            None => None,
        };
        let description = name.map(|n| generate_copy(self.generator.as_ref(), n));

        info!(
            %client,
            image = prepared.is_some(),
            copy = description.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "processed resize request"
        );

        let (image_id, preview_base64) = match prepared {
            Some(p) => (Some(p.id), Some(p.preview)),
            None => (None, None),
        };
        Ok(ResizeResponse { description, image_id, preview_base64 })
    }

    fn prepare_image(
        &self,
        request: &ResizeRequest,
        upload: &UploadedImage,
        name: Option<&str>,
    ) -> Result<PreparedImage, StudioError> {
        let dims = NormalizedDimensions::from_form(
            request.requested_width.as_deref(),
            request.requested_height.as_deref(),
        );
        let jpeg = letterbox_jpeg(&upload.bytes, &dims)?;
        let preview = BASE64.encode(&jpeg);
        let filename = output_filename(name, upload.filename.as_deref());
        debug!(width = dims.width, height = dims.height, %filename, bytes = jpeg.len(), "letterboxed upload");

        let id = self.store.put(jpeg, filename);
        Ok(PreparedImage { id, preview })
    }

    /// Hands out a stored image once; later calls get `NotFound`.
    pub fn download(&self, id: &str) -> Result<StoredBlob, StudioError> {
        self.store.take_once(id).ok_or(StudioError::NotFound)
    }

    /// Drops expired images and elapsed rate-limit windows.
    pub fn sweep(&self) -> (usize, usize) {
        (self.store.sweep_expired(), self.limiter.prune())
    }
}

/// Calls [`ResizeService::sweep`] every `interval` for the life of the process.
pub fn spawn_housekeeping(service: Arc<ResizeService>, interval: Duration) -> JoinHandle<()> {
    thread::spawn(move || loop {
        thread::sleep(interval);
        let (blobs, clients) = service.sweep();
        if blobs > 0 || clients > 0 {
            debug!(blobs, clients, "housekeeping sweep");
        }
    })
}
