pub mod canvas;
pub mod config;
pub mod copy;
pub mod error;
pub mod ratelimit;
pub mod service;
pub mod store;

// Convenience re-exports
pub use canvas::dimensions::NormalizedDimensions;
pub use canvas::letterbox::letterbox_jpeg;
pub use config::StudioConfig;
pub use copy::{CopyGenerator, CopyResult, GeminiClient};
pub use error::StudioError;
pub use ratelimit::FixedWindowLimiter;
pub use service::{ResizeRequest, ResizeResponse, ResizeService, UploadedImage};
pub use store::BlobStore;
