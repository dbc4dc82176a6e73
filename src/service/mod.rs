pub mod resize;

pub use resize::{
    spawn_housekeeping, ResizeRequest, ResizeResponse, ResizeService, UploadedImage,
    MAX_PRODUCT_NAME_CHARS,
};
