pub mod download;
pub mod index;
pub mod resize;
