pub mod dimensions;
pub mod filename;
pub mod letterbox;
