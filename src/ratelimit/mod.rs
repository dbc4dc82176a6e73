pub mod fixed_window;

pub use fixed_window::{FixedWindowLimiter, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};
