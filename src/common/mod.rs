pub mod errors;
pub mod render;
pub mod setup;

pub use errors::{NetworkError, Result};
