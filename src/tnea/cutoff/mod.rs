pub mod config;
pub mod error;
pub mod export;
pub mod io;
pub mod listing;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod query;

pub use error::{FetchError, Result, ToolError};
