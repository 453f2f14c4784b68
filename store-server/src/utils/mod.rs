//! Shared server utilities

pub mod error;
pub mod logger;
pub mod money;

pub use error::{AppError, AppResponse, AppResult};
pub use logger::{init_logger, init_logger_with_file};
