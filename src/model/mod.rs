pub mod global_error;
pub mod issue;

pub use global_error::{AppError, ErrorCode, ErrorResponse};
