pub mod error;
pub mod success;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILED: &str = "failed";
