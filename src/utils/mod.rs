pub mod handle;
pub mod password;

pub use handle::validate_handle;
