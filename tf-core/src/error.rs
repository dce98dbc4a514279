//! Error types re-exported from the shared tf-error crate

pub use tf_error::{Result, ThermofanError};
