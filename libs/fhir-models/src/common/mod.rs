//! Patient and Bundle models shared by the client and the CLI

pub mod bundle;
pub mod error;
pub mod patient;

// Re-export commonly used types
pub use bundle::*;
pub use error::{Error, Result};
pub use patient::*;
