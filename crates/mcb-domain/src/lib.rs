//! Domain layer for the code-quality analysis service.
//!
//! Holds the core entities ([`entities`]), the port traits concrete
//! providers implement ([`ports`]), the shared `Error` type, and the
//! fixed tables (secret patterns, defaults) the rest of the pipeline
//! draws on. No I/O happens here; async is limited to trait signatures.

pub mod constants;
pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{error_kind_label, Error, Result};
