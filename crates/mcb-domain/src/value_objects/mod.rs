//! Small newtype wrappers that give primitive values a domain-specific type.

pub mod ids;

pub use ids::JobId;
