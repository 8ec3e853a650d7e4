//! Language analyzers (C3): pure `(path, bytes) -> (issues, metrics)`
//! adapters, one per supported language tag.

mod docker;
mod js_like;
mod python_like;

pub use docker::DockerfileAnalyzer;
pub use js_like::JsLikeAnalyzer;
pub use python_like::PythonLikeAnalyzer;
