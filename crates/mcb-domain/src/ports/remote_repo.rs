//! The remote repository client port (used by the source fetcher, C1).

use async_trait::async_trait;

use crate::error::Result;

/// A single entry discovered while walking a remote repository tree.
#[derive(Debug, Clone)]
pub struct RemoteEntry {
    /// Repository-relative path.
    pub path: String,
    /// `true` if this entry is a directory.
    pub is_dir: bool,
}

/// Capability for walking and fetching files from a remote repository host.
///
/// Abstracted behind this trait per the state machine ("remote LLM and external page
/// APIs ... abstracted behind narrow interfaces"), generalized to remote
/// repository access as well since it is likewise an out-of-scope external
/// collaborator.
#[async_trait]
pub trait RemoteRepoClient: Send + Sync {
    /// List the full recursive tree for `owner/repo`.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::RemoteFetch`] on an unreachable host,
    /// malformed owner/repo, or a non-2xx response.
    async fn list_tree(&self, owner: &str, repo: &str) -> Result<Vec<RemoteEntry>>;

    /// Fetch and base64-decode the contents of `path` within `owner/repo`.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::RemoteFetch`] on an unreachable host
    /// or a non-2xx response.
    async fn fetch_file(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<u8>>;
}
