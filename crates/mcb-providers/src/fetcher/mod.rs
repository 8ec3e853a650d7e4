//! The source fetcher (C1): materializes a working set from either an
//! uploaded bundle or a remote repository reference.

mod github;
mod remote;
mod upload;

pub use github::{parse_github_url, GithubRepoClient};
pub use remote::fetch_remote_working_set;
pub use upload::validate_upload_paths;
