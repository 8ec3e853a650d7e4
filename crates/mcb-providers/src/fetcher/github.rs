//! GitHub-backed [`RemoteRepoClient`].
//!
//! Walks the contents API directory-by-directory rather than the recursive
//! git-trees endpoint: one request per directory, the same rate-limit
//! profile a token-gated integration is expected to have.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use mcb_domain::error::{Error, Result};
use mcb_domain::ports::{RemoteEntry, RemoteRepoClient};

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Parse a GitHub repository URL into `(owner, repo)`.
///
/// Accepts `https://github.com/{owner}/{repo}[.git]` and
/// `git@github.com:{owner}/{repo}[.git]` forms.
///
/// # Errors
/// Returns [`Error::InputValidation`] if `url` is not a recognizable GitHub
/// repository reference.
pub fn parse_github_url(url: &str) -> Result<(String, String)> {
    let trimmed = url.trim();

    let path = if let Some(rest) = trimmed.strip_prefix("git@github.com:") {
        rest
    } else {
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        without_scheme
            .strip_prefix("github.com/")
            .or_else(|| without_scheme.strip_prefix("www.github.com/"))
            .ok_or_else(|| Error::input_validation(format!("not a GitHub repository URL: {url}")))?
    };

    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut segments = path.trim_matches('/').splitn(2, '/');
    let (Some(owner), Some(repo)) = (segments.next(), segments.next()) else {
        return Err(Error::input_validation(format!("not a GitHub repository URL: {url}")));
    };
    if owner.is_empty() || repo.is_empty() {
        return Err(Error::input_validation(format!("not a GitHub repository URL: {url}")));
    }

    Ok((owner.to_owned(), repo.to_owned()))
}

/// [`RemoteRepoClient`] backed by the GitHub REST contents API.
pub struct GithubRepoClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl GithubRepoClient {
    /// Construct a client, optionally authenticated with a personal access
    /// token (`REMOTE_REPO_API_TOKEN`) to raise GitHub's unauthenticated
    /// rate limit.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    fn contents_url(owner: &str, repo: &str, path: &str) -> String {
        if path.is_empty() {
            format!("{GITHUB_API_BASE}/repos/{owner}/{repo}/contents")
        } else {
            format!("{GITHUB_API_BASE}/repos/{owner}/{repo}/contents/{path}")
        }
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "mcb-quality-analyzer");
        match &self.token {
            Some(token) => builder.header("Authorization", format!("token {token}")),
            None => builder,
        }
    }

    async fn list_directory(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<ContentEntry>> {
        let url = Self::contents_url(owner, repo, path);
        let response = self
            .request(&url)
            .send()
            .await
            .map_err(|e| Error::remote_fetch_with_source(format!("GET {url} failed"), e))?;

        if !response.status().is_success() {
            return Err(Error::remote_fetch(format!(
                "GitHub API returned {} for {url}",
                response.status()
            )));
        }

        response
            .json::<Vec<ContentEntry>>()
            .await
            .map_err(|e| Error::remote_fetch_with_source(format!("malformed contents response for {url}"), e))
    }
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
}

#[derive(Debug, Deserialize)]
struct ContentFile {
    content: String,
    encoding: String,
}

#[async_trait]
impl RemoteRepoClient for GithubRepoClient {
    async fn list_tree(&self, owner: &str, repo: &str) -> Result<Vec<RemoteEntry>> {
        let mut entries = Vec::new();
        let mut pending = vec![String::new()];

        while let Some(dir) = pending.pop() {
            for entry in self.list_directory(owner, repo, &dir).await? {
                let is_dir = entry.entry_type == "dir";
                if is_dir {
                    pending.push(entry.path.clone());
                }
                entries.push(RemoteEntry {
                    path: entry.path,
                    is_dir,
                });
            }
        }

        Ok(entries)
    }

    async fn fetch_file(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<u8>> {
        let url = Self::contents_url(owner, repo, path);
        let response = self
            .request(&url)
            .send()
            .await
            .map_err(|e| Error::remote_fetch_with_source(format!("GET {url} failed"), e))?;

        if !response.status().is_success() {
            return Err(Error::remote_fetch(format!(
                "GitHub API returned {} for {url}",
                response.status()
            )));
        }

        let file: ContentFile = response
            .json()
            .await
            .map_err(|e| Error::remote_fetch_with_source(format!("malformed content response for {url}"), e))?;

        if file.encoding != "base64" {
            return Err(Error::remote_fetch(format!("unsupported encoding '{}' for {path}", file.encoding)));
        }

        base64::engine::general_purpose::STANDARD
            .decode(file.content.replace('\n', ""))
            .map_err(|e| Error::remote_fetch_with_source(format!("malformed base64 content for {path}"), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_https_url() {
        let (owner, repo) = parse_github_url("https://github.com/octocat/hello-world").unwrap();
        assert_eq!(owner, "octocat");
        assert_eq!(repo, "hello-world");
    }

    #[test]
    fn parses_a_dot_git_suffix() {
        let (owner, repo) = parse_github_url("https://github.com/octocat/hello-world.git").unwrap();
        assert_eq!(repo, "hello-world");
    }

    #[test]
    fn parses_an_ssh_url() {
        let (owner, repo) = parse_github_url("git@github.com:octocat/hello-world.git").unwrap();
        assert_eq!(owner, "octocat");
        assert_eq!(repo, "hello-world");
    }

    #[test]
    fn rejects_a_non_github_url() {
        assert!(parse_github_url("https://gitlab.com/octocat/hello-world").is_err());
    }

    #[test]
    fn rejects_a_url_missing_the_repo_segment() {
        assert!(parse_github_url("https://github.com/octocat").is_err());
    }
}
