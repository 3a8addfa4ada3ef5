//! GitHub API helpers: fetching the changed files of a compare range and
//! creating/updating the coverage comment on a pull request.

use anyhow::{bail, Context as _, Result};
use serde::Deserialize;

use crate::model::ChangedFile;

/// Resolved GitHub Actions context, read from environment variables.
pub struct Context {
    token: String,
    repo: String,
    pub pr_number: Option<u64>,
}

impl Context {
    /// Build a context from standard GitHub Actions environment variables
    /// (`GITHUB_TOKEN`, `GITHUB_REPOSITORY`, `GITHUB_REF`).
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN")
            .context("GITHUB_TOKEN environment variable is required")?;
        let repo = std::env::var("GITHUB_REPOSITORY")
            .context("GITHUB_REPOSITORY environment variable is required")?;
        let pr_number = pr_number_from_ref();
        Ok(Self {
            token,
            repo,
            pr_number,
        })
    }

    /// Fetch the files changed between two revisions via the compare API.
    pub fn fetch_changed_files(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>> {
        eprintln!("Fetching changed files for {}: {base}...{head}", self.repo);
        fetch_changed_files(&self.token, &self.repo, base, head)
    }

    /// Create or update the coverage comment on the pull request.
    ///
    /// When `update` is set and `title` is non-empty, an existing comment
    /// whose body starts with the title is replaced; otherwise a new
    /// comment is created.
    pub fn post_comment(&self, pr_number: u64, title: &str, body: &str, update: bool) -> Result<()> {
        post_comment(&self.token, &self.repo, pr_number, title, body, update)?;
        eprintln!("Comment posted to {}/pull/{pr_number}", self.repo);
        Ok(())
    }
}

/// Extract PR number from GITHUB_REF (e.g. "refs/pull/42/merge" → 42).
fn pr_number_from_ref() -> Option<u64> {
    let github_ref = std::env::var("GITHUB_REF").ok()?;
    let parts: Vec<&str> = github_ref.split('/').collect();
    if parts.len() >= 3 && parts[0] == "refs" && parts[1] == "pull" {
        parts[2].parse().ok()
    } else {
        None
    }
}

fn api_get(token: &str, url: &str) -> ureq::Request {
    ureq::get(url)
        .set("Authorization", &format!("Bearer {}", token))
        .set("Accept", "application/vnd.github+json")
        .set("User-Agent", "covpr")
        .set("X-GitHub-Api-Version", "2022-11-28")
}

#[derive(Deserialize)]
struct CompareFile {
    filename: String,
    blob_url: String,
}

#[derive(Deserialize)]
struct CompareResponse {
    #[serde(default)]
    files: Vec<CompareFile>,
}

fn fetch_changed_files(
    token: &str,
    repo: &str,
    base: &str,
    head: &str,
) -> Result<Vec<ChangedFile>> {
    let url = format!(
        "https://api.github.com/repos/{}/compare/{}...{}",
        repo, base, head
    );
    let resp = api_get(token, &url)
        .call()
        .context("Failed to compare revisions on GitHub")?;

    let compare: CompareResponse = resp.into_json().context("Failed to parse compare JSON")?;
    Ok(compare
        .files
        .into_iter()
        .map(|file| ChangedFile {
            file_path: file.filename,
            url: file.blob_url,
        })
        .collect())
}

#[derive(Deserialize)]
struct Comment {
    id: u64,
    body: Option<String>,
}

/// Find an existing coverage comment on a PR (by its title prefix).
fn find_existing_comment(
    token: &str,
    repo: &str,
    pr_number: u64,
    title: &str,
) -> Result<Option<u64>> {
    let mut page = 1u32;
    loop {
        let url = format!(
            "https://api.github.com/repos/{}/issues/{}/comments?per_page=100&page={}",
            repo, pr_number, page
        );
        let resp = api_get(token, &url)
            .call()
            .context("Failed to list PR comments")?;

        let comments: Vec<Comment> = resp.into_json().context("Failed to parse comments JSON")?;
        if comments.is_empty() {
            break;
        }
        for c in &comments {
            if let Some(ref body) = c.body {
                if body.starts_with(title) {
                    return Ok(Some(c.id));
                }
            }
        }
        page += 1;
    }
    Ok(None)
}

fn post_comment(
    token: &str,
    repo: &str,
    pr_number: u64,
    title: &str,
    body: &str,
    update: bool,
) -> Result<()> {
    let existing = if update && !title.is_empty() {
        find_existing_comment(token, repo, pr_number, title)?
    } else {
        None
    };

    match existing {
        Some(comment_id) => {
            let url = format!(
                "https://api.github.com/repos/{}/issues/comments/{}",
                repo, comment_id
            );
            let resp = ureq::patch(&url)
                .set("Authorization", &format!("Bearer {}", token))
                .set("Accept", "application/vnd.github+json")
                .set("User-Agent", "covpr")
                .set("X-GitHub-Api-Version", "2022-11-28")
                .send_json(serde_json::json!({ "body": body }));
            match resp {
                Ok(_) => {}
                Err(ureq::Error::Status(code, resp)) => {
                    let body = resp.into_string().unwrap_or_default();
                    bail!(
                        "GitHub API error updating comment (HTTP {}): {}",
                        code,
                        body
                    );
                }
                Err(e) => bail!("Failed to update comment: {}", e),
            }
        }
        None => {
            let url = format!(
                "https://api.github.com/repos/{}/issues/{}/comments",
                repo, pr_number
            );
            let resp = ureq::post(&url)
                .set("Authorization", &format!("Bearer {}", token))
                .set("Accept", "application/vnd.github+json")
                .set("User-Agent", "covpr")
                .set("X-GitHub-Api-Version", "2022-11-28")
                .send_json(serde_json::json!({ "body": body }));
            match resp {
                Ok(_) => {}
                Err(ureq::Error::Status(code, resp)) => {
                    let body = resp.into_string().unwrap_or_default();
                    bail!(
                        "GitHub API error creating comment (HTTP {}): {}",
                        code,
                        body
                    );
                }
                Err(e) => bail!("Failed to create comment: {}", e),
            }
        }
    }

    Ok(())
}
