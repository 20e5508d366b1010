//! GitHub-backed code-generation collaborator
//!
//! Launching a venture fires a `repository_dispatch` event at the
//! factory repository; a workflow there picks the event up and
//! generates the product scaffold. All dispatches go through the
//! process-wide call gate so a burst of launches cannot trip GitHub's
//! secondary rate limits.

use async_trait::async_trait;
use serde_json::json;

use crate::error::OrchestratorResult;
use crate::gate::{CallFailure, CallGate};
use crate::traits::{ScaffoldReceipt, Scaffolder};
use shared::{actor_warn, Actor, Blueprint, Venture};

const DISPATCH_EVENT: &str = "venture_approved";

/// Fires `repository_dispatch` events for approved ventures
pub struct GithubScaffolder {
    client: reqwest::Client,
    /// `owner/repo`, from `GITHUB_REPOSITORY`
    repo: Option<String>,
    token: Option<String>,
}

impl GithubScaffolder {
    pub fn new(repo: Option<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            repo,
            token,
        }
    }

    /// Configure from `GITHUB_REPOSITORY` / `GITHUB_TOKEN`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("GITHUB_REPOSITORY").ok(),
            std::env::var("GITHUB_TOKEN").ok(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.repo.is_some() && self.token.is_some()
    }
}

#[async_trait]
impl Scaffolder for GithubScaffolder {
    async fn request_scaffold(
        &self,
        venture: &Venture,
        blueprint: &Blueprint,
    ) -> OrchestratorResult<ScaffoldReceipt> {
        let (Some(repo), Some(token)) = (&self.repo, &self.token) else {
            actor_warn!(
                Actor::Launcher,
                "⚠️ GitHub integration not configured, scaffold skipped"
            );
            return Ok(ScaffoldReceipt {
                accepted: false,
                reference: None,
            });
        };

        let url = format!("https://api.github.com/repos/{repo}/dispatches");
        let branch = format!("venture/{}", venture.slug);
        let body = json!({
            "event_type": DISPATCH_EVENT,
            "client_payload": {
                "venture_id": venture.id,
                "venture_name": venture.name,
                "slug": venture.slug,
                "branch": branch,
                "blueprint": blueprint,
            },
        });

        let receipt = CallGate::shared()
            .enqueue(|| {
                let request = self
                    .client
                    .post(&url)
                    .bearer_auth(token)
                    .header("Accept", "application/vnd.github+json")
                    .header("User-Agent", "venture-factory")
                    .json(&body);
                let branch = branch.clone();
                async move {
                    let response = request.send().await.map_err(|err| {
                        CallFailure::Failed(anyhow::anyhow!("dispatch request failed: {err}"))
                    })?;

                    match response.status() {
                        status if status.is_success() => Ok(ScaffoldReceipt {
                            accepted: true,
                            reference: Some(branch),
                        }),
                        reqwest::StatusCode::TOO_MANY_REQUESTS => Err(CallFailure::Throttled),
                        status => {
                            let detail = response.text().await.unwrap_or_default();
                            Err(CallFailure::Failed(anyhow::anyhow!(
                                "dispatch rejected with {status}: {detail}"
                            )))
                        }
                    }
                }
            })
            .await?;

        Ok(receipt)
    }
}
