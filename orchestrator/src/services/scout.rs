//! Inbox-backed signal source
//!
//! Candidate opportunities arrive as JSON draft files dropped into an
//! inbox directory (by an operator or an upstream feed scraper). Each
//! discovery pass parses up to `max` drafts, mints full candidates
//! from them, and moves the consumed drafts aside so they are only
//! discovered once.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tokio::fs;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::SignalSource;
use shared::{
    actor_debug, actor_warn, Actor, AskingPrice, Candidate, CandidateId, CandidateStatus,
    CompetitorNote, CriteriaFlags, Provenance, RiskNote, Track,
};

/// The fields an operator writes by hand; everything else is minted.
#[derive(Debug, Deserialize)]
struct CandidateDraft {
    source: Provenance,
    source_url: String,
    problem: String,
    target_audience: String,
    pitch: String,
    price: AskingPrice,
    track: Track,
    #[serde(default)]
    key_features: Vec<String>,
    #[serde(default)]
    competitors: Vec<CompetitorNote>,
    #[serde(default)]
    advantage: String,
    #[serde(default)]
    criteria: CriteriaFlags,
    #[serde(default)]
    risks: Vec<RiskNote>,
}

/// Reads candidate drafts from a JSON inbox directory
pub struct InboxSignalSource {
    inbox_dir: PathBuf,
}

impl InboxSignalSource {
    pub fn new(inbox_dir: PathBuf) -> Self {
        Self { inbox_dir }
    }

    fn processed_dir(&self) -> PathBuf {
        self.inbox_dir.join("processed")
    }

    fn failed_dir(&self) -> PathBuf {
        self.inbox_dir.join("failed")
    }
}

#[async_trait]
impl SignalSource for InboxSignalSource {
    async fn discover(&self, max: u32) -> OrchestratorResult<Vec<Candidate>> {
        let mut entries = match fs::read_dir(&self.inbox_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                actor_debug!(Actor::Scout, "Inbox {} does not exist", self.inbox_dir.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut draft_paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                draft_paths.push(path);
            }
        }
        // deterministic pick order when the inbox holds more than max
        draft_paths.sort();

        let mut candidates = Vec::new();
        for (index, path) in draft_paths.iter().take(max as usize).enumerate() {
            let content = fs::read_to_string(path).await?;
            // a malformed draft must not block the rest of the batch;
            // set it aside so the operator can fix or drop it
            let draft: CandidateDraft = match serde_json::from_str(&content) {
                Ok(draft) => draft,
                Err(err) => {
                    actor_warn!(
                        Actor::Scout,
                        "⚠️ Malformed draft {} set aside: {err}",
                        path.display()
                    );
                    let failed = self.failed_dir();
                    fs::create_dir_all(&failed).await?;
                    if let Some(file_name) = path.file_name() {
                        fs::rename(path, failed.join(file_name)).await?;
                    }
                    continue;
                }
            };

            // spread discovery timestamps so minted ids stay unique
            // within one pass
            let discovered_at = Utc::now() + Duration::seconds(index as i64);
            let confidence_score = draft.criteria.confidence_score();

            candidates.push(Candidate {
                id: CandidateId::mint(discovered_at),
                discovered_at,
                source: draft.source,
                source_url: draft.source_url,
                confidence_score,
                problem: draft.problem,
                target_audience: draft.target_audience,
                pitch: draft.pitch,
                price: draft.price,
                track: draft.track,
                key_features: draft.key_features,
                competitors: draft.competitors,
                advantage: draft.advantage,
                criteria: draft.criteria,
                risks: draft.risks,
                status: CandidateStatus::PendingValidation,
                decision_id: None,
            });

            // consume the draft so the next pass does not re-discover it
            let processed = self.processed_dir();
            fs::create_dir_all(&processed).await?;
            let file_name = path.file_name().ok_or_else(|| {
                OrchestratorError::store(format!("draft without a file name: {}", path.display()))
            })?;
            fs::rename(path, processed.join(file_name)).await?;
        }

        if candidates.is_empty() {
            actor_debug!(Actor::Scout, "Inbox empty, nothing discovered");
        } else {
            actor_warn!(
                Actor::Scout,
                "📥 {} drafts consumed from inbox",
                candidates.len()
            );
        }

        Ok(candidates)
    }
}
