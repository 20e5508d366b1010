//! Record store implementations
//!
//! Two stores share the [`RecordStore`] seam: an in-memory store for
//! tests and dry runs, and a JSON-file store for real deployments.
//! Both apply a commit batch under a single writer lock so a venture
//! transition and its audit entry land together.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{Record, RecordStore};
use shared::{
    AuditEntry, Candidate, CandidateId, CandidateStatus, Decision, DecisionId, MonitorReport,
    ProcessState, Venture, VentureId, VentureStatus,
};

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Default)]
struct Collections {
    candidates: HashMap<CandidateId, Candidate>,
    decisions: HashMap<DecisionId, Decision>,
    ventures: HashMap<VentureId, Venture>,
    reports: HashMap<VentureId, Vec<MonitorReport>>,
    audits: Vec<AuditEntry>,
    state: Option<ProcessState>,
}

impl Collections {
    fn apply(&mut self, record: Record) {
        match record {
            Record::Candidate(c) => {
                self.candidates.insert(c.id.clone(), c);
            }
            Record::Decision(d) => {
                self.decisions.insert(d.id.clone(), d);
            }
            Record::Venture(v) => {
                self.ventures.insert(v.id.clone(), v);
            }
            Record::Report(r) => {
                self.reports.entry(r.venture_id.clone()).or_default().push(r);
            }
            Record::Audit(a) => self.audits.push(a),
            Record::State(s) => self.state = Some(s),
        }
    }
}

/// In-memory record store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn candidate(&self, id: &CandidateId) -> OrchestratorResult<Option<Candidate>> {
        Ok(self.collections.lock().await.candidates.get(id).cloned())
    }

    async fn decision(&self, id: &DecisionId) -> OrchestratorResult<Option<Decision>> {
        Ok(self.collections.lock().await.decisions.get(id).cloned())
    }

    async fn venture(&self, id: &VentureId) -> OrchestratorResult<Option<Venture>> {
        Ok(self.collections.lock().await.ventures.get(id).cloned())
    }

    async fn list_candidates(
        &self,
        status: Option<CandidateStatus>,
    ) -> OrchestratorResult<Vec<Candidate>> {
        let guard = self.collections.lock().await;
        let mut out: Vec<Candidate> = guard
            .candidates
            .values()
            .filter(|c| status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        out.sort_by_key(|c| c.discovered_at);
        Ok(out)
    }

    async fn list_ventures(
        &self,
        status: Option<VentureStatus>,
    ) -> OrchestratorResult<Vec<Venture>> {
        let guard = self.collections.lock().await;
        let mut out: Vec<Venture> = guard
            .ventures
            .values()
            .filter(|v| status.is_none_or(|s| v.status == s))
            .cloned()
            .collect();
        out.sort_by_key(|v| v.created_at);
        Ok(out)
    }

    async fn latest_report(
        &self,
        venture: &VentureId,
    ) -> OrchestratorResult<Option<MonitorReport>> {
        let guard = self.collections.lock().await;
        Ok(guard
            .reports
            .get(venture)
            .and_then(|reports| reports.iter().max_by_key(|r| r.created_at))
            .cloned())
    }

    async fn audit_trail(
        &self,
        venture: Option<VentureId>,
    ) -> OrchestratorResult<Vec<AuditEntry>> {
        let guard = self.collections.lock().await;
        Ok(guard
            .audits
            .iter()
            .filter(|a| venture.is_none() || a.venture_id == venture)
            .cloned()
            .collect())
    }

    async fn process_state(&self) -> OrchestratorResult<Option<ProcessState>> {
        Ok(self.collections.lock().await.state.clone())
    }

    async fn commit(&self, records: Vec<Record>) -> OrchestratorResult<()> {
        let mut guard = self.collections.lock().await;
        for record in records {
            guard.apply(record);
        }
        Ok(())
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// File-backed record store: one JSON file per record, one directory
/// per collection, plus a singleton `state.json`.
///
/// Writes go through write-then-rename so readers never see a partial
/// file; a commit batch is applied under one writer lock.
pub struct JsonFileStore {
    base_dir: PathBuf,
    writer: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            writer: Mutex::new(()),
        }
    }

    fn candidates_dir(&self) -> PathBuf {
        self.base_dir.join("candidates")
    }

    fn decisions_dir(&self) -> PathBuf {
        self.base_dir.join("decisions")
    }

    fn ventures_dir(&self) -> PathBuf {
        self.base_dir.join("ventures")
    }

    fn reports_dir(&self, venture: &VentureId) -> PathBuf {
        self.base_dir.join("reports").join(venture.as_str())
    }

    fn audits_dir(&self) -> PathBuf {
        self.base_dir.join("audit")
    }

    fn state_path(&self) -> PathBuf {
        self.base_dir.join("state.json")
    }

    async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> OrchestratorResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        path: &Path,
    ) -> OrchestratorResult<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Read every `.json` record in a collection directory.
    async fn read_dir_json<T: serde::de::DeserializeOwned>(
        dir: &Path,
    ) -> OrchestratorResult<Vec<T>> {
        let mut out = Vec::new();
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(out),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = fs::read_to_string(&path).await?;
                let value = serde_json::from_str(&content).map_err(|err| {
                    OrchestratorError::store(format!(
                        "corrupt record {}: {err}",
                        path.display()
                    ))
                })?;
                out.push(value);
            }
        }
        Ok(out)
    }

    async fn apply(&self, record: &Record) -> OrchestratorResult<()> {
        match record {
            Record::Candidate(c) => {
                let path = self.candidates_dir().join(format!("{}.json", c.id));
                Self::write_json(&path, c).await
            }
            Record::Decision(d) => {
                let path = self.decisions_dir().join(format!("{}.json", d.id));
                Self::write_json(&path, d).await
            }
            Record::Venture(v) => {
                let path = self.ventures_dir().join(format!("{}.json", v.id));
                Self::write_json(&path, v).await
            }
            Record::Report(r) => {
                let path = self.reports_dir(&r.venture_id).join(format!("{}.json", r.id));
                Self::write_json(&path, r).await
            }
            Record::Audit(a) => {
                let path = self.audits_dir().join(format!("{}.json", a.id));
                Self::write_json(&path, a).await
            }
            Record::State(s) => Self::write_json(&self.state_path(), s).await,
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn candidate(&self, id: &CandidateId) -> OrchestratorResult<Option<Candidate>> {
        Self::read_json(&self.candidates_dir().join(format!("{id}.json"))).await
    }

    async fn decision(&self, id: &DecisionId) -> OrchestratorResult<Option<Decision>> {
        Self::read_json(&self.decisions_dir().join(format!("{id}.json"))).await
    }

    async fn venture(&self, id: &VentureId) -> OrchestratorResult<Option<Venture>> {
        Self::read_json(&self.ventures_dir().join(format!("{id}.json"))).await
    }

    async fn list_candidates(
        &self,
        status: Option<CandidateStatus>,
    ) -> OrchestratorResult<Vec<Candidate>> {
        let mut all: Vec<Candidate> = Self::read_dir_json(&self.candidates_dir()).await?;
        all.retain(|c: &Candidate| status.is_none_or(|s| c.status == s));
        all.sort_by_key(|c| c.discovered_at);
        Ok(all)
    }

    async fn list_ventures(
        &self,
        status: Option<VentureStatus>,
    ) -> OrchestratorResult<Vec<Venture>> {
        let mut all: Vec<Venture> = Self::read_dir_json(&self.ventures_dir()).await?;
        all.retain(|v: &Venture| status.is_none_or(|s| v.status == s));
        all.sort_by_key(|v| v.created_at);
        Ok(all)
    }

    async fn latest_report(
        &self,
        venture: &VentureId,
    ) -> OrchestratorResult<Option<MonitorReport>> {
        let all: Vec<MonitorReport> = Self::read_dir_json(&self.reports_dir(venture)).await?;
        Ok(all.into_iter().max_by_key(|r| r.created_at))
    }

    async fn audit_trail(
        &self,
        venture: Option<VentureId>,
    ) -> OrchestratorResult<Vec<AuditEntry>> {
        let mut all: Vec<AuditEntry> = Self::read_dir_json(&self.audits_dir()).await?;
        all.retain(|a| venture.is_none() || a.venture_id == venture);
        all.sort_by_key(|a| a.timestamp);
        Ok(all)
    }

    async fn process_state(&self) -> OrchestratorResult<Option<ProcessState>> {
        Self::read_json(&self.state_path()).await
    }

    async fn commit(&self, records: Vec<Record>) -> OrchestratorResult<()> {
        let _guard = self.writer.lock().await;
        for record in &records {
            self.apply(record).await?;
        }
        Ok(())
    }
}
