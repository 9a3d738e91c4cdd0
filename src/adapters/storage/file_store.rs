//! File-backed repositories.
//!
//! Each aggregate is one YAML document under its own directory:
//!
//! ```text
//! {base}/sessions/{session_id}.yaml
//! {base}/roadmaps/{roadmap_id}.yaml
//! ```
//!
//! Writes go to a temporary file first and are renamed into place. A
//! per-store mutex makes the version check and the write a single step
//! within this process.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::in_memory::latest_active;
use crate::domain::aptitude::AptitudeSession;
use crate::domain::foundation::{
    DomainError, ErrorCode, RoadmapId, SessionId, Timestamp, UserId,
};
use crate::domain::roadmap::Roadmap;
use crate::ports::{AptitudeSessionRepository, RoadmapRepository};

/// Directory of YAML documents of one type.
#[derive(Debug)]
struct YamlDocuments<T> {
    dir: PathBuf,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> YamlDocuments<T>
where
    T: Serialize + DeserializeOwned,
{
    fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    fn path_for(&self, id: &impl Display) -> PathBuf {
        self.dir.join(format!("{}.yaml", id))
    }

    async fn read(&self, id: &impl Display) -> Result<Option<T>, DomainError> {
        read_document(&self.path_for(id)).await
    }

    async fn write(&self, id: &impl Display, doc: &T) -> Result<(), DomainError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("create directory", &self.dir, e))?;

        let yaml = serde_yaml::to_string(doc)
            .map_err(|e| DomainError::storage(format!("Serialization failed: {}", e)))?;

        let path = self.path_for(id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| io_error("write", &tmp, e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error("rename", &path, e))
    }

    async fn remove(&self, id: &impl Display) -> Result<(), DomainError> {
        let path = self.path_for(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", &path, e)),
        }
    }

    /// Every readable document. Unparseable files are logged and skipped.
    async fn list(&self) -> Result<Vec<T>, DomainError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list", &self.dir, e)),
        };

        let mut docs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("list", &self.dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match read_document(&path).await {
                Ok(Some(doc)) => docs.push(doc),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable document")
                }
            }
        }
        Ok(docs)
    }
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, DomainError> {
    let yaml = match fs::read_to_string(path).await {
        Ok(yaml) => yaml,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error("read", path, e)),
    };
    serde_yaml::from_str(&yaml)
        .map(Some)
        .map_err(|e| DomainError::storage(format!("Deserialization failed for {}: {}", path.display(), e)))
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> DomainError {
    DomainError::storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

// ════════════════════════════════════════════════════════════════════════════
// Sessions
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct FileSessionRepository {
    docs: YamlDocuments<AptitudeSession>,
}

impl FileSessionRepository {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            docs: YamlDocuments::new(base_path.as_ref().join("sessions")),
        }
    }
}

#[async_trait]
impl AptitudeSessionRepository for FileSessionRepository {
    async fn save(&self, session: &AptitudeSession) -> Result<(), DomainError> {
        let _guard = self.docs.write_lock.lock().await;
        if self.docs.read(session.id()).await?.is_some() {
            return Err(DomainError::conflict("Session", session.id()));
        }
        self.docs.write(session.id(), session).await
    }

    async fn update(&self, session: &AptitudeSession) -> Result<(), DomainError> {
        let _guard = self.docs.write_lock.lock().await;
        let stored = self.docs.read(session.id()).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )
        })?;
        if stored.version() != session.version() {
            return Err(DomainError::conflict("Session", session.id()));
        }
        let mut next = session.clone();
        next.advance_version();
        self.docs.write(session.id(), &next).await
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<AptitudeSession>, DomainError> {
        self.docs.read(id).await
    }

    async fn find_stale(&self, cutoff: &Timestamp) -> Result<Vec<AptitudeSession>, DomainError> {
        Ok(self
            .docs
            .list()
            .await?
            .into_iter()
            .filter(|s| s.is_stale(cutoff))
            .collect())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        let _guard = self.docs.write_lock.lock().await;
        self.docs.remove(id).await
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Roadmaps
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct FileRoadmapRepository {
    docs: YamlDocuments<Roadmap>,
}

impl FileRoadmapRepository {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            docs: YamlDocuments::new(base_path.as_ref().join("roadmaps")),
        }
    }
}

#[async_trait]
impl RoadmapRepository for FileRoadmapRepository {
    async fn save(&self, roadmap: &Roadmap) -> Result<(), DomainError> {
        let _guard = self.docs.write_lock.lock().await;
        if self.docs.read(roadmap.id()).await?.is_some() {
            return Err(DomainError::conflict("Roadmap", roadmap.id()));
        }
        self.docs.write(roadmap.id(), roadmap).await
    }

    async fn update(&self, roadmap: &Roadmap) -> Result<(), DomainError> {
        let _guard = self.docs.write_lock.lock().await;
        let stored = self.docs.read(roadmap.id()).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::RoadmapNotFound,
                format!("Roadmap not found: {}", roadmap.id()),
            )
        })?;
        if stored.version() != roadmap.version() {
            return Err(DomainError::conflict("Roadmap", roadmap.id()));
        }
        let mut next = roadmap.clone();
        next.advance_version();
        self.docs.write(roadmap.id(), &next).await
    }

    async fn find_by_id(&self, id: &RoadmapId) -> Result<Option<Roadmap>, DomainError> {
        self.docs.read(id).await
    }

    async fn find_latest_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Roadmap>, DomainError> {
        let roadmaps = self.docs.list().await?;
        Ok(latest_active(roadmaps.iter(), user_id).cloned())
    }
}
