//! Local document store for presentation analyses
//!
//! Documents are plain JSON files laid out the way the hosted document store
//! nests them:
//!
//! ```text
//! <root>/users/<user>/projects/<project>/project.json
//! <root>/users/<user>/projects/<project>/feedback/<presentation>.json
//! ```
//!
//! Feedback documents are stored raw, exactly as the analysis backend
//! produced them, and only normalized when read back for display.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::types::{PresentationRecord, RawRecord};

const PROJECT_FILE: &str = "project.json";
const FEEDBACK_DIR: &str = "feedback";

/// JSON document store rooted at a directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Open a store at `root`. The directory is created lazily on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store configured in `[store]`.
    pub fn open(config: &StoreConfig) -> Self {
        Self::new(config.root_path())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fresh presentation id for a new upload.
    pub fn new_presentation_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    // ============================================
    // Paths
    // ============================================

    fn user_dir(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.root.join("users").join(validate_id("user", user_id)?))
    }

    fn project_dir(&self, user_id: &str, project_id: &str) -> Result<PathBuf> {
        Ok(self
            .user_dir(user_id)?
            .join("projects")
            .join(validate_id("project", project_id)?))
    }

    fn feedback_path(&self, user_id: &str, project_id: &str, presentation_id: &str) -> Result<PathBuf> {
        let file = format!("{}.json", validate_id("presentation", presentation_id)?);
        Ok(self
            .project_dir(user_id, project_id)?
            .join(FEEDBACK_DIR)
            .join(file))
    }

    // ============================================
    // Reads
    // ============================================

    /// Raw feedback document, `None` if it does not exist.
    pub fn get_presentation(
        &self,
        user_id: &str,
        project_id: &str,
        presentation_id: &str,
    ) -> Result<Option<RawRecord>> {
        read_json(&self.feedback_path(user_id, project_id, presentation_id)?)
    }

    /// Find a presentation, trying `project_id` first and then every project
    /// of the user. Returns the owning project id with the document.
    pub fn find_presentation(
        &self,
        user_id: &str,
        project_id: Option<&str>,
        presentation_id: &str,
    ) -> Result<Option<(String, RawRecord)>> {
        if let Some(project_id) = project_id {
            if let Some(raw) = self.get_presentation(user_id, project_id, presentation_id)? {
                return Ok(Some((project_id.to_string(), raw)));
            }
        }

        for candidate in self.project_ids(user_id)? {
            if Some(candidate.as_str()) == project_id {
                continue;
            }
            if let Some(raw) = self.get_presentation(user_id, &candidate, presentation_id)? {
                tracing::debug!(
                    project_id = %candidate,
                    presentation_id,
                    "Found presentation outside the requested project"
                );
                return Ok(Some((candidate, raw)));
            }
        }

        Ok(None)
    }

    /// Like [`Self::find_presentation`], but a missing document is an error.
    pub fn require_presentation(
        &self,
        user_id: &str,
        project_id: Option<&str>,
        presentation_id: &str,
    ) -> Result<(String, RawRecord)> {
        self.find_presentation(user_id, project_id, presentation_id)?
            .ok_or_else(|| Error::NotFound(format!("{}/{}", user_id, presentation_id)))
    }

    /// Project ids of a user, sorted.
    pub fn project_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let projects_dir = self.user_dir(user_id)?.join("projects");
        let entries = match fs::read_dir(&projects_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Script text attached to a project (`scriptText`, else `script`).
    pub fn project_script(&self, user_id: &str, project_id: &str) -> Result<Option<String>> {
        let project = read_json(&self.project_dir(user_id, project_id)?.join(PROJECT_FILE))?;
        Ok(project
            .as_ref()
            .and_then(|doc| first_non_empty(doc, &["scriptText", "script"]))
            .map(str::to_string))
    }

    /// Display name of a project (`name`, else `title`, else the id).
    pub fn project_name(&self, user_id: &str, project_id: &str) -> Result<String> {
        let project = read_json(&self.project_dir(user_id, project_id)?.join(PROJECT_FILE))?;
        Ok(project
            .as_ref()
            .and_then(|doc| first_non_empty(doc, &["name", "title"]))
            .unwrap_or(project_id)
            .to_string())
    }

    /// All presentations of a user across projects, newest first.
    ///
    /// Unreadable or malformed documents are skipped with a warning.
    pub fn list_presentations(&self, user_id: &str, limit: usize) -> Result<Vec<PresentationRecord>> {
        let pattern = format!(
            "{}/users/{}/projects/*/{}/*.json",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            glob::Pattern::escape(validate_id("user", user_id)?),
            FEEDBACK_DIR
        );
        let entries = glob::glob(&pattern)
            .map_err(|e| Error::Store(format!("invalid glob pattern: {}", e)))?;

        let mut project_names: HashMap<String, String> = HashMap::new();
        let mut records = Vec::new();

        for path in entries.flatten() {
            let Some((project_id, presentation_id)) = split_feedback_path(&path) else {
                continue;
            };

            let raw = match read_json(&path) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                    continue;
                }
            };

            let project_name = match project_names.get(&project_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .project_name(user_id, &project_id)
                        .unwrap_or_else(|_| project_id.clone());
                    project_names.insert(project_id.clone(), name.clone());
                    name
                }
            };

            records.push(build_record(
                user_id,
                project_id,
                project_name,
                presentation_id,
                &raw,
                file_modified(&path),
            ));
        }

        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        records.truncate(limit);

        tracing::debug!(user_id, count = records.len(), "Listed presentations");
        Ok(records)
    }

    // ============================================
    // Writes
    // ============================================

    /// Write a raw feedback document.
    ///
    /// Object documents are stamped with `updated_at` (and `created_at` if it
    /// is not set yet) as RFC 3339 strings.
    pub fn save_presentation(
        &self,
        user_id: &str,
        project_id: &str,
        presentation_id: &str,
        raw: &RawRecord,
    ) -> Result<PathBuf> {
        let path = self.feedback_path(user_id, project_id, presentation_id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut doc = raw.clone();
        if let Some(map) = doc.as_object_mut() {
            let now = Value::String(Utc::now().to_rfc3339());
            map.entry("created_at").or_insert_with(|| now.clone());
            map.insert("updated_at".to_string(), now);
        }

        fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
        tracing::info!(
            user_id,
            project_id,
            presentation_id,
            path = %path.display(),
            "Saved presentation"
        );
        Ok(path)
    }

    /// Write project metadata (`project.json`).
    pub fn save_project(&self, user_id: &str, project_id: &str, project: &Value) -> Result<PathBuf> {
        let dir = self.project_dir(user_id, project_id)?;
        fs::create_dir_all(&dir)?;
        let path = dir.join(PROJECT_FILE);
        fs::write(&path, serde_json::to_string_pretty(project)?)?;
        Ok(path)
    }
}

/// Reject ids that would escape their directory.
fn validate_id<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(Error::Store(format!("invalid {} id: {:?}", kind, id)));
    }
    Ok(id)
}

fn read_json(path: &Path) -> Result<Option<Value>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&content)?))
}

/// `(project_id, presentation_id)` from `.../projects/<p>/feedback/<id>.json`.
fn split_feedback_path(path: &Path) -> Option<(String, String)> {
    let presentation_id = path.file_stem()?.to_str()?.to_string();
    let project_id = path.parent()?.parent()?.file_name()?.to_str()?.to_string();
    Some((project_id, presentation_id))
}

fn file_modified(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::from)
}

/// First string under `keys` that is not blank.
fn first_non_empty<'a>(doc: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        doc.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    })
}

fn build_record(
    user_id: &str,
    project_id: String,
    project_name: String,
    presentation_id: String,
    raw: &RawRecord,
    modified: Option<DateTime<Utc>>,
) -> PresentationRecord {
    let title = first_non_empty(raw, &["original_filename", "presentation_id", "title"])
        .map(str::to_string)
        .unwrap_or_else(|| presentation_id.clone());
    let created_at = raw.get("created_at").and_then(parse_timestamp);
    let updated_at = raw
        .get("updated_at")
        .and_then(parse_timestamp)
        .or(created_at)
        .or(modified);

    PresentationRecord {
        id: presentation_id,
        user_id: user_id.to_string(),
        project_id,
        project_name,
        title,
        created_at,
        updated_at,
        result: normalize(raw),
    }
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 strings, naive ISO 8601 strings (taken as UTC) and
/// `{seconds, nanoseconds}` objects (also with leading underscores).
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Object(map) => {
            let seconds = ["seconds", "_seconds"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_i64))?;
            let nanos = ["nanoseconds", "_nanoseconds"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_u64))
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, nanos)
        }
        _ => None,
    }
}
