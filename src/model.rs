use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Which of the three catalogs a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Files,
    Sonarr,
    Plex,
}

impl SourceTag {
    pub const ALL: [SourceTag; 3] = [SourceTag::Files, SourceTag::Sonarr, SourceTag::Plex];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Files => "FILES",
            SourceTag::Sonarr => "SONARR",
            SourceTag::Plex => "PLEX",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "files" => Ok(SourceTag::Files),
            "sonarr" => Ok(SourceTag::Sonarr),
            "plex" => Ok(SourceTag::Plex),
            other => Err(format!(
                "unknown source '{}' (expected files, sonarr or plex)",
                other
            )),
        }
    }
}

/// One file as seen by exactly one catalog at snapshot time.
///
/// `created_at` is only populated by the filesystem scanner (and is nullable
/// even there); the Sonarr and Plex mirrors track `added_date` /
/// `removed_date` only. A record is live iff `removed_at` is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub parent_path: String,
    pub filename: String,
    pub created_at: Option<DateTime<Utc>>,
    pub added_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn is_live(&self) -> bool {
        self.removed_at.is_none()
    }

    /// Lower-cased extension, if the filename has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.filename.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// One canonical path and the set of catalogs that reported it live.
/// `present_in` is non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationRow {
    pub canonical_path: String,
    pub present_in: BTreeSet<SourceTag>,
}

impl ReconciliationRow {
    /// Catalogs in the active comparison set that did not report this path.
    pub fn missing_from(&self, active: &BTreeSet<SourceTag>) -> BTreeSet<SourceTag> {
        active.difference(&self.present_in).copied().collect()
    }
}

/// A canonical path reported more than once among one catalog's live records.
/// Surfaced as a diagnostic; it never blocks reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePath {
    pub source: SourceTag,
    pub canonical_path: String,
    pub count: usize,
}

/// Recoverable conditions aggregated during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconDiagnostics {
    /// Malformed records skipped, per source.
    pub skipped: BTreeMap<SourceTag, usize>,
    /// Live records that survived filtering, per source.
    pub live_counts: BTreeMap<SourceTag, usize>,
    /// Same-source duplicate canonical paths.
    pub duplicates: Vec<DuplicatePath>,
}

impl ReconDiagnostics {
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}
