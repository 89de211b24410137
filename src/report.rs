use crate::error::Error;
use crate::model::{FileRecord, ReconciliationRow, SourceTag};
use ahash::AHashMap;
use glob::Pattern;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

/// A filename shared by more than one live record within a single catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameGroup {
    pub filename: String,
    pub count: usize,
}

/// Narrow rows with the interactive-query idiom: a pattern with glob
/// metacharacters is compiled and matched against the canonical path, any
/// other pattern is plain substring containment (`LIKE '%text%'`).
///
/// An invalid glob is recoverable: the unfiltered rows come back along with
/// a diagnostic naming the pattern.
pub fn filter_rows(
    rows: &[ReconciliationRow],
    pattern: Option<&str>,
) -> (Vec<ReconciliationRow>, Option<String>) {
    let Some(pattern) = pattern else {
        return (rows.to_vec(), None);
    };

    if pattern.chars().any(|c| matches!(c, '*' | '?' | '[')) {
        match Pattern::new(pattern) {
            Ok(glob) => {
                let filtered = rows
                    .iter()
                    .filter(|row| glob.matches(&row.canonical_path))
                    .cloned()
                    .collect();
                (filtered, None)
            }
            Err(e) => {
                warn!("Invalid filter '{}': {}", pattern, e);
                (
                    rows.to_vec(),
                    Some(format!("invalid filter '{}': {}", pattern, e)),
                )
            }
        }
    } else {
        let filtered = rows
            .iter()
            .filter(|row| row.canonical_path.contains(pattern))
            .cloned()
            .collect();
        (filtered, None)
    }
}

/// Group one catalog's live records by filename and keep the groups with
/// more than one member, sorted by count descending then filename.
pub fn duplicate_filenames(records: &[FileRecord]) -> Vec<FilenameGroup> {
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for record in records.iter().filter(|r| r.is_live()) {
        *counts.entry(record.filename.as_str()).or_insert(0) += 1;
    }

    let mut groups: Vec<FilenameGroup> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(filename, count)| FilenameGroup {
            filename: filename.to_string(),
            count,
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.filename.cmp(&b.filename)));
    groups
}

/// Live records whose lower-cased extension is in the allow-list.
pub fn video_files(records: &[FileRecord], extensions: &[String]) -> Vec<FileRecord> {
    records
        .iter()
        .filter(|r| r.is_live())
        .filter(|r| {
            r.extension()
                .map(|ext| extensions.iter().any(|allowed| *allowed == ext))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Emit rows as CSV: canonical path, catalogs that have the file, catalogs
/// that are missing it.
pub fn write_csv(
    path: &Path,
    rows: &[ReconciliationRow],
    active: &BTreeSet<SourceTag>,
) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["canonical_path", "present_in", "missing_from"])?;
    for row in rows {
        writer.write_record([
            row.canonical_path.as_str(),
            &join_tags(&row.present_in),
            &join_tags(&row.missing_from(active)),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn join_tags(tags: &BTreeSet<SourceTag>) -> String {
    tags.iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join("+")
}
