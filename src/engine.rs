use crate::config::AppConfig;
use crate::error::Error;
use crate::inventory::InventorySource;
use crate::model::{
    DuplicatePath, FileRecord, ReconDiagnostics, ReconciliationRow, SourceTag,
};
use crate::normalize;
use ahash::AHashMap;
use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct ReconEngine {
    config: AppConfig,
}

/// Result of one reconciliation pass. Rows are sorted lexicographically by
/// canonical path, so two runs over identical snapshots produce identical
/// output.
#[derive(Debug)]
pub struct ReconOutcome {
    pub rows: Vec<ReconciliationRow>,
    pub active: BTreeSet<SourceTag>,
    pub diagnostics: ReconDiagnostics,
    pub load_duration: Duration,
    pub join_duration: Duration,
}

impl ReconOutcome {
    /// Rows reported by every active source.
    pub fn matches(&self) -> Vec<&ReconciliationRow> {
        self.rows
            .iter()
            .filter(|row| row.present_in == self.active)
            .collect()
    }

    /// Rows reported by a strict, non-empty subset of the active sources.
    pub fn mismatches(&self) -> Vec<&ReconciliationRow> {
        self.rows
            .iter()
            .filter(|row| row.present_in != self.active)
            .collect()
    }
}

/// One source's contribution after the live filter, malformed-record skip,
/// and alias normalization.
struct SourceSnapshot {
    tag: SourceTag,
    paths: Vec<String>,
    skipped: usize,
    duplicates: Vec<DuplicatePath>,
}

impl ReconEngine {
    pub fn new(config: AppConfig) -> Self {
        ReconEngine { config }
    }

    /// Run the full reconciliation pipeline:
    /// 1. Fetch active snapshots in parallel (any failure aborts the run)
    /// 2. Filter to live records, skip malformed ones, normalize paths
    /// 3. Merge into canonical-path → present-in map and sort
    pub fn run(&self, inventory: &dyn InventorySource) -> Result<ReconOutcome, Error> {
        let active = self.config.active_sources();
        if active.is_empty() {
            return Err(Error::Config(config::ConfigError::Message(
                "no sources configured for comparison".to_string(),
            )));
        }
        info!("Reconciling catalogs: {:?}", active);

        let load_start = Instant::now();
        let tags: Vec<SourceTag> = active.iter().copied().collect();
        let mut snapshots: Vec<SourceSnapshot> = tags
            .par_iter()
            .map(|&tag| {
                let records = inventory.load(tag)?;
                Ok(self.prepare_snapshot(tag, records))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        snapshots.sort_by_key(|snap| snap.tag);
        let load_duration = load_start.elapsed();
        debug!(
            "Snapshots loaded in {:.2}s",
            load_duration.as_secs_f64()
        );

        let join_start = Instant::now();
        let merged: DashMap<String, BTreeSet<SourceTag>> = DashMap::new();
        snapshots.par_iter().for_each(|snap| {
            for path in &snap.paths {
                merged.entry(path.clone()).or_default().insert(snap.tag);
            }
        });

        let mut rows: Vec<ReconciliationRow> = merged
            .into_iter()
            .map(|(canonical_path, present_in)| ReconciliationRow {
                canonical_path,
                present_in,
            })
            .collect();
        rows.sort_by(|a, b| a.canonical_path.cmp(&b.canonical_path));
        let join_duration = join_start.elapsed();

        let mut diagnostics = ReconDiagnostics::default();
        for snap in snapshots {
            diagnostics.skipped.insert(snap.tag, snap.skipped);
            diagnostics.live_counts.insert(snap.tag, snap.paths.len());
            diagnostics.duplicates.extend(snap.duplicates);
        }

        info!(
            "{} canonical paths joined across {} catalogs ({} records skipped)",
            rows.len(),
            active.len(),
            diagnostics.total_skipped(),
        );

        Ok(ReconOutcome {
            rows,
            active,
            diagnostics,
            load_duration,
            join_duration,
        })
    }

    fn prepare_snapshot(&self, tag: SourceTag, records: Vec<FileRecord>) -> SourceSnapshot {
        let aliases = self.config.aliases_for(tag);

        let mut paths = Vec::new();
        let mut skipped = 0usize;
        let mut seen: AHashMap<String, usize> = AHashMap::new();

        for record in records {
            // Soft-deleted records are invisible: they count as neither
            // present nor missing.
            if !record.is_live() {
                continue;
            }
            if record.filename.is_empty() || record.parent_path.is_empty() {
                skipped += 1;
                continue;
            }
            let canonical =
                normalize::canonical_path(aliases, &record.parent_path, &record.filename);
            *seen.entry(canonical.clone()).or_insert(0) += 1;
            paths.push(canonical);
        }

        let mut duplicates: Vec<DuplicatePath> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(canonical_path, count)| DuplicatePath {
                source: tag,
                canonical_path,
                count,
            })
            .collect();
        duplicates.sort_by(|a, b| a.canonical_path.cmp(&b.canonical_path));

        if skipped > 0 {
            debug!("{}: skipped {} malformed records", tag, skipped);
        }

        SourceSnapshot {
            tag,
            paths,
            skipped,
            duplicates,
        }
    }
}
