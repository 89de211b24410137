use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use tv_recon::{
    AppConfig, Error, FileRecord, MemoryInventory, ReconEngine, SourceTag,
};

fn record(parent: &str, filename: &str) -> FileRecord {
    FileRecord {
        parent_path: parent.to_string(),
        filename: filename.to_string(),
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        added_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()),
        removed_at: None,
    }
}

fn removed(mut rec: FileRecord) -> FileRecord {
    rec.removed_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    rec
}

fn two_way_config() -> AppConfig {
    let mut aliases = HashMap::new();
    aliases.insert(
        SourceTag::Files,
        vec!["/mnt/nas5/media/videos".to_string(), "/mnt/media/videos".to_string()],
    );
    aliases.insert(SourceTag::Sonarr, vec!["/mnt/media/videos".to_string()]);
    AppConfig {
        compare: vec![SourceTag::Files, SourceTag::Sonarr],
        aliases,
        ..AppConfig::default()
    }
}

fn three_way_config() -> AppConfig {
    let mut config = two_way_config();
    config.compare = SourceTag::ALL.to_vec();
    config
        .aliases
        .insert(SourceTag::Plex, vec!["/media/videos".to_string()]);
    config
}

#[test]
fn test_two_way_match_across_mount_aliases() {
    // The same physical file observed under two mount roots.
    let inventory = MemoryInventory::new()
        .with_source(
            SourceTag::Files,
            vec![record("/mnt/nas5/media/videos/Show", "e01.mkv")],
        )
        .with_source(
            SourceTag::Sonarr,
            vec![record("/mnt/media/videos/Show", "e01.mkv")],
        );

    let outcome = ReconEngine::new(two_way_config()).run(&inventory).unwrap();

    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].canonical_path, "Show/e01.mkv");
    let expected: std::collections::BTreeSet<_> =
        [SourceTag::Files, SourceTag::Sonarr].into_iter().collect();
    assert_eq!(outcome.rows[0].present_in, expected);
    assert_eq!(outcome.matches().len(), 1);
    assert!(outcome.mismatches().is_empty());
}

#[test]
fn test_soft_deleted_record_becomes_mismatch() {
    // The Sonarr copy is soft-deleted, so only FILES reports it.
    let inventory = MemoryInventory::new()
        .with_source(
            SourceTag::Files,
            vec![record("/mnt/nas5/media/videos/Show", "e01.mkv")],
        )
        .with_source(
            SourceTag::Sonarr,
            vec![removed(record("/mnt/media/videos/Show", "e01.mkv"))],
        );

    let outcome = ReconEngine::new(two_way_config()).run(&inventory).unwrap();

    assert_eq!(outcome.rows.len(), 1);
    let expected: std::collections::BTreeSet<_> = [SourceTag::Files].into_iter().collect();
    assert_eq!(outcome.rows[0].present_in, expected);
    assert!(outcome.matches().is_empty());
    assert_eq!(outcome.mismatches().len(), 1);
    assert_eq!(outcome.diagnostics.live_counts[&SourceTag::Sonarr], 0);
}

#[test]
fn test_unavailable_source_fails_whole_run() {
    // No PLEX snapshot registered → the whole run fails, no
    // partial rows.
    let inventory = MemoryInventory::new()
        .with_source(
            SourceTag::Files,
            vec![record("/mnt/nas5/media/videos/Show", "e01.mkv")],
        )
        .with_source(
            SourceTag::Sonarr,
            vec![record("/mnt/media/videos/Show", "e01.mkv")],
        );

    let result = ReconEngine::new(three_way_config()).run(&inventory);

    match result {
        Err(Error::InventoryUnavailable { source, .. }) => {
            assert_eq!(source, SourceTag::Plex);
        }
        other => panic!("expected InventoryUnavailable(PLEX), got {:?}", other),
    }
}

#[test]
fn test_same_source_duplicate_contributes_one_membership() {
    let inventory = MemoryInventory::new()
        .with_source(
            SourceTag::Files,
            vec![
                record("/mnt/nas5/media/videos/Show", "e01.mkv"),
                record("/mnt/media/videos/Show", "e01.mkv"),
            ],
        )
        .with_source(
            SourceTag::Sonarr,
            vec![record("/mnt/media/videos/Show", "e01.mkv")],
        );

    let outcome = ReconEngine::new(two_way_config()).run(&inventory).unwrap();

    // Both FILES records normalize to the same key; membership is a set.
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.matches().len(), 1);

    assert_eq!(outcome.diagnostics.duplicates.len(), 1);
    let dupe = &outcome.diagnostics.duplicates[0];
    assert_eq!(dupe.source, SourceTag::Files);
    assert_eq!(dupe.canonical_path, "Show/e01.mkv");
    assert_eq!(dupe.count, 2);
}

#[test]
fn test_malformed_records_are_skipped_and_counted() {
    let inventory = MemoryInventory::new()
        .with_source(
            SourceTag::Files,
            vec![
                record("/mnt/nas5/media/videos/Show", "e01.mkv"),
                record("/mnt/nas5/media/videos/Show", ""),
                record("", "orphan.mkv"),
            ],
        )
        .with_source(
            SourceTag::Sonarr,
            vec![record("/mnt/media/videos/Show", "e01.mkv")],
        );

    let outcome = ReconEngine::new(two_way_config()).run(&inventory).unwrap();

    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.diagnostics.skipped[&SourceTag::Files], 2);
    assert_eq!(outcome.diagnostics.skipped[&SourceTag::Sonarr], 0);
    assert_eq!(outcome.diagnostics.total_skipped(), 2);
}

#[test]
fn test_rows_sorted_and_deterministic() {
    let inventory = MemoryInventory::new()
        .with_source(
            SourceTag::Files,
            vec![
                record("/mnt/nas5/media/videos/Zeta", "e09.mkv"),
                record("/mnt/nas5/media/videos/Alpha", "e01.mkv"),
                record("/mnt/nas5/media/videos/Mid", "e05.mkv"),
            ],
        )
        .with_source(
            SourceTag::Sonarr,
            vec![
                record("/mnt/media/videos/Mid", "e05.mkv"),
                record("/mnt/media/videos/Alpha", "e01.mkv"),
            ],
        );

    let engine = ReconEngine::new(two_way_config());
    let first = engine.run(&inventory).unwrap();
    let second = engine.run(&inventory).unwrap();

    let paths: Vec<&str> = first.rows.iter().map(|r| r.canonical_path.as_str()).collect();
    assert_eq!(paths, vec!["Alpha/e01.mkv", "Mid/e05.mkv", "Zeta/e09.mkv"]);
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_present_in_nonempty_subset_of_active() {
    let inventory = MemoryInventory::new()
        .with_source(
            SourceTag::Files,
            vec![
                record("/mnt/nas5/media/videos/Show", "e01.mkv"),
                record("/mnt/nas5/media/videos/Only", "here.mkv"),
            ],
        )
        .with_source(
            SourceTag::Sonarr,
            vec![record("/mnt/media/videos/Show", "e01.mkv")],
        );

    let outcome = ReconEngine::new(two_way_config()).run(&inventory).unwrap();

    for row in &outcome.rows {
        assert!(!row.present_in.is_empty());
        assert!(row.present_in.is_subset(&outcome.active));
    }
}

#[test]
fn test_unmatched_mount_prefix_stays_reportable() {
    // A parent outside every configured alias joins on its raw path.
    let inventory = MemoryInventory::new()
        .with_source(
            SourceTag::Files,
            vec![record("/srv/elsewhere/Show", "e01.mkv")],
        )
        .with_source(
            SourceTag::Sonarr,
            vec![record("/srv/elsewhere/Show", "e01.mkv")],
        );

    let outcome = ReconEngine::new(two_way_config()).run(&inventory).unwrap();

    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].canonical_path, "/srv/elsewhere/Show/e01.mkv");
    assert_eq!(outcome.matches().len(), 1);
}
