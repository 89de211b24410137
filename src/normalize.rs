/// Mount-alias normalization.
///
/// Each source observes the library under its own mount roots (e.g.
/// `/mnt/nas5/media/videos` and `/mnt/media/videos` are the same physical
/// storage). Stripping the configured aliases up front makes the same
/// physical file yield an identical join key regardless of which source, or
/// which mount alias, observed it.

/// Strip the first matching alias prefix from `parent_path` and join with
/// `filename` into a `/`-delimited canonical path.
///
/// Alias matching is boundary-respecting: `/mnt/media` matches
/// `/mnt/media/Show` and `/mnt/media`, never `/mnt/media2/Show`. First match
/// wins. A parent that matches no alias passes through unchanged so the path
/// is still joinable and reportable.
pub fn canonical_path(aliases: &[String], parent_path: &str, filename: &str) -> String {
    let parent = strip_alias(aliases, parent_path);
    if parent.is_empty() {
        return collapse_separators(filename);
    }
    let joined = format!("{}/{}", parent, filename);
    collapse_separators(&joined)
}

/// Remove the first alias that matches `parent_path` at a path-separator
/// boundary. Returns the remainder without its leading separator.
pub fn strip_alias<'a>(aliases: &[String], parent_path: &'a str) -> &'a str {
    for alias in aliases {
        let alias = alias.trim_end_matches('/');
        if alias.is_empty() {
            continue;
        }
        if let Some(rest) = parent_path.strip_prefix(alias) {
            if rest.is_empty() {
                return "";
            }
            if let Some(rest) = rest.strip_prefix('/') {
                return rest;
            }
            // Mid-segment match (e.g. alias "/mnt/media" vs "/mnt/media2");
            // keep trying later aliases.
        }
    }
    parent_path
}

fn collapse_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_sep = false;
    for ch in path.chars() {
        if ch == '/' {
            if prev_sep {
                continue;
            }
            prev_sep = true;
        } else {
            prev_sep = false;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strips_first_matching_alias() {
        let a = aliases(&["/mnt/nas5/media/videos", "/mnt/media/videos"]);
        assert_eq!(
            canonical_path(&a, "/mnt/nas5/media/videos/Show", "e01.mkv"),
            "Show/e01.mkv"
        );
        assert_eq!(
            canonical_path(&a, "/mnt/media/videos/Show", "e01.mkv"),
            "Show/e01.mkv"
        );
    }

    #[test]
    fn test_alias_order_breaks_ties() {
        // Both aliases match; the first configured one wins.
        let a = aliases(&["/mnt/media", "/mnt/media/videos"]);
        assert_eq!(
            canonical_path(&a, "/mnt/media/videos/Show", "e01.mkv"),
            "videos/Show/e01.mkv"
        );
    }

    #[test]
    fn test_no_mid_segment_match() {
        let a = aliases(&["/mnt/media"]);
        assert_eq!(
            canonical_path(&a, "/mnt/media2/Show", "e01.mkv"),
            "/mnt/media2/Show/e01.mkv"
        );
    }

    #[test]
    fn test_unmatched_parent_passes_through() {
        let a = aliases(&["/mnt/media/videos"]);
        assert_eq!(
            canonical_path(&a, "/srv/other/Show", "e01.mkv"),
            "/srv/other/Show/e01.mkv"
        );
    }

    #[test]
    fn test_parent_equal_to_alias() {
        let a = aliases(&["/mnt/media/videos"]);
        assert_eq!(canonical_path(&a, "/mnt/media/videos", "loose.mkv"), "loose.mkv");
    }

    #[test]
    fn test_trailing_slash_on_alias_and_parent() {
        let a = aliases(&["/mnt/media/videos/"]);
        assert_eq!(
            canonical_path(&a, "/mnt/media/videos/Show/", "e01.mkv"),
            "Show/e01.mkv"
        );
    }

    #[test]
    fn test_idempotent_on_already_stripped_path() {
        let a = aliases(&["/mnt/media/videos"]);
        let once = canonical_path(&a, "/mnt/media/videos/Show", "e01.mkv");
        let stripped_parent = once.rsplit_once('/').map(|(p, _)| p).unwrap();
        assert_eq!(canonical_path(&a, stripped_parent, "e01.mkv"), once);
    }

    #[test]
    fn test_collapses_doubled_separators() {
        let a = aliases(&["/mnt/media"]);
        assert_eq!(
            canonical_path(&a, "/mnt/media//videos//Show", "e01.mkv"),
            "videos/Show/e01.mkv"
        );
    }
}
