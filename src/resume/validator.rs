//! Segment validation: are all declared line segments on disk?

use std::path::PathBuf;
use tracing::{debug, warn};

use crate::artifacts::ArtifactStore;

/// Outcome of checking `[0, expected)` against the segment directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentReport {
    pub expected: usize,
    /// Missing or empty indices, ascending
    pub missing: Vec<usize>,
    pub unit_dir: PathBuf,
}

impl SegmentReport {
    pub fn all_present(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Pure check over `[0, expected)`, in ascending order
pub fn find_missing(expected: usize, is_present: impl Fn(usize) -> bool) -> Vec<usize> {
    (0..expected).filter(|&index| !is_present(index)).collect()
}

/// Check that every segment in `[0, expected)` exists and is non-empty
///
/// Read-only. A missing directory reports every index as missing.
pub fn validate_segments(store: &ArtifactStore, expected: usize) -> SegmentReport {
    let missing = if store.exists() {
        find_missing(expected, |index| store.is_present(index))
    } else {
        warn!(
            "Line segments directory not found: {}",
            store.unit_dir().display()
        );
        (0..expected).collect()
    };

    if missing.is_empty() {
        debug!("All {} line segments present", expected);
    } else {
        warn!("Missing {} line segments out of {}", missing.len(), expected);
        debug!("Missing segment indices: {:?}", missing);
    }

    SegmentReport {
        expected,
        missing,
        unit_dir: store.unit_dir().to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::unit_file_name;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn store_with(indices: impl IntoIterator<Item = usize>) -> (TempDir, ArtifactStore) {
        let temp_dir = TempDir::new().unwrap();
        let unit_dir = temp_dir.path().join("line_segments");
        std::fs::create_dir_all(&unit_dir).unwrap();
        for index in indices {
            std::fs::write(unit_dir.join(unit_file_name(index, "wav")), b"RIFF").unwrap();
        }
        (temp_dir, ArtifactStore::new(unit_dir))
    }

    #[test]
    fn test_all_present() {
        let (_temp, store) = store_with(0..4);
        let report = validate_segments(&store, 4);
        assert!(report.all_present());
        assert_eq!(report.expected, 4);
    }

    #[test]
    fn test_empty_file_counts_as_missing() {
        let (_temp, store) = store_with([0, 2]);
        std::fs::write(store.unit_path(1), b"").unwrap();

        let report = validate_segments(&store, 3);
        assert_eq!(report.missing, vec![1]);
    }

    #[test]
    fn test_missing_directory_reports_every_index() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().join("absent"));

        let report = validate_segments(&store, 3);
        assert!(!report.all_present());
        assert_eq!(report.missing, vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_expected_is_trivially_complete() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().join("absent"));
        assert!(validate_segments(&store, 0).all_present());
    }

    proptest! {
        #[test]
        fn prop_missing_equals_removed_subset(
            (total, removed) in (1usize..40).prop_flat_map(|total| {
                (Just(total), proptest::collection::btree_set(0..total, 0..=total))
            })
        ) {
            let present: BTreeSet<usize> = (0..total).filter(|i| !removed.contains(i)).collect();
            let (_temp, store) = store_with(present.iter().copied());

            let report = validate_segments(&store, total);
            let expected: Vec<usize> = removed.iter().copied().collect();

            prop_assert_eq!(report.all_present(), removed.is_empty());
            prop_assert_eq!(report.missing, expected);
        }

        #[test]
        fn prop_find_missing_is_ascending(
            expected in 0usize..200,
            holes in proptest::collection::hash_set(0usize..200, 0..50)
        ) {
            let missing = find_missing(expected, |i| !holes.contains(&i));
            prop_assert!(missing.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(missing.iter().all(|i| *i < expected && holes.contains(i)));
        }
    }
}
