//! Property tests for checkpoint persistence

mod common;

use audiobook_recovery::checkpoint::{Checkpoint, CheckpointStore};
use common::checkpoint_for;
use proptest::prelude::*;
use tempfile::TempDir;

/// Chapters with generated titles (including non-ASCII) and 1..6 lines each
fn chapters() -> impl Strategy<Value = Vec<(String, Vec<usize>)>> {
    proptest::collection::vec(("[a-zA-Z0-9 éü]{1,12}", 1usize..6), 0..8).prop_map(|specs| {
        let mut next = 0;
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (title, lines))| {
                let units = (next..next + lines).collect();
                next += lines;
                (format!("{:02} {}.wav", i, title.trim()), units)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_store_round_trip(chapters in chapters()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(temp_dir.path());
        let checkpoint = checkpoint_for(&chapters);

        let read_back = runtime.block_on(async {
            store.write(&checkpoint).await.unwrap();
            store.read().await.unwrap()
        });

        prop_assert_eq!(read_back, Some(checkpoint));
    }

    #[test]
    fn prop_json_preserves_chapter_order(chapters in chapters()) {
        let checkpoint = checkpoint_for(&chapters);
        let json = serde_json::to_string(&checkpoint).unwrap();
        let parsed: Checkpoint = serde_json::from_str(&json).unwrap();

        let ids: Vec<&str> = parsed.chapter_line_map.ids().collect();
        prop_assert_eq!(ids, parsed.chapter_files.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert!(parsed.validate().is_ok());
    }
}
