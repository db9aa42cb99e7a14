//! Benchmarks for checkpoint persistence and the resume decision

use audiobook_recovery::artifacts::{unit_file_name, ArtifactStore};
use audiobook_recovery::checkpoint::{Checkpoint, CheckpointStore, GroupUnitMap, UnitMetadata};
use audiobook_recovery::resume::{validate_segments, ResumeController};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Runtime;

/// Book with `chapters` chapters of `lines_per_chapter` lines each
fn create_test_checkpoint(chapters: usize, lines_per_chapter: usize) -> Checkpoint {
    let map: GroupUnitMap = (0..chapters)
        .map(|c| {
            let start = c * lines_per_chapter;
            (
                format!("Chapter {}.wav", c + 1),
                (start..start + lines_per_chapter).collect::<Vec<_>>(),
            )
        })
        .collect();
    let files = (0..chapters).map(|c| format!("Chapter {}.wav", c + 1)).collect();
    let metadata = (0..chapters * lines_per_chapter)
        .map(|index| UnitMetadata {
            index,
            line: format!("\u{201c}Line {index}\u{201d}, said the narrator with some realistic length."),
            is_chapter_heading: index % lines_per_chapter == 0,
        })
        .collect();
    Checkpoint::from_generation(map, files, metadata)
}

fn write_segments(unit_dir: &Path, count: usize) {
    std::fs::create_dir_all(unit_dir).unwrap();
    for index in 0..count {
        std::fs::write(unit_dir.join(unit_file_name(index, "wav")), b"RIFF").unwrap();
    }
}

fn bench_checkpoint_write(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("checkpoint_write");
    group
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5));
    for (name, chapters, lines) in [("short_book", 10, 20), ("long_book", 60, 150)] {
        group.bench_function(name, |b| {
            b.to_async(&rt).iter_batched(
                || {
                    let temp_dir = TempDir::new().unwrap();
                    let store = CheckpointStore::new(temp_dir.path());
                    (store, create_test_checkpoint(chapters, lines), temp_dir)
                },
                |(store, checkpoint, _temp_dir)| async move {
                    store.write(&checkpoint).await.unwrap();
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_checkpoint_read(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let store = CheckpointStore::new(temp_dir.path());
    rt.block_on(store.write(&create_test_checkpoint(60, 150)))
        .unwrap();

    c.bench_function("checkpoint_read_long_book", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(store.read().await.unwrap()) });
    });
}

fn bench_segment_validation(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let unit_dir = temp_dir.path().join("line_segments");
    write_segments(&unit_dir, 2_000);
    let artifacts = ArtifactStore::new(unit_dir);

    c.bench_function("validate_2000_segments", |b| {
        b.iter(|| black_box(validate_segments(&artifacts, 2_000)));
    });
}

fn bench_can_resume(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let unit_dir = temp_dir.path().join("line_segments");
    write_segments(&unit_dir, 2_000);
    rt.block_on(CheckpointStore::new(temp_dir.path()).write(&create_test_checkpoint(20, 100)))
        .unwrap();
    let controller = ResumeController::new(temp_dir.path(), ArtifactStore::new(unit_dir));

    c.bench_function("can_resume_2000_lines", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(controller.can_resume().await.is_resumable()) });
    });
}

criterion_group!(
    benches,
    bench_checkpoint_write,
    bench_checkpoint_read,
    bench_segment_validation,
    bench_can_resume
);
criterion_main!(benches);
