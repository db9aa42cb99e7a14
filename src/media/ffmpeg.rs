//! ffmpeg-backed implementation of the media operations

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

use super::{MediaError, MediaOperations, NarratorVoice, OutputFormat};
use crate::artifacts::unit_file_name;
use crate::config::RecoveryConfig;
use crate::subprocess::{ProcessCommandBuilder, ProcessRunner};

/// File name of the merged audiobook inside the output directory
pub const FINAL_AUDIOBOOK_NAME: &str = "audiobook.m4b";

const STDERR_TAIL_LINES: usize = 5;

/// Runs ffmpeg and ffprobe through a [`ProcessRunner`]
pub struct FfmpegMedia {
    runner: Arc<dyn ProcessRunner>,
    ffmpeg: String,
    ffprobe: String,
    timeout: Option<Duration>,
    bitrate: String,
    unit_extension: String,
    output_dir: PathBuf,
}

impl FfmpegMedia {
    pub fn new(runner: Arc<dyn ProcessRunner>, config: &RecoveryConfig) -> Self {
        Self {
            runner,
            ffmpeg: config.ffmpeg_path.clone(),
            ffprobe: config.ffprobe_path.clone(),
            timeout: config.command_timeout(),
            bitrate: config.audio_bitrate.clone(),
            unit_extension: config.line_extension.clone(),
            output_dir: config.output_dir.clone(),
        }
    }

    async fn run_ffmpeg(&self, args: Vec<String>) -> Result<(), MediaError> {
        let command = ProcessCommandBuilder::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(args)
            .maybe_timeout(self.timeout)
            .build();

        let output = self.runner.run(command).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(MediaError::CommandFailed {
                program: self.ffmpeg.clone(),
                status: output.status,
                stderr_tail: stderr_tail(&output.stderr),
            })
        }
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError> {
        let command = ProcessCommandBuilder::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .path_arg(path)
            .maybe_timeout(self.timeout)
            .build();

        let output = self.runner.run(command).await?;
        if !output.status.success() {
            return Err(MediaError::CommandFailed {
                program: self.ffprobe.clone(),
                status: output.status,
                stderr_tail: stderr_tail(&output.stderr),
            });
        }

        output
            .stdout
            .trim()
            .parse::<f64>()
            .map_err(|_| MediaError::Probe {
                path: path.to_path_buf(),
                output: output.stdout.trim().to_string(),
            })
    }
}

#[async_trait]
impl MediaOperations for FfmpegMedia {
    async fn assemble(
        &self,
        group_id: &str,
        units: &[usize],
        unit_dir: &Path,
        working_dir: &Path,
    ) -> Result<PathBuf, MediaError> {
        let unit_dir = fs::canonicalize(unit_dir)
            .await
            .map_err(|_| MediaError::MissingInput {
                path: unit_dir.to_path_buf(),
            })?;

        let mut list = String::new();
        for &index in units {
            let path = unit_dir.join(unit_file_name(index, &self.unit_extension));
            if !path.is_file() {
                return Err(MediaError::MissingInput { path });
            }
            list.push_str(&concat_entry(&path));
        }

        let group_path = working_dir.join(group_id);
        let list_path = working_dir.join(format!("chapter_list_{}.txt", file_stem(group_id)));
        fs::write(&list_path, list)
            .await
            .map_err(|e| MediaError::io("write", &list_path, e))?;

        debug!("Assembling {} from {} line segments", group_id, units.len());
        let result = self
            .run_ffmpeg(vec![
                "-f".into(),
                "concat".into(),
                "-safe".into(),
                "0".into(),
                "-i".into(),
                path_string(&list_path),
                "-c".into(),
                "copy".into(),
                path_string(&group_path),
            ])
            .await;

        let _ = fs::remove_file(&list_path).await;
        result.map(|()| group_path)
    }

    async fn add_silence(&self, group_file: &Path, duration: Duration) -> Result<(), MediaError> {
        if !group_file.is_file() {
            return Err(MediaError::MissingInput {
                path: group_file.to_path_buf(),
            });
        }

        let temp_path = temp_sibling(group_file);
        let result = self
            .run_ffmpeg(vec![
                "-i".into(),
                path_string(group_file),
                "-af".into(),
                format!("apad=pad_dur={}", duration.as_secs_f64()),
                path_string(&temp_path),
            ])
            .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        fs::rename(&temp_path, group_file)
            .await
            .map_err(|e| MediaError::io("replace", group_file, e))
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        if !input.is_file() {
            return Err(MediaError::MissingInput {
                path: input.to_path_buf(),
            });
        }

        let mut args = vec!["-i".to_string(), path_string(input), "-vn".to_string()];
        let format = output
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(OutputFormat::from_extension);
        if let Some(format) = format {
            args.extend(["-c:a".to_string(), format.codec().to_string()]);
            if format.uses_bitrate() {
                args.extend(["-b:a".to_string(), self.bitrate.clone()]);
            }
        }

        // ffmpeg cannot write over its own input
        if input == output {
            let temp_path = temp_sibling(output);
            args.push(path_string(&temp_path));
            if let Err(e) = self.run_ffmpeg(args).await {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e);
            }
            return fs::rename(&temp_path, output)
                .await
                .map_err(|e| MediaError::io("replace", output, e));
        }

        args.push(path_string(output));
        self.run_ffmpeg(args).await
    }

    async fn merge_final(
        &self,
        converted: &[PathBuf],
        working_dir: &Path,
        source_document: &Path,
        narrator: NarratorVoice,
    ) -> Result<PathBuf, MediaError> {
        let mut chapters = Vec::with_capacity(converted.len());
        let mut list = String::new();
        for path in converted {
            let seconds = self.probe_duration(path).await?;
            chapters.push((file_stem(&path.to_string_lossy()), seconds));
            let absolute = fs::canonicalize(path)
                .await
                .map_err(|e| MediaError::io("resolve", path, e))?;
            list.push_str(&concat_entry(&absolute));
        }

        let title = file_stem(&source_document.to_string_lossy());
        let list_path = working_dir.join("audiobook.concat_list.txt");
        let metadata_path = working_dir.join("audiobook.temp.ffmetadata");
        fs::write(&list_path, list)
            .await
            .map_err(|e| MediaError::io("write", &list_path, e))?;
        fs::write(&metadata_path, chapter_metadata(&title, narrator, &chapters))
            .await
            .map_err(|e| MediaError::io("write", &metadata_path, e))?;
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| MediaError::io("create directory", &self.output_dir, e))?;

        let output = self.output_dir.join(FINAL_AUDIOBOOK_NAME);
        let result = self
            .run_ffmpeg(vec![
                "-f".into(),
                "concat".into(),
                "-safe".into(),
                "0".into(),
                "-i".into(),
                path_string(&list_path),
                "-i".into(),
                path_string(&metadata_path),
                "-map_metadata".into(),
                "1".into(),
                "-map_chapters".into(),
                "1".into(),
                "-c".into(),
                "copy".into(),
                path_string(&output),
            ])
            .await;

        let _ = fs::remove_file(&list_path).await;
        let _ = fs::remove_file(&metadata_path).await;
        result?;

        info!("Final audiobook written to {}", output.display());
        Ok(output)
    }
}

/// FFMETADATA1 document with one chapter per converted file
pub fn chapter_metadata(title: &str, narrator: NarratorVoice, chapters: &[(String, f64)]) -> String {
    let mut doc = String::from(";FFMETADATA1\n");
    doc.push_str(&format!("title={}\n", escape_metadata(title)));
    doc.push_str(&format!("comment=Narrated with {} voice\n", narrator));

    let mut start_ms: u64 = 0;
    for (name, seconds) in chapters {
        let end_ms = start_ms + (seconds * 1000.0).round() as u64;
        doc.push_str("\n[CHAPTER]\nTIMEBASE=1/1000\n");
        doc.push_str(&format!("START={start_ms}\nEND={end_ms}\n"));
        doc.push_str(&format!("title={}\n", escape_metadata(name)));
        start_ms = end_ms;
    }
    doc
}

fn escape_metadata(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '=' | ';' | '#' | '\\' | '\n') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One line of a concat demuxer list
fn concat_entry(path: &Path) -> String {
    format!("file '{}'\n", path.to_string_lossy().replace('\'', "'\\''"))
}

/// `<dir>/<stem>.temp.<ext>` next to `path`
fn temp_sibling(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.temp.{}", ext.to_string_lossy()),
        None => format!("{stem}.temp"),
    };
    path.with_file_name(name)
}

fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
