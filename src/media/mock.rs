use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{MediaError, MediaOperation, MediaOperations, NarratorVoice};

/// One recorded call against [`RecordingMedia`]
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Assemble { group: String, units: Vec<usize> },
    AddSilence { file: PathBuf, duration: Duration },
    Convert { input: PathBuf, output: PathBuf },
    MergeFinal {
        converted: Vec<PathBuf>,
        source_document: PathBuf,
        narrator: NarratorVoice,
    },
}

/// In-memory media operations for tests
///
/// Every call is recorded. Successful calls write a small placeholder file so
/// later phases find their inputs. A failure can be scripted per operation and
/// chapter file name.
#[derive(Clone, Default)]
pub struct RecordingMedia {
    calls: Arc<Mutex<Vec<MediaCall>>>,
    failures: Arc<Mutex<Vec<(MediaOperation, Option<String>)>>>,
}

impl RecordingMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `operation` for the chapter whose file name is `group`
    ///
    /// For `Convert` the input file name is matched; for `MergeFinal` pass
    /// `None`.
    pub fn fail_on(self, operation: MediaOperation, group: Option<&str>) -> Self {
        self.failures
            .lock()
            .unwrap()
            .push((operation, group.map(str::to_string)));
        self
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MediaCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: MediaOperation, group: Option<&str>) -> Result<(), MediaError> {
        let scripted = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|(op, g)| *op == operation && g.as_deref() == group);
        if scripted {
            Err(MediaError::Simulated(format!(
                "{} failed for {}",
                operation,
                group.unwrap_or("final audiobook")
            )))
        } else {
            Ok(())
        }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

async fn touch(path: &Path) -> Result<(), MediaError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| MediaError::io("create directory", parent, e))?;
    }
    tokio::fs::write(path, b"audio")
        .await
        .map_err(|e| MediaError::io("write", path, e))
}

#[async_trait]
impl MediaOperations for RecordingMedia {
    async fn assemble(
        &self,
        group_id: &str,
        units: &[usize],
        _unit_dir: &Path,
        working_dir: &Path,
    ) -> Result<PathBuf, MediaError> {
        self.record(MediaCall::Assemble {
            group: group_id.to_string(),
            units: units.to_vec(),
        });
        self.check(MediaOperation::Assemble, Some(group_id))?;
        let path = working_dir.join(group_id);
        touch(&path).await?;
        Ok(path)
    }

    async fn add_silence(&self, group_file: &Path, duration: Duration) -> Result<(), MediaError> {
        self.record(MediaCall::AddSilence {
            file: group_file.to_path_buf(),
            duration,
        });
        self.check(MediaOperation::AddSilence, file_name(group_file).as_deref())
    }

    async fn convert(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        self.record(MediaCall::Convert {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
        self.check(MediaOperation::Convert, file_name(input).as_deref())?;
        touch(output).await
    }

    async fn merge_final(
        &self,
        converted: &[PathBuf],
        working_dir: &Path,
        source_document: &Path,
        narrator: NarratorVoice,
    ) -> Result<PathBuf, MediaError> {
        self.record(MediaCall::MergeFinal {
            converted: converted.to_vec(),
            source_document: source_document.to_path_buf(),
            narrator,
        });
        self.check(MediaOperation::MergeFinal, None)?;
        let output = working_dir.join("audiobook.m4b");
        touch(&output).await?;
        Ok(output)
    }
}
