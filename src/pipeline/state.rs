//! Pipeline input rebuilt from a checkpoint, plus run options

use std::path::{Path, PathBuf};

use super::error::PipelineError;
use crate::checkpoint::{Checkpoint, GroupUnitMap};
use crate::media::{NarratorVoice, OutputFormat};

/// Chapter order and membership for one resume attempt; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    pub group_order: Vec<String>,
    pub group_units: GroupUnitMap,
}

impl PipelineState {
    pub fn from_checkpoint(checkpoint: &Checkpoint) -> Self {
        Self {
            group_order: checkpoint.chapter_files.clone(),
            group_units: checkpoint.chapter_line_map.clone(),
        }
    }

    pub fn group_count(&self) -> usize {
        self.group_order.len()
    }

    pub fn units_for(&self, group: &str) -> Result<&[usize], PipelineError> {
        self.group_units
            .get(group)
            .ok_or_else(|| PipelineError::UnmappedGroup {
                group: group.to_string(),
            })
    }
}

/// Inputs for the optional final merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalMergeRequest {
    pub source_document: PathBuf,
    pub narrator: NarratorVoice,
}

impl FinalMergeRequest {
    /// Build the request from CLI-style flags; a merge needs a source document
    pub fn from_flags(
        generate_final: bool,
        source_document: Option<PathBuf>,
        narrator: NarratorVoice,
    ) -> Result<Option<Self>, PipelineError> {
        if !generate_final {
            return Ok(None);
        }
        let source_document = source_document.ok_or(PipelineError::MissingSourceDocument)?;
        Ok(Some(Self {
            source_document,
            narrator,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub working_dir: PathBuf,
    pub unit_dir: PathBuf,
    pub output_format: OutputFormat,
    pub final_merge: Option<FinalMergeRequest>,
}

impl PipelineOptions {
    pub fn new(working_dir: impl Into<PathBuf>, unit_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            unit_dir: unit_dir.into(),
            output_format: OutputFormat::default(),
            final_merge: None,
        }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_final_merge(mut self, request: Option<FinalMergeRequest>) -> Self {
        self.final_merge = request;
        self
    }

    /// Converted file for a chapter: the chapter file name with the target extension
    pub fn converted_path(&self, group: &str) -> PathBuf {
        self.working_dir
            .join(Path::new(group).with_extension(self.output_format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converted_path_replaces_extension() {
        let options = PipelineOptions::new("work", "work/line_segments")
            .with_output_format(OutputFormat::Mp3);
        assert_eq!(
            options.converted_path("Chapter 1.wav"),
            PathBuf::from("work/Chapter 1.mp3")
        );
    }

    #[test]
    fn test_final_merge_needs_source_document() {
        assert_eq!(
            FinalMergeRequest::from_flags(false, None, NarratorVoice::Male).unwrap(),
            None
        );
        assert!(matches!(
            FinalMergeRequest::from_flags(true, None, NarratorVoice::Male),
            Err(PipelineError::MissingSourceDocument)
        ));
        let request =
            FinalMergeRequest::from_flags(true, Some("book.epub".into()), NarratorVoice::Female)
                .unwrap()
                .unwrap();
        assert_eq!(request.narrator, NarratorVoice::Female);
    }

    #[test]
    fn test_unmapped_group() {
        let state = PipelineState {
            group_order: vec!["ch1.wav".into()],
            group_units: GroupUnitMap::new(),
        };
        assert!(matches!(
            state.units_for("ch1.wav"),
            Err(PipelineError::UnmappedGroup { .. })
        ));
    }
}
