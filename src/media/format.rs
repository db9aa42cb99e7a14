//! Output formats and narrator voice selection

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target format of converted chapter files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    M4a,
    Aac,
    Mp3,
    Opus,
    Flac,
    Wav,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::M4a => "m4a",
            Self::Aac => "aac",
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::value_variants()
            .iter()
            .copied()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// ffmpeg audio codec for this container
    pub fn codec(self) -> &'static str {
        match self {
            Self::M4a | Self::Aac => "aac",
            Self::Mp3 => "libmp3lame",
            Self::Opus => "libopus",
            Self::Flac => "flac",
            Self::Wav => "pcm_s16le",
        }
    }

    /// Lossless and PCM codecs ignore a bitrate
    pub fn uses_bitrate(self) -> bool {
        !matches!(self, Self::Flac | Self::Wav)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Voice used for the narrator, recorded in the final audiobook metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarratorVoice {
    #[default]
    Male,
    Female,
}

impl NarratorVoice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for NarratorVoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
