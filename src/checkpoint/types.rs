//! Typed recovery checkpoint record
//!
//! The on-disk shape is fixed: `chapter_line_map`, `chapter_files`,
//! `total_lines` and `results_metadata`, in that order. Group insertion order
//! in `chapter_line_map` is preserved through a round trip.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use super::errors::CheckpointError;

/// Fixed file name of the checkpoint inside the working directory
pub const CHECKPOINT_FILE_NAME: &str = "recovery_checkpoint.json";

/// Per-line metadata recorded at the end of generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMetadata {
    pub index: usize,
    pub line: String,
    pub is_chapter_heading: bool,
}

/// One chapter and the ordered line indices that make it up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub id: String,
    pub units: Vec<usize>,
}

/// Chapter id → ordered line indices, keeping insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupUnitMap {
    entries: Vec<GroupEntry>,
}

impl GroupUnitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a chapter; a replaced chapter keeps its position
    pub fn insert(&mut self, id: impl Into<String>, units: Vec<usize>) -> Option<Vec<usize>> {
        let id = id.into();
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => Some(std::mem::replace(&mut entry.units, units)),
            None => {
                self.entries.push(GroupEntry { id, units });
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&[usize]> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.units.as_slice())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.entries
            .iter()
            .map(|entry| (entry.id.as_str(), entry.units.as_slice()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<usize>)> for GroupUnitMap {
    fn from_iter<I: IntoIterator<Item = (S, Vec<usize>)>>(iter: I) -> Self {
        let mut map = GroupUnitMap::new();
        for (id, units) in iter {
            map.insert(id, units);
        }
        map
    }
}

impl Serialize for GroupUnitMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.id, &entry.units)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GroupUnitMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupUnitMapVisitor;

        impl<'de> Visitor<'de> for GroupUnitMapVisitor {
            type Value = GroupUnitMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of chapter file names to line index lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = GroupUnitMap::new();
                while let Some((id, units)) = access.next_entry::<String, Vec<usize>>()? {
                    if map.contains(&id) {
                        return Err(de::Error::custom(format!("duplicate chapter `{id}`")));
                    }
                    map.entries.push(GroupEntry { id, units });
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(GroupUnitMapVisitor)
    }
}

/// Snapshot written once at the end of line generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Chapter file name → ordered line indices
    pub chapter_line_map: GroupUnitMap,
    /// Chapter file names in assembly order
    pub chapter_files: Vec<String>,
    /// Number of line segments the generation phase produced
    pub total_lines: usize,
    pub results_metadata: Vec<UnitMetadata>,
}

impl Checkpoint {
    /// Build a checkpoint from generation results; the line total is the metadata length
    pub fn from_generation(
        chapter_line_map: GroupUnitMap,
        chapter_files: Vec<String>,
        results_metadata: Vec<UnitMetadata>,
    ) -> Self {
        Self {
            chapter_line_map,
            chapter_files,
            total_lines: results_metadata.len(),
            results_metadata,
        }
    }

    pub fn chapter_count(&self) -> usize {
        self.chapter_files.len()
    }

    /// Check structural invariants
    ///
    /// Every chapter in `chapter_files` is a plain file name with exactly one
    /// mapping and vice versa, every index lies in `[0, total_lines)`, and the
    /// mapped indices together cover exactly `total_lines` lines.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        let mut seen = HashSet::new();
        for chapter in &self.chapter_files {
            if !is_plain_file_name(chapter) {
                return Err(CheckpointError::invalid(format!(
                    "chapter `{chapter}` is not a file name inside the working directory"
                )));
            }
            if !seen.insert(chapter.as_str()) {
                return Err(CheckpointError::invalid(format!(
                    "chapter `{chapter}` is listed more than once"
                )));
            }
            if !self.chapter_line_map.contains(chapter) {
                return Err(CheckpointError::invalid(format!(
                    "chapter `{chapter}` has no line mapping"
                )));
            }
        }

        if let Some(orphan) = self
            .chapter_line_map
            .ids()
            .find(|id| !seen.contains(id))
        {
            return Err(CheckpointError::invalid(format!(
                "line mapping for `{orphan}` is not in the chapter list"
            )));
        }

        let mut covered = HashSet::new();
        for (chapter, units) in self.chapter_line_map.iter() {
            for &index in units {
                if index >= self.total_lines {
                    return Err(CheckpointError::invalid(format!(
                        "chapter `{chapter}` references line {index}, outside 0..{}",
                        self.total_lines
                    )));
                }
                covered.insert(index);
            }
        }

        if covered.len() != self.total_lines {
            return Err(CheckpointError::invalid(format!(
                "chapters cover {} distinct lines but total_lines is {}",
                covered.len(),
                self.total_lines
            )));
        }

        Ok(())
    }

    /// Whether the metadata list mirrors `total_lines` one entry per index
    pub fn metadata_consistent(&self) -> bool {
        self.results_metadata.len() == self.total_lines
            && self
                .results_metadata
                .iter()
                .enumerate()
                .all(|(position, meta)| meta.index == position)
    }
}

/// Chapter files live directly in the working directory
fn is_plain_file_name(id: &str) -> bool {
    Path::new(id).file_name() == Some(OsStr::new(id))
}
