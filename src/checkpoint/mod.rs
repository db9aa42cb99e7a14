//! Recovery checkpoint: the persisted chapter/line structure of a run

pub mod errors;
pub mod store;
pub mod types;

pub use errors::CheckpointError;
pub use store::CheckpointStore;
pub use types::{Checkpoint, GroupEntry, GroupUnitMap, UnitMetadata, CHECKPOINT_FILE_NAME};
