/// Error code registry for audiobook recovery
///
/// Error codes are organized by category:
/// - 1000-1999: Resume blockers (checkpoint and line segment state)
/// - 2000-2999: Cleanup of stale outputs
/// - 3000-3999: Media operations (assembly, padding, conversion, merge)
/// - 4000-4999: Configuration and arguments
/// - 5000-5999: Generation and checkpoint persistence
pub struct ErrorCode;

impl ErrorCode {
    // Resume blockers (1000-1999)
    pub const NO_CHECKPOINT: u16 = 1001;
    pub const CORRUPT_CHECKPOINT: u16 = 1002;
    pub const INCOMPLETE_UNITS: u16 = 1003;

    // Cleanup (2000-2999)
    pub const CLEANUP_FAILURE: u16 = 2001;

    // Media operations (3000-3999)
    pub const MEDIA_OPERATION_FAILURE: u16 = 3001;

    // Configuration and arguments (4000-4999)
    pub const CONFIG_INVALID: u16 = 4001;
    pub const INVALID_ARGUMENTS: u16 = 4002;

    // Generation and persistence (5000-5999)
    pub const GENERATION_FAILURE: u16 = 5001;
    pub const CHECKPOINT_WRITE_FAILURE: u16 = 5002;
}

/// Short description of an error code, used by `--verbose` output
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::NO_CHECKPOINT => "No recovery checkpoint in the working directory",
        ErrorCode::CORRUPT_CHECKPOINT => "Recovery checkpoint could not be read or is inconsistent",
        ErrorCode::INCOMPLETE_UNITS => "Line segments declared by the checkpoint are missing or empty",
        ErrorCode::CLEANUP_FAILURE => "A stale chapter or temporary file could not be removed",
        ErrorCode::MEDIA_OPERATION_FAILURE => "An external media operation failed",
        ErrorCode::CONFIG_INVALID => "Configuration file or environment override is invalid",
        ErrorCode::INVALID_ARGUMENTS => "Command-line arguments are inconsistent",
        ErrorCode::GENERATION_FAILURE => "Line segment generation failed",
        ErrorCode::CHECKPOINT_WRITE_FAILURE => "Recovery checkpoint could not be written",
        _ => "Unknown error",
    }
}
