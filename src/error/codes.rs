/// Error code registry
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 4000-4999: Execution errors
/// - 6000-6999: Git errors
/// - 7000-7999: Validation errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_READ_FAILED: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1007;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;

    // Execution errors (4000-4999)
    pub const EXEC_COMMAND_FAILED: u16 = 4003;

    // Git errors (6000-6999)
    pub const GIT_MERGE_CONFLICT: u16 = 6003;
    pub const GIT_DETACHED_HEAD: u16 = 6009;

    // Validation errors (7000-7999)
    pub const VALIDATION_COMMIT_MESSAGE: u16 = 7001;
    pub const VALIDATION_BRANCH_NAME: u16 = 7002;
    pub const VALIDATION_BRANCH_STATE: u16 = 7003;
    pub const VALIDATION_REMOTE: u16 = 7004;
}

/// Human-readable description of an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_READ_FAILED => "Configuration file could not be read",
        ErrorCode::CONFIG_PARSE_ERROR => "Configuration file could not be parsed",
        ErrorCode::CONFIG_INVALID_VALUE => "Configuration value is invalid",
        ErrorCode::EXEC_COMMAND_FAILED => "A git command exited with a non-zero status",
        ErrorCode::GIT_MERGE_CONFLICT => "Merge stopped on conflicts that need manual resolution",
        ErrorCode::GIT_DETACHED_HEAD => "HEAD is detached; check out a branch first",
        ErrorCode::VALIDATION_COMMIT_MESSAGE => "Commit message does not follow the convention",
        ErrorCode::VALIDATION_BRANCH_NAME => "Branch name is not valid",
        ErrorCode::VALIDATION_BRANCH_STATE => "Branch state does not allow the operation",
        ErrorCode::VALIDATION_REMOTE => "Remote setting is not valid",
        _ => "Unknown error",
    }
}
