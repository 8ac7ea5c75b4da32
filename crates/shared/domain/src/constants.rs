/// Route deriving active users from a deep copy of the dataset.
pub const ISSUE_PATH: &str = "/issue";
/// Route deriving active users straight from the shared dataset.
pub const NO_ISSUE_PATH: &str = "/no-issue";

/// Plain-text body for unmatched routes.
pub const NOT_FOUND_BODY: &str = "Not Found";

pub const PROFILE_FILE_PREFIX: &str = "cpu-profile-";
pub const PROFILE_FILE_EXTENSION: &str = "cpuprofile";

/// Base name of the optional configuration file (any supported extension).
pub const CONFIG_FILE: &str = "server";
/// Prefix for environment overrides, e.g. `CWATCH__SERVER__PORT`.
pub const ENV_PREFIX: &str = "CWATCH";
