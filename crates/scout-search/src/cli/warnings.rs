//! Error-stream filtering for the npm CLI.
//!
//! npm writes configuration warnings to stderr even when a search succeeds,
//! so stderr content alone is only fatal when it is not recognizably a
//! warning.

use scout_core::error::{ScoutError, ScoutResult};

/// Config keys other package managers leave in `.npmrc` that npm complains about
pub const KNOWN_CONFIG_WARNINGS: [&str; 8] = [
    "Unknown user config \"auto-install-peers\"",
    "Unknown user config \"ELECTRON_MIRROR\"",
    "Unknown user config \"store-dir\"",
    "Unknown user config \"strict-peer-dependencies\"",
    "Unknown user config \"run\"",
    "Unknown user config \"electron_mirror\"",
    "Unknown user config \"home\"",
    "Unknown user config \"is-current\"",
];

/// Marker npm puts on every warning line
const WARN_MARKER: &str = "WARN";

/// Check whether stderr output can be ignored
pub fn is_ignorable(stderr: &str) -> bool {
    let stderr = stderr.trim();

    stderr.is_empty()
        || stderr.contains(WARN_MARKER)
        || KNOWN_CONFIG_WARNINGS.iter().any(|warning| stderr.contains(warning))
}

/// Fail with the stderr text unless it is ignorable
pub fn check_stderr(stderr: &str) -> ScoutResult<()> {
    if is_ignorable(stderr) {
        Ok(())
    } else {
        Err(ScoutError::Subprocess {
            stderr: stderr.trim().to_string(),
        })
    }
}
