//! Shared utilities for `issuetrack`.
//!
//! - ID generation (base36 adaptive)
//! - Password hashing (Argon2id, PHC strings)
//! - Time parsing and formatting (RFC3339)
//! - Owner-only file writes for session and config state

mod hash;
pub mod id;
pub mod time;

pub use hash::{hash_password, verify_password};
pub use id::{IdConfig, IdGenerator, normalize_id};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Write `contents` to `path`, readable only by the current user.
///
/// Creates the parent directory (mode 0700 on unix) when missing.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_private_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(parent, fs::Permissions::from_mode(0o700))?;
            }
        }
    }

    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}
