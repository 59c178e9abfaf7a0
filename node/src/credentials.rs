//! # Credential Loading
//!
//! The secret seed is read once at startup, from `STELLAR_SECRET_KEY` or a
//! file, into a `Zeroizing<String>` that is wiped when dropped.
//!
//! The environment variable is removed from the process environment after
//! reading, so child processes don't inherit it. On Linux,
//! `/proc/<pid>/environ` still shows the initial environment; prefer the
//! file on shared hosts.

use std::path::Path;

use anyhow::{bail, Context, Result};
use zeroize::Zeroizing;

use stellar_signer::BatchError;

/// Environment variable holding the `S...` secret seed.
pub const SECRET_KEY_ENV: &str = "STELLAR_SECRET_KEY";

/// Load the secret seed.
///
/// The environment variable wins over the file. Surrounding whitespace is
/// stripped either way, so a trailing newline in a file is harmless.
///
/// # Errors
///
/// Fails with the "credentials are required" message when neither source
/// yields a non-blank value, or when the file cannot be read.
pub fn load_secret(secret_key_file: Option<&Path>) -> Result<Zeroizing<String>> {
    let raw = match std::env::var(SECRET_KEY_ENV) {
        Ok(value) => {
            let value = Zeroizing::new(value);
            clear_env_var(SECRET_KEY_ENV);
            Some(value)
        }
        Err(std::env::VarError::NotUnicode(_)) => {
            clear_env_var(SECRET_KEY_ENV);
            bail!("{SECRET_KEY_ENV} is not valid UTF-8");
        }
        Err(std::env::VarError::NotPresent) => None,
    };

    let raw = match (raw, secret_key_file) {
        (Some(value), _) => value,
        (None, Some(path)) => Zeroizing::new(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read secret key file {}", path.display()))?,
        ),
        (None, None) => bail!(BatchError::MissingCredentials),
    };

    let secret = Zeroizing::new(raw.trim().to_string());
    if secret.is_empty() {
        bail!(BatchError::MissingCredentials);
    }
    Ok(secret)
}

/// Called during single-threaded startup, before the tokio runtime exists,
/// so there are no concurrent readers of the environment.
fn clear_env_var(var: &str) {
    std::env::remove_var(var);
}
