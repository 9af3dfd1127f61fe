//! Account credentials loaded from a secrets file.
//!
//! The file is TOML with two keys:
//!
//! ```toml
//! username = "user@example.com"
//! password = "hunter2"
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use veil::Redact;

use crate::error::{Error, Result};

#[derive(Clone, PartialEq, Eq, Hash, Deserialize, Redact)]
pub struct Credentials {
    pub username: String,

    #[redact]
    pub password: String,
}

impl Credentials {
    /// Secrets files are tiny; anything larger is refused unread.
    const MAX_FILE_SIZE: u64 = 1024;

    /// Loads credentials from `secrets_file`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file is missing, too large, not valid TOML,
    /// or lacks a non-empty username or password.
    pub fn from_file(secrets_file: impl AsRef<Path>) -> Result<Self> {
        let path = secrets_file.as_ref();

        let attributes = fs::metadata(path)?;
        if attributes.len() > Self::MAX_FILE_SIZE {
            return Err(Error::invalid_argument(format!(
                "{} is too large",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let credentials: Self = toml::from_str(&contents).map_err(|e| {
            Error::invalid_argument(format!("{} format is invalid: {e}", path.display()))
        })?;

        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(Error::invalid_argument(format!(
                "{} should contain a username and password",
                path.display()
            )));
        }

        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn write(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    fn loads_credentials() {
        let file = write("username = \"user\"\npassword = \"hunter2\"\n");
        let credentials = Credentials::from_file(file.path()).unwrap();
        assert_eq!(credentials.username, "user");
        assert_eq!(credentials.password, "hunter2");
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }

    #[test]
    fn rejects_incomplete_files() {
        let file = write("username = \"user\"\n");
        assert_eq!(
            Credentials::from_file(file.path()).unwrap_err().kind,
            ErrorKind::InvalidArgument
        );

        let file = write("username = \"user\"\npassword = \"\"\n");
        assert_eq!(
            Credentials::from_file(file.path()).unwrap_err().kind,
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn rejects_large_files() {
        let file = write(&"#".repeat(2048));
        assert_eq!(
            Credentials::from_file(file.path()).unwrap_err().kind,
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Credentials::from_file(dir.path().join("secrets.toml")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
