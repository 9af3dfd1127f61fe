//! Session state: device identity and access tokens.
//!
//! The session is loaded from and saved to the host's [`Settings`] under the
//! keys in [`Session::STORAGE_KEYS`]. The device id is generated once, on the
//! first run, and then reused for as long as the host keeps its settings.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use veil::Redact;

use crate::{error::Result, store::Settings};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Session {
    /// Identifies this installation to the vendor on every request.
    pub device_id: String,

    pub tokens: Option<Tokens>,
}

#[derive(Clone, PartialEq, Eq, Hash, Redact)]
pub struct Tokens {
    #[redact]
    pub access_token: String,

    #[redact]
    pub refresh_token: String,

    pub expires_at: SystemTime,
}

impl Tokens {
    #[must_use]
    pub fn time_to_live(&self) -> Duration {
        self.expires_at
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }
}

impl Session {
    pub const DEVICE_ID: &'static str = "device_id";
    pub const ACCESS_TOKEN: &'static str = "access_token";
    pub const REFRESH_TOKEN: &'static str = "refresh_token";
    pub const EXPIRES: &'static str = "expires";

    pub const STORAGE_KEYS: [&'static str; 4] = [
        Self::DEVICE_ID,
        Self::ACCESS_TOKEN,
        Self::REFRESH_TOKEN,
        Self::EXPIRES,
    ];

    const DEVICE_ID_LENGTH: usize = 28;

    const DEVICE_ID_ALPHABET: &'static [u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_";

    #[must_use]
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            tokens: None,
        }
    }

    /// Generates a device id like the Android app does: 28 characters of
    /// letters, digits and underscores.
    #[must_use]
    pub fn generate_device_id() -> String {
        (0..Self::DEVICE_ID_LENGTH)
            .map(|_| {
                let index = fastrand::usize(..Self::DEVICE_ID_ALPHABET.len());
                char::from(Self::DEVICE_ID_ALPHABET[index])
            })
            .collect()
    }

    /// Restores the session from `store`, creating and persisting a device
    /// id when there is none yet.
    ///
    /// Tokens are restored whenever an access token is present. A missing or
    /// unreadable expiry makes them count as expired.
    ///
    /// # Errors
    ///
    /// Returns error if a new device id cannot be persisted.
    pub fn load(store: &mut impl Settings) -> Result<Self> {
        let device_id = match store.read(Self::DEVICE_ID).filter(|id| !id.is_empty()) {
            Some(device_id) => device_id,
            None => {
                let device_id = Self::generate_device_id();
                debug!("generated new device id");
                store.set(Self::DEVICE_ID, &device_id)?;
                device_id
            }
        };

        // A lone access token is still usable until it expires.
        let tokens = store
            .read(Self::ACCESS_TOKEN)
            .filter(|token| !token.is_empty())
            .map(|access_token| {
                let expires_at = store
                    .read(Self::EXPIRES)
                    .and_then(|expires| expires.parse::<u64>().ok())
                    .map_or(UNIX_EPOCH, |secs| UNIX_EPOCH + Duration::from_secs(secs));

                Tokens {
                    access_token,
                    refresh_token: store.read(Self::REFRESH_TOKEN).unwrap_or_default(),
                    expires_at,
                }
            });

        Ok(Self { device_id, tokens })
    }

    /// Writes the session to `store`. Absent tokens are removed.
    ///
    /// # Errors
    ///
    /// Returns error if `store` fails to persist a value.
    pub fn save(&self, store: &mut impl Settings) -> Result<()> {
        store.set(Self::DEVICE_ID, &self.device_id)?;

        match &self.tokens {
            Some(tokens) => {
                let expires = tokens
                    .expires_at
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or(Duration::ZERO)
                    .as_secs();

                store.set(Self::ACCESS_TOKEN, &tokens.access_token)?;
                store.set(Self::REFRESH_TOKEN, &tokens.refresh_token)?;
                store.set(Self::EXPIRES, &expires.to_string())?;
            }
            None => {
                store.remove(Self::ACCESS_TOKEN)?;
                store.remove(Self::REFRESH_TOKEN)?;
                store.remove(Self::EXPIRES)?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|tokens| tokens.access_token.as_str())
    }

    /// Whether there is an access token that has not expired yet.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tokens.as_ref().is_some_and(|tokens| !tokens.is_expired())
    }
}
