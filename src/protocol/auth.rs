//! Login and entitlement responses from the account host.
//!
//! # Wire Format
//!
//! Login (`POST login`):
//!
//! ```json
//! {
//!     "ret_code": 0,
//!     "result": {
//!         "token": {
//!             "access_token": "secret",
//!             "refresh_token": "secret",
//!             "expires_in": 3600
//!         }
//!     }
//! }
//! ```
//!
//! A `ret_code` of `300` means the credentials were rejected.
//!
//! Entitlement (`POST right`):
//!
//! ```json
//! {
//!     "ret_code": 0,
//!     "ret_msg": "OK",
//!     "result": { "member_level": { "level": "VIP" } }
//! }
//! ```

use std::time::Duration;

use serde::Deserialize;
use serde_with::{formats::Flexible, serde_as, DurationSeconds};
use veil::Redact;

/// `ret_code` for bad credentials.
pub const RET_CODE_INVALID_CREDENTIALS: i64 = 300;

/// `ret_code` for success.
pub const RET_CODE_OK: i64 = 0;

/// Subscription level that is allowed to stream.
pub const VIP_LEVEL: &str = "VIP";

#[derive(Clone, PartialEq, Eq, Deserialize, Debug)]
pub struct Login {
    #[serde(default)]
    pub ret_code: i64,

    #[serde(default)]
    pub ret_msg: Option<String>,

    #[serde(default)]
    pub result: Option<LoginResult>,
}

#[derive(Clone, PartialEq, Eq, Deserialize, Debug)]
pub struct LoginResult {
    pub token: Token,
}

/// OAuth-style token pair handed out on login.
#[serde_as]
#[derive(Clone, Eq, PartialEq, Deserialize, Redact)]
pub struct Token {
    #[redact]
    pub access_token: String,

    #[redact]
    pub refresh_token: String,

    /// How long the access token remains valid
    #[serde_as(as = "DurationSeconds<u64, Flexible>")]
    pub expires_in: Duration,
}

#[derive(Clone, PartialEq, Eq, Deserialize, Debug)]
pub struct Right {
    #[serde(default)]
    pub ret_code: i64,

    #[serde(default)]
    pub ret_msg: Option<String>,

    #[serde(default)]
    pub result: Option<Account>,
}

/// Account entitlement.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Debug)]
pub struct Account {
    #[serde(default)]
    pub member_level: Option<MemberLevel>,
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize, Debug)]
pub struct MemberLevel {
    #[serde(default)]
    pub level: String,
}

impl Account {
    #[must_use]
    pub fn level(&self) -> Option<&str> {
        self.member_level.as_ref().map(|member| member.level.as_str())
    }

    #[must_use]
    pub fn is_vip(&self) -> bool {
        self.level() == Some(VIP_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::json;

    #[test]
    fn parses_login_tokens() {
        let login: Login = json(
            r#"{"ret_code":0,"result":{"token":{"access_token":"a","refresh_token":"r","expires_in":"3600"}}}"#,
            "login",
        )
        .unwrap();

        let token = login.result.unwrap().token;
        assert_eq!(token.access_token, "a");
        assert_eq!(token.expires_in, Duration::from_secs(3600));
    }

    #[test]
    fn tokens_are_redacted() {
        let login: Login = json(
            r#"{"result":{"token":{"access_token":"hunter2","refresh_token":"r","expires_in":1}}}"#,
            "login",
        )
        .unwrap();
        assert!(!format!("{login:?}").contains("hunter2"));
    }

    #[test]
    fn rejected_login_has_no_result() {
        let login: Login = json(r#"{"ret_code":300,"ret_msg":"fail"}"#, "login").unwrap();
        assert_eq!(login.ret_code, RET_CODE_INVALID_CREDENTIALS);
        assert!(login.result.is_none());
    }

    #[test]
    fn account_level() {
        let right: Right =
            json(r#"{"ret_code":0,"result":{"member_level":{"level":"VIP"}}}"#, "right").unwrap();
        assert!(right.result.unwrap().is_vip());
        assert!(!Account::default().is_vip());
    }
}
