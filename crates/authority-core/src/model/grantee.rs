//! Grantee identity and configured users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AuthorityError, AuthorityResult};

/// Host marker matching any client host.
pub const ANY_HOST: &str = "%";

/// A client identity: username plus originating host.
///
/// The hostname is stored as given, so `%` and `localhost` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Grantee {
    username: String,
    hostname: String,
}

impl Grantee {
    /// Create a grantee. Both parts must be non-empty.
    pub fn new(username: impl Into<String>, hostname: impl Into<String>) -> AuthorityResult<Self> {
        let username = username.into();
        let hostname = hostname.into();
        if username.is_empty() {
            return Err(AuthorityError::InvalidGrantee(format!(
                "empty username for host '{}'",
                hostname
            )));
        }
        if hostname.is_empty() {
            return Err(AuthorityError::InvalidGrantee(format!(
                "empty hostname for user '{}'",
                username
            )));
        }
        Ok(Self { username, hostname })
    }

    /// The username part.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The hostname part.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

impl fmt::Display for Grantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.username, self.hostname)
    }
}

impl FromStr for Grantee {
    type Err = AuthorityError;

    /// Parse `user@host`. The split happens at the last `@`; a bare
    /// username means any host.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('@') {
            Some((user, host)) => Self::new(user.trim(), host.trim()),
            None => Self::new(s.trim(), ANY_HOST),
        }
    }
}

/// A logical user configured on the access layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityUser {
    grantee: Grantee,
    password: String,
}

impl AuthorityUser {
    /// Create a user.
    pub fn new(grantee: Grantee, password: impl Into<String>) -> Self {
        Self {
            grantee,
            password: password.into(),
        }
    }

    /// Convenience constructor from raw parts.
    pub fn from_parts(
        username: impl Into<String>,
        password: impl Into<String>,
        hostname: impl Into<String>,
    ) -> AuthorityResult<Self> {
        Ok(Self::new(Grantee::new(username, hostname)?, password))
    }

    /// The identity of this user.
    pub fn grantee(&self) -> &Grantee {
        &self.grantee
    }

    /// The configured password.
    pub fn password(&self) -> &str {
        &self.password
    }
}
