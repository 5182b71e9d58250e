//! Provider configuration.

use serde::Deserialize;

use crate::error::{AuthorityError, AuthorityResult};
use crate::model::{AuthorityUser, Grantee};
use crate::provider::NATIVE_PROVIDER_TYPE;

/// Default environment variable listing users.
pub const DEFAULT_USERS_ENV: &str = "AUTHORITY_USERS";

/// A configured user as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserConfig {
    /// Grantee in `user@host` form.
    pub user: String,
    /// Password, unused by the privilege providers.
    #[serde(default)]
    pub password: String,
}

impl UserConfig {
    /// Create a user entry.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Resolve into an [`AuthorityUser`].
    pub fn to_user(&self) -> AuthorityResult<AuthorityUser> {
        let grantee: Grantee = self.user.parse()?;
        Ok(AuthorityUser::new(grantee, self.password.clone()))
    }
}

fn default_provider_type() -> String {
    NATIVE_PROVIDER_TYPE.to_string()
}

/// Which provider to run and for which users.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Registered provider type, `NATIVE` by default.
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,
    /// Configured logical users.
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            users: Vec::new(),
        }
    }
}

impl ProviderConfig {
    /// Set the provider type.
    pub fn with_provider_type(mut self, provider_type: impl Into<String>) -> Self {
        self.provider_type = provider_type.into();
        self
    }

    /// Add a user.
    pub fn with_user(mut self, user: UserConfig) -> Self {
        self.users.push(user);
        self
    }

    /// Append users parsed from an environment variable, if set.
    ///
    /// Format: `user@host[:password]` entries separated by `;`.
    ///
    /// ```text
    /// AUTHORITY_USERS="root@localhost:secret;app@%"
    /// ```
    pub fn with_users_from_env(mut self, env_var: &str) -> AuthorityResult<Self> {
        if let Ok(list) = std::env::var(env_var) {
            self.users.extend(parse_user_list(&list)?);
        }
        Ok(self)
    }

    /// Resolve every configured user.
    pub fn authority_users(&self) -> AuthorityResult<Vec<AuthorityUser>> {
        self.users.iter().map(UserConfig::to_user).collect()
    }
}

/// Parse a `user@host[:password];...` list.
pub fn parse_user_list(list: &str) -> AuthorityResult<Vec<UserConfig>> {
    list.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (user, password) = entry.split_once(':').unwrap_or((entry, ""));
            let user = user.trim();
            if user.is_empty() {
                return Err(AuthorityError::Config(format!(
                    "missing user in entry '{}'",
                    entry
                )));
            }
            Ok(UserConfig::new(user, password))
        })
        .collect()
}
