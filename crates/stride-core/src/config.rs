use crate::error::{Result, StrideError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Credentials / accounts
// ---------------------------------------------------------------------------

/// Provider credential block for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorosCredentials {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub password: String,
}

/// One configured account. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coros: Option<CorosCredentials>,
}

impl UserAccount {
    /// Provider credentials, if the account is syncable: both fields
    /// present and non-empty.
    pub fn credentials(&self) -> Option<&CorosCredentials> {
        self.coros
            .as_ref()
            .filter(|c| !c.account.is_empty() && !c.password.is_empty())
    }
}

// ---------------------------------------------------------------------------
// UsersConfig (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UsersConfig {
    #[serde(default)]
    pub users: Vec<UserAccount>,
}

impl UsersConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StrideError::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: UsersConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Per-entry diagnostics. A warning never fails the batch: accounts
    /// with problems are skipped at sync time, the rest still run.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.users.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no accounts configured".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for user in &self.users {
            if paths::validate_account_name(&user.name).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "account name '{}' is not filesystem-safe",
                        user.name
                    ),
                });
            }
            if !seen.insert(user.name.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("duplicate account name '{}'", user.name),
                });
            }
            match &user.coros {
                None => warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("account '{}' has no coros block", user.name),
                }),
                Some(c) if c.account.is_empty() || c.password.is_empty() => {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!(
                            "account '{}' is missing coros account or password",
                            user.name
                        ),
                    });
                }
                Some(_) => {}
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_yaml_roundtrip() {
        let yaml = r#"
users:
  - name: alice
    coros:
      account: alice@example.com
      password: hunter2
  - name: bob
"#;
        let cfg: UsersConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.users.len(), 2);
        assert_eq!(cfg.users[0].name, "alice");
        assert!(cfg.users[0].credentials().is_some());
        assert!(cfg.users[1].credentials().is_none());
    }

    #[test]
    fn empty_config_deserializes() {
        let cfg: UsersConfig = serde_yaml::from_str("{}").unwrap();
        assert!(cfg.users.is_empty());
    }

    #[test]
    fn credentials_require_both_fields() {
        let yaml = r#"
users:
  - name: carol
    coros:
      account: carol@example.com
      password: ""
"#;
        let cfg: UsersConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.users[0].credentials().is_none());
    }

    #[test]
    fn load_missing_file_is_config_not_found() {
        let err = UsersConfig::load(Path::new("/nonexistent/users.yaml")).unwrap_err();
        assert!(matches!(err, StrideError::ConfigNotFound(_)));
    }

    #[test]
    fn validate_flags_missing_credentials() {
        let yaml = "users:\n  - name: dave\n";
        let cfg: UsersConfig = serde_yaml::from_str(yaml).unwrap();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("no coros block")));
    }

    #[test]
    fn validate_flags_unsafe_name() {
        let yaml = "users:\n  - name: \"../escape\"\n";
        let cfg: UsersConfig = serde_yaml::from_str(yaml).unwrap();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| {
            w.level == WarnLevel::Error && w.message.contains("not filesystem-safe")
        }));
    }

    #[test]
    fn validate_flags_duplicates() {
        let yaml = "users:\n  - name: eve\n  - name: eve\n";
        let cfg: UsersConfig = serde_yaml::from_str(yaml).unwrap();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("duplicate account name 'eve'")));
    }

    #[test]
    fn validate_clean_config_warns_nothing_fatal() {
        let yaml = r#"
users:
  - name: alice
    coros:
      account: a
      password: b
"#;
        let cfg: UsersConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.validate().is_empty());
    }
}
