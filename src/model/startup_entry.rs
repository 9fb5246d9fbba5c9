use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Shown in place of a path no source or cache knows about.
pub const PATH_UNAVAILABLE: &str = "Path not available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupEntry {
    pub name: String,
    pub path: Option<String>,
    pub status: StartupStatus,
    pub scope: StartupScope,
}

impl StartupEntry {
    pub fn display_path(&self) -> &str {
        self.path.as_deref().unwrap_or(PATH_UNAVAILABLE)
    }

    pub fn is_enabled(&self) -> bool {
        self.status == StartupStatus::Enabled
    }
}

/// Privilege domain that owns an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartupScope {
    User,
    Machine,
}

impl StartupScope {
    /// Precedence order used when merging sources.
    pub const ALL: [StartupScope; 2] = [StartupScope::User, StartupScope::Machine];
}

impl std::fmt::Display for StartupScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupScope::User => write!(f, "User"),
            StartupScope::Machine => write!(f, "Machine"),
        }
    }
}

impl FromStr for StartupScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(StartupScope::User),
            "machine" => Ok(StartupScope::Machine),
            other => Err(format!("Unknown scope '{}' (expected user or machine)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartupStatus {
    Enabled,
    Disabled,
}

impl StartupStatus {
    pub const ENABLED_CODE: u8 = 2;
    pub const DISABLED_CODE: u8 = 3;

    pub fn code(self) -> u8 {
        match self {
            StartupStatus::Enabled => Self::ENABLED_CODE,
            StartupStatus::Disabled => Self::DISABLED_CODE,
        }
    }

    /// Anything other than the enabled code counts as disabled.
    pub fn from_code(code: u8) -> Self {
        if code == Self::ENABLED_CODE {
            StartupStatus::Enabled
        } else {
            StartupStatus::Disabled
        }
    }
}

impl std::fmt::Display for StartupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupStatus::Enabled => write!(f, "Enabled"),
            StartupStatus::Disabled => write!(f, "Disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_approval_convention() {
        assert_eq!(StartupStatus::Enabled.code(), 2);
        assert_eq!(StartupStatus::Disabled.code(), 3);
        assert_eq!(StartupStatus::from_code(2), StartupStatus::Enabled);
        assert_eq!(StartupStatus::from_code(3), StartupStatus::Disabled);
        assert_eq!(StartupStatus::from_code(6), StartupStatus::Disabled);
    }

    #[test]
    fn scope_parses_case_insensitively() {
        assert_eq!("User".parse::<StartupScope>(), Ok(StartupScope::User));
        assert_eq!(" machine ".parse::<StartupScope>(), Ok(StartupScope::Machine));
        assert!("system".parse::<StartupScope>().is_err());
    }

    #[test]
    fn missing_path_renders_sentinel() {
        let entry = StartupEntry {
            name: "App1".into(),
            path: None,
            status: StartupStatus::Enabled,
            scope: StartupScope::User,
        };
        assert_eq!(entry.display_path(), PATH_UNAVAILABLE);
        assert!(entry.is_enabled());
    }
}
