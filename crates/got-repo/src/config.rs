//! The repository `config` metadata file.
//!
//! The file is a small TOML document with a single `[core]` table. The store
//! never interprets these flags; they are seeded by `init` and checked for a
//! supported format version by `load`.

use serde::{Deserialize, Serialize};

use crate::error::{RepoError, RepoResult};

/// Parsed contents of `.got/config`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    pub core: CoreConfig,
}

/// The `[core]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// On-disk layout version. Only [`RepoConfig::FORMAT_VERSION`] is understood.
    #[serde(rename = "repositoryformatversion")]
    pub repository_format_version: u32,
    /// Whether the executable bit of worktree files is tracked.
    pub filemode: bool,
    /// Whether the repository has no worktree.
    pub bare: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            repository_format_version: RepoConfig::FORMAT_VERSION,
            filemode: false,
            bare: false,
        }
    }
}

impl RepoConfig {
    /// The only supported `repositoryformatversion`.
    pub const FORMAT_VERSION: u32 = 0;

    /// Render as TOML.
    pub fn to_toml_string(&self) -> RepoResult<String> {
        toml::to_string(self).map_err(|e| RepoError::Serialization(e.to_string()))
    }

    /// Parse from TOML. Unknown keys and tables are ignored.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Returns `true` if this build can read a repository with this config.
    pub fn is_supported(&self) -> bool {
        self.core.repository_format_version == Self::FORMAT_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags() {
        let c = RepoConfig::default();
        assert_eq!(c.core.repository_format_version, 0);
        assert!(!c.core.filemode);
        assert!(!c.core.bare);
        assert!(c.is_supported());
    }

    #[test]
    fn renders_core_table() {
        let rendered = RepoConfig::default().to_toml_string().unwrap();
        assert!(rendered.contains("[core]"));
        assert!(rendered.contains("repositoryformatversion = 0"));
        assert!(rendered.contains("filemode = false"));
        assert!(rendered.contains("bare = false"));
    }

    #[test]
    fn parses_rendered_output() {
        let rendered = RepoConfig::default().to_toml_string().unwrap();
        let parsed = RepoConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, RepoConfig::default());
    }

    #[test]
    fn ignores_unknown_keys() {
        let parsed = RepoConfig::from_toml_str(
            "[core]\nrepositoryformatversion = 0\nfilemode = true\nbare = false\nlogallrefupdates = true\n\n[user]\nname = \"x\"\n",
        )
        .unwrap();
        assert!(parsed.core.filemode);
    }

    #[test]
    fn missing_core_table_is_rejected() {
        assert!(RepoConfig::from_toml_str("[user]\nname = \"x\"\n").is_err());
    }

    #[test]
    fn future_version_is_unsupported() {
        let parsed = RepoConfig::from_toml_str(
            "[core]\nrepositoryformatversion = 1\nfilemode = false\nbare = false\n",
        )
        .unwrap();
        assert!(!parsed.is_supported());
    }
}
