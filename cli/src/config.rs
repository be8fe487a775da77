use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "makedown.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Candidate input documents, tried in order when no `--file` is given.
    #[serde(default = "default_files")]
    pub files: Vec<PathBuf>,

    /// Program invoked by `run`.
    #[serde(default = "default_make")]
    pub make: String,

    /// Default destination for `generate`. Stdout when unset.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_files() -> Vec<PathBuf> {
    vec![PathBuf::from("makedown.md"), PathBuf::from("README.md")]
}

fn default_make() -> String {
    "make".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            files: default_files(),
            make: default_make(),
            output: None,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("invalid config: {}", e))
    }

    /// Load an explicit config file, or `makedown.toml` from the working
    /// directory if present, or the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Config::default());
                }
                path
            }
        };
        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read config '{}': {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Self::from_toml(&text)
    }

    /// Pick the input document: the explicit one, or the first candidate
    /// that exists.
    pub fn resolve_input(&self, explicit: Option<&Path>) -> Result<PathBuf, String> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        self.files
            .iter()
            .find(|candidate| candidate.is_file())
            .cloned()
            .ok_or_else(|| {
                let names: Vec<String> =
                    self.files.iter().map(|p| p.display().to_string()).collect();
                format!("no input document found (tried: {})", names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.files,
            vec![PathBuf::from("makedown.md"), PathBuf::from("README.md")]
        );
        assert_eq!(config.make, "make");
        assert_eq!(config.output, None);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(r#"make = "gmake""#).unwrap();
        assert_eq!(config.make, "gmake");
        assert_eq!(config.files, default_files());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            files = ["BUILD.md"]
            make = "bmake"
            output = "Makefile"
            "#,
        )
        .unwrap();
        assert_eq!(config.files, vec![PathBuf::from("BUILD.md")]);
        assert_eq!(config.make, "bmake");
        assert_eq!(config.output, Some(PathBuf::from("Makefile")));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_toml("colour = true").unwrap_err();
        assert!(err.starts_with("invalid config"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "make = \"remake\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.make, "remake");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.starts_with("cannot read config"));
    }

    #[test]
    fn test_resolve_input() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("README.md");
        std::fs::write(&second, "# a:\n").unwrap();
        let config = Config {
            files: vec![dir.path().join("makedown.md"), second.clone()],
            ..Config::default()
        };
        assert_eq!(config.resolve_input(None).unwrap(), second);

        let explicit = PathBuf::from("other.md");
        assert_eq!(config.resolve_input(Some(&explicit)).unwrap(), explicit);
    }

    #[test]
    fn test_resolve_input_none_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            files: vec![dir.path().join("makedown.md")],
            ..Config::default()
        };
        let err = config.resolve_input(None).unwrap_err();
        assert!(err.contains("no input document found"));
    }
}
