//! Site configuration module.
//!
//! Handles loading and validating the project's `config.toml`. There is one
//! config file per project, read once at startup; the resulting [`SiteConfig`]
//! is immutable and passed by reference to every stage.
//!
//! ## Config File Location
//!
//! ```text
//! blog/
//! ├── config.toml        # Site config (required)
//! ├── md/                # Content files
//! └── template/          # page.html, index.html, static/
//! ```
//!
//! Projects created by older releases carry a `config.json` with the same
//! keys. It is read only when no `config.toml` exists.
//!
//! ## Configuration Options
//!
//! ```toml
//! title = "My Blog"          # required
//! author = "Jane Doe"        # required
//! year = "2024"              # required, string or integer
//! root = "/"                 # required, prefix for every generated link
//! site_url = "https://example.org"   # optional, exposed to page templates
//! repo = "git@github.com:me/me.github.io.git"   # required for deploy only
//! branch = "master"          # branch pushed by deploy
//!
//! content_dir = "md"
//! output_dir = "output"
//! template_dir = "template"
//! static_dir = "template/static"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";
pub const LEGACY_CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No config.toml or config.json found in {0}")]
    NotFound(PathBuf),
    #[error("Missing required config key `{0}`")]
    MissingKey(&'static str),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// `title`, `author`, `year` and `root` have no defaults; a file missing any
/// of them fails to load.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, shown on the index page.
    pub title: String,
    /// Author name for the footer of every page.
    pub author: String,
    /// Copyright year for the footer of every page.
    #[serde(deserialize_with = "string_or_integer")]
    pub year: String,
    /// Prefix prepended to every generated link and stylesheet path.
    pub root: String,
    /// Canonical site URL, available to templates as `{site_url}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Remote the output directory is pushed to by `deploy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Remote branch `deploy` pushes to.
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("md")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("template")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("template/static")
}

/// Accepts `year = "2024"` as well as `year = 2024`.
fn string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(s) => s,
        Year::Number(n) => n.to_string(),
    })
}

/// Directories of a project, resolved against the project root.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    pub content: PathBuf,
    pub output: PathBuf,
    pub templates: PathBuf,
    pub static_assets: PathBuf,
}

impl SiteConfig {
    /// Validate that required values are not blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("year", &self.year),
            ("branch", &self.branch),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// The deploy remote. Only `deploy` needs it, so its absence is not a
    /// load-time error.
    pub fn require_repo(&self) -> Result<&str, ConfigError> {
        match self.repo.as_deref().map(str::trim) {
            Some(repo) if !repo.is_empty() => Ok(repo),
            _ => Err(ConfigError::MissingKey("repo")),
        }
    }

    /// Resolve the configured directories against `project_root`.
    /// Absolute paths in the config are kept as they are.
    pub fn paths(&self, project_root: &Path) -> ProjectPaths {
        ProjectPaths {
            content: project_root.join(&self.content_dir),
            output: project_root.join(&self.output_dir),
            templates: project_root.join(&self.template_dir),
            static_assets: project_root.join(&self.static_dir),
        }
    }
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the project config from `root`.
///
/// Reads `config.toml`, falling back to a legacy `config.json`, and
/// validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let toml_path = root.join(CONFIG_FILE);
    let config: SiteConfig = if toml_path.is_file() {
        toml::from_str(&read_config_file(&toml_path)?)?
    } else {
        let json_path = root.join(LEGACY_CONFIG_FILE);
        if !json_path.is_file() {
            return Err(ConfigError::NotFound(root.to_path_buf()));
        }
        tracing::debug!(path = %json_path.display(), "reading legacy config");
        serde_json::from_str(&read_config_file(&json_path)?)?
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# arco configuration
# ==================
# The four keys below are required.

# Site title, shown on the index page.
title = "My Blog"

# Author and year, shown in the footer of every page.
author = "Anonymous"
year = "2024"

# Prefix for every generated link. Use "/" when the site is served from the
# domain root, or a full URL such as "https://example.org/blog/".
root = "/"

# ---------------------------------------------------------------------------
# Optional
# ---------------------------------------------------------------------------

# Canonical site URL, available to page templates as {site_url}.
# site_url = "https://example.org"

# Git remote the output directory is pushed to by `arco deploy`.
# repo = "git@github.com:me/me.github.io.git"

# Remote branch pushed by `arco deploy`.
branch = "master"

# ---------------------------------------------------------------------------
# Layout (relative to the project directory)
# ---------------------------------------------------------------------------
content_dir = "md"
output_dir = "output"
template_dir = "template"
static_dir = "template/static"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
title = "Notes"
author = "Ada"
year = "2024"
root = "/"
"#;

    #[test]
    fn parse_minimal_config_uses_defaults() {
        let config: SiteConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.title, "Notes");
        assert_eq!(config.root, "/");
        assert_eq!(config.branch, "master");
        assert_eq!(config.content_dir, PathBuf::from("md"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.template_dir, PathBuf::from("template"));
        assert_eq!(config.static_dir, PathBuf::from("template/static"));
        assert!(config.repo.is_none());
        assert!(config.site_url.is_none());
    }

    #[test]
    fn year_accepts_integer() {
        let toml = r#"
title = "Notes"
author = "Ada"
year = 2017
root = "/"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.year, "2017");
    }

    #[test]
    fn missing_required_key_is_error() {
        let toml = r#"
title = "Notes"
year = "2024"
root = "/"
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("author"), "{err}");
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = format!("{MINIMAL}\ntitel = \"typo\"\n");
        let result: Result<SiteConfig, _> = toml::from_str(&toml);
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_reads_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), MINIMAL).unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.author, "Ada");
    }

    #[test]
    fn load_config_falls_back_to_legacy_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(LEGACY_CONFIG_FILE),
            r#"{"title": "Old", "author": "Bob", "year": "2017",
                "root": "https://bob.github.io/", "repo": "git@github.com:bob/bob.github.io.git"}"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Old");
        assert_eq!(config.root, "https://bob.github.io/");
        assert_eq!(
            config.require_repo().unwrap(),
            "git@github.com:bob/bob.github.io.git"
        );
    }

    #[test]
    fn load_config_prefers_toml_over_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), MINIMAL).unwrap();
        fs::write(tmp.path().join(LEGACY_CONFIG_FILE), "not json").unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Notes");
    }

    #[test]
    fn load_config_without_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            MINIMAL.replace("\"Ada\"", "\"  \""),
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[test]
    fn require_repo_missing_or_blank() {
        let mut config: SiteConfig = toml::from_str(MINIMAL).unwrap();
        assert!(matches!(
            config.require_repo(),
            Err(ConfigError::MissingKey("repo"))
        ));

        config.repo = Some("   ".to_string());
        assert!(config.require_repo().is_err());

        config.repo = Some("/srv/git/site.git".to_string());
        assert_eq!(config.require_repo().unwrap(), "/srv/git/site.git");
    }

    #[test]
    fn paths_resolve_against_project_root() {
        let config: SiteConfig = toml::from_str(MINIMAL).unwrap();
        let paths = config.paths(Path::new("/blog"));
        assert_eq!(paths.content, PathBuf::from("/blog/md"));
        assert_eq!(paths.output, PathBuf::from("/blog/output"));
        assert_eq!(paths.templates, PathBuf::from("/blog/template"));
        assert_eq!(paths.static_assets, PathBuf::from("/blog/template/static"));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let toml = format!("{MINIMAL}\noutput_dir = \"/var/www\"\n");
        let config: SiteConfig = toml::from_str(&toml).unwrap();
        assert_eq!(
            config.paths(Path::new("/blog")).output,
            PathBuf::from("/var/www")
        );
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_config() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.root, "/");
        assert_eq!(config.content_dir, PathBuf::from("md"));
    }

    #[test]
    fn stock_config_toml_documents_optional_keys() {
        let content = stock_config_toml();
        assert!(content.contains("# repo ="));
        assert!(content.contains("# site_url ="));
    }
}
