//! Configuration module for drivemirror.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{is_safe_local_name, ParentRef, RemoteId, RemotePath};
use crate::usecases::mirror_tree::{ExtensionAllowlist, DEFAULT_MIRROR_EXTENSIONS};

/// Top-level configuration for drivemirror.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub auth: AuthConfig,
    pub mirror: MirrorConfig,
    pub workflows: WorkflowsConfig,
    pub logging: LoggingConfig,
}

/// Remote store location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Folder the workflows operate under. `None` means the top-level container.
    pub root_id: Option<RemoteId>,
    /// Base URL of the Drive metadata API.
    pub api_base_url: String,
    /// Base URL of the Drive upload API.
    pub upload_base_url: String,
}

/// Access token settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Environment variable holding an OAuth access token.
    pub token_env: String,
}

/// Tree mirror settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// File extensions that are downloaded; everything else is skipped.
    pub allowed_extensions: Vec<String>,
}

/// The three preconfigured workflows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowsConfig {
    pub analysis: AnalysisConfig,
    pub training: TrainingConfig,
    pub publish: Vec<PublishTarget>,
}

/// Temporary inspection of a data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Folder name under the project root.
    pub folder: String,
    /// Extension of the file to inspect, with or without the leading dot.
    pub inspect_extension: String,
    /// Directory for the temporary download. Defaults to the system temp dir.
    pub temp_dir: Option<PathBuf>,
}

/// Dataset mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Slash-separated folder path under the project root.
    pub folder_path: RemotePath,
    /// Subfolders mirrored one by one.
    pub splits: Vec<String>,
    /// Local directory receiving `<local_root>/<split>`.
    pub local_root: PathBuf,
}

/// One local file to upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishTarget {
    pub local: PathBuf,
    /// Folder path under the project root; created on demand.
    pub remote_path: RemotePath,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Output format: `text` or `json`.
    pub format: String,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/drivemirror/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("drivemirror")
            .join("config.yaml")
    }

    /// Parent that workflow paths are resolved under.
    pub fn project_root(&self) -> ParentRef {
        ParentRef::from(self.remote.root_id.clone())
    }

    pub fn allowlist(&self) -> ExtensionAllowlist {
        ExtensionAllowlist::new(&self.mirror.allowed_extensions)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            root_id: None,
            api_base_url: "https://www.googleapis.com/drive/v3".to_string(),
            upload_base_url: "https://www.googleapis.com/upload/drive/v3".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: "DRIVEMIRROR_ACCESS_TOKEN".to_string(),
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_MIRROR_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            folder: "Mis_Datos_Analisis".to_string(),
            inspect_extension: "csv".to_string(),
            temp_dir: None,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            folder_path: RemotePath::from_segments(["Datos_YOLO", "Emotions"])
                .unwrap_or_default(),
            splits: vec!["val".into(), "train".into(), "test".into()],
            local_root: PathBuf::from("./Yolo/data_images"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"logging.level"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid values for `logging.format`.
const VALID_LOG_FORMATS: &[&str] = &["text", "json"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- remote ---
        for (field, url) in [
            ("remote.api_base_url", &self.remote.api_base_url),
            ("remote.upload_base_url", &self.remote.upload_base_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                errors.push(ValidationError {
                    field: field.into(),
                    message: format!("not an http(s) URL: '{url}'"),
                });
            }
        }

        // --- auth ---
        if self.auth.token_env.trim().is_empty() {
            errors.push(ValidationError {
                field: "auth.token_env".into(),
                message: "must not be empty".into(),
            });
        }

        // --- mirror ---
        if self.mirror.allowed_extensions.is_empty() {
            errors.push(ValidationError {
                field: "mirror.allowed_extensions".into(),
                message: "must list at least one extension".into(),
            });
        }

        // --- workflows.analysis ---
        let folder = &self.workflows.analysis.folder;
        if folder.trim().is_empty() || !is_safe_local_name(folder) {
            errors.push(ValidationError {
                field: "workflows.analysis.folder".into(),
                message: "must be a single non-empty folder name".into(),
            });
        }
        if self
            .workflows
            .analysis
            .inspect_extension
            .trim_start_matches('.')
            .is_empty()
        {
            errors.push(ValidationError {
                field: "workflows.analysis.inspect_extension".into(),
                message: "must not be empty".into(),
            });
        }
        if let Some(dir) = &self.workflows.analysis.temp_dir {
            if !dir.is_dir() {
                errors.push(ValidationError {
                    field: "workflows.analysis.temp_dir".into(),
                    message: format!("directory does not exist: {}", dir.display()),
                });
            }
        }

        // --- workflows.training ---
        if self.workflows.training.splits.is_empty() {
            errors.push(ValidationError {
                field: "workflows.training.splits".into(),
                message: "must list at least one split".into(),
            });
        }
        for (i, split) in self.workflows.training.splits.iter().enumerate() {
            // Splits become directories under `local_root`.
            if split.trim().is_empty() || !is_safe_local_name(split) {
                errors.push(ValidationError {
                    field: format!("workflows.training.splits[{i}]"),
                    message: format!("invalid split name '{split}'"),
                });
            }
        }

        // --- workflows.publish ---
        for (i, target) in self.workflows.publish.iter().enumerate() {
            if target.local.as_os_str().is_empty() {
                errors.push(ValidationError {
                    field: format!("workflows.publish[{i}].local"),
                    message: "must not be empty".into(),
                });
            }
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }
        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            errors.push(ValidationError {
                field: "logging.format".into(),
                message: format!(
                    "invalid format '{}'; valid options: {}",
                    self.logging.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        errors
    }
}

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use drivemirror_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .training_local_root(PathBuf::from("/data/yolo"))
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self::default()
    }

    // --- remote ---

    pub fn root_id(mut self, id: RemoteId) -> Self {
        self.config.remote.root_id = Some(id);
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote.api_base_url = url.into();
        self
    }

    pub fn upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote.upload_base_url = url.into();
        self
    }

    // --- auth ---

    pub fn token_env(mut self, var: impl Into<String>) -> Self {
        self.config.auth.token_env = var.into();
        self
    }

    // --- mirror ---

    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.mirror.allowed_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    // --- workflows ---

    pub fn analysis_folder(mut self, folder: impl Into<String>) -> Self {
        self.config.workflows.analysis.folder = folder.into();
        self
    }

    pub fn analysis_inspect_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.workflows.analysis.inspect_extension = ext.into();
        self
    }

    pub fn analysis_temp_dir(mut self, dir: PathBuf) -> Self {
        self.config.workflows.analysis.temp_dir = Some(dir);
        self
    }

    pub fn training_folder_path(mut self, path: RemotePath) -> Self {
        self.config.workflows.training.folder_path = path;
        self
    }

    pub fn training_splits<I, S>(mut self, splits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.workflows.training.splits = splits.into_iter().map(Into::into).collect();
        self
    }

    pub fn training_local_root(mut self, root: PathBuf) -> Self {
        self.config.workflows.training.local_root = root;
        self
    }

    pub fn publish_target(mut self, local: PathBuf, remote_path: RemotePath) -> Self {
        self.config
            .workflows
            .publish
            .push(PublishTarget { local, remote_path });
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_format(mut self, format: impl Into<String>) -> Self {
        self.config.logging.format = format.into();
        self
    }

    /// Consume the builder and return the final [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.project_root(), ParentRef::Root);
        assert_eq!(config.workflows.training.splits, vec!["val", "train", "test"]);
        assert_eq!(
            config.workflows.training.folder_path.to_string(),
            "/Datos_YOLO/Emotions"
        );
    }

    #[test]
    fn load_partial_yaml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
remote:
  root_id: "1AbCdEf"
workflows:
  training:
    folder_path: "Datos/Faces"
    splits: [train]
  publish:
    - local: ./Yolo/data.yaml
      remote_path: Datos_YOLO/Emotions
logging:
  format: json
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.project_root().to_string(), "1AbCdEf");
        assert_eq!(config.workflows.training.folder_path.segments(), ["Datos", "Faces"]);
        assert_eq!(config.workflows.training.splits, vec!["train"]);
        assert_eq!(
            config.workflows.training.local_root,
            PathBuf::from("./Yolo/data_images")
        );
        assert_eq!(config.workflows.publish.len(), 1);
        assert_eq!(config.workflows.analysis.folder, "Mis_Datos_Analisis");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn load_rejects_invalid_root_id() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "remote:\n  root_id: \"bad'id\"").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/drivemirror.yaml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn validate_reports_every_problem() {
        let config = ConfigBuilder::new()
            .api_base_url("ftp://example")
            .allowed_extensions(Vec::<String>::new())
            .training_splits(["", "a/b"])
            .logging_level("loud")
            .logging_format("xml")
            .build();

        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "remote.api_base_url",
                "mirror.allowed_extensions",
                "workflows.training.splits[0]",
                "workflows.training.splits[1]",
                "logging.level",
                "logging.format",
            ]
        );
    }

    #[test]
    fn validate_rejects_names_that_escape_local_root() {
        let config = ConfigBuilder::new()
            .analysis_folder("..")
            .training_splits(["train", ".", ".."])
            .build();

        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "workflows.analysis.folder",
                "workflows.training.splits[1]",
                "workflows.training.splits[2]",
            ]
        );
    }

    #[test]
    fn builder_overrides() {
        let config = ConfigBuilder::new()
            .root_id(RemoteId::new("root123".into()).unwrap())
            .analysis_inspect_extension(".tsv")
            .allowed_extensions(["JPG"])
            .build();

        assert_eq!(config.remote.root_id.as_ref().unwrap().as_str(), "root123");
        assert_eq!(config.workflows.analysis.inspect_extension, ".tsv");
        assert_eq!(config.allowlist().iter().collect::<Vec<_>>(), vec!["jpg"]);
    }

    #[test]
    fn round_trips_through_yaml() {
        let config = ConfigBuilder::new()
            .publish_target(PathBuf::from("a.txt"), "x/y".parse().unwrap())
            .build();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
