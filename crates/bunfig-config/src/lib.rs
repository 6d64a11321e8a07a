//! Defaults for `bunfig-auth` flags, read from `bunfig-auth.toml` files and
//! `BUNFIG_AUTH_*` environment variables.

use std::path::{Path, PathBuf};

pub use clap::ArgMatches;
use clap::parser::ValueSource;
pub use config::Config as BunfigConfig;
use config::{ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use miette::Result;

pub use error::BunfigConfigError;

mod error;

/// File name looked for in the user config directory and the project root.
pub const CONFIG_FILE_NAME: &str = "bunfig-auth.toml";

const ENV_PREFIX: &str = "bunfig_auth";

/// Fills in fields that weren't given on the command line from `config`.
pub trait BunfigConfigLayer {
    fn layer_config(&mut self, matches: &ArgMatches, config: &BunfigConfig) -> Result<()>;
}

/// `<config dir>/bunfig-auth.toml` for the current user, e.g.
/// `~/.config/bunfig-auth/bunfig-auth.toml` on Linux.
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bunfig-auth").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Whether config gets a say for the argument `id`. Anything typed on the
/// command line wins; defaults and unset flags don't.
pub fn is_unset(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) != Some(ValueSource::CommandLine)
}

/// Turns a lookup into `None` when the key isn't configured at all, while
/// still failing on values of the wrong type.
pub fn optional<T>(found: Result<T, ConfigError>) -> Result<Option<T>, BunfigConfigError> {
    match found {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Relative paths in config are relative to the project root, not to
/// wherever the command happens to be run from.
pub fn config_path(root: Option<&Path>, value: impl Into<PathBuf>) -> PathBuf {
    let path = value.into();
    match root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path,
    }
}

/// Which sources [`BunfigConfigOptions::load`] reads, lowest precedence
/// first: the user file, the environment, then the project files.
#[derive(Debug, Clone)]
pub struct BunfigConfigOptions {
    user_file: Option<PathBuf>,
    env: bool,
    project_root: Option<PathBuf>,
}

impl Default for BunfigConfigOptions {
    fn default() -> Self {
        BunfigConfigOptions {
            user_file: user_config_file(),
            env: true,
            project_root: None,
        }
    }
}

impl BunfigConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `file` instead of the user config file. It's fine for it to
    /// not exist.
    pub fn user_file(mut self, file: Option<PathBuf>) -> Self {
        self.user_file = file;
        self
    }

    pub fn env(mut self, env: bool) -> Self {
        self.env = env;
        self
    }

    /// Also read `bunfig-auth.toml` and `.bunfig-auth.toml` from `root`.
    pub fn project_root(mut self, root: Option<PathBuf>) -> Self {
        self.project_root = root;
        self
    }

    pub fn load(self) -> Result<BunfigConfig> {
        let mut builder = BunfigConfig::builder();
        if let Some(file) = self.user_file {
            tracing::debug!("loading config from {}", file.display());
            builder = builder.add_source(toml_file(&file));
        }
        if self.env {
            builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));
        }
        if let Some(root) = self.project_root {
            for name in [CONFIG_FILE_NAME.to_string(), format!(".{CONFIG_FILE_NAME}")] {
                builder = builder.add_source(toml_file(&root.join(name)));
            }
        }
        Ok(builder.build().map_err(BunfigConfigError::ConfigError)?)
    }
}

/// Config files are TOML whatever they're called.
fn toml_file(path: &Path) -> impl config::Source + Send + Sync + 'static {
    File::new(&path.to_string_lossy(), FileFormat::Toml).required(false)
}
