//! Migrates `.npmrc` registry configuration into a `bunfig.toml`, swapping
//! Artifact Registry credentials for a fresh access token.

use std::path::{Path, PathBuf};

use bunfig_config::{
    config_path, is_unset, optional, ArgMatches, BunfigConfig, BunfigConfigLayer,
    BunfigConfigOptions,
};
use clap::{CommandFactory, FromArgMatches as _, Parser};
use directories::BaseDirs;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

pub use crate::credentials::{CredentialSource, GcloudToken, StaticToken};
pub use crate::error::BunfigAuthError;
pub use crate::generate::generate_bunfig_file;

mod credentials;
mod error;
mod generate;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct BunfigAuth {
    /// Path to the .npmrc file to read registry configs from. Defaults to
    /// the project-level .npmrc if it exists, otherwise the user-level one.
    #[arg(long)]
    repo_config: Option<PathBuf>,

    /// Path to the base bunfig, usually the version-controlled,
    /// credential-free project-level one. [default: ~/.bunfig.toml]
    #[arg(long)]
    from: Option<PathBuf>,

    /// Path to write the bunfig with registries and credentials to.
    /// [default: ~/.bunfig.toml]
    #[arg(long)]
    bunfig: Option<PathBuf>,

    /// Access token to use instead of asking `gcloud` for one.
    #[arg(long)]
    token: Option<String>,

    /// Project root to look for .npmrc and bunfig-auth.toml in. Relative
    /// paths in config files are resolved against it.
    #[arg(long)]
    root: Option<PathBuf>,

    /// File to read configuration values from, instead of the user and
    /// project bunfig-auth.toml files.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output level/directive. Supports plain loglevels (off, error,
    /// warn, info, debug, trace) as well as more advanced directives in the
    /// format `target[span{field=value}]=level`.
    #[arg(long, default_value = "warn")]
    loglevel: String,

    /// Disable all output
    #[arg(long, short)]
    quiet: bool,
}

impl BunfigAuth {
    fn setup_logging(&self) -> Result<()> {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(
                EnvFilter::builder()
                    .with_default_directive(if self.quiet {
                        LevelFilter::OFF.into()
                    } else {
                        self.loglevel.parse().into_diagnostic()?
                    })
                    .from_env_lossy(),
            )
            .init();
        Ok(())
    }

    pub async fn load() -> Result<()> {
        let start = std::time::Instant::now();
        let matches = BunfigAuth::command().get_matches();
        let mut cli = BunfigAuth::from_arg_matches(&matches).into_diagnostic()?;
        let cfg = if let Some(file) = &cli.config {
            BunfigConfigOptions::new()
                .user_file(Some(file.clone()))
                .load()?
        } else {
            BunfigConfigOptions::new()
                .project_root(cli.root.clone().or_else(|| std::env::current_dir().ok()))
                .load()?
        };
        cli.layer_config(&matches, &cfg)?;
        cli.setup_logging()?;
        cli.execute().await?;
        tracing::info!("Ran in {}s", start.elapsed().as_millis() as f32 / 1000.0);
        Ok(())
    }

    pub async fn execute(self) -> Result<()> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().into_diagnostic()?,
        };
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_owned());
        let default_bunfig = || {
            home.as_ref()
                .map(|home| home.join(".bunfig.toml"))
                .ok_or(BunfigAuthError::NoHomeDir)
        };
        let repo_config = match self.repo_config {
            Some(repo_config) => repo_config,
            None => default_repo_config(&root, home.as_deref()).ok_or(BunfigAuthError::NoHomeDir)?,
        };
        let from = match self.from {
            Some(from) => from,
            None => default_bunfig()?,
        };
        let bunfig = match self.bunfig {
            Some(bunfig) => bunfig,
            None => default_bunfig()?,
        };
        let credential = match self.token {
            Some(token) => StaticToken(token).token().await?,
            None => GcloudToken::new().token().await?,
        };
        generate_bunfig_file(&repo_config, &from, &bunfig, &credential).await?;
        if !self.quiet {
            eprintln!("Success!");
        }
        Ok(())
    }
}

impl BunfigConfigLayer for BunfigAuth {
    fn layer_config(&mut self, matches: &ArgMatches, config: &BunfigConfig) -> Result<()> {
        let root = self.root.as_deref();
        for (id, slot) in [
            ("repo_config", &mut self.repo_config),
            ("from", &mut self.from),
            ("bunfig", &mut self.bunfig),
        ] {
            if is_unset(matches, id) {
                if let Some(path) = optional(config.get_string(id))? {
                    *slot = Some(config_path(root, path));
                }
            }
        }
        if is_unset(matches, "token") {
            if let Some(token) = optional(config.get_string("token"))? {
                self.token = Some(token);
            }
        }
        if is_unset(matches, "loglevel") {
            if let Some(loglevel) = optional(config.get_string("loglevel"))? {
                self.loglevel = loglevel;
            }
        }
        if is_unset(matches, "quiet") {
            if let Some(quiet) = optional(config.get_bool("quiet"))? {
                self.quiet = quiet;
            }
        }
        Ok(())
    }
}

/// The project's .npmrc if there is one, otherwise the user's.
fn default_repo_config(root: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let project = root.join(".npmrc");
    if project.is_file() {
        Some(project)
    } else {
        home.map(|home| home.join(".npmrc"))
    }
}
