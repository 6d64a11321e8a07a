use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum BunfigAuthError {
    /// Failed to read the .npmrc or the existing bunfig.
    #[error("Failed to read {}", .0.display())]
    #[diagnostic(code(bunfig_auth::read_error), url(docsrs))]
    ReadError(PathBuf, #[source] std::io::Error),

    /// Failed to write the generated bunfig.
    #[error("Failed to write {}", .0.display())]
    #[diagnostic(
        code(bunfig_auth::write_error),
        url(docsrs),
        help("Make sure the directory exists and is writable.")
    )]
    WriteError(PathBuf, #[source] std::io::Error),

    /// No home directory to look for `~/.npmrc` and `~/.bunfig.toml` in.
    #[error("Could not determine the home directory.")]
    #[diagnostic(
        code(bunfig_auth::no_home_dir),
        url(docsrs),
        help("Pass --repo-config, --from and --bunfig explicitly.")
    )]
    NoHomeDir,

    /// The credential helper couldn't be started at all.
    #[error("Failed to run `{0}` to obtain an access token.")]
    #[diagnostic(
        code(bunfig_auth::credentials::spawn),
        url(docsrs),
        help("Install the Google Cloud CLI, or pass a token with --token.")
    )]
    CredentialsSpawnError(String, #[source] std::io::Error),

    /// The credential helper ran but didn't hand back a token.
    #[error("Failed to obtain an access token: {0}")]
    #[diagnostic(
        code(bunfig_auth::credentials::failed),
        url(docsrs),
        help("Run `gcloud auth login` and try again, or pass a token with --token.")
    )]
    CredentialsError(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    RegistryError(#[from] bunfig_registry::RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    BunfigTomlError(#[from] bunfig_toml::BunfigTomlError),
}
