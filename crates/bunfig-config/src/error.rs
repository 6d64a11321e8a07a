use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum BunfigConfigError {
    /// A configuration source couldn't be read, or a value in it has the
    /// wrong type for the option it sets.
    #[error(transparent)]
    #[diagnostic(
        code(bunfig_config::error),
        url(docsrs),
        help("Check bunfig-auth.toml and any BUNFIG_AUTH_* environment variables.")
    )]
    ConfigError(#[from] config::ConfigError),
}
