use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum BunfigTomlError {
    /// The existing bunfig could not be parsed as TOML. Since it would be
    /// overwritten, nothing is written until it's fixed.
    #[error("Failed to parse bunfig: {0}")]
    #[diagnostic(
        code(bunfig_toml::parse_error),
        url(docsrs),
        help("Fix the TOML syntax in the existing bunfig, or delete it to start fresh.")
    )]
    ParseError(#[from] toml::de::Error),
}
