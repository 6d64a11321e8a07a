use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    /// A registry entry ended up with neither a `registry=` URL nor a
    /// `//host/:` prefix to derive one from, so there's nowhere to point it.
    #[error("url or registry is not found for `{key}`")]
    #[diagnostic(
        code(bunfig_registry::missing_url),
        url(docsrs),
        help("Add a `registry=` line for this entry, or prefix its credential lines with `//<host>/:`.")
    )]
    MissingUrl { key: String },
}
