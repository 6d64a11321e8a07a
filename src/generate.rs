use std::io::{ErrorKind, Write};
use std::path::Path;

use async_std::{fs, task};
use bunfig_npmrc::NpmrcLine;
use bunfig_registry::rewrite_legacy_basic_auth;
use bunfig_toml::Bunfig;
use tempfile::NamedTempFile;

use crate::error::BunfigAuthError;

/// Reads registry configuration from `npmrc`, merges it into the bunfig at
/// `from` (or an empty one if it doesn't exist) with `credential` injected,
/// and writes the result to `bunfig`.
///
/// `from` and `bunfig` may be the same file. `bunfig` is replaced in one
/// step, so it is left as it was if anything fails, the write included.
pub async fn generate_bunfig_file(
    npmrc: &Path,
    from: &Path,
    bunfig: &Path,
    credential: &str,
) -> Result<(), BunfigAuthError> {
    tracing::info!("reading registry configuration from {}", npmrc.display());
    let npmrc_text = fs::read_to_string(npmrc)
        .await
        .map_err(|e| BunfigAuthError::ReadError(npmrc.to_owned(), e))?;
    let npmrc_text = rewrite_legacy_basic_auth(&npmrc_text, credential);

    let document = match fs::read_to_string(from).await {
        Ok(text) => {
            tracing::debug!("merging into existing bunfig at {}", from.display());
            text.parse::<Bunfig>()?
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} does not exist, starting from scratch", from.display());
            Bunfig::new()
        }
        Err(e) => return Err(BunfigAuthError::ReadError(from.to_owned(), e)),
    };

    let lines = npmrc_text
        .split('\n')
        .map(NpmrcLine::parse)
        .collect::<Vec<_>>();
    let document = bunfig_registry::merge(&lines, credential, document)?;

    tracing::info!("writing {}", bunfig.display());
    replace_file(bunfig, bunfig_toml::to_string(&document))
        .await
        .map_err(|e| BunfigAuthError::WriteError(bunfig.to_owned(), e))?;
    Ok(())
}

/// Writes `contents` to a temp file next to `path` and renames it over
/// `path`. The temp file is cleaned up if either step fails.
async fn replace_file(path: &Path, contents: String) -> std::io::Result<()> {
    let path = path.to_owned();
    task::spawn_blocking(move || {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
}
