//! Turns classified `.npmrc` lines into bunfig `install.registry` and
//! `install.scopes` values.
//!
//! Lines are folded per scope (unscoped lines all land on the global
//! registry), entries pointing at an Artifact Registry npm repository get the
//! supplied credential as their token, and the result replaces the matching
//! slots of an existing [`Bunfig`].

use bunfig_npmrc::NpmrcLine;
use bunfig_toml::{take_table, Bunfig};
use toml::Value;

pub use crate::entry::RegistryEntry;
pub use crate::error::RegistryError;
pub use crate::legacy::rewrite_legacy_basic_auth;
pub use crate::map::{is_managed_registry, EntryKey, RegistryFields, RegistryMap};

mod entry;
mod error;
mod legacy;
mod map;

const INSTALL_SECTION: &str = "install";
const REGISTRY_KEY: &str = "registry";
const SCOPES_KEY: &str = "scopes";

/// Folds `lines`, injects `credential`, and writes the resulting registries
/// into `document`.
///
/// Every entry is validated before `document` is touched, so a
/// [`RegistryError`] leaves nothing half-applied. Existing scopes that the
/// lines don't mention are kept; `install.registry` is only replaced when
/// there are unscoped lines.
pub fn merge(
    lines: &[NpmrcLine],
    credential: &str,
    mut document: Bunfig,
) -> Result<Bunfig, RegistryError> {
    let mut registries = RegistryMap::fold(lines);
    if registries.is_empty() {
        tracing::debug!("no registry configuration found");
        return Ok(document);
    }
    registries.inject_credential(credential);

    let entries = registries
        .into_iter()
        .map(|(key, fields)| {
            let entry = RegistryEntry::from_fields(&key, &fields)?;
            Ok((key, entry))
        })
        .collect::<Result<Vec<_>, RegistryError>>()?;

    let mut install = document.take_section(INSTALL_SECTION);
    let mut scopes = None;
    for (key, entry) in entries {
        match key {
            EntryKey::Global => {
                install.insert(REGISTRY_KEY.into(), entry.into());
            }
            EntryKey::Scope(scope) => {
                scopes
                    .get_or_insert_with(|| take_table(&mut install, SCOPES_KEY))
                    .insert(scope, Value::from(entry));
            }
        }
    }
    if let Some(scopes) = scopes {
        install.insert(SCOPES_KEY.into(), Value::Table(scopes));
    }
    document.insert_section(INSTALL_SECTION, install);
    Ok(document)
}
