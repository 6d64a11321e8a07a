use std::fmt;

use bunfig_npmrc::NpmrcLine;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static MANAGED_REGISTRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9-]+-npm\.pkg\.dev/.*/").unwrap());

/// Whether `url` points at an Artifact Registry npm repository, the only
/// kind of host we hand the fresh credential to.
pub fn is_managed_registry(url: &str) -> bool {
    MANAGED_REGISTRY_REGEX.is_match(url)
}

/// Which bunfig slot an entry ends up in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKey {
    /// `install.registry`
    Global,
    /// `install.scopes."@scope"`
    Scope(String),
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKey::Global => write!(f, "registry"),
            EntryKey::Scope(scope) => write!(f, "{scope}"),
        }
    }
}

/// Everything the lines for one [`EntryKey`] said, field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryFields {
    pub registry: Option<String>,
    pub url: Option<String>,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RegistryFields {
    /// Pulls the fields out of a classified line. `None` for lines that
    /// carry nothing, including every [`NpmrcLine::Default`].
    pub fn from_line(line: &NpmrcLine) -> Option<(EntryKey, RegistryFields)> {
        let key = match line.scope() {
            Some(scope) => EntryKey::Scope(scope.into()),
            None => EntryKey::Global,
        };
        let registry = line.registry().and_then(non_empty);
        let url = line.url().and_then(non_empty);
        let fields = match line {
            NpmrcLine::Default(_) => return None,
            NpmrcLine::Registry { .. } => RegistryFields {
                registry,
                url,
                ..Self::default()
            },
            NpmrcLine::UrlAuth {
                username, password, ..
            } => RegistryFields {
                registry,
                url,
                username: non_empty(username),
                password: non_empty(password),
                ..Self::default()
            },
            NpmrcLine::AuthToken { token, .. } => RegistryFields {
                registry,
                token: non_empty(token),
                ..Self::default()
            },
            NpmrcLine::Password { password, .. } => RegistryFields {
                registry,
                password: non_empty(password),
                ..Self::default()
            },
            NpmrcLine::Username { username, .. } => RegistryFields {
                registry,
                username: non_empty(username),
                ..Self::default()
            },
            NpmrcLine::Auth {
                username, password, ..
            } => RegistryFields {
                registry,
                username: username.as_deref().and_then(non_empty),
                password: password.as_deref().and_then(non_empty),
                ..Self::default()
            },
        };
        if fields == RegistryFields::default() {
            None
        } else {
            Some((key, fields))
        }
    }

    /// Field-level last-write-wins: every field set in `newer` replaces
    /// ours, everything else is left alone.
    pub fn absorb(&mut self, newer: RegistryFields) {
        fn overwrite(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }
        overwrite(&mut self.registry, newer.registry);
        overwrite(&mut self.url, newer.url);
        overwrite(&mut self.token, newer.token);
        overwrite(&mut self.username, newer.username);
        overwrite(&mut self.password, newer.password);
    }

    /// The literal `url`, or `https://` + `registry`.
    pub fn resolved_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| self.registry.as_ref().map(|r| format!("https://{r}")))
    }

    pub fn is_managed(&self) -> bool {
        self.url
            .as_deref()
            .or(self.registry.as_deref())
            .map_or(false, is_managed_registry)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.into())
    }
}

/// Accumulated registry fields, keyed by scope, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryMap {
    entries: IndexMap<EntryKey, RegistryFields>,
}

impl RegistryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold<'a>(lines: impl IntoIterator<Item = &'a NpmrcLine>) -> Self {
        let mut map = RegistryMap::new();
        for line in lines {
            map.insert_line(line);
        }
        map
    }

    pub fn insert_line(&mut self, line: &NpmrcLine) {
        if let Some((key, fields)) = RegistryFields::from_line(line) {
            tracing::trace!("folding {:?} line into `{key}`", line.kind());
            self.entries.entry(key).or_default().absorb(fields);
        }
    }

    /// Sets `credential` as the token of every entry that points at a
    /// managed registry, whatever the lines said.
    pub fn inject_credential(&mut self, credential: &str) {
        for (key, fields) in self.entries.iter_mut() {
            if fields.is_managed() {
                tracing::debug!("injecting credential into `{key}`");
                fields.token = Some(credential.into());
            }
        }
    }

    pub fn get(&self, key: &EntryKey) -> Option<&RegistryFields> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntryKey, &RegistryFields)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for RegistryMap {
    type Item = (EntryKey, RegistryFields);
    type IntoIter = indexmap::map::IntoIter<EntryKey, RegistryFields>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
