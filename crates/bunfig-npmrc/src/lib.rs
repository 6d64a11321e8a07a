//! Classification of individual `.npmrc` lines.
//!
//! Only the handful of shapes that carry registry or credential information
//! are understood. Everything else is kept as [`NpmrcLine::Default`] so it
//! can be written back out exactly as it was read.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use base64::{
    alphabet,
    engine::{general_purpose, DecodePaddingMode, GeneralPurpose},
    Engine as _,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REGISTRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(@[a-zA-Z0-9*~-][a-zA-Z0-9*._~-]*:)?registry=(.*)").unwrap());

static URL_AUTH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"https://(.*):(.*)@(.*)").unwrap());

static AUTH_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.*:)?_authToken=(.*)").unwrap());

static PASSWORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.*:)?_password=(.*)").unwrap());

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.*:)?username=(.*)").unwrap());

static AUTH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*:)?_auth=(.*)").unwrap());

/// `_auth` values show up both with and without `=` padding.
const BASIC_AUTH_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    general_purpose::PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The shape a line was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Default,
    Registry,
    AuthToken,
    Auth,
    Password,
    Username,
    UrlAuth,
}

/// A single parsed `.npmrc` line.
///
/// `registry` values are hosts with the scheme (or the `//` nerf-dart marker)
/// stripped, e.g. `us-west1-npm.pkg.dev/myproj/myrepo/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NpmrcLine {
    /// Anything we don't understand. Holds the raw, untrimmed line.
    Default(String),
    /// `[@scope:]registry=<url>`
    Registry {
        scope: Option<String>,
        registry: String,
        url: String,
    },
    /// `[@scope:]registry=https://<user>:<pass>@<host>`
    UrlAuth {
        scope: Option<String>,
        registry: String,
        url: String,
        username: String,
        password: String,
    },
    /// `[//<host>/:]_authToken=<token>`
    AuthToken {
        registry: Option<String>,
        token: String,
    },
    /// `[//<host>/:]_password=<password>`
    Password {
        registry: Option<String>,
        password: String,
    },
    /// `[//<host>/:]username=<username>`
    Username {
        registry: Option<String>,
        username: String,
    },
    /// `[//<host>/:]_auth=<base64 user:pass>`
    ///
    /// `username` and `password` are `None` when the payload doesn't decode.
    Auth {
        registry: Option<String>,
        auth: String,
        username: Option<String>,
        password: Option<String>,
    },
}

impl NpmrcLine {
    /// Classifies `line`. This never fails: unrecognized input becomes
    /// [`NpmrcLine::Default`] holding the line verbatim, surrounding
    /// whitespace included.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        parse_registry(trimmed)
            .or_else(|| parse_auth_token(trimmed))
            .or_else(|| parse_password(trimmed))
            .or_else(|| parse_username(trimmed))
            .or_else(|| parse_auth(trimmed))
            .unwrap_or_else(|| NpmrcLine::Default(line.into()))
    }

    pub fn kind(&self) -> LineKind {
        use NpmrcLine::*;
        match self {
            Default(_) => LineKind::Default,
            Registry { .. } => LineKind::Registry,
            UrlAuth { .. } => LineKind::UrlAuth,
            AuthToken { .. } => LineKind::AuthToken,
            Password { .. } => LineKind::Password,
            Username { .. } => LineKind::Username,
            Auth { .. } => LineKind::Auth,
        }
    }

    pub fn scope(&self) -> Option<&str> {
        use NpmrcLine::*;
        match self {
            Registry { scope, .. } | UrlAuth { scope, .. } => scope.as_deref(),
            _ => None,
        }
    }

    pub fn registry(&self) -> Option<&str> {
        use NpmrcLine::*;
        match self {
            Default(_) => None,
            Registry { registry, .. } | UrlAuth { registry, .. } => Some(registry),
            AuthToken { registry, .. }
            | Password { registry, .. }
            | Username { registry, .. }
            | Auth { registry, .. } => registry.as_deref(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        use NpmrcLine::*;
        match self {
            Registry { url, .. } | UrlAuth { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl FromStr for NpmrcLine {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NpmrcLine::parse(s))
    }
}

impl fmt::Display for NpmrcLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use NpmrcLine::*;
        match self {
            Default(text) => write!(f, "{text}"),
            Registry { scope, url, .. } | UrlAuth { scope, url, .. } => {
                if let Some(scope) = scope {
                    write!(f, "{scope}:")?;
                }
                write!(f, "registry={url}")
            }
            AuthToken { registry, token } => {
                write_host_prefix(f, registry)?;
                write!(f, "_authToken={token}")
            }
            Password { registry, password } => {
                write_host_prefix(f, registry)?;
                write!(f, "_password={password}")
            }
            Username { registry, username } => {
                write_host_prefix(f, registry)?;
                write!(f, "username={username}")
            }
            Auth { registry, auth, .. } => {
                write_host_prefix(f, registry)?;
                write!(f, "_auth={auth}")
            }
        }
    }
}

fn write_host_prefix(f: &mut fmt::Formatter<'_>, registry: &Option<String>) -> fmt::Result {
    match registry {
        Some(registry) => write!(f, "//{registry}:"),
        None => Ok(()),
    }
}

/// `//host/path/:` => `host/path/`
fn host_prefix(captures: &Captures, group: usize) -> Option<String> {
    captures
        .get(group)
        .map(|m| {
            let prefix = m.as_str();
            let prefix = prefix.strip_suffix(':').unwrap_or(prefix);
            prefix.replacen("//", "", 1)
        })
        .filter(|prefix| !prefix.is_empty())
}

/// `@scope:` => `@scope`
fn scope_prefix(captures: &Captures, group: usize) -> Option<String> {
    captures.get(group).map(|m| {
        let scope = m.as_str();
        scope.strip_suffix(':').unwrap_or(scope).to_string()
    })
}

fn value(captures: &Captures, group: usize) -> String {
    captures
        .get(group)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn parse_registry(text: &str) -> Option<NpmrcLine> {
    let captures = REGISTRY_REGEX.captures(text)?;
    let scope = scope_prefix(&captures, 1);
    let url = value(&captures, 2);
    if let Some(auth) = URL_AUTH_REGEX.captures(&url) {
        return Some(NpmrcLine::UrlAuth {
            scope,
            registry: value(&auth, 3).replacen("//", "", 1),
            username: value(&auth, 1),
            password: value(&auth, 2),
            url: url.clone(),
        });
    }
    Some(NpmrcLine::Registry {
        scope,
        registry: url.strip_prefix("https://").unwrap_or(&url).to_string(),
        url,
    })
}

fn parse_auth_token(text: &str) -> Option<NpmrcLine> {
    let captures = AUTH_TOKEN_REGEX.captures(text)?;
    Some(NpmrcLine::AuthToken {
        registry: host_prefix(&captures, 1),
        token: value(&captures, 2),
    })
}

fn parse_password(text: &str) -> Option<NpmrcLine> {
    let captures = PASSWORD_REGEX.captures(text)?;
    Some(NpmrcLine::Password {
        registry: host_prefix(&captures, 1),
        password: value(&captures, 2),
    })
}

fn parse_username(text: &str) -> Option<NpmrcLine> {
    let captures = USERNAME_REGEX.captures(text)?;
    Some(NpmrcLine::Username {
        registry: host_prefix(&captures, 1),
        username: value(&captures, 2),
    })
}

fn parse_auth(text: &str) -> Option<NpmrcLine> {
    let captures = AUTH_REGEX.captures(text)?;
    let auth = value(&captures, 2);
    let (username, password) = match decode_basic_auth(&auth) {
        Some((username, password)) => (Some(username), Some(password)),
        None => {
            tracing::debug!("_auth value is not valid base64; username and password left unset");
            (None, None)
        }
    };
    Some(NpmrcLine::Auth {
        registry: host_prefix(&captures, 1),
        auth,
        username,
        password,
    })
}

/// Decodes a base64 `user:pass` pair. The password keeps any further colons.
fn decode_basic_auth(auth: &str) -> Option<(String, String)> {
    let decoded = BASIC_AUTH_ENGINE.decode(auth.trim()).ok()?;
    let decoded = String::from_utf8_lossy(&decoded);
    match decoded.split_once(':') {
        Some((username, password)) => Some((username.into(), password.into())),
        None => Some((decoded.into_owned(), String::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nerf_dart_and_trailing_colon() {
        let line = NpmrcLine::parse("//us-west1-npm.pkg.dev/myproj/myrepo/:_authToken=abc");
        assert_eq!(line.registry(), Some("us-west1-npm.pkg.dev/myproj/myrepo/"));
    }

    #[test]
    fn bare_colon_prefix_is_not_a_registry() {
        let line = NpmrcLine::parse(":_authToken=abc");
        assert_eq!(
            line,
            NpmrcLine::AuthToken {
                registry: None,
                token: "abc".into()
            }
        );
    }

    #[test]
    fn password_may_contain_colons() {
        let encoded = general_purpose::STANDARD.encode("user:pa:ss");
        assert_eq!(
            decode_basic_auth(&encoded),
            Some(("user".into(), "pa:ss".into()))
        );
    }

    #[test]
    fn padding_is_optional() {
        let expected = Some(("user".into(), "password".into()));
        assert_eq!(decode_basic_auth("dXNlcjpwYXNzd29yZA=="), expected);
        assert_eq!(decode_basic_auth("dXNlcjpwYXNzd29yZA"), expected);
    }

    #[test]
    fn undecodable_auth() {
        assert_eq!(decode_basic_auth("!!not base64!!"), None);
    }
}
