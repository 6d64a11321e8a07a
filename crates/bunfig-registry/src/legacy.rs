use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// `gcloud artifacts print-settings` used to emit a `_password` line followed
// by `username=oauth2accesstoken`. It only emits `_authToken` now.
static LEGACY_BASIC_AUTH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(//[a-zA-Z0-9-]+-npm\.pkg\.dev/.*/):_password=.*\n//[a-zA-Z0-9-]+-npm\.pkg\.dev/.*/:username=oauth2accesstoken",
    )
    .unwrap()
});

/// Replaces every legacy `_password` + `username=oauth2accesstoken` pair in
/// raw `.npmrc` text with a single `_authToken=<credential>` line for the
/// same host.
///
/// This works on the raw text because the pattern spans two lines.
pub fn rewrite_legacy_basic_auth<'a>(npmrc: &'a str, credential: &str) -> Cow<'a, str> {
    LEGACY_BASIC_AUTH_REGEX.replace_all(npmrc, |captures: &Captures| {
        tracing::debug!("rewriting legacy basic auth for {}", &captures[1]);
        format!("{}:_authToken={credential}", &captures[1])
    })
}
