use std::fmt;

use async_std::process::Command;
use async_trait::async_trait;

use crate::error::BunfigAuthError;

/// Somewhere to get the access token that gets written into the bunfig.
#[async_trait]
pub trait CredentialSource {
    async fn token(&self) -> Result<String, BunfigAuthError>;
}

/// A token handed to us directly.
#[derive(Clone)]
pub struct StaticToken(pub String);

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

#[async_trait]
impl CredentialSource for StaticToken {
    async fn token(&self) -> Result<String, BunfigAuthError> {
        Ok(self.0.clone())
    }
}

/// Asks the Google Cloud CLI for an access token for the active account.
#[derive(Debug, Clone)]
pub struct GcloudToken {
    program: String,
}

impl Default for GcloudToken {
    fn default() -> Self {
        GcloudToken {
            program: "gcloud".into(),
        }
    }
}

impl GcloudToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different `gcloud` executable.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl CredentialSource for GcloudToken {
    async fn token(&self) -> Result<String, BunfigAuthError> {
        tracing::debug!("requesting access token from `{}`", self.program);
        let output = Command::new(&self.program)
            .args(["auth", "print-access-token"])
            .output()
            .await
            .map_err(|e| BunfigAuthError::CredentialsSpawnError(self.program.clone(), e))?;
        if !output.status.success() {
            return Err(BunfigAuthError::CredentialsError(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(BunfigAuthError::CredentialsError(format!(
                "`{} auth print-access-token` printed nothing",
                self.program
            )));
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[async_std::test]
    async fn static_token() -> miette::Result<()> {
        assert_eq!(StaticToken("abcd".into()).token().await?, "abcd");
        Ok(())
    }

    #[test]
    fn static_token_is_not_printed() {
        assert_eq!(format!("{:?}", StaticToken("abcd".into())), "StaticToken(***)");
    }

    #[async_std::test]
    async fn missing_program() {
        let source = GcloudToken::new().program("definitely-not-a-real-gcloud-binary");
        assert!(matches!(
            source.token().await,
            Err(BunfigAuthError::CredentialsSpawnError(program, _)) if program == "definitely-not-a-real-gcloud-binary"
        ));
    }
}
