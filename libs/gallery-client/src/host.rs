//! PowerShell host used to run the gallery cmdlets.

use crate::error::{Error, Result};
use async_trait::async_trait;
use tokio::process::Command;

/// Executable used when none is configured.
pub const DEFAULT_PWSH: &str = "pwsh";

/// Something that can execute a PowerShell script and hand back its stdout.
#[async_trait]
pub trait ShellHost: Send + Sync {
    async fn run(&self, script: &str) -> Result<String>;
}

/// Runs scripts in a fresh `pwsh -NoProfile -NonInteractive` process.
#[derive(Debug, Clone)]
pub struct PwshHost {
    program: String,
}

impl PwshHost {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for PwshHost {
    fn default() -> Self {
        Self::new(DEFAULT_PWSH)
    }
}

#[async_trait]
impl ShellHost for PwshHost {
    async fn run(&self, script: &str) -> Result<String> {
        tracing::debug!(program = %self.program, script, "Running PowerShell script");

        let output = Command::new(&self.program)
            .args(["-NoProfile", "-NonInteractive", "-Command", script])
            .output()
            .await
            .map_err(|source| Error::HostUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr
            };
            return Err(Error::Registry(message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Quote a value as a PowerShell single-quoted literal.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote a list of values as a PowerShell array literal.
pub fn quote_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("@({})", quoted.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_single_quotes() {
        assert_eq!(quote("Pester"), "'Pester'");
        assert_eq!(quote("Az.*"), "'Az.*'");
        assert_eq!(quote("it's"), "'it''s'");
        assert_eq!(quote("'; Remove-Item *"), "'''; Remove-Item *'");
    }

    #[test]
    fn test_quote_list() {
        let tags = vec!["Azure".to_string(), "o'brien".to_string()];
        assert_eq!(quote_list(&tags), "@('Azure','o''brien')");
        assert_eq!(quote_list(&[]), "@()");
    }

    #[tokio::test]
    async fn test_missing_executable_is_host_unavailable() {
        let host = PwshHost::new("psgallery-definitely-not-a-real-shell");
        let err = host.run("'hello'").await.unwrap_err();
        assert!(matches!(err, Error::HostUnavailable { .. }));
    }
}
