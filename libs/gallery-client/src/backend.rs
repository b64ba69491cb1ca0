//! Search backends: the modern PSResourceGet cmdlets and the legacy
//! PowerShellGet ones.
//!
//! Each backend renders a single script for the host. The script normalizes
//! every hit to `{Name, Version, Description, Author, AdditionalMetadata}`
//! and prints them as one compressed JSON array, so both families decode the
//! same way.

use crate::error::Result;
use crate::host::{quote, quote_list, ShellHost};
use crate::models::{RawResult, ResourceType, SearchMode, SearchQuery};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Which cmdlet family a backend drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// `Find-PSResource` from Microsoft.PowerShell.PSResourceGet
    PsResourceGet,
    /// `Find-Module` and friends from PowerShellGet
    PowerShellGet,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::PsResourceGet => f.write_str("PSResourceGet"),
            BackendKind::PowerShellGet => f.write_str("PowerShellGet"),
        }
    }
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Issue exactly one registry query and return the hits in registry order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawResult>>;
}

const SCRIPT_PRELUDE: &str = r#"$ErrorActionPreference = 'Stop'
$ProgressPreference = 'SilentlyContinue'
$searchErrors = @()
function ConvertTo-GalleryHit($item) {
    $r = if ($item.ParentResource) { $item.ParentResource } elseif ($item.PSGetModuleInfo) { $item.PSGetModuleInfo } else { $item }
    $v = [string]$r.Version
    if ($r.Prerelease) { $v = "$v-$($r.Prerelease)" }
    [pscustomobject]@{
        Name = [string]$r.Name
        Version = $v
        Description = $r.Description
        Author = $r.Author
        AdditionalMetadata = $r.AdditionalMetadata
    }
}
"#;

const SCRIPT_EPILOGUE: &str = r#"$fatal = @($searchErrors | Where-Object { $_.FullyQualifiedErrorId -notmatch 'NoMatchFound|NotFound' })
if ($fatal.Count -gt 0) { throw $fatal[0] }
ConvertTo-Json -InputObject $hits -Depth 4 -Compress
"#;

/// Suffix appended to every cmdlet call so "no match" stays a zero-hit
/// outcome while other failures are rethrown by the epilogue.
const ERROR_CAPTURE: &str = "-ErrorAction SilentlyContinue -ErrorVariable +searchErrors";

fn wrap_script(search: &str) -> String {
    format!(
        "{}$hits = @(. {{ {} }} | ForEach-Object {{ ConvertTo-GalleryHit $_ }})\n{}",
        SCRIPT_PRELUDE, search, SCRIPT_EPILOGUE
    )
}

/// Render the modern `Find-PSResource` call for a query.
pub fn psresourceget_command(query: &SearchQuery) -> String {
    let mut cmd = match &query.mode {
        SearchMode::ByName { name_pattern, tags } => {
            let mut cmd = format!("Find-PSResource -Name {}", quote(name_pattern));
            if !tags.is_empty() {
                cmd.push_str(&format!(" -Tag {}", quote_list(tags)));
            }
            match query.resource_type {
                ResourceType::Module => cmd.push_str(" -Type Module"),
                ResourceType::Script => cmd.push_str(" -Type Script"),
                ResourceType::All => {}
            }
            cmd
        }
        SearchMode::ByCommand { command_name } => {
            format!("Find-PSResource -CommandName {}", quote(command_name))
        }
        SearchMode::ByDscResource { resource_name } => {
            format!("Find-PSResource -DscResourceName {}", quote(resource_name))
        }
    };

    cmd.push_str(&format!(" -Repository {}", quote(&query.repository)));
    if query.include_prerelease {
        cmd.push_str(" -Prerelease");
    }
    cmd.push(' ');
    cmd.push_str(ERROR_CAPTURE);
    cmd
}

/// Render the legacy PowerShellGet call(s) for a query.
///
/// `All` searches modules then scripts inside the same script, so it is still
/// a single host invocation.
pub fn powershellget_command(query: &SearchQuery) -> String {
    let common = |cmd: &mut String| {
        cmd.push_str(&format!(" -Repository {}", quote(&query.repository)));
        if query.include_prerelease {
            cmd.push_str(" -AllowPrerelease");
        }
        cmd.push(' ');
        cmd.push_str(ERROR_CAPTURE);
    };

    match &query.mode {
        SearchMode::ByName { name_pattern, tags } => {
            let cmdlets: &[&str] = match query.resource_type {
                ResourceType::Module => &["Find-Module"],
                ResourceType::Script => &["Find-Script"],
                ResourceType::All => &["Find-Module", "Find-Script"],
            };
            cmdlets
                .iter()
                .map(|cmdlet| {
                    let mut cmd = format!("{} -Name {}", cmdlet, quote(name_pattern));
                    if !tags.is_empty() {
                        cmd.push_str(&format!(" -Tag {}", quote_list(tags)));
                    }
                    common(&mut cmd);
                    cmd
                })
                .collect::<Vec<_>>()
                .join("; ")
        }
        SearchMode::ByCommand { command_name } => {
            let mut cmd = format!("Find-Command -Name {}", quote(command_name));
            common(&mut cmd);
            cmd
        }
        SearchMode::ByDscResource { resource_name } => {
            let mut cmd = format!("Find-DscResource -Name {}", quote(resource_name));
            common(&mut cmd);
            cmd
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HostHits {
    Many(Vec<RawResult>),
    One(Box<RawResult>),
}

/// Decode the JSON printed by a backend script.
///
/// Blank output and `null` both mean zero hits; a bare object is one hit.
pub fn decode_hits(output: &str) -> Result<Vec<RawResult>> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    let hits = match serde_json::from_str::<HostHits>(trimmed)? {
        HostHits::Many(hits) => hits,
        HostHits::One(hit) => vec![*hit],
    };
    Ok(hits)
}

async fn run_search(
    host: &dyn ShellHost,
    kind: BackendKind,
    command: String,
) -> Result<Vec<RawResult>> {
    tracing::debug!(backend = %kind, command = %command, "Querying registry");
    let output = host.run(&wrap_script(&command)).await?;
    let hits = decode_hits(&output)?;
    tracing::debug!(backend = %kind, hits = hits.len(), "Registry query finished");
    Ok(hits)
}

/// Backend driving `Find-PSResource`.
pub struct PsResourceGetBackend {
    host: Arc<dyn ShellHost>,
}

impl PsResourceGetBackend {
    pub fn new(host: Arc<dyn ShellHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl SearchBackend for PsResourceGetBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::PsResourceGet
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawResult>> {
        run_search(self.host.as_ref(), self.kind(), psresourceget_command(query)).await
    }
}

/// Backend driving the PowerShellGet `Find-*` cmdlets.
pub struct PowerShellGetBackend {
    host: Arc<dyn ShellHost>,
}

impl PowerShellGetBackend {
    pub fn new(host: Arc<dyn ShellHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl SearchBackend for PowerShellGetBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::PowerShellGet
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawResult>> {
        run_search(self.host.as_ref(), self.kind(), powershellget_command(query)).await
    }
}
