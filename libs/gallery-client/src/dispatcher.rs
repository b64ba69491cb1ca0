//! Gallery search dispatcher: capability probe, backend selection and
//! result projection.

use crate::backend::{BackendKind, PowerShellGetBackend, PsResourceGetBackend, SearchBackend};
use crate::error::Result;
use crate::host::ShellHost;
use crate::models::{SearchOutcome, SearchQuery};
use crate::projection::project_results;
use std::sync::Arc;

/// Module that provides `Find-PSResource`.
pub const MODERN_MODULE: &str = "Microsoft.PowerShell.PSResourceGet";

/// Whether the modern search cmdlets are installed on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryCapability {
    pub modern_available: bool,
}

/// Check once whether [`MODERN_MODULE`] is installed. No retry.
pub async fn probe_capability(host: &dyn ShellHost) -> Result<RegistryCapability> {
    let script = format!(
        "if (Get-Module -ListAvailable -Name '{}') {{ 'true' }} else {{ 'false' }}",
        MODERN_MODULE
    );
    let output = host.run(&script).await?;
    let modern_available = output.trim().eq_ignore_ascii_case("true");

    tracing::debug!(modern_available, "Probed registry capability");
    Ok(RegistryCapability { modern_available })
}

/// Runs gallery searches through the backend chosen at construction.
pub struct Dispatcher {
    backend: Box<dyn SearchBackend>,
    warnings: Vec<String>,
}

impl Dispatcher {
    /// Dispatcher over an explicit backend.
    pub fn new(backend: Box<dyn SearchBackend>) -> Self {
        Self {
            backend,
            warnings: Vec::new(),
        }
    }

    /// Probe the host and pick the backend for the rest of this invocation.
    ///
    /// When the modern cmdlets are missing a warning is recorded for the
    /// caller to surface, and every search goes through PowerShellGet.
    pub async fn connect(host: Arc<dyn ShellHost>) -> Result<Self> {
        let capability = probe_capability(host.as_ref()).await?;
        Ok(Self::for_capability(capability, host))
    }

    pub fn for_capability(capability: RegistryCapability, host: Arc<dyn ShellHost>) -> Self {
        if capability.modern_available {
            return Self::new(Box::new(PsResourceGetBackend::new(host)));
        }

        let warning = format!(
            "{} is not installed; falling back to PowerShellGet (Find-Module)",
            MODERN_MODULE
        );
        // Surfaced once by the caller through `warnings()`
        tracing::debug!(warning = %warning, "Using legacy search backend");

        let mut dispatcher = Self::new(Box::new(PowerShellGetBackend::new(host)));
        dispatcher.warnings.push(warning);
        dispatcher
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Warnings raised while choosing the backend.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Validate `query`, run it once and project the hits.
    ///
    /// Configuration errors are returned before the registry is touched;
    /// registry failures are passed through untouched.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        query.validate()?;

        tracing::debug!(
            backend = %self.backend.kind(),
            mode = %query.mode,
            resource_type = %query.resource_type,
            prerelease = query.include_prerelease,
            max_results = query.max_results,
            "Searching gallery"
        );

        let hits = self.backend.search(query).await?;
        if hits.is_empty() {
            tracing::info!(mode = %query.mode, "No results");
            return Ok(SearchOutcome::NoResults);
        }

        let records = project_results(&hits, query.limit());
        Ok(SearchOutcome::Found {
            records,
            total_hits: hits.len(),
        })
    }
}
