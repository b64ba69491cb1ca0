//! PowerShell Gallery search client
//!
//! Dispatches gallery searches to whichever cmdlet family the local
//! PowerShell host has installed: `Find-PSResource` when
//! Microsoft.PowerShell.PSResourceGet is present, PowerShellGet's
//! `Find-Module` family otherwise. Hits are projected into fixed display rows.
//!
//! # Examples
//!
//! ```rust,no_run
//! use psgallery_client::{Dispatcher, PwshHost, SearchOutcome, SearchQuery};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = Dispatcher::connect(Arc::new(PwshHost::default())).await?;
//! let query = SearchQuery::by_name("Pester").with_max_results(5);
//! if let SearchOutcome::Found { records, .. } = dispatcher.search(&query).await? {
//!     for record in records {
//!         println!("{} {} {}", record.name, record.version, record.download_count);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
pub mod backend;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod models;
pub mod projection;

pub use backend::{BackendKind, PowerShellGetBackend, PsResourceGetBackend, SearchBackend};
pub use dispatcher::{probe_capability, Dispatcher, RegistryCapability};
pub use error::{Error, Result};
pub use host::{PwshHost, ShellHost, DEFAULT_PWSH};
pub use models::{
    DownloadCount, RawResult, ResourceType, ResultRecord, SearchMode, SearchOutcome, SearchQuery,
    DEFAULT_MAX_RESULTS, DEFAULT_NAME_PATTERN, DEFAULT_REPOSITORY,
};
pub use projection::{truncate_description, MAX_DESCRIPTION_CHARS};
