//! Data models for gallery searches

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Repository searched when none is configured.
pub const DEFAULT_REPOSITORY: &str = "PSGallery";

/// Name pattern used when the caller gives none.
pub const DEFAULT_NAME_PATTERN: &str = "*";

/// Row cap used when the caller gives none.
pub const DEFAULT_MAX_RESULTS: i64 = 20;

/// Kind of gallery item to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceType {
    #[default]
    Module,
    Script,
    All,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Module => "Module",
            ResourceType::Script => "Script",
            ResourceType::All => "All",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutually exclusive ways of querying the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    ByName {
        name_pattern: String,
        tags: Vec<String>,
    },
    ByCommand {
        command_name: String,
    },
    ByDscResource {
        resource_name: String,
    },
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::ByName {
            name_pattern: DEFAULT_NAME_PATTERN.to_string(),
            tags: Vec::new(),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::ByName { name_pattern, tags } if tags.is_empty() => {
                write!(f, "name '{}'", name_pattern)
            }
            SearchMode::ByName { name_pattern, tags } => {
                write!(f, "name '{}' tagged {}", name_pattern, tags.join(", "))
            }
            SearchMode::ByCommand { command_name } => write!(f, "command '{}'", command_name),
            SearchMode::ByDscResource { resource_name } => {
                write!(f, "DSC resource '{}'", resource_name)
            }
        }
    }
}

/// A single gallery query: one mode plus the shared modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub resource_type: ResourceType,
    pub include_prerelease: bool,
    pub max_results: i64,
    pub repository: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            resource_type: ResourceType::default(),
            include_prerelease: false,
            max_results: DEFAULT_MAX_RESULTS,
            repository: DEFAULT_REPOSITORY.to_string(),
        }
    }
}

impl SearchQuery {
    pub fn by_name(name_pattern: impl Into<String>) -> Self {
        Self {
            mode: SearchMode::ByName {
                name_pattern: name_pattern.into(),
                tags: Vec::new(),
            },
            ..Self::default()
        }
    }

    pub fn by_command(command_name: impl Into<String>) -> Self {
        Self {
            mode: SearchMode::ByCommand {
                command_name: command_name.into(),
            },
            ..Self::default()
        }
    }

    pub fn by_dsc_resource(resource_name: impl Into<String>) -> Self {
        Self {
            mode: SearchMode::ByDscResource {
                resource_name: resource_name.into(),
            },
            ..Self::default()
        }
    }

    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = max_results;
        self
    }

    /// Check mandatory fields and limits. Called before the registry is touched.
    pub fn validate(&self) -> Result<()> {
        match &self.mode {
            SearchMode::ByName { name_pattern, .. } => {
                if name_pattern.trim().is_empty() {
                    return Err(Error::MissingField("name".into()));
                }
            }
            SearchMode::ByCommand { command_name } => {
                if command_name.trim().is_empty() {
                    return Err(Error::MissingField("command".into()));
                }
            }
            SearchMode::ByDscResource { resource_name } => {
                if resource_name.trim().is_empty() {
                    return Err(Error::MissingField("dsc-resource".into()));
                }
            }
        }

        if self.max_results < 0 {
            return Err(Error::InvalidMaxResults(self.max_results));
        }

        if self.repository.trim().is_empty() {
            return Err(Error::MissingField("repository".into()));
        }

        Ok(())
    }

    /// Row cap as a count. Only meaningful after `validate`.
    pub fn limit(&self) -> usize {
        usize::try_from(self.max_results).unwrap_or(0)
    }
}

/// Hit as emitted by the search cmdlets, normalized by the host script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawResult {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, rename = "AdditionalMetadata")]
    pub metadata: Option<Map<String, Value>>,
}

/// Download counter of a gallery item, or the `N/A` sentinel when the
/// metadata does not carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadCount {
    Count(u64),
    NotAvailable,
}

impl fmt::Display for DownloadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadCount::Count(n) => write!(f, "{}", n),
            DownloadCount::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for DownloadCount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            DownloadCount::Count(n) => serializer.serialize_u64(*n),
            DownloadCount::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Display row projected from a [`RawResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub download_count: DownloadCount,
}

/// What a search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// At least one hit. `records` is capped, `total_hits` is what the registry returned.
    Found {
        records: Vec<ResultRecord>,
        total_hits: usize,
    },
    NoResults,
}
