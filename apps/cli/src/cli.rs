use clap::{Parser, ValueEnum};
use psgallery_client::{
    ResourceType, SearchMode, SearchQuery, DEFAULT_MAX_RESULTS, DEFAULT_NAME_PATTERN,
};

use crate::output::OutputFormat;

/// Search the PowerShell Gallery for modules, scripts, commands and DSC resources.
#[derive(Parser, Debug)]
#[command(name = "psgallery", version, about)]
pub struct Cli {
    /// Module or script name, wildcards allowed
    #[arg(long, default_value = DEFAULT_NAME_PATTERN, conflicts_with_all = ["command", "dsc_resource"])]
    pub name: String,

    /// Only return items carrying these tags
    #[arg(long = "tag", num_args = 1.., conflicts_with_all = ["command", "dsc_resource"])]
    pub tags: Vec<String>,

    /// Find the modules that export this command
    #[arg(long, conflicts_with = "dsc_resource")]
    pub command: Option<String>,

    /// Find the modules that provide this DSC resource
    #[arg(long = "dsc-resource")]
    pub dsc_resource: Option<String>,

    /// Kind of item to search for
    #[arg(long = "type", value_enum, default_value_t = TypeArg::Module)]
    pub resource_type: TypeArg,

    /// Include prerelease versions
    #[arg(long)]
    pub prerelease: bool,

    /// Maximum number of results to show
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS, allow_negative_numbers = true)]
    pub first: i64,

    /// Repository to search (overrides config)
    #[arg(long)]
    pub repository: Option<String>,

    /// PowerShell executable (overrides config)
    #[arg(long)]
    pub pwsh: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeArg {
    Module,
    Script,
    All,
}

impl From<TypeArg> for ResourceType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Module => ResourceType::Module,
            TypeArg::Script => ResourceType::Script,
            TypeArg::All => ResourceType::All,
        }
    }
}

impl Cli {
    /// Mode follows whichever group was given; name search is the fallback.
    pub fn search_mode(&self) -> SearchMode {
        if let Some(command_name) = &self.command {
            SearchMode::ByCommand {
                command_name: command_name.clone(),
            }
        } else if let Some(resource_name) = &self.dsc_resource {
            SearchMode::ByDscResource {
                resource_name: resource_name.clone(),
            }
        } else {
            SearchMode::ByName {
                name_pattern: self.name.clone(),
                tags: self.tags.clone(),
            }
        }
    }

    pub fn to_query(&self, repository: &str) -> SearchQuery {
        SearchQuery {
            mode: self.search_mode(),
            resource_type: self.resource_type.into(),
            include_prerelease: self.prerelease,
            max_results: self.first,
            repository: repository.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("psgallery").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_to_name_search() {
        let cli = parse(&[]).unwrap();
        let query = cli.to_query("PSGallery");
        assert_eq!(
            query.mode,
            SearchMode::ByName {
                name_pattern: "*".into(),
                tags: vec![],
            }
        );
        assert_eq!(query.resource_type, ResourceType::Module);
        assert_eq!(query.max_results, 20);
        assert!(!query.include_prerelease);
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn test_name_with_tags() {
        let cli = parse(&[
            "--name", "Az.*", "--tag", "Azure", "Cloud", "--type", "all", "--prerelease",
            "--first", "5",
        ])
        .unwrap();
        let query = cli.to_query("PSGallery");
        assert_eq!(
            query.mode,
            SearchMode::ByName {
                name_pattern: "Az.*".into(),
                tags: vec!["Azure".into(), "Cloud".into()],
            }
        );
        assert_eq!(query.resource_type, ResourceType::All);
        assert!(query.include_prerelease);
        assert_eq!(query.max_results, 5);
    }

    #[test]
    fn test_command_mode() {
        let cli = parse(&["--command", "Invoke-Pester"]).unwrap();
        assert_eq!(
            cli.search_mode(),
            SearchMode::ByCommand {
                command_name: "Invoke-Pester".into()
            }
        );
    }

    #[test]
    fn test_dsc_resource_mode() {
        let cli = parse(&["--dsc-resource", "xWebsite", "--repository", "Internal"]).unwrap();
        let query = cli.to_query(cli.repository.as_deref().unwrap());
        assert_eq!(
            query.mode,
            SearchMode::ByDscResource {
                resource_name: "xWebsite".into()
            }
        );
        assert_eq!(query.repository, "Internal");
    }

    #[test]
    fn test_modes_are_exclusive() {
        assert!(parse(&["--name", "Pester", "--command", "Invoke-Pester"]).is_err());
        assert!(parse(&["--tag", "Azure", "--dsc-resource", "xWebsite"]).is_err());
        assert!(parse(&["--command", "Get-Thing", "--dsc-resource", "xWebsite"]).is_err());
    }

    #[test]
    fn test_mandatory_values() {
        assert!(parse(&["--command"]).is_err());
        assert!(parse(&["--dsc-resource"]).is_err());
    }

    #[test]
    fn test_negative_first_reaches_validation() {
        let cli = parse(&["--first", "-1"]).unwrap();
        let err = cli.to_query("PSGallery").validate().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(parse(&["--type", "package"]).is_err());
    }
}
