use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Versioned SBOM ledger for multi-source C++/Python software stacks
#[derive(Parser, Debug)]
#[command(name = "sbom-ledger")]
#[command(version)]
#[command(
    about = "Collect dependencies from build artifacts and keep a versioned ledger of CycloneDX SBOMs",
    long_about = None
)]
pub struct Args {
    /// Path to the config file (defaults to ./sbom-ledger.config.yml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Generate an SBOM for one project; unchanged content is not stored again
    Generate {
        /// Project name as configured
        project: String,
    },
    /// Generate every configured project in turn and log the run
    Batch,
    /// Show the log tail of the most recent batch run (JSON)
    BatchStatus,
    /// List every stored SBOM, newest version first (JSON)
    List,
    /// Show catalog details for one stored SBOM (JSON)
    Show {
        /// Artifact id, e.g. analysisbase-v3
        id: String,
    },
    /// Print the stored CycloneDX manifest
    RawJson {
        id: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the stored Markdown report
    RawMarkdown {
        id: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List configured projects and their version counts (JSON)
    Projects,
}

impl Args {
    pub fn parse_args() -> std::result::Result<Self, clap::Error> {
        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("sbom-ledger").chain(args.iter().copied()))
    }

    #[test]
    fn test_generate_requires_project() {
        let args = parse(&["generate", "AnalysisBase"]).unwrap();
        assert_eq!(
            args.command,
            Command::Generate {
                project: "AnalysisBase".to_string()
            }
        );
        assert!(args.config.is_none());

        assert!(parse(&["generate"]).is_err());
    }

    #[test]
    fn test_global_config_option() {
        let args = parse(&["list", "--config", "/etc/ledger.yml"]).unwrap();
        assert_eq!(args.command, Command::List);
        assert_eq!(args.config, Some(PathBuf::from("/etc/ledger.yml")));

        let args = parse(&["-c", "ledger.yml", "projects"]).unwrap();
        assert_eq!(args.command, Command::Projects);
        assert_eq!(args.config, Some(PathBuf::from("ledger.yml")));
    }

    #[test]
    fn test_kebab_case_subcommands() {
        assert_eq!(parse(&["batch-status"]).unwrap().command, Command::BatchStatus);
        assert_eq!(parse(&["batch"]).unwrap().command, Command::Batch);

        let args = parse(&["raw-json", "athena-v2", "-o", "out.json"]).unwrap();
        assert_eq!(
            args.command,
            Command::RawJson {
                id: "athena-v2".to_string(),
                output: Some(PathBuf::from("out.json"))
            }
        );

        let args = parse(&["raw-markdown", "athena-v2"]).unwrap();
        assert_eq!(
            args.command,
            Command::RawMarkdown {
                id: "athena-v2".to_string(),
                output: None
            }
        );
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        let err = parse(&["check-cve"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_missing_subcommand_rejected() {
        assert!(parse(&[]).is_err());
    }
}
