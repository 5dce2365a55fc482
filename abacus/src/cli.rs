// abacus/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "abacus")]
#[command(about = "Claims data quality scoring and anomaly detection", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Analyses claim files (Validate -> Score -> Detect -> Fuse)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// CSV files to analyse
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// 📋 Lists processed datasets, newest first
    List {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Prints one dataset record as JSON
    Show {
        /// Dataset id (see `abacus list`)
        id: String,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🎲 Writes a synthetic claims CSV with injected defects (demo data)
    Generate {
        /// Output CSV path
        #[arg(long, short)]
        output: PathBuf,

        /// Number of base claims (duplicates are added on top)
        #[arg(long, default_value = "100")]
        rows: usize,

        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_run_defaults() -> Result<()> {
        let args = Cli::parse_from(["abacus", "run", "claims.csv"]);
        match args.command {
            Commands::Run { project_dir, files } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert_eq!(files, vec![PathBuf::from("claims.csv")]);
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_run_requires_files() {
        assert!(Cli::try_parse_from(["abacus", "run"]).is_err());
    }

    #[test]
    fn test_cli_parse_run_many_files() -> Result<()> {
        let args = Cli::parse_from([
            "abacus",
            "run",
            "--project-dir",
            "/tmp",
            "a.csv",
            "b.csv",
        ]);
        match args.command {
            Commands::Run { project_dir, files } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                assert_eq!(files.len(), 2);
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_generate() -> Result<()> {
        let args = Cli::parse_from(["abacus", "generate", "-o", "out.csv", "--rows", "500"]);
        match args.command {
            Commands::Generate { output, rows, seed } => {
                assert_eq!(output, PathBuf::from("out.csv"));
                assert_eq!(rows, 500);
                assert_eq!(seed, 42);
                Ok(())
            }
            _ => bail!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_show() -> Result<()> {
        let args = Cli::parse_from(["abacus", "show", "1700000000000-claims"]);
        match args.command {
            Commands::Show { id, .. } => {
                assert_eq!(id, "1700000000000-claims");
                Ok(())
            }
            _ => bail!("Expected Show command"),
        }
    }
}
