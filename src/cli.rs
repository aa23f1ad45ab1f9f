use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::SceneId;

/// Planboard - pick cards and arrange them on two planning tables
#[derive(Parser)]
#[command(name = "planboard")]
#[command(about = "A terminal planning board: pick cards, drag them into place")]
#[command(version)]
pub struct Cli {
    /// Directory holding the board state, exports and log file
    #[arg(long, global = true, default_value = ".planboard")]
    pub data_dir: PathBuf,

    /// Board configuration file (canvas geometry, area labels)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Card catalog replacing the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Category table replacing the built-in one
    #[arg(long, global = true)]
    pub categories: Option<PathBuf>,

    /// Keep state in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive board (default)
    Run,
    /// Print the layout of a scene
    Show {
        /// Scene to print (1 or 2)
        #[arg(short, long, default_value = "1")]
        scene: SceneId,
        /// Card set to print; defaults to the board's default set
        #[arg(long)]
        subset: Option<String>,
    },
    /// Forget all placements, the stacking order and the session label
    Reset,
    /// Write the layout of both scenes as JSON files
    Export {
        /// Output directory; defaults to `<data-dir>/exports`
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Validate a card catalog file
    ValidateCatalog {
        /// Path to the catalog file to validate
        catalog: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Location of the persisted board state
    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("board.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("planboard.log")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }

    /// Configuration file: `--config`, else `<data-dir>/config.json`
    pub fn config_file(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.data_dir.join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_args() {
        // Running with no args should succeed (defaults to the board)
        let cli = Cli::try_parse_from(["planboard"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.ephemeral);
        assert_eq!(cli.state_file(), PathBuf::from(".planboard/board.json"));
        assert_eq!(cli.config_file(), PathBuf::from(".planboard/config.json"));
    }

    #[test]
    fn test_cli_show_scene_two() {
        let cli = Cli::try_parse_from(["planboard", "show", "--scene", "2", "--subset", "b"])
            .unwrap();
        match cli.command {
            Some(Commands::Show { scene, subset }) => {
                assert_eq!(scene, SceneId::Two);
                assert_eq!(subset.as_deref(), Some("b"));
            }
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_scene() {
        assert!(Cli::try_parse_from(["planboard", "show", "--scene", "3"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_command() {
        let cli = Cli::try_parse_from([
            "planboard",
            "export",
            "--dir",
            "/tmp/out",
            "--data-dir",
            "/tmp/state",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/state"));
        match cli.command {
            Some(Commands::Export { dir }) => {
                assert_eq!(dir.unwrap().to_str().unwrap(), "/tmp/out");
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_cli_validate_catalog_command() {
        let cli =
            Cli::try_parse_from(["planboard", "validate-catalog", "/path/to/cards.json"]).unwrap();
        match cli.command {
            Some(Commands::ValidateCatalog { catalog }) => {
                assert_eq!(catalog.to_str().unwrap(), "/path/to/cards.json");
            }
            _ => panic!("Expected ValidateCatalog command"),
        }
    }
}
