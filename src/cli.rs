use clap::{Parser, Subcommand};

use crate::registry::{SearchSort, SortDirection};

#[derive(Parser, Debug)]
#[command(name = "ipm")]
#[command(version)]
#[command(about = "Inkdrop package manager", long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Set up the access key used to talk to the registry
    Configure,

    /// Remove the stored access key
    Logout,

    /// List installed packages
    #[command(visible_alias = "ls")]
    List,

    /// List installed packages that have newer releases
    Outdated,

    /// Install a package
    Install {
        /// Package name
        package: String,

        /// Install this version instead of the latest
        #[arg(short = 'v', long)]
        version: Option<String>,
    },

    /// Update an installed package
    Update {
        /// Package name
        package: String,

        /// Update to this version instead of the latest
        #[arg(short = 'v', long)]
        version: Option<String>,
    },

    /// Uninstall a package
    #[command(visible_alias = "remove")]
    Uninstall {
        /// Package name
        package: String,
    },

    /// Search the registry
    Search {
        /// Search query
        query: String,

        /// Sort order
        #[arg(short, long, value_enum)]
        sort: Option<SearchSort>,

        /// Sort direction
        #[arg(short, long, value_enum)]
        direction: Option<SortDirection>,
    },

    /// Show package information
    Info {
        /// Package name
        package: String,
    },
}
