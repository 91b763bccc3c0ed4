pub mod scan;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use certwatch_common::config::FailurePolicy;
use certwatch_common::config::loader::{ConfigLoader, Overrides};
use clap::{ArgAction, Parser};

#[derive(Parser)]
#[command(name = "certwatch", version)]
#[command(about = "Checks when TLS certificates expire and pushes alerts to Bark.")]
pub struct CommandLine {
    /// INI file to read instead of ./config.ini
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How many targets to check at the same time
    #[arg(short, long, value_name = "N", conflicts_with = "sequential")]
    pub workers: Option<NonZeroUsize>,

    /// Check one target after the other
    #[arg(long)]
    pub sequential: bool,

    /// What to do with targets that could not be checked: ignore, count or notify
    #[arg(long, value_name = "POLICY")]
    pub failure_policy: Option<FailurePolicy>,

    /// Scan without sending push notifications
    #[arg(long)]
    pub no_push: bool,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,

    /// Print less; repeat to print only status lines
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,

    /// Print debug output; repeat for dependencies too
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn loader(&self) -> ConfigLoader {
        match &self.config {
            Some(path) => ConfigLoader::new().with_file(path),
            None => ConfigLoader::new(),
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            workers: self.workers,
            sequential: self.sequential,
            failure_policy: self.failure_policy,
            no_push: self.no_push,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
