use std::path::PathBuf;

use clap::Parser;

/// Command-line surface of the desktop shell. `-V` is verbosity, so the
/// stock short version flag is disabled and re-added as `--version` only.
#[derive(Debug, Parser)]
#[command(
    name = "sipline-desktop",
    version,
    about = "Sipline desktop shell",
    disable_version_flag = true
)]
struct Cli {
    /// Path of the session engine configuration file.
    #[arg(long, value_name = "file")]
    config: Option<PathBuf>,

    /// Start with the main window hidden (ignored where unsupported).
    #[arg(long)]
    iconified: bool,

    /// Initialize, print the selftest result line, and exit.
    #[arg(long)]
    selftest: bool,

    /// Log every diagnostic line to stderr as well.
    #[arg(short = 'V', long)]
    verbose: bool,

    #[arg(long, action = clap::ArgAction::Version, help = "Print version")]
    version: Option<bool>,
}

/// Immutable snapshot of the parsed options, taken once per process and
/// read-only for every startup/restart cycle after that.
#[derive(Debug, Clone)]
pub(crate) struct StartupConfig {
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) iconified: bool,
    pub(crate) selftest: bool,
    pub(crate) verbose: bool,
}

impl StartupConfig {
    fn from_cli(cli: Cli) -> Self {
        Self {
            config_path: cli.config,
            iconified: cli.iconified,
            selftest: cli.selftest,
            verbose: cli.verbose,
        }
    }
}

pub(crate) fn parse() -> StartupConfig {
    StartupConfig::from_cli(Cli::parse())
}
