use clap::Parser;
use hardlink_snapshot::backup::backup_config::BackupConfig;
use hardlink_snapshot::backup::logging::{init_logging, Verbosity};
use hardlink_snapshot::backup::process::SystemCommandRunner;
use hardlink_snapshot::backup::result_error::normalize_output;
use hardlink_snapshot::backup::session::BackupSession;
use std::path::PathBuf;
use std::process::exit;
use tracing::{error, info};

/// Incremental backup into hard-linked snapshots on a remote host
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Location of config file, defaults to the first hardlink-snapshot.yml
    /// found in /etc, ~/.local or the working directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print log records to stdout, repeat for debug records
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Same as -vv
    #[arg(long = "very-verbose", alias = "vv")]
    very_verbose: bool,
}

impl Args {
    fn verbosity(&self) -> Verbosity {
        if self.very_verbose {
            Verbosity::VeryVerbose
        } else {
            Verbosity::from(self.verbose)
        }
    }
}

fn main() {
    let args = Args::parse();
    let verbosity = args.verbosity();

    let res = BackupConfig::load(args.config.as_deref()).and_then(|config| {
        init_logging(config.local().log_path(), verbosity).map(|_| config)
    });
    let config = match res {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Fatal error: {}", normalize_output(e.to_string()));
            exit(1);
        }
    };

    info!("Backup started");
    match BackupSession::new(&config, &SystemCommandRunner).run() {
        Ok(_) => {
            info!("Backup finished");
        }
        Err(e) => {
            error!("Backup terminated because of errors: {e}");
            if verbosity == Verbosity::Quiet {
                eprintln!("Fatal error: {}", normalize_output(e.to_string()));
            }
            exit(1);
        }
    }
}
