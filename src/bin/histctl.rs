//! histdb maintenance CLI
//!
//! Inspects and edits a history database from the command line: dump the
//! unified view with record ids, add or remove lines, clear the banks, or
//! run a reap pass over orphaned session banks.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use histdb::{Config, DupeMode, HistoryStore, SessionContext};

/// histdb maintenance tool
#[derive(Parser, Debug)]
#[command(name = "histctl")]
#[command(about = "Inspect and maintain a shell history database")]
#[command(version)]
struct Args {
    /// Path of the master history file
    #[arg(short = 'f', long)]
    file: PathBuf,

    /// Session id to act as (defaults to this process id)
    #[arg(short, long)]
    session: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every live record with its bank and offset
    Dump,

    /// Append a line to the master bank
    Add {
        /// The line to record
        line: String,
    },

    /// Tombstone every copy of a line
    Remove {
        /// The line to remove
        line: String,
    },

    /// Truncate all banks
    Clear,

    /// Fold orphaned session banks into master
    Reap,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,histdb=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();
    let session = args.session.unwrap_or_else(std::process::id);

    // Maintenance runs in shared mode: operate on master directly and
    // leave no session bank of our own behind. Dupe handling is literal
    // so `add` always writes exactly what was asked.
    let config = Config::builder()
        .shared(true)
        .ignore_space(false)
        .dupe_mode(DupeMode::Add)
        .build();

    let ctx = SessionContext::new(&args.file, session);
    let mut store = HistoryStore::new(config, ctx);
    if !store.initialise() {
        eprintln!("failed to open history database at {}", args.file.display());
        std::process::exit(1);
    }

    match &args.command {
        Commands::Dump => {
            let mut iter = store.read_lines();
            while let Some((id, record)) = iter.next() {
                println!(
                    "bank {} offset {:>8}  {}",
                    id.bank_index(),
                    id.offset(),
                    String::from_utf8_lossy(record)
                );
            }
        }

        Commands::Add { line } => {
            if !store.add(line) {
                eprintln!("line was not recorded");
                std::process::exit(1);
            }
        }

        Commands::Remove { line } => {
            let count = store.remove_line(line);
            println!("removed {}", count);
        }

        Commands::Clear => {
            store.clear();
        }

        Commands::Reap => {
            // The drop-side reap pass does the work once the store closes.
            tracing::info!("reaping orphaned session banks");
        }
    }
}
