//! Scanomatic CLI - archive scanning and zip maintenance
//!
//! Provides `scanomatic scan`, `scanomatic checksums` and the zip editing
//! commands.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::archive::AlgorithmArg;
use commands::scan::{OutputFormat, ScanArgs};

#[derive(Parser)]
#[command(name = "scanomatic")]
#[command(about = "Scanomatic - archive scanner and zip toolkit")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan archives and files for member CRCs
    Scan {
        /// Files or directories to scan
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Also compute an MD5 of every member
        #[arg(long)]
        md5: bool,

        /// Delete archives that fail to open
        #[arg(long)]
        clean: bool,

        /// Header offset for a member extension (EXT=BYTES, repeatable)
        #[arg(long = "offset", value_name = "EXT=BYTES")]
        offsets: Vec<String>,

        /// Use the built-in a78/lnx/nes header offsets
        #[arg(long)]
        legacy_offsets: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a digest of every member of a zip archive
    Checksums {
        /// Zip archive
        archive: PathBuf,
        /// Digest algorithm
        #[arg(short, long, value_enum, default_value = "sha1")]
        algorithm: AlgorithmArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract a single member from a zip archive
    Extract {
        /// Zip archive
        archive: PathBuf,
        /// Member name
        member: String,
        /// Destination directory
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,
    },
    /// Add a file to a zip archive
    Append {
        /// Zip archive (created if missing)
        archive: PathBuf,
        /// File to add
        file: PathBuf,
        /// Member name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Remove a member from a zip archive
    Remove {
        /// Zip archive
        archive: PathBuf,
        /// Member name
        member: String,
    },
    /// Rename members of a zip archive
    Rename {
        /// Zip archive
        archive: PathBuf,
        /// Renames as OLD=NEW
        #[arg(value_name = "OLD=NEW", required = true)]
        renames: Vec<String>,
    },
    /// Copy members from another zip archive into a target archive
    Merge {
        /// Target zip archive
        target: PathBuf,
        /// Source zip archive
        #[arg(short, long)]
        source: PathBuf,
        /// Member to copy, optionally renamed (NAME or NAME=NEW, repeatable)
        #[arg(short, long = "member", value_name = "NAME[=NEW]", required = true)]
        members: Vec<String>,
        /// Add to the target instead of replacing it
        #[arg(long)]
        append: bool,
    },
    /// Show the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Scan {
            paths,
            md5,
            clean,
            offsets,
            legacy_offsets,
            format,
            output,
        } => commands::scan::run(
            &ScanArgs {
                paths,
                md5,
                clean,
                offsets,
                legacy_offsets,
                format,
                output,
            },
            config,
        ),
        Commands::Checksums {
            archive,
            algorithm,
            json,
        } => commands::archive::checksums(&archive, algorithm.into(), json),
        Commands::Extract {
            archive,
            member,
            dest,
        } => commands::archive::extract(&archive, &member, &dest),
        Commands::Append {
            archive,
            file,
            name,
        } => commands::archive::append(&archive, &file, name.as_deref()),
        Commands::Remove { archive, member } => commands::archive::remove(&archive, &member),
        Commands::Rename { archive, renames } => commands::archive::rename(&archive, &renames),
        Commands::Merge {
            target,
            source,
            members,
            append,
        } => commands::archive::merge(&target, source, &members, append),
        Commands::Config => commands::config::show(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}
