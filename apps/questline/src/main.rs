//! # Questline
//!
//! Command-line host for the Questline engine.

use clap::{Parser, Subcommand};
use questline::cli::{
    HostOptions, build_proof, cmd_export, cmd_init, cmd_quest, cmd_reflect, cmd_reflections,
    cmd_status, cmd_submit,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "questline", version, about = "Gamified habit quests")]
struct Cli {
    /// Path to the store
    #[arg(short = 'D', long, global = true, default_value = "questline.db")]
    database: PathBuf,

    /// Storage backend: file or redb
    #[arg(short = 'B', long, global = true, default_value = "file")]
    backend: String,

    /// Engine config JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quest catalog JSON
    #[arg(long, global = true)]
    quests: Option<PathBuf>,

    /// Seed for the mock witness
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new store
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Stats, quest board and due reflection
    Status {
        #[arg(long)]
        json: bool,
    },
    /// The offered quest
    Quest {
        #[arg(long)]
        json: bool,
    },
    /// Begin a quest and submit proof
    Submit {
        quest_id: String,
        #[arg(long)]
        text: Option<String>,
        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
        /// Description of an audio or video recording
        #[arg(long)]
        recording: Option<String>,
        /// Ask a witness to confirm the attempt
        #[arg(long)]
        witness: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Seal a reflection (omit the text to postpone)
    Reflect {
        quest_id: String,
        text: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List reflections and their state
    Reflections {
        #[arg(long)]
        json: bool,
    },
    /// Export the profile as JSON
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = HostOptions {
        db_path: cli.database.clone(),
        backend: cli.backend.clone(),
        config_path: cli.config,
        quests_path: cli.quests,
        witness_seed: cli.seed,
    };

    match cli.command {
        Commands::Init { force } => cmd_init(&cli.database, &cli.backend, force),
        Commands::Status { json } => cmd_status(&options, json),
        Commands::Quest { json } => cmd_quest(&options, json),
        Commands::Submit {
            quest_id,
            text,
            image,
            recording,
            witness,
            json,
        } => {
            let proof = build_proof(text, image.as_deref(), recording)?;
            cmd_submit(&options, &quest_id, &proof, witness.as_deref(), json)
        }
        Commands::Reflect {
            quest_id,
            text,
            json,
        } => cmd_reflect(&options, &quest_id, text.as_deref(), json),
        Commands::Reflections { json } => cmd_reflections(&options, json),
        Commands::Export { output } => cmd_export(&options, &output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
