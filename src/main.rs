//! shortlist CLI - session recording and hiring-bias analytics.

use clap::{Parser, Subcommand};
use shortlist::cli;
use std::path::PathBuf;
use std::process::ExitCode;

/// Get the version string.
///
/// - Release builds (on a git tag): "0.1.0"
/// - Development builds: "0.1.0-dev (abc1234)"
/// - Dirty working directory: "0.1.0-dev (abc1234-dirty)"
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("SHORTLIST_GIT_HASH");
    const IS_RELEASE: &str = env!("SHORTLIST_IS_RELEASE");

    // Use a static to avoid repeated allocations
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            VERSION.to_string()
        } else {
            format!("{VERSION}-dev ({GIT_HASH})")
        }
    })
}

#[derive(Parser)]
#[command(name = "shortlist")]
#[command(author, version = version(), about = "Session recording and hiring-bias analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one round of a player's game.
    Record {
        /// Player identifier.
        player_id: String,

        /// Round number (1..=max_rounds).
        round_number: u32,

        /// Chosen candidate id.
        chosen: String,

        /// Rejected candidate id.
        rejected: String,

        /// Position being recruited for.
        #[arg(short, long)]
        position: String,

        /// Decision time in seconds.
        #[arg(short, long)]
        time_taken: f64,

        /// Tabs viewed (PROFILE, SKILLS, WORK, EDUCATION). Repeatable.
        #[arg(long = "tab")]
        tabs: Vec<String>,
    },

    /// End a session explicitly (abandons if short of max rounds).
    End {
        /// Session ID.
        session_id: String,
    },

    /// List recent sessions.
    Sessions {
        /// Maximum number of sessions to show. Defaults to 20.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the full session document.
    Show {
        /// Session ID.
        session_id: String,
    },

    /// Show session and choice statistics.
    Stats {
        /// Emit JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Show demographic hiring-rate bias analytics.
    Bias {
        /// Path to a candidates JSON file. Defaults to
        /// `<home>/candidates.json`.
        #[arg(short, long)]
        candidates: Option<PathBuf>,

        /// Emit the full JSON report instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Show per-player session summaries.
    Players {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Migrate legacy flat choice records into sessions. Not idempotent.
    Migrate {
        /// Path to a JSON file of legacy flat choice records.
        input: PathBuf,
    },

    /// Remove old sessions.
    Clean {
        /// Duration (e.g., "7d", "30d", "24h"). Defaults to 7d.
        #[arg(long, default_value = "7d")]
        before: String,

        /// Remove all sessions, including active ones.
        #[arg(long)]
        all: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Record {
            player_id,
            round_number,
            chosen,
            rejected,
            position,
            time_taken,
            tabs,
        } => cli::record::run(
            &player_id,
            round_number,
            &chosen,
            &rejected,
            &position,
            time_taken,
            &tabs,
        ),
        Commands::End { session_id } => cli::end::run(&session_id),
        Commands::Sessions { limit } => cli::sessions::run(limit),
        Commands::Show { session_id } => cli::show::run(&session_id),
        Commands::Stats { json } => cli::stats::run(json),
        Commands::Bias { candidates, json } => cli::bias::run(candidates.as_deref(), json),
        Commands::Players { json } => cli::players::run(json),
        Commands::Migrate { input } => cli::migrate::run(&input),
        Commands::Clean { before, all } => cli::clean::run(&before, all),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("shortlist: error: {e}");
            ExitCode::FAILURE
        }
    }
}
