mod render;
mod storage;
mod theme;

use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use quiz_core::result::DEFAULT_CATEGORY;
use quiz_core::sample::sample_results;
use quiz_core::{
    sanitize_player_name, Achievement, Attempt, Difficulty, Period, Persistence, QuizResult,
    ResultStorage, ResultStore,
};
use rand::Rng;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use storage::Environment;
use theme::Theme;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "quiz-board")]
#[command(about = "Quizify trivia leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory the leaderboard file lives in
    #[arg(long, env = "QUIZIFY_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the ranked leaderboard
    List {
        #[arg(short, long, default_value = "all")]
        period: Period,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Print the dashboard as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show player count, best and average score
    Stats {
        #[arg(short, long, default_value = "all")]
        period: Period,
    },
    /// Record a finished quiz
    Record(RecordArgs),
    /// Fill the leaderboard with demo results
    Seed {
        #[arg(long, default_value_t = 25)]
        count: usize,
    },
    /// Delete every stored result
    Clear,
}

#[derive(Args)]
struct RecordArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    score: u32,

    #[arg(long, default_value_t = 10)]
    total: u32,

    /// Time taken in seconds
    #[arg(long)]
    time: u64,

    #[arg(long, default_value = DEFAULT_CATEGORY)]
    category: String,

    #[arg(long, default_value = "easy")]
    difficulty: Difficulty,
}

impl RecordArgs {
    fn into_attempt(self) -> Attempt {
        Attempt {
            player_name: sanitize_player_name(&self.name),
            score: self.score,
            total_questions: self.total,
            time_taken_seconds: self.time,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let env = Environment::detect();
    let store = ResultStore::new(storage::create_backend(env, cli.data_dir));
    tracing::debug!(backend = store.storage().backend_name(), ?env, "opened leaderboard");

    let theme = if cli.no_color {
        Theme::plain()
    } else {
        Theme::dark()
    };
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::List {
            period,
            limit,
            json,
        } => {
            let dashboard = store.dashboard(period);
            if json {
                serde_json::to_writer_pretty(&mut stdout, &dashboard)?;
                writeln!(stdout)?;
            } else {
                render::render_leaderboard(&mut stdout, &dashboard, limit, &theme, &Local::now())?;
            }
        }
        Command::Stats { period } => {
            let dashboard = store.dashboard(period);
            render::render_stats(&mut stdout, period, &dashboard.stats, &theme)?;
        }
        Command::Record(args) => {
            let first_attempt = store.is_first_attempt();
            let result = QuizResult::record(args.into_attempt())?;
            let achievement = Achievement::earned(
                result.percentage(),
                result.time_taken_seconds(),
                first_attempt,
            );

            let ranked = store.append(result.clone());
            let position = ranked
                .iter()
                .position(|r| r.id() == result.id())
                .map(|i| i + 1);
            render::render_recorded(&mut stdout, &result, position, achievement, &theme)?;
        }
        Command::Seed { count } => {
            let (generated, kept) = seed(&store, count, &mut rand::thread_rng());
            writeln!(stdout, "Seeded {} results, {} on the leaderboard", generated, kept)?;
        }
        Command::Clear => match store.clear() {
            Persistence::Persisted => writeln!(stdout, "Leaderboard cleared")?,
            Persistence::MemoryOnly => {
                render::render_warning(&mut stdout, "could not clear the leaderboard", &theme)?
            }
        },
    }

    Ok(())
}

/// Add `count` demo results in one save; returns (generated, kept)
fn seed<S: ResultStorage, R: Rng + ?Sized>(store: &ResultStore<S>, count: usize, rng: &mut R) -> (usize, usize) {
    let samples = sample_results(rng, count, Utc::now());
    let generated = samples.len();
    (generated, store.extend(samples).len())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("quiz_board={},quiz_core={}", level, level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
