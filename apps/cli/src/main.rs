use anyhow::Result;
use clap::{Parser, Subcommand};
use generation::{GeminiConfig, GeminiGateway, GenerationGateway, MockGateway};
use history::{FileStore, HistoryLog, UuidIdGenerator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod concepts;
mod session;

#[derive(Parser)]
#[command(name = "adstudio")]
#[command(about = "AI CGI Ad Studio - turn product photos into CGI advertisements")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// History file location (defaults to the platform data directory)
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive studio session
    Studio {
        /// Use the offline mock backend instead of Gemini
        #[arg(long)]
        mock: bool,

        /// Gemini API key (falls back to the API_KEY environment variable)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Browse past generations
    History,

    /// Show one past generation in full
    Show {
        /// Entry id, or 1-based position in the list
        selector: String,
    },

    /// Delete all past generations
    ClearHistory {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let history_path = cli
        .history_file
        .clone()
        .unwrap_or_else(history::default_history_path);

    match cli.command {
        Commands::Studio { mock, api_key } => studio_command(mock, api_key, history_path),
        Commands::History => history_command(history_path),
        Commands::Show { selector } => show_command(&selector, history_path),
        Commands::ClearHistory { yes } => clear_command(yes, history_path),
    }
}

fn open_history(path: PathBuf) -> HistoryLog {
    HistoryLog::open(Box::new(FileStore::new(path)), Box::new(UuidIdGenerator))
}

fn studio_command(mock: bool, api_key: Option<String>, history_path: PathBuf) -> Result<()> {
    let gateway: Arc<dyn GenerationGateway> = if mock {
        info!("using the offline mock backend");
        Arc::new(MockGateway::new())
    } else {
        let key = api_key
            .or_else(|| std::env::var("API_KEY").ok())
            .unwrap_or_default();
        Arc::new(GeminiGateway::new(GeminiConfig::with_api_key(key))?)
    };
    info!("history file: {}", history_path.display());
    let controller = studio::StudioController::new(gateway, open_history(history_path));
    session::Session::new(controller).run()
}

fn history_command(history_path: PathBuf) -> Result<()> {
    let log = open_history(history_path);
    if log.is_empty() {
        println!("No ads in history.");
        return Ok(());
    }
    for (index, entry) in log.entries().iter().enumerate() {
        println!(
            "{:>3}. {}  [{}]  {}",
            index + 1,
            entry
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            entry.id,
            entry.scene_description
        );
    }
    Ok(())
}

fn show_command(selector: &str, history_path: PathBuf) -> Result<()> {
    let log = open_history(history_path);
    let entry = selector
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| log.entries().get(index))
        .or_else(|| log.get(selector));
    match entry {
        Some(entry) => {
            println!("Id: {}", entry.id);
            println!(
                "Created: {}",
                entry
                    .timestamp
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
            );
            println!("Scene: {}", entry.scene_description);
            if entry.video_prompt.is_empty() {
                println!("Video prompt: not generated.");
            } else {
                println!("Video prompt: {}", entry.video_prompt);
            }
        }
        None => println!("No history entry '{selector}'."),
    }
    Ok(())
}

fn clear_command(yes: bool, history_path: PathBuf) -> Result<()> {
    if !yes {
        use std::io::{BufRead, Write};
        print!("Are you sure you want to delete all your project history? This action cannot be undone. [y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Kept history.");
            return Ok(());
        }
    }
    let mut log = open_history(history_path);
    log.clear();
    println!("History cleared.");
    Ok(())
}
