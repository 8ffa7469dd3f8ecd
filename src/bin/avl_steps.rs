use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use avl_steps::config::Config;
use avl_steps::sequencer::{JsonRenderer, TextRenderer};
use avl_steps::{key, layout, logging, Renderer, Sequencer, Session};

/// Watch an AVL tree rebalance itself, one step at a time.
///
/// Commands are read from stdin, one per line: `insert X`, `remove X`, `undo`,
/// `show`, `layout`, `quit`. Keys are single letters.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delay between steps in milliseconds (overrides the config file)
    #[arg(long)]
    pace_ms: Option<u64>,

    /// Print frames as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

enum Command {
    Insert(char),
    Remove(char),
    Undo,
    Show,
    Layout,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let letter = || key::parse_letter(rest).map_err(|e| e.to_string());
    match word.to_ascii_lowercase().as_str() {
        "insert" | "i" => Ok(Command::Insert(letter()?)),
        "remove" | "r" => Ok(Command::Remove(letter()?)),
        "undo" | "u" => Ok(Command::Undo),
        "show" | "s" => Ok(Command::Show),
        "layout" => Ok(Command::Layout),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command {other:?}")),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(pace_ms) = args.pace_ms {
        config.pace_ms = pace_ms;
    }
    logging::init(&config)?;
    info!("starting with {config:?}");

    let renderer: Box<dyn Renderer<char>> = if args.json {
        Box::new(JsonRenderer::new(std::io::stdout()))
    } else {
        Box::new(TextRenderer::new(std::io::stdout()))
    };
    let mut session = Session::new(Sequencer::new(renderer, config.pace()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        let res = match command {
            Command::Insert(key) => session.insert(key).await,
            Command::Remove(key) => session.remove(key).await,
            Command::Undo => session.undo(),
            Command::Show => {
                session.show();
                Ok(())
            }
            Command::Layout => {
                let placed = layout::layout(&session.tree().shape(), config.width);
                println!("{}", serde_json::to_string(&placed)?);
                Ok(())
            }
            Command::Quit => break,
        };
        if let Err(e) = res {
            debug!("command failed: {e}");
            eprintln!("{e}");
        }
    }

    Ok(())
}
