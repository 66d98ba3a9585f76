use std::fmt;
use std::path::PathBuf;

use quiz_core::model::DayIndex;
use quiz_core::{CategoryFilter, ChallengeRules};
use services::{ChallengeController, Clock, load_bank};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as log_fmt};

mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSeconds { raw: String },
    InvalidDay { raw: String },
    MissingDay,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSeconds { raw } => write!(f, "invalid --seconds value: {raw}"),
            ArgsError::InvalidDay { raw } => write!(f, "invalid day number: {raw}"),
            ArgsError::MissingDay => write!(f, "review needs a day number"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- board                         [options]");
    eprintln!("  cargo run -p app -- play   [--players <a,b,..>]   [options]");
    eprintln!("  cargo run -p app -- bank   [--category <label>]   [options]");
    eprintln!("  cargo run -p app -- review <day>                  [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>     default sqlite:quiz.sqlite3");
    eprintln!("  --bank <path>         question bank JSON, default: built in");
    eprintln!("  --seconds <n>         seconds per question, default 20");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_BANK_PATH, QUIZ_SECONDS_PER_QUESTION, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Board,
    Play,
    Bank,
    Review,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "board" => Some(Self::Board),
            "play" => Some(Self::Play),
            "bank" => Some(Self::Bank),
            "review" => Some(Self::Review),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    bank_path: Option<PathBuf>,
    seconds: Option<u32>,
    players: Vec<String>,
    category: Option<String>,
    day: Option<DayIndex>,
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("sqlite:quiz.sqlite3".into()), normalize_sqlite_url);
        let mut bank_path = std::env::var_os("QUIZ_BANK_PATH").map(PathBuf::from);
        let mut seconds = std::env::var("QUIZ_SECONDS_PER_QUESTION")
            .ok()
            .and_then(|value| value.parse::<u32>().ok());
        let mut players = Vec::new();
        let mut category = None;
        let mut day = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--bank" => bank_path = Some(PathBuf::from(require_value(args, "--bank")?)),
                "--seconds" => {
                    let value = require_value(args, "--seconds")?;
                    let parsed = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidSeconds { raw: value.clone() })?;
                    seconds = Some(parsed);
                }
                "--players" if cmd == Command::Play => {
                    players = require_value(args, "--players")?
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_owned)
                        .collect();
                }
                "--category" if cmd == Command::Bank => {
                    category = Some(require_value(args, "--category")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                raw if cmd == Command::Review && day.is_none() && !raw.starts_with("--") => {
                    day = Some(parse_day(raw)?);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Review && day.is_none() {
            return Err(ArgsError::MissingDay);
        }

        Ok(Self {
            db_url,
            bank_path,
            seconds,
            players,
            category,
            day,
        })
    }

    fn rules(&self) -> Result<ChallengeRules, Box<dyn std::error::Error>> {
        let rules = ChallengeRules::default();
        Ok(match self.seconds {
            Some(seconds) => rules.with_seconds_per_question(seconds)?,
            None => rules,
        })
    }
}

/// Days are numbered from 1 on the command line.
fn parse_day(raw: &str) -> Result<DayIndex, ArgsError> {
    match raw.parse::<usize>() {
        Ok(number) if number >= 1 => Ok(DayIndex::new(number - 1)),
        _ => Err(ArgsError::InvalidDay { raw: raw.to_owned() }),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Logs go to stderr; stdout is the game screen.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(log_fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand shows the board.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Board,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Board,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();
    let bank = load_bank(parsed.bank_path.as_deref()).await?;

    if cmd == Command::Bank {
        let filter = parsed
            .category
            .clone()
            .map_or(CategoryFilter::All, CategoryFilter::Label);
        terminal::print_bank(&bank, &filter);
        return Ok(());
    }

    // sqlx will not create a missing database file.
    prepare_sqlite_file(&parsed.db_url)?;
    let mut controller = ChallengeController::new_sqlite(
        &parsed.db_url,
        Clock::default_clock(),
        parsed.rules()?,
        bank,
    )
    .await?;

    match cmd {
        Command::Board => terminal::print_board(&controller),
        Command::Play => terminal::play(&mut controller, &parsed.players).await?,
        Command::Review => {
            if let Some(day) = parsed.day {
                terminal::print_review(&controller, day);
            }
        }
        Command::Bank => {}
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
