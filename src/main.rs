use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use eduid_connector::affiliation::{AffiliationConnector, OBJECT_CLASS};
use eduid_connector::config::ConnectorConfig;
use eduid_connector::framework::{AttributeSet, ConnectorObject, Filter, Uid, UID_ATTRIBUTE};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage eduID affiliation records from the command line
#[derive(Parser, Debug)]
#[command(name = "eduid-connector", version = eduid_connector::VERSION, about, long_about = None)]
struct Args {
    /// Config file (JSON or YAML); defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the service answers
    Test,
    /// Print the affiliation schema
    Schema,
    /// Fetch one affiliation
    Get { uid: String },
    /// Look up affiliations through the query interface
    Search {
        /// Identifier to look up
        #[arg(long)]
        uid: Option<String>,
    },
    /// Create an affiliation
    Create {
        /// Attribute as name=value; repeat a name for multiple values
        #[arg(short, long = "attr", value_parser = parse_attribute)]
        attrs: Vec<(String, String)>,
    },
    /// Update an affiliation
    Update {
        uid: String,
        /// Attribute as name=value; repeat a name for multiple values
        #[arg(short, long = "attr", value_parser = parse_attribute)]
        attrs: Vec<(String, String)>,
    },
    /// Delete an affiliation
    Delete { uid: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}

fn attribute_set(pairs: Vec<(String, String)>) -> AttributeSet {
    let mut attrs = AttributeSet::new();
    for (name, value) in pairs {
        attrs.push(name, value);
    }
    attrs
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("eduid-connector started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("eduid-connector").join("eduid-connector.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".eduid-connector").join("eduid-connector.log");
    }
    PathBuf::from("eduid-connector.log")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = ConnectorConfig::load(args.config.as_deref())?;
    let connector = AffiliationConnector::new(config).context("Invalid connector configuration")?;

    match args.command {
        Command::Test => {
            connector.test().await.context("Error when testing connection")?;
            println!("OK");
        }
        Command::Schema => print_json(&connector.schema())?,
        Command::Get { uid } => print_json(&connector.get(&Uid::new(uid)).await?)?,
        Command::Search { uid } => {
            let filter = uid.map(|uid| Filter::eq(UID_ATTRIBUTE, uid));
            let mut results: Vec<ConnectorObject> = Vec::new();
            connector
                .execute_query(OBJECT_CLASS, filter.as_ref(), &mut |object: ConnectorObject| {
                    results.push(object);
                    true
                })
                .await?;
            print_json(&results)?;
        }
        Command::Create { attrs } => {
            match connector.create(OBJECT_CLASS, &attribute_set(attrs)).await? {
                Some(uid) => println!("{}", uid),
                None => println!("nothing to create"),
            }
        }
        Command::Update { uid, attrs } => {
            let uid = connector
                .update(OBJECT_CLASS, &Uid::new(uid), &attribute_set(attrs))
                .await?;
            println!("{}", uid);
        }
        Command::Delete { uid } => {
            connector.delete(OBJECT_CLASS, &Uid::new(uid)).await?;
            println!("deleted");
        }
    }

    Ok(())
}
