use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use restobj::client::ApiClient;
use restobj::object::{ApiObject, PathTemplates};
use restobj::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage a REST endpoint as a create/read/update/delete object
#[derive(Parser, Debug)]
#[command(name = "restobj", version, about, long_about = None)]
struct Args {
    /// Config file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URI of the API, overrides the config file
    #[arg(short, long)]
    uri: Option<String>,

    /// Per-request timeout in seconds, overrides the config file
    #[arg(long)]
    timeout: Option<u64>,

    /// Retries on connection failures, overrides the config file
    #[arg(long)]
    retries: Option<u32>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Save the effective settings (file plus overrides) back to the config file
    #[arg(long)]
    save_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// POST the object and resolve its id
    Create(ObjectArgs),
    /// GET the object
    Read(ObjectArgs),
    /// PUT the object's data
    Update(ObjectArgs),
    /// DELETE the object
    Delete(ObjectArgs),
}

#[derive(clap::Args, Debug)]
struct ObjectArgs {
    /// Collection path; POST goes here, the rest to PATH/{id}
    #[arg(short, long)]
    path: String,

    #[arg(long)]
    get_path: Option<String>,

    #[arg(long)]
    post_path: Option<String>,

    #[arg(long)]
    put_path: Option<String>,

    #[arg(long)]
    delete_path: Option<String>,

    /// Object id, when already known
    #[arg(long)]
    id: Option<String>,

    /// Object data as a JSON object
    #[arg(short, long)]
    data: Option<String>,
}

impl ObjectArgs {
    fn paths(&self) -> PathTemplates {
        let defaults = PathTemplates::for_collection(&self.path);
        PathTemplates {
            get: self.get_path.clone().unwrap_or(defaults.get),
            post: self.post_path.clone().unwrap_or(defaults.post),
            put: self.put_path.clone().unwrap_or(defaults.put),
            delete: self.delete_path.clone().unwrap_or(defaults.delete),
        }
    }
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

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("restobj started with log level: {:?}", level);

    Ok(Some(guard))
}

fn load_config(args: &Args) -> Result<Config> {
    // An explicit --config must exist; only the default location is optional
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) if path.exists() => Config::load(&path)?,
            _ => {
                let uri = args
                    .uri
                    .as_deref()
                    .context("No config file found. Pass --config or --uri")?;
                Config::new(uri)
            }
        },
    };

    if let Some(uri) = &args.uri {
        config.transport.uri = uri.clone();
    }
    if let Some(timeout) = args.timeout {
        config.transport.timeout = timeout;
    }
    if let Some(retries) = args.retries {
        config.transport.retries = retries;
    }

    Ok(config)
}

fn save_config(args: &Args, config: &Config) -> Result<PathBuf> {
    let path = args
        .config
        .clone()
        .or_else(Config::default_path)
        .context("No config file location available")?;
    config.save(&path)?;
    tracing::info!("Saved config to {}", path.display());
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;

    let config = load_config(&args)?;
    tracing::info!("Using API at {}", config.transport.uri);

    if args.save_config {
        save_config(&args, &config)?;
    }

    let client = Arc::new(ApiClient::new(config.transport)?);
    let profile = Arc::new(config.profile);

    let (object_args, operation) = match &args.command {
        Command::Create(a) => (a, "create"),
        Command::Read(a) => (a, "read"),
        Command::Update(a) => (a, "update"),
        Command::Delete(a) => (a, "delete"),
    };

    let mut object = ApiObject::new(
        client,
        profile,
        object_args.paths(),
        object_args.id.as_deref(),
        object_args.data.as_deref(),
    )
    .context("Failed to set up object")?;

    let result = match &args.command {
        Command::Create(_) => object.create().await,
        Command::Read(_) => object.read().await,
        Command::Update(_) => object.update().await,
        Command::Delete(_) => object.delete().await,
    };
    result.with_context(|| format!("Failed to {} object", operation))?;

    let output = serde_json::json!({
        "id": object.id(),
        "data": object.data(),
        "api_data": object.api_data(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
