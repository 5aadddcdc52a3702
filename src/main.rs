use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use process_memory_utils::code::CODES_SECTION;
use process_memory_utils::config::{validate_config, Config, ConfigLoader};
use process_memory_utils::{CodeBook, MemoryAccess, MemoryValue, Session, ValueKind};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pmu")]
#[command(about = "Resolve pointer paths and read or write values in a running process")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = "pmu.toml", env = "PMU_CONFIG")]
    config: PathBuf,

    /// INI file with a [codes] section; replaces the configured code file
    #[arg(long)]
    codes: Option<PathBuf>,

    /// Target process id
    #[arg(short, long, conflicts_with = "name")]
    pid: Option<u32>,

    /// Target executable name, with or without .exe
    #[arg(short, long)]
    name: Option<String>,

    /// Fail on unreadable pointer chain links instead of continuing with 0
    #[arg(long)]
    strict: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the target's modules and base addresses
    Modules,
    /// Print the address a code resolves to
    Resolve { code: String },
    /// Read a typed value (float, int, byte, string)
    Read { code: String, r#type: String },
    /// Read a string from the fixed window
    ReadString { code: String },
    /// Read raw bytes (1 to 65536) and print them as hex
    ReadBytes { code: String, len: usize },
    /// Write a value parsed from text
    Write {
        code: String,
        r#type: String,
        value: String,
    },
    /// Poll a value until interrupted
    Watch {
        code: String,
        r#type: String,
        #[arg(short, long, default_value_t = 500)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loader = ConfigLoader::new(&args.config);
    let mut config = loader
        .load_or_default()
        .with_context(|| format!("loading {}", loader.path().display()))?;
    if args.strict {
        config.access.strict = true;
    }
    validate_config(&config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(false)
        .init();

    let book = load_codes(&args, &config)?;
    run(&args, &config, book).await
}

fn load_codes(args: &Args, config: &Config) -> Result<Option<CodeBook>> {
    if let Some(path) = &args.codes {
        let mut book = CodeBook::load(path)?;
        for (name, code) in &config.codes.entries {
            book.insert(CODES_SECTION, name, code);
        }
        return Ok(Some(book));
    }

    let base_dir = args.config.parent().unwrap_or_else(|| Path::new(""));
    let book = config.code_book(base_dir)?;
    if let Some(book) = &book {
        info!(codes = book.len(), "loaded code book");
    }
    Ok(book)
}

#[cfg(windows)]
async fn run(args: &Args, config: &Config, book: Option<CodeBook>) -> Result<()> {
    use process_memory_utils::ProcessSession;

    let session = match (args.pid, &args.name) {
        (Some(pid), _) => ProcessSession::attach(pid)?,
        (None, Some(name)) => ProcessSession::attach_by_name(name)?,
        (None, None) => bail!("specify the target with --pid or --name"),
    };
    let mut session = session.with_options(config.access.options())?;
    if let Some(book) = book {
        session = session.with_codes(book);
    }

    let result = execute(&session, &args.command, args.json).await;
    session.detach()?;
    result
}

#[cfg(not(windows))]
async fn run(_args: &Args, _config: &Config, _book: Option<CodeBook>) -> Result<()> {
    bail!("attaching to a live process is only supported on Windows")
}

#[cfg_attr(not(windows), allow(dead_code))]
async fn execute<M: MemoryAccess>(session: &Session<M>, command: &Command, as_json: bool) -> Result<()> {
    match command {
        Command::Modules => {
            let modules: Vec<_> = session.modules().iter().collect();
            if as_json {
                let rows: Vec<_> = modules
                    .iter()
                    .map(|(name, base)| json!({ "name": name, "base": base.to_string() }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("main module base: {}", session.main_base());
                for (name, base) in modules {
                    println!("{:>18}  {}", base.to_string(), name);
                }
            }
        }
        Command::Resolve { code } => {
            let address = session.address_of(code)?;
            print_result(as_json, code, "address", &address.to_string());
        }
        Command::Read { code, r#type } => {
            let kind: ValueKind = r#type.parse()?;
            let value = session.read_value(code, kind)?;
            print_value(as_json, code, &value)?;
        }
        Command::ReadString { code } => {
            let text = session.read_string(code);
            print_result(as_json, code, "value", &text);
        }
        Command::ReadBytes { code, len } => {
            let bytes = session.read_bytes(code, *len)?;
            print_result(as_json, code, "bytes", &hex::encode_upper(bytes));
        }
        Command::Write {
            code,
            r#type,
            value,
        } => {
            if !session.write(code, r#type, value)? {
                bail!("write to '{}' failed", code);
            }
            print_result(as_json, code, "written", value);
        }
        Command::Watch {
            code,
            r#type,
            interval_ms,
        } => {
            let kind: ValueKind = r#type.parse()?;
            watch(session, code, kind, Duration::from_millis(*interval_ms), as_json).await?;
        }
    }
    Ok(())
}

#[cfg_attr(not(windows), allow(dead_code))]
async fn watch<M: MemoryAccess>(
    session: &Session<M>,
    code: &str,
    kind: ValueKind,
    period: Duration,
    as_json: bool,
) -> Result<()> {
    let mut ticker = tokio::time::interval(period);
    let mut last: Option<MemoryValue> = None;

    info!(code, %kind, "watching, press Ctrl+C to stop");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let value = match kind {
                    ValueKind::String => Ok(MemoryValue::Text(session.read_string(code))),
                    _ => session.read_value(code, kind),
                };
                match value {
                    Ok(value) if last.as_ref() != Some(&value) => {
                        print_value(as_json, code, &value)?;
                        last = Some(value);
                    }
                    Ok(_) => {}
                    Err(e) => warn!(code, error = %e, "read failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watch");
                return Ok(());
            }
        }
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn print_value(as_json: bool, code: &str, value: &MemoryValue) -> Result<()> {
    if as_json {
        println!(
            "{}",
            serde_json::to_string(&json!({ "code": code, "value": value }))?
        );
    } else {
        println!("{} = {}", code, value);
    }
    Ok(())
}

#[cfg_attr(not(windows), allow(dead_code))]
fn print_result(as_json: bool, code: &str, field: &str, value: &str) {
    if as_json {
        let mut row = serde_json::Map::new();
        row.insert("code".to_string(), json!(code));
        row.insert(field.to_string(), json!(value));
        println!("{}", serde_json::Value::Object(row));
    } else {
        println!("{} {} {}", code, field, value);
    }
}
