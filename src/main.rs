use std::io::{self, Read};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use serde_json::json;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use device_detect::{ClientToken, Config, Error};

/// Classify a user-agent as mobile, tablet or desktop.
#[derive(Parser, Debug)]
#[command(name = "device-detect", version, about)]
struct Args {
    /// User-agent string. Read from stdin when omitted.
    user_agent: Vec<String>,

    /// Raw Cookie header sent by the client
    #[arg(long, env = "DEVICE_DETECT_COOKIE")]
    cookie: Option<String>,

    /// Emit Set-Cookie values on a cache miss
    #[arg(long)]
    persist: bool,

    /// JSON configuration file
    #[arg(long, env = "DEVICE_DETECT_CONFIG")]
    config: Option<PathBuf>,

    /// Evaluate as of this unix timestamp instead of the current time
    #[arg(long)]
    now: Option<i64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log in JSON format
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args);

    // Get input: from CLI args or stdin
    let user_agent = if args.user_agent.is_empty() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer.trim().to_string()
    } else {
        args.user_agent.join(" ")
    };

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let cache = config.build_cache()?;

    let now = match args.now {
        Some(secs) => DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| Error::Config(format!("Invalid --now timestamp: {}", secs)))?,
        None => Utc::now(),
    };

    let token = args
        .cookie
        .as_deref()
        .map(ClientToken::from_cookie_header)
        .unwrap_or_default();
    debug!(?token, "Client token");

    let outcome = cache.classify(&token, &user_agent, args.persist, now);

    let set_cookie: Vec<String> = outcome.cookies.iter().map(|c| c.header_value()).collect();
    let output = json!({
        "device_class": outcome.result.class.as_str(),
        "device_class_code": outcome.result.class.code(),
        "device_type": outcome.result.device_type.name(),
        "lookup": outcome.lookup.as_str(),
        "set_cookie": set_cookie,
    });
    println!("{}", output);

    Ok(())
}

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // RUST_LOG wins when set; --log-level is only the fallback.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init();
    }
}
