//! service-call CLI
//!
//! Sends one request to the configured service and prints the JSON response.

use anyhow::{Context, bail};
use clap::Parser;
use service_call::{
    CallArgs, MethodSpec, ServiceClient, TypeDescriptor,
    auth::{AuthTokenProvider, StaticTokenProvider, create_token_provider},
    config::{LogFormat, LoggingConfig, load_config},
    http::Method,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Call a JSON HTTP service with bearer-token authorization
#[derive(Parser, Debug)]
#[command(name = "service-call")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "SERVICE_CALL_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "SERVICE_CALL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Bearer token; overrides the configured token
    #[arg(long)]
    token: Option<String>,

    /// HTTP method (GET, POST, PUT, DELETE, ...)
    method: String,

    /// Path relative to the configured base URL
    path: String,

    /// Query parameter as key=value (repeatable)
    #[arg(short, long = "query", value_name = "KEY=VALUE")]
    queries: Vec<String>,

    /// JSON request body
    #[arg(short, long)]
    body: Option<String>,
}

fn init_logging(config: &LoggingConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(config.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

fn call_args(args: &Args) -> anyhow::Result<CallArgs> {
    let mut call_args = CallArgs::new();

    for query in &args.queries {
        let (key, value) = query
            .split_once('=')
            .with_context(|| format!("query parameter '{}' is not key=value", query))?;
        call_args = call_args.query(key, value);
    }

    if let Some(body) = &args.body {
        let value: serde_json::Value =
            serde_json::from_str(body).context("request body is not valid JSON")?;
        call_args = call_args.json(&value)?;
    }

    Ok(call_args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.http.base_url,
        "Starting service-call"
    );

    let provider: Arc<dyn AuthTokenProvider> = match &args.token {
        Some(token) => Arc::new(StaticTokenProvider::new(token.as_str())),
        None => create_token_provider(&config.auth),
    };

    let client = ServiceClient::builder(config.http.clone())
        .auth(provider)
        .build()
        .inspect_err(|e| error!(error = %e, "Failed to create client"))?;

    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method '{}'", args.method))?;
    let spec = MethodSpec::new(
        method,
        args.path.clone(),
        TypeDescriptor::service_call_of::<serde_json::Value>(),
    );
    let endpoint = client.method::<serde_json::Value>(spec)?;

    let response = endpoint
        .call_with(call_args(&args)?)?
        .execute()
        .await
        .inspect_err(|e| error!(error = %e, "Request failed"))?;

    if !response.is_successful() {
        if let Some(body) = response.error_body() {
            eprintln!("{}", String::from_utf8_lossy(body));
        }
        bail!("request failed with HTTP {}", response.status());
    }

    let body = response.into_body().unwrap_or(serde_json::Value::Null);
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}
