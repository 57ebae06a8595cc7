//! tourgate web server
//!
//! Admin access layer for the tour booking site.

use anyhow::Context;
use clap::Parser;
use tourgate_core::{LogFormat, SecurityConfig};
use tourgate_web::server::TourgateServerBuilder;
use tourgate_web::{init_logging, WebConfig};
use tracing::info;

/// tourgate web server - authentication, role checks and security headers for the admin
#[derive(Parser)]
#[command(name = "tourgate-web")]
#[command(about = "Admin access layer for the tour booking site")]
#[command(version)]
struct Args {
    /// Server host to bind to (overrides TOURGATE_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on (overrides TOURGATE_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (compact, pretty, json)
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load .env first so RUST_LOG from it reaches the log filter
    dotenvy::dotenv().ok();
    init_logging(&args.log_level, args.log_format).context("failed to initialize logging")?;

    let security = SecurityConfig::from_env()
        .inspect_err(|e| e.log())
        .context("invalid security configuration")?;

    let mut config = WebConfig::from_env().context("invalid server configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("Allowed origins: {:?}", security.cors.allowed_origins);

    let server = TourgateServerBuilder::new()
        .host(config.host)
        .port(config.port)
        .security(security)
        .build()
        .context("failed to build server")?;

    server.start().await.context("server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["tourgate-web"]);
        assert!(args.host.is_none());
        assert!(args.port.is_none());
        assert_eq!(args.log_format, LogFormat::Compact);

        let args = Args::parse_from([
            "tourgate-web",
            "--host",
            "0.0.0.0",
            "--port",
            "3000",
            "--log-format",
            "json",
        ]);
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(3000));
        assert_eq!(args.log_format, LogFormat::Json);
    }
}
