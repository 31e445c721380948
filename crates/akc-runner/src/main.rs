//! # akc-runner
//!
//! Command-line entry point for the Aikucun gateway client.
//!
//! Credentials come from a JSON config file (`--config`) or from
//! `--app-id/--app-secret/--gateway` (env: `APP_ID`, `APP_SECRET`,
//! `APP_GATEWAY`). Results are printed as pretty JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! akc-runner --config akc.json orders --from "2024-01-01 00:00:00" --to "2024-01-31 23:59:59"
//! APP_ID=.. APP_SECRET=.. APP_GATEWAY=.. akc-runner login-url --phone 13800000000
//! ```

use std::path::PathBuf;

use akc_api::{GatewayClient, SellerApi};
use akc_core::config::{AppConfig, GatewayConfig, LoggingMeta, TransportConfig};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

/// Message fragment the gateway uses for an already registered distributor.
const ALREADY_REGISTERED: &str = "已经注册过";

/// Aikucun open gateway client.
#[derive(Parser)]
#[command(name = "akc-runner", about = "Aikucun open gateway client")]
struct Cli {
    /// Configuration file path (JSON). Overrides the credential flags.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application ID.
    #[arg(long, env = "APP_ID")]
    app_id: Option<String>,

    /// Application secret.
    #[arg(long, env = "APP_SECRET", hide_env_values = true)]
    app_secret: Option<String>,

    /// Gateway URL.
    #[arg(long, env = "APP_GATEWAY")]
    gateway: Option<String>,

    /// Verify TLS certificates (off by default, matching the platform client).
    #[arg(long)]
    verify_tls: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch an auto-login URL for a member.
    LoginUrl {
        #[arg(long)]
        phone: String,
    },
    /// Register a distributor.
    Register {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        name: String,
    },
    /// List seller orders in a time window.
    Orders {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
        /// Window start (`yyyy-MM-dd HH:mm:ss`).
        #[arg(long)]
        from: String,
        /// Window end (`yyyy-MM-dd HH:mm:ss`).
        #[arg(long)]
        to: String,
    },
    /// Look up the settlement record of an order.
    Settle {
        #[arg(long)]
        order_no: String,
    },
}

impl Cli {
    /// Resolve the app config from `--config` or the credential flags.
    fn app_config(&self) -> Result<AppConfig> {
        if let Some(path) = &self.config {
            let mut config = akc_core::config::load_config(path)?;
            if self.verify_tls {
                config.gateway.transport.accept_invalid_certs = false;
            }
            return Ok(config);
        }

        let (Some(app_id), Some(app_secret), Some(gateway_url)) =
            (&self.app_id, &self.app_secret, &self.gateway)
        else {
            bail!("either --config or app id, app secret and gateway must be provided");
        };

        let gateway = GatewayConfig {
            app_id: app_id.clone(),
            app_secret: app_secret.clone(),
            gateway_url: gateway_url.clone(),
            transport: TransportConfig {
                accept_invalid_certs: !self.verify_tls,
                ..TransportConfig::default()
            },
        };
        gateway.validate()?;
        Ok(AppConfig { logging: None, gateway })
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let AppConfig { logging, gateway: config } = cli.app_config()?;

    // 2. Initialize logging (CLI flags win over the config file)
    let LoggingMeta { module_name, log_path } = logging.unwrap_or_default();
    let log_dir = cli.log_dir.clone().or(log_path);
    let module_name = module_name.unwrap_or_else(|| "akc-runner".into());
    akc_core::logging::init_logging(&cli.log_level, log_dir.as_deref(), &module_name);

    // 3. Build the client
    info!("akc-runner starting — app_id={}, gateway={}", config.app_id, config.gateway_url);
    let client = GatewayClient::from_config(&config).context("failed to build gateway client")?;

    // 4. Run the requested operation
    match &cli.command {
        Command::LoginUrl { phone } => {
            let url = client.auto_login_url(phone).await?;
            print_json(&serde_json::json!({ "url": url }))?;
        }
        Command::Register { phone, name } => match client.register_distributor(phone, name).await {
            Ok(id) => print_json(&serde_json::json!({ "distributor_id": id }))?,
            Err(e) if e.is_rejection_containing(ALREADY_REGISTERED) => {
                info!("{phone} is already registered");
                print_json(&serde_json::json!({ "already_registered": true }))?;
            }
            Err(e) => return Err(e.into()),
        },
        Command::Orders { page, page_size, from, to } => {
            let orders = client.list_orders(*page, *page_size, from, to).await?;
            info!("page {}/{} — {} order(s), total {}", orders.page_index, orders.pages, orders.result.len(), orders.total);
            print_json(&orders)?;
        }
        Command::Settle { order_no } => {
            let info = client.order_settle_info(order_no).await?;
            print_json(&info)?;
        }
    }

    Ok(())
}
