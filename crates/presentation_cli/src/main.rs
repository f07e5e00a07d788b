//! Anti-GIF bot CLI
//!
//! Operator commands: webhook registration, message inspection, local
//! classification and one-off moderation.

#![allow(clippy::print_stdout)]

use std::{path::PathBuf, sync::Arc};

use application::ModerationService;
use clap::{Parser, Subcommand};
use domain::MessageId;
use infrastructure::{
    AppConfig, GifClassifier, LegacyEnv, SparkAdapter,
    adapters::gif_classifier::{classify_bytes, count_frames},
};
use integration_spark::{DEFAULT_WEBHOOK_NAME, NewWebhook, SparkClient};
use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Anti-GIF bot CLI
#[derive(Parser)]
#[command(name = "antigiphy-cli")]
#[command(author, version, about = "Anti-GIF Spark bot CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "ANTIGIPHY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the "messages created" webhook with Spark
    ///
    /// Example: antigiphy-cli register-webhook --target https://bot.example.com/
    RegisterWebhook {
        /// Public URL deliveries are sent to (falls back to spark.webhook_target)
        #[arg(short, long)]
        target: Option<String>,

        /// Webhook name
        #[arg(short, long, default_value = DEFAULT_WEBHOOK_NAME)]
        name: String,

        /// Signing secret (falls back to spark.webhook_secret)
        #[arg(short, long)]
        secret: Option<String>,
    },

    /// List the bot's registered webhooks
    ListWebhooks,

    /// Print a message as the API returns it
    ShowMessage {
        /// Message id
        message_id: String,
    },

    /// Classify a local file
    Classify {
        /// File to inspect
        path: PathBuf,
    },

    /// Run the moderation pipeline for an existing message
    Moderate {
        /// Message id
        message_id: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Pick the CLI value, else the configured one
fn resolve(explicit: Option<String>, configured: Option<String>) -> Option<String> {
    explicit
        .filter(|v| !v.trim().is_empty())
        .or(configured)
}

/// Full frame count for display; the verdict stops counting at two
fn describe_frames(bytes: &[u8]) -> String {
    match count_frames(bytes) {
        Ok(frames) => frames.to_string(),
        Err(e) => format!("unreadable ({e})"),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    Ok(AppConfig::load_with(
        path.map(PathBuf::as_path),
        &LegacyEnv::from_env(),
    )?)
}

fn spark_client(config: &AppConfig) -> anyhow::Result<SparkClient> {
    Ok(SparkClient::new(&config.spark_client_config()?)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::RegisterWebhook {
            target,
            name,
            secret,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let target = resolve(target, config.spark.webhook_target.clone()).ok_or_else(|| {
                anyhow::anyhow!("webhook target required (--target or WEBHOOK_TARGET)")
            })?;
            let secret = resolve(
                secret,
                config
                    .spark
                    .webhook_secret
                    .as_ref()
                    .map(|s| s.expose_secret().to_string()),
            );

            let mut webhook = NewWebhook::messages_created(target).with_name(name);
            if let Some(secret) = secret {
                webhook = webhook.with_secret(secret);
            }

            let registered = spark_client(&config)?.register_webhook(&webhook).await?;
            println!("🪝 Registered webhook:");
            println!("{}", serde_json::to_string_pretty(&registered)?);
        },

        Commands::ListWebhooks => {
            let config = load_config(cli.config.as_ref())?;
            let webhooks = spark_client(&config)?.list_webhooks().await?;

            if webhooks.is_empty() {
                println!("No webhooks registered");
            }
            for webhook in webhooks {
                println!(
                    "{}  {}  {}/{}  {}",
                    webhook.id, webhook.name, webhook.resource, webhook.event, webhook.target_url
                );
            }
        },

        Commands::ShowMessage { message_id } => {
            let config = load_config(cli.config.as_ref())?;
            let message = spark_client(&config)?
                .fetch_message(&MessageId::new(message_id)?)
                .await?;
            println!("{}", serde_json::to_string_pretty(&message)?);
        },

        Commands::Classify { path } => {
            let bytes = tokio::fs::read(&path).await?;
            let verdict = classify_bytes(&bytes);
            println!("📄 {}", path.display());
            println!("   gif:      {}", verdict.is_gif);
            if verdict.is_gif {
                println!("   frames:   {}", describe_frames(&bytes));
            }
            println!("   animated: {}", verdict.is_animated_gif());
        },

        Commands::Moderate { message_id } => {
            let config = load_config(cli.config.as_ref())?;
            let spark = Arc::new(SparkAdapter::from_config(&config.spark_client_config()?)?);
            let service = ModerationService::new(
                spark.clone(),
                spark,
                Arc::new(GifClassifier::new()),
                config.moderation.clone(),
            );

            let disposition = service
                .review_message(&MessageId::new(message_id)?)
                .await?;
            println!(
                "⚖️  {} (HTTP {})",
                disposition,
                disposition.status_code()
            );
        },
    }

    Ok(())
}
