//! Main entry point for the gtranslate CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::commands::{Commands, TranslateArgs};

/// gtranslate - Google Translate and DeepL from the command line
#[derive(Parser, Debug)]
#[command(name = "gtranslate", version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}={}", env!("CARGO_PKG_NAME"), log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Some(Commands::Translate {
            text,
            to,
            from,
            provider,
            host,
            proxy,
            dl_session,
            json,
        }) => {
            cli::commands::handle_translate(TranslateArgs {
                text,
                to,
                from,
                provider,
                host,
                proxy,
                dl_session,
                json,
            })
            .await?;
        }
        Some(Commands::Detect { text }) => {
            cli::commands::handle_detect(&text)?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
