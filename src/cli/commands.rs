//! CLI command definitions and handlers

use clap::{Subcommand, ValueEnum};
use tracing::info;

use gtranslate::core::language;
use gtranslate::{CancellationToken, ClientSettings, ProviderKind, TranslateParams, TranslatorRegistry};

/// Provider selectable on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Provider {
    Google,
    Deepl,
}

impl From<Provider> for ProviderKind {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Google => ProviderKind::Google,
            Provider::Deepl => ProviderKind::Deepl,
        }
    }
}

/// Commands for gtranslate
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a piece of text
    Translate {
        /// Text to translate
        text: String,

        /// Target language
        #[arg(short, long)]
        to: String,

        /// Source language (auto-detect if not specified)
        #[arg(short, long)]
        from: Option<String>,

        /// Backend to use (defaults to GTRANSLATE_PROVIDER or google)
        #[arg(short, long, value_enum)]
        provider: Option<Provider>,

        /// Provider host, e.g. google.co.id
        #[arg(long)]
        host: Option<String>,

        /// Outbound proxy URL
        #[arg(long)]
        proxy: Option<String>,

        /// DeepL dl_session cookie
        #[arg(long)]
        dl_session: Option<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detect the language of a piece of text
    Detect {
        /// Text to inspect
        text: String,
    },
}

/// Options for the translate command
#[derive(Debug)]
pub struct TranslateArgs {
    pub text: String,
    pub to: String,
    pub from: Option<String>,
    pub provider: Option<Provider>,
    pub host: Option<String>,
    pub proxy: Option<String>,
    pub dl_session: Option<String>,
    pub json: bool,
}

/// Handle translate command
pub async fn handle_translate(args: TranslateArgs) -> anyhow::Result<()> {
    let mut settings = ClientSettings::from_env()?;
    if let Some(provider) = args.provider {
        settings.provider = provider.into();
    }
    if args.host.is_some() {
        settings.host = args.host;
    }
    if let Some(proxy) = args.proxy {
        settings.proxy_url = proxy;
    }
    if let Some(dl_session) = args.dl_session {
        settings.dl_session = dl_session;
    }

    info!("Translating with {} to {}", settings.provider, args.to);

    let registry = TranslatorRegistry::new(settings.build_translator()?);

    let ctx = CancellationToken::new();
    let cancel = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut params = TranslateParams::new(args.text, args.to);
    if let Some(from) = args.from {
        params = params.with_from(from);
    }

    let result = registry.translate_with_params(&ctx, &params).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.text);
        if let Some(pronunciation) = &result.pronunciation {
            println!("   Pronunciation: {}", pronunciation);
        }
        if let Some(value) = &result.from.text.value {
            println!("   Did you mean: {}", value);
        }
        for alternative in &result.alternatives {
            println!("   Alternative: {}", alternative);
        }
        println!("   Source: {} ({})", result.source_iso(), result.method);
    }

    Ok(())
}

/// Handle detect command
pub fn handle_detect(text: &str) -> anyhow::Result<()> {
    let iso = language::detect(text)?;
    println!("{}", iso);
    Ok(())
}
