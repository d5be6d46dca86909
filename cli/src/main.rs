//! CLI entrypoint for mirai-bot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use mirai_application::SessionManager;
use mirai_domain::{ListenScope, Signal};
use mirai_infrastructure::{ConfigLoader, FileBotConfig, FileConfig, HttpTransport};
use mirai_presentation::{Cli, ConsoleFormatter};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging: RUST_LOG wins, otherwise the verbosity level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            error!("{}", issue);
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    info!(
        host = %config.gateway.host,
        port = config.gateway.port,
        bot_id = config.gateway.bot_id,
        "Starting mirai-bot"
    );

    // === Dependency Injection ===
    let session_config = config.gateway.to_session_config();
    let transport = Arc::new(
        HttpTransport::for_session(&config.gateway.host, &session_config)
            .context("Failed to create HTTP client")?,
    );
    let session = SessionManager::with_params(
        session_config,
        transport,
        config.poller.to_poller_params(),
    );

    session.listen(config.listen.parse_scope()?);
    for signal in Signal::ALL {
        session.on_signal(signal, |signal| {
            println!("{}", ConsoleFormatter::format_signal(signal));
        });
    }

    let bot = config.bot.clone();
    session.on_message_fn(move |message, session| {
        let bot = bot.clone();
        async move {
            println!("{}", ConsoleFormatter::format_message(&message));
            if bot.echo {
                echo(&session, &bot, &message).await;
            }
        }
    });

    session
        .authenticate()
        .await
        .context("Failed to start session")?;
    session
        .verify()
        .await
        .context("Failed to bind session to bot account")?;

    info!("Listening for messages, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    if let Err(e) = session.release().await {
        warn!("Session not released: {}", e);
    }

    Ok(())
}

/// Apply command line flags on top of the loaded configuration
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(host) = &cli.host {
        config.gateway.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if let Some(auth_key) = &cli.auth_key {
        config.gateway.auth_key = auth_key.clone();
    }
    if let Some(bot_id) = cli.bot_id {
        config.gateway.bot_id = bot_id;
    }
    if let Some(listen) = cli.listen {
        config.listen.scope = ListenScope::from(listen).to_string();
    }
    config.bot.quote |= cli.quote;
    config.bot.echo |= cli.echo || config.bot.quote;
}

/// Send a message's text back to where it came from
async fn echo(session: &SessionManager, bot: &FileBotConfig, message: &mirai_domain::Message) {
    let text = message.chain().plain_text();
    if text.is_empty() {
        return;
    }

    let composer = session.composer();
    let sent = if bot.quote {
        composer.quote_reply(text, message).await
    } else {
        composer.reply(text, message).await
    };

    if let Err(e) = sent {
        warn!("Echo failed: {}", e);
    }
}
