//! Main entry point for the `mc-bridge` binary.
//!
//! Subcommands:
//! - `init`: write a default `bridge.toml`
//! - `check`: validate the configuration and show the launch command
//! - `run`: start the server and let chat drive it

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use colored::Colorize;
use mcb_core::bridge::{Bridge, ChatLoopEnd};
use mcb_core::chat::{ChatSource, StdinChatSource, TwitchClient, TwitchCredentials};
use mcb_core::config::{load_config, DEFAULT_CONFIG_FILE};
use mcb_core::console::JavaCommand;
use mcb_core::init::{generate_config, InitOptions};
use mcb_protocol::config_models::BridgeConfig;
use mcb_protocol::ipc::WrapperEvent;
use mcb_protocol::lifecycle_models::LifecycleState;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mc-bridge")]
#[command(about = "Let a Twitch chat play a Minecraft server")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default bridge.toml
    Init {
        /// Directory to write into (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Overwrite an existing bridge.toml
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration and print the server command line
    Check {
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },

    /// Start the server and relay chat to it
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Read chat from standard input instead of Twitch
    #[arg(long, conflicts_with = "auth_code")]
    stdin: bool,

    /// OAuth authorization code to exchange for a Twitch access token
    #[arg(long, value_name = "CODE")]
    auth_code: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?cli, "parsed arguments");
    match cli.command {
        Commands::Init { dir, force } => init(dir, force).await,
        Commands::Check { config } => check(config).await,
        Commands::Run(args) => run(args).await,
    }
}

async fn init(dir: Option<PathBuf>, force: bool) -> Result<()> {
    let mut options = InitOptions {
        force,
        ..InitOptions::default()
    };
    if let Some(dir) = dir {
        options.target_dir = dir;
    }

    let path = generate_config(options).await?;
    println!("{} {}", "Created".green().bold(), path.display());
    Ok(())
}

async fn check(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path).await?;
    let command = JavaCommand::from_config(&config.server);

    println!("{} {}", "Config OK:".green().bold(), config_path.display());
    println!("  {} {}", "server:".bold(), command.command_line());
    println!(
        "  {} {}",
        "working dir:".bold(),
        config.server.working_dir.display()
    );
    println!("  {} {}", "player:".bold(), config.chat.player);
    println!("  {} {}", "channel:".bold(), config.chat.broadcaster_login);

    let jar = config.server.working_dir.join(&config.server.jar);
    if !jar.exists() {
        println!("{} {} does not exist", "warning:".yellow().bold(), jar.display());
    }
    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    let config = load_config(&args.config).await?;

    let (events_tx, events_rx) = mpsc::channel(256);
    tokio::spawn(print_state_changes(events_rx));

    let bridge = Bridge::from_config(&config, Some(events_tx));

    println!("{} {}", "Starting".cyan().bold(), JavaCommand::from_config(&config.server).command_line());
    if let Err(e) = bridge.start().await {
        shutdown(&bridge).await;
        return Err(eyre!(e));
    }
    if let Some(pid) = bridge.wrapper().process_id().await {
        println!("{} pid {pid}", "Server online,".green().bold());
    }

    let source = match chat_source(&args, &config).await {
        Ok(source) => source,
        Err(e) => {
            shutdown(&bridge).await;
            return Err(e);
        }
    };

    println!(
        "{} chat is now playing as {}",
        "Ready:".green().bold(),
        config.chat.player.bold()
    );

    let result = tokio::select! {
        end = bridge.run_chat(source) => end.map(Some),
        _ = tokio::signal::ctrl_c() => Ok(None),
    };

    match &result {
        Ok(Some(ChatLoopEnd::Quit)) => println!("{}", "Quit requested from chat".yellow()),
        Ok(Some(ChatLoopEnd::ChatClosed)) => println!("{}", "Chat closed".yellow()),
        Ok(None) => println!("{}", "Interrupted".yellow()),
        Err(_) => {}
    }

    shutdown(&bridge).await;
    result.map(|_| ()).map_err(|e| eyre!(e))
}

async fn shutdown(bridge: &Bridge) {
    println!("{}", "Stopping server...".cyan().bold());
    match bridge.shutdown().await {
        Ok(exit) => println!("{} ({exit:?})", "Server stopped".green().bold()),
        Err(e) => eprintln!("{} {e:#}", "Shutdown failed:".red().bold()),
    }
}

async fn chat_source(args: &RunArgs, config: &BridgeConfig) -> Result<Box<dyn ChatSource>> {
    if args.stdin {
        println!("{}", "Reading chat from standard input".dimmed());
        return Ok(Box::new(StdinChatSource::stdin()));
    }

    let credentials = TwitchCredentials::from_env()?;
    let client = TwitchClient::new(credentials.clone(), config.chat.clone())?;

    let token = match (&args.auth_code, &credentials.access_token) {
        (Some(code), _) => client
            .exchange_code(code)
            .await
            .wrap_err("Failed to exchange the authorization code")?,
        (None, Some(token)) => token.clone(),
        (None, None) => bail!(
            "No Twitch access token: pass --auth-code or set {}",
            TwitchCredentials::ACCESS_TOKEN_VAR
        ),
    };

    let source = client.connect().await?;
    client
        .subscribe_chat(&token, source.session_id())
        .await
        .wrap_err("Failed to subscribe to chat")?;
    Ok(Box::new(source))
}

async fn print_state_changes(mut events_rx: mpsc::Receiver<WrapperEvent>) {
    while let Some(event) = events_rx.recv().await {
        if let WrapperEvent::StateChanged { from, to, .. } = event {
            println!("{} {} -> {}", "server:".bold(), from, paint(to));
        }
    }
}

fn paint(state: LifecycleState) -> colored::ColoredString {
    match state {
        LifecycleState::Online => state.as_str().green(),
        LifecycleState::Offline => state.as_str().red(),
        LifecycleState::Starting | LifecycleState::Stopping => state.as_str().yellow(),
    }
}
