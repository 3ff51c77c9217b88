use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use marco_config::Config;
use marco_engine::layout::layout;
use marco_engine::markup::{parse_markup, snapshot};
use marco_engine::{
    AppserviceUsers, HomeserverMedia, IncomingMessage, MessageContent, MessageType, PowerLevels,
    StaticResolver, TranslateOptions, death_notice, translate_incoming, translate_outgoing,
};
use std::io::Read;
use std::path::PathBuf;
use uuid::Uuid;

/// Translate messages between chat-network markup and game chat
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Config file (default: ~/.config/marco/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read m.room.message content JSON and print the game chat line
    Incoming {
        #[arg(long)]
        sender: String,

        #[arg(long)]
        room: String,

        /// Display name for a user, as ID=NAME
        #[arg(long = "name", value_parser = parse_name)]
        names: Vec<(String, String)>,

        /// m.room.power_levels content JSON for the room
        #[arg(long)]
        power_levels: Option<PathBuf>,
    },

    /// Read legacy-coded game chat and print message content JSON
    Outgoing {
        #[arg(long, default_value = "m.text")]
        msgtype: String,
    },

    /// Read markup and print the laid-out tree
    Layout {
        #[arg(long)]
        separator: Option<String>,
    },

    /// Read a death message and print the notice content JSON
    Death {
        /// Player UUID
        #[arg(long)]
        player: Uuid,

        /// Names the message may start with, tried in order
        #[arg(long = "name", required = true)]
        names: Vec<String>,
    },
}

fn parse_name(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((user_id, name)) if !user_id.is_empty() => {
            Ok((user_id.to_string(), name.to_string()))
        }
        _ => Err(format!("expected ID=NAME, got {value:?}")),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());

    match Config::load_from_path(&config_path)? {
        Some(config) => Ok(config),
        None => {
            log::warn!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            Ok(Config::default())
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    Ok(input)
}

fn appservice_users(config: &Config) -> AppserviceUsers {
    AppserviceUsers::new(
        config.appservice.user_prefix.as_str(),
        config.appservice.bot_localpart.as_str(),
        config.appservice.homeserver_name.as_str(),
    )
}

/// `Info` by default; `RUST_LOG` takes precedence.
fn logger() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();
    builder
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logger().init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    let options = TranslateOptions {
        paragraph_separator: config.formatting.paragraph_separator.clone(),
        max_depth: config.formatting.max_depth,
    };

    match cli.command {
        Command::Incoming {
            sender,
            room,
            names,
            power_levels,
        } => {
            let content = MessageContent::from_json(&read_stdin()?)?;

            let mut resolver = StaticResolver::new(
                appservice_users(&config),
                HomeserverMedia::new(config.appservice.homeserver_url.as_str()),
            );
            for (user_id, name) in &names {
                resolver = resolver.with_display_name(user_id, name);
            }
            if let Some(path) = power_levels {
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                resolver = resolver.with_power_levels(&room, PowerLevels::from_json(&json)?);
            }

            let message = IncomingMessage::from_content(&room, &sender, &content);
            let translation = translate_incoming(&message, &resolver, &options).await;

            match translation.chat_line(&content.msgtype) {
                Some(line) => println!("{line}"),
                None => bail!("Message type {:?} is not relayed", content.msgtype),
            }
            if let Some(richtext) = &translation.richtext {
                println!("{}", serde_json::to_string(richtext)?);
            }
        }
        Command::Outgoing { msgtype } => {
            let msgtype: MessageType = serde_json::from_value(serde_json::Value::String(msgtype))?;
            let input = read_stdin()?;
            let content = translate_outgoing(input.trim_end_matches('\n')).into_content(msgtype);
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Command::Layout { separator } => {
            let separator = separator.unwrap_or(options.paragraph_separator);
            let mut tree = parse_markup(&read_stdin()?);
            if !layout(&mut tree, &separator) {
                log::info!("Nothing survived layout");
            }
            println!("{}", serde_json::to_string_pretty(&snapshot(&tree))?);
        }
        Command::Death { player, names } => {
            let user_id = appservice_users(&config).user_id_for_player(&player);
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let input = read_stdin()?;
            let content = death_notice(input.trim_end_matches('\n'), &user_id, &names);
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rust_log_overrides_default_level() {
        unsafe {
            std::env::set_var("RUST_LOG", "debug");
        }
        let filter = logger().build().filter();
        unsafe {
            std::env::remove_var("RUST_LOG");
        }

        assert_eq!(filter, log::LevelFilter::Debug);
    }

    #[test]
    fn parses_names() {
        assert_eq!(
            parse_name("@a:example.com=Alice Smith"),
            Ok(("@a:example.com".to_string(), "Alice Smith".to_string()))
        );
        assert!(parse_name("Alice").is_err());
        assert!(parse_name("=Alice").is_err());
    }
}
