//! CLI command definitions

use clap::{Parser, ValueEnum};
use mirai_domain::ListenScope;
use std::path::PathBuf;

/// Message kinds delivered to the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListenArg {
    /// Friend and group messages
    All,
    /// Friend messages only
    Friend,
    /// Group messages only
    Group,
}

impl From<ListenArg> for ListenScope {
    fn from(arg: ListenArg) -> Self {
        match arg {
            ListenArg::All => ListenScope::all(),
            ListenArg::Friend => ListenScope::friends(),
            ListenArg::Group => ListenScope::groups(),
        }
    }
}

/// CLI arguments for mirai-bot
#[derive(Parser, Debug)]
#[command(name = "mirai-bot")]
#[command(author, version, about = "Chat bot client for a mirai HTTP gateway")]
#[command(long_about = r#"
mirai-bot authenticates against a running gateway, binds the session to a bot
account and prints every inbound friend or group message. With --echo it
answers each message with its own text, as a quote-reply when --quote is set.

Configuration files are loaded from (in priority order):
1. MIRAI_* environment variables (e.g. MIRAI_GATEWAY__AUTH_KEY)
2. --config <path>     Explicit config file
3. ./mirai.toml        Project-level config
4. ~/.config/mirai-bot/config.toml   Global config

Example:
  mirai-bot --port 8080 --auth-key SupreSecureAuthKey --bot-id 123456
  mirai-bot --listen group --echo --quote -vv
"#)]
pub struct Cli {
    /// Gateway host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Gateway HTTP port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Auth key configured on the gateway
    #[arg(long, value_name = "KEY")]
    pub auth_key: Option<String>,

    /// Bot account to bind the session to
    #[arg(short, long, value_name = "QQ")]
    pub bot_id: Option<i64>,

    /// Which messages to receive
    #[arg(short, long, value_enum, value_name = "SCOPE")]
    pub listen: Option<ListenArg>,

    /// Echo every received message back
    #[arg(long)]
    pub echo: bool,

    /// Echo as a quote-reply when possible (implies --echo)
    #[arg(long)]
    pub quote: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "mirai-bot",
            "--port",
            "9000",
            "--auth-key",
            "k",
            "--bot-id",
            "42",
            "--listen",
            "group",
            "--echo",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.auth_key.as_deref(), Some("k"));
        assert_eq!(cli.bot_id, Some(42));
        assert_eq!(cli.listen, Some(ListenArg::Group));
        assert!(cli.echo);
        assert!(!cli.quote);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["mirai-bot"]).unwrap();
        assert!(cli.port.is_none());
        assert!(cli.listen.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_unknown_listen_scope_rejected() {
        assert!(Cli::try_parse_from(["mirai-bot", "--listen", "temp"]).is_err());
    }

    #[test]
    fn test_listen_arg_to_scope() {
        assert_eq!(ListenScope::from(ListenArg::All), ListenScope::all());
        assert_eq!(ListenScope::from(ListenArg::Friend), ListenScope::friends());
        assert_eq!(ListenScope::from(ListenArg::Group), ListenScope::groups());
    }
}
