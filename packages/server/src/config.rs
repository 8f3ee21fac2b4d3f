//! Server configuration.
//!
//! Every option can be given on the command line or through a `LOBBY_*`
//! environment variable; the command line wins.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Command-line arguments for the lobby server.
#[derive(Parser, Debug, Clone)]
#[command(name = "lobby-server")]
#[command(about = "Multiplayer lobby server", long_about = None)]
pub struct ServerConfig {
    /// Address to bind to
    #[arg(long, env = "LOBBY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "LOBBY_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seconds a disconnected player is kept before its session is deleted
    #[arg(long, env = "LOBBY_SESSION_TIMEOUT_SECS", default_value_t = 300)]
    pub session_timeout_secs: u64,

    /// Seconds between idle session sweeps
    #[arg(long, env = "LOBBY_SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub sweep_interval_secs: u64,

    /// Messages buffered per connection before broadcasts to it are dropped
    #[arg(long, env = "LOBBY_OUTBOX_CAPACITY", default_value_t = 64)]
    pub outbox_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            session_timeout_secs: 300,
            sweep_interval_secs: 60,
            outbox_capacity: 64,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_timeout_secs == 0 {
            return Err(ConfigError::Zero("session timeout"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Zero("sweep interval"));
        }
        if self.outbox_capacity == 0 {
            return Err(ConfigError::Zero("outbox capacity"));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parser_defaults() {
        // テスト項目: 引数なしのパース結果が Default と一致する
        // given (前提条件):
        let args = ["lobby-server"];

        // when (操作):
        let parsed = ServerConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        let defaults = ServerConfig::default();
        assert_eq!(parsed.port, defaults.port);
        assert_eq!(parsed.session_timeout_secs, defaults.session_timeout_secs);
        assert_eq!(parsed.sweep_interval_secs, defaults.sweep_interval_secs);
        assert_eq!(parsed.outbox_capacity, defaults.outbox_capacity);
        assert_eq!(parsed.session_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_command_line_overrides() {
        // テスト項目: コマンドライン引数で値を上書きできる
        let parsed = ServerConfig::try_parse_from([
            "lobby-server",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--sweep-interval-secs",
            "5",
        ])
        .unwrap();

        assert_eq!(parsed.bind_address(), "127.0.0.1:9000");
        assert_eq!(parsed.sweep_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_validate_rejects_zero() {
        // テスト項目: 0 の設定値は validate で拒否される
        let config = ServerConfig {
            outbox_capacity: 0,
            ..ServerConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero("outbox capacity"))
        );
        assert!(ServerConfig::default().validate().is_ok());
    }
}
