//! Server configuration from command-line flags and environment variables.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::usecase::{RelayPolicy, SlowPeerPolicy};

/// Default listening port
pub const DEFAULT_PORT: u16 = 8080;

/// WebSocket broadcast relay server
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "yamabiko-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "BIND_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on (HTTP and WebSocket share it)
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum number of simultaneous connections (unbounded if unset)
    #[arg(long, env = "MAX_CONNECTIONS")]
    pub max_connections: Option<usize>,

    /// Maximum payload size in bytes (unbounded if unset)
    #[arg(long, env = "MAX_MESSAGE_SIZE")]
    pub max_message_size: Option<usize>,

    /// Pending payloads buffered per connection (unbounded if unset)
    #[arg(long, env = "SEND_QUEUE_CAPACITY")]
    pub send_queue_capacity: Option<usize>,

    /// What to do with a peer whose send queue is full: drop or disconnect
    #[arg(long, env = "SLOW_PEER_POLICY", default_value_t = SlowPeerPolicy::Drop)]
    pub slow_peer_policy: SlowPeerPolicy,

    /// Relay messages back to their sender too
    #[arg(
        long,
        env = "ECHO_TO_SENDER",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub echo_to_sender: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_connections: None,
            max_message_size: None,
            send_queue_capacity: None,
            slow_peer_policy: SlowPeerPolicy::Drop,
            echo_to_sender: true,
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Broadcast settings derived from this configuration.
    pub fn relay_policy(&self) -> RelayPolicy {
        RelayPolicy {
            echo_to_sender: self.echo_to_sender,
            max_message_size: self.max_message_size,
            slow_peer_policy: self.slow_peer_policy,
        }
    }
}

/// Load variables from a `.env` file into the process environment.
///
/// With no `path`, `.env` is searched for from the working directory upwards.
/// Variables already present in the environment are not overridden.
/// A missing file is not an error and yields `Ok(None)`.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, dotenvy::Error> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_flagless_invocation() {
        // テスト項目: フラグなしで起動した場合はデフォルト設定と一致する
        // when (操作):
        let config = ServerConfig::try_parse_from(["yamabiko-server"]).unwrap();

        // then (期待する結果):
        // 環境変数が設定されていない前提（PORT などを上書きしていない CI を想定）
        if std::env::var_os("PORT").is_none() {
            assert_eq!(config.port, DEFAULT_PORT);
        }
        assert_eq!(ServerConfig::default().socket_addr().port(), 8080);
        assert_eq!(ServerConfig::default().relay_policy(), RelayPolicy::default());
    }

    #[test]
    fn test_parse_all_flags() {
        // テスト項目: 全てのフラグを解析できる
        // when (操作):
        let config = ServerConfig::try_parse_from([
            "yamabiko-server",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--max-connections",
            "50",
            "--max-message-size",
            "1024",
            "--send-queue-capacity",
            "16",
            "--slow-peer-policy",
            "disconnect",
            "--echo-to-sender",
            "false",
        ])
        .unwrap();

        // then (期待する結果):
        assert_eq!(config.socket_addr(), "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.max_connections, Some(50));
        assert_eq!(config.send_queue_capacity, Some(16));
        assert_eq!(
            config.relay_policy(),
            RelayPolicy {
                echo_to_sender: false,
                max_message_size: Some(1024),
                slow_peer_policy: SlowPeerPolicy::Disconnect,
            }
        );
    }

    #[test]
    fn test_parse_invalid_slow_peer_policy() {
        // テスト項目: 不明なポリシーはエラーになる
        let result =
            ServerConfig::try_parse_from(["yamabiko-server", "--slow-peer-policy", "block"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_env_file_missing_is_not_an_error() {
        // テスト項目: .env ファイルが存在しなくてもエラーにならない
        // given (前提条件):
        let path = std::env::temp_dir()
            .join(format!("yamabiko-missing-{}.env", uuid::Uuid::new_v4()));

        // when (操作):
        let result = load_env_file(Some(&path));

        // then (期待する結果):
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_load_env_file_sets_variables() {
        // テスト項目: .env ファイルの変数が環境変数として読み込まれる
        // given (前提条件): 他のテストと衝突しない変数名
        let suffix = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        let key = format!("YAMABIKO_TEST_PORT_{suffix}");
        let path = std::env::temp_dir().join(format!("yamabiko-{suffix}.env"));
        std::fs::write(&path, format!("{key}=9191\n")).unwrap();

        // when (操作):
        let result = load_env_file(Some(&path));
        std::fs::remove_file(&path).unwrap();

        // then (期待する結果):
        assert_eq!(result.unwrap(), Some(path));
        assert_eq!(std::env::var(&key).unwrap(), "9191");
    }
}
