//! Repository trait definitions.
//!
//! ドメイン層が必要とするデータアクセスの抽象。
//! 具体的な実装は infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Connection, ConnectionId, Outbound, RegistryError};

/// Registry of currently open connections.
///
/// A connection is a member iff it is open and known to the server.
/// Membership is the single source of truth for broadcast fan-out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Register a connection with its outbound handle.
    ///
    /// Returns the registry size after insertion.
    async fn insert(
        &self,
        connection: Connection,
        outbound: Outbound,
    ) -> Result<usize, RegistryError>;

    /// Remove a connection.
    ///
    /// Returns the removed connection and the registry size after removal.
    async fn remove(&self, id: &ConnectionId) -> Result<(Connection, usize), RegistryError>;

    /// Stable snapshot of the outbound handles used for one fan-out.
    async fn snapshot(&self) -> Vec<(ConnectionId, Outbound)>;

    /// All registered connections.
    async fn connections(&self) -> Vec<Connection>;

    /// Number of registered connections.
    async fn count(&self) -> usize;
}
