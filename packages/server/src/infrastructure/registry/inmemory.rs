//! InMemory ConnectionRegistry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! `tokio::sync::Mutex` で保護した HashMap をレジストリとして使用します。
//!
//! ブロードキャスト時はロック中に Outbound のスナップショットを取り、
//! ロックを解放してから配信します。配信中にレジストリが変化しても
//! スナップショットは影響を受けません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, Outbound, RegistryError};

struct Entry {
    connection: Connection,
    outbound: Outbound,
}

/// インメモリ ConnectionRegistry 実装
pub struct InMemoryConnectionRegistry {
    /// 接続中のコネクション（Outbound を含む）
    entries: Mutex<HashMap<ConnectionId, Entry>>,
    /// 最大接続数（None の場合は無制限）
    capacity: Option<usize>,
}

impl InMemoryConnectionRegistry {
    /// 接続数無制限のレジストリを作成
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// 最大接続数を指定してレジストリを作成
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn insert(
        &self,
        connection: Connection,
        outbound: Outbound,
    ) -> Result<usize, RegistryError> {
        let mut entries = self.entries.lock().await;

        if entries.contains_key(&connection.id) {
            return Err(RegistryError::DuplicateConnection(connection.id));
        }
        if let Some(capacity) = self.capacity
            && entries.len() >= capacity
        {
            return Err(RegistryError::CapacityExceeded {
                capacity,
                current: entries.len(),
            });
        }

        entries.insert(
            connection.id,
            Entry {
                connection,
                outbound,
            },
        );
        Ok(entries.len())
    }

    async fn remove(&self, id: &ConnectionId) -> Result<(Connection, usize), RegistryError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .remove(id)
            .ok_or(RegistryError::ConnectionNotFound(*id))?;
        Ok((entry.connection, entries.len()))
    }

    async fn snapshot(&self) -> Vec<(ConnectionId, Outbound)> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .map(|(id, entry)| (*id, entry.outbound.clone()))
            .collect()
    }

    async fn connections(&self) -> Vec<Connection> {
        let entries = self.entries.lock().await;
        entries
            .values()
            .map(|entry| entry.connection.clone())
            .collect()
    }

    async fn count(&self) -> usize {
        self.entries.lock().await.len()
    }
}
