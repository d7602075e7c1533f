//! UseCase: ピア接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectPeerUseCase::execute() メソッド
//! - ConnectPeerUseCase::check_capacity() メソッド
//!
//! ### なぜこのテストが必要か
//! - レジストリへの登録がブロードキャスト対象の唯一の情報源になる
//! - 接続数上限を設定した場合に、ハンドシェイク前に拒否できることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ピアの接続（登録後の件数が返る）
//! - 異常系：上限超過、同一コネクションの二重登録、その他のレジストリエラー
//! - エッジケース：上限未設定（無制限）

use std::sync::Arc;

use crate::domain::{Connection, ConnectionRegistry, Outbound, RegistryError};

use super::error::ConnectError;

/// ピア接続のユースケース
pub struct ConnectPeerUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// 最大接続数（None の場合は無制限）
    max_connections: Option<usize>,
}

impl ConnectPeerUseCase {
    /// 新しい ConnectPeerUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, max_connections: Option<usize>) -> Self {
        Self {
            registry,
            max_connections,
        }
    }

    /// アップグレード前の上限チェック
    ///
    /// 上限に達している場合は `ConnectError::CapacityExceeded` を返す。
    /// 実際の登録時にも registry 側で再チェックされる。
    pub async fn check_capacity(&self) -> Result<(), ConnectError> {
        if let Some(capacity) = self.max_connections
            && self.registry.count().await >= capacity
        {
            return Err(ConnectError::CapacityExceeded { capacity });
        }
        Ok(())
    }

    /// ピア接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 登録後の接続数
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        connection: Connection,
        outbound: Outbound,
    ) -> Result<usize, ConnectError> {
        self.registry
            .insert(connection, outbound)
            .await
            .map_err(|e| match e {
                RegistryError::CapacityExceeded { capacity, .. } => {
                    ConnectError::CapacityExceeded { capacity }
                }
                RegistryError::DuplicateConnection(id) => ConnectError::AlreadyRegistered(id),
                other => ConnectError::Registry(other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::time::now_timestamp,
        domain::{outbound, repository::MockConnectionRegistry},
        infrastructure::registry::InMemoryConnectionRegistry,
    };
    use std::net::SocketAddr;

    fn test_connection() -> Connection {
        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        Connection::new(addr, now_timestamp())
    }

    #[tokio::test]
    async fn test_connect_peer_success() {
        // テスト項目: 新規ピアが正常に接続でき、登録後の件数が返る
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ConnectPeerUseCase::new(registry.clone(), None);
        let (tx, _rx) = outbound::channel(None);
        let connection = test_connection();

        // when (操作):
        let result = usecase.execute(connection.clone(), tx).await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert_eq!(registry.connections().await, vec![connection]);
    }

    #[tokio::test]
    async fn test_connect_peer_duplicate_error() {
        // テスト項目: 同じコネクションの二重登録はエラーになる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ConnectPeerUseCase::new(registry.clone(), None);
        let (tx1, _rx1) = outbound::channel(None);
        let (tx2, _rx2) = outbound::channel(None);
        let connection = test_connection();
        usecase.execute(connection.clone(), tx1).await.unwrap();

        // when (操作):
        let result = usecase.execute(connection.clone(), tx2).await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::AlreadyRegistered(connection.id)));
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_check_capacity_unbounded() {
        // テスト項目: 上限未設定の場合は常に接続可能
        // given (前提条件):
        let mut registry = MockConnectionRegistry::new();
        registry.expect_count().never();
        let usecase = ConnectPeerUseCase::new(Arc::new(registry), None);

        // when (操作):
        let result = usecase.check_capacity().await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_check_capacity_exceeded() {
        // テスト項目: 上限に達している場合はアップグレード前に拒否される
        // given (前提条件):
        let mut registry = MockConnectionRegistry::new();
        registry.expect_count().times(1).returning(|| 2);
        let usecase = ConnectPeerUseCase::new(Arc::new(registry), Some(2));

        // when (操作):
        let result = usecase.check_capacity().await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::CapacityExceeded { capacity: 2 }));
    }

    #[tokio::test]
    async fn test_connect_peer_capacity_exceeded_on_insert() {
        // テスト項目: 登録時に上限を超えた場合もエラーになる（チェックと登録の競合）
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::with_capacity(Some(1)));
        let usecase = ConnectPeerUseCase::new(registry.clone(), Some(1));
        let (tx1, _rx1) = outbound::channel(None);
        let (tx2, _rx2) = outbound::channel(None);
        usecase.execute(test_connection(), tx1).await.unwrap();

        // when (操作):
        let result = usecase.execute(test_connection(), tx2).await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::CapacityExceeded { capacity: 1 }));
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_connect_peer_passes_through_other_registry_errors() {
        // テスト項目: 重複・上限以外のレジストリエラーは意味を変えずに返される
        // given (前提条件):
        let connection = test_connection();
        let id = connection.id;
        let mut registry = MockConnectionRegistry::new();
        registry
            .expect_insert()
            .times(1)
            .returning(move |_, _| Err(RegistryError::ConnectionNotFound(id)));
        let usecase = ConnectPeerUseCase::new(Arc::new(registry), None);
        let (tx, _rx) = outbound::channel(None);

        // when (操作):
        let result = usecase.execute(connection, tx).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::Registry(RegistryError::ConnectionNotFound(id)))
        );
    }
}
