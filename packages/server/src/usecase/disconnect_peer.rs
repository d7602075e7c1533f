//! UseCase: ピア切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPeerUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断したピアが以降のブロードキャスト対象から外れることを保証
//! - 残りの接続数が正しく返ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ピアの切断
//! - エッジケース：最後のピアの切断（残り 0）
//! - 異常系：すでに削除されたピアの切断

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry};

use super::error::DisconnectError;

/// ピア切断のユースケース
pub struct DisconnectPeerUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectPeerUseCase {
    /// 新しい DisconnectPeerUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// ピア切断を実行
    ///
    /// 呼び出し側は事前に Outbound を close しておくこと。
    /// close 済みの Outbound にはスナップショット経由でも配信されない。
    ///
    /// # Returns
    ///
    /// * `Ok((Connection, usize))` - 削除したコネクションと残りの接続数
    /// * `Err(DisconnectError)` - レジストリに存在しない
    pub async fn execute(&self, id: &ConnectionId) -> Result<(Connection, usize), DisconnectError> {
        self.registry
            .remove(id)
            .await
            .map_err(|_| DisconnectError::NotFound(*id))
    }
}
