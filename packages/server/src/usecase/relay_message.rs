//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - ブロードキャスト（スナップショット上の全ての open なコネクションへ配信）
//!
//! ### なぜこのテストが必要か
//! - ペイロードが加工されずに各ピアへ 1 回だけ届くことを保証
//! - 閉じたピアや遅いピアが他のピアへの配信を妨げないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者を含む全員への配信（エコー）
//! - 設定：送信者を除外する場合
//! - エッジケース：送信者以外に誰もいない場合、閉じたピア、満杯のキュー
//! - 異常系：サイズ上限超過

use std::{fmt, str::FromStr, sync::Arc};

use crate::domain::{ConnectionId, ConnectionRegistry, DeliveryError, Payload};

use super::error::RelayError;

/// 送信キューが満杯のピアに対する扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlowPeerPolicy {
    /// そのピア宛てのメッセージだけを破棄する
    #[default]
    Drop,
    /// そのピアを切断する
    Disconnect,
}

impl FromStr for SlowPeerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(SlowPeerPolicy::Drop),
            "disconnect" => Ok(SlowPeerPolicy::Disconnect),
            other => Err(format!(
                "unknown slow peer policy '{other}' (expected 'drop' or 'disconnect')"
            )),
        }
    }
}

impl fmt::Display for SlowPeerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlowPeerPolicy::Drop => write!(f, "drop"),
            SlowPeerPolicy::Disconnect => write!(f, "disconnect"),
        }
    }
}

/// ブロードキャストの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayPolicy {
    /// 送信者自身にも配信する
    pub echo_to_sender: bool,
    /// ペイロードの最大バイト数（None の場合は無制限）
    pub max_message_size: Option<usize>,
    /// 送信キューが満杯のピアの扱い
    pub slow_peer_policy: SlowPeerPolicy,
}

impl Default for RelayPolicy {
    fn default() -> Self {
        Self {
            echo_to_sender: true,
            max_message_size: None,
            slow_peer_policy: SlowPeerPolicy::Drop,
        }
    }
}

/// 1 回のブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// キューに積めた配信先
    pub delivered: Vec<ConnectionId>,
    /// 閉じていたためスキップした件数
    pub skipped: usize,
    /// キュー満杯で破棄した件数
    pub dropped: usize,
    /// キュー満杯で切断したピア
    pub evicted: Vec<ConnectionId>,
}

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    policy: RelayPolicy,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, policy: RelayPolicy) -> Self {
        Self { registry, policy }
    }

    /// メッセージ中継を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信者のコネクション ID
    /// * `payload` - 中継するペイロード（加工しない）
    ///
    /// # Returns
    ///
    /// * `Ok(RelayReport)` - 配信結果
    /// * `Err(RelayError)` - サイズ上限超過（誰にも配信しない）
    pub async fn execute(
        &self,
        from: &ConnectionId,
        payload: Payload,
    ) -> Result<RelayReport, RelayError> {
        if let Some(max) = self.policy.max_message_size
            && payload.len() > max
        {
            return Err(RelayError::PayloadTooLarge {
                max,
                actual: payload.len(),
            });
        }

        let targets = self.registry.snapshot().await;
        let mut report = RelayReport::default();

        for (id, outbound) in targets {
            if !self.policy.echo_to_sender && &id == from {
                continue;
            }

            match outbound.deliver(payload.clone()) {
                Ok(()) => {
                    tracing::debug!(
                        "Broadcasting {} message to connection '{}'",
                        payload.kind(),
                        id
                    );
                    report.delivered.push(id);
                }
                Err(DeliveryError::Closed) => {
                    tracing::debug!("Skipping closed connection '{}'", id);
                    report.skipped += 1;
                }
                Err(DeliveryError::Full) => match self.policy.slow_peer_policy {
                    SlowPeerPolicy::Drop => {
                        tracing::warn!(
                            "Send queue full for connection '{}', dropping message",
                            id
                        );
                        report.dropped += 1;
                    }
                    SlowPeerPolicy::Disconnect => {
                        tracing::warn!("Send queue full for connection '{}', disconnecting", id);
                        outbound.close();
                        report.evicted.push(id);
                    }
                },
            }
        }

        Ok(report)
    }
}
