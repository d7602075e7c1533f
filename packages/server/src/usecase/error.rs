//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{ConnectionId, RegistryError};

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// 接続数の上限に達している
    #[error("connection limit reached ({capacity})")]
    CapacityExceeded { capacity: usize },

    /// 同じコネクションがすでに登録されている
    #[error("connection '{0}' is already registered")]
    AlreadyRegistered(ConnectionId),

    /// その他のレジストリエラー
    #[error(transparent)]
    Registry(RegistryError),
}

/// 切断処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    /// レジストリに存在しない（すでに削除済み）
    #[error("connection '{0}' is not registered")]
    NotFound(ConnectionId),
}

/// ブロードキャスト処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// 設定されたメッセージサイズ上限を超えている
    #[error("payload of {actual} bytes exceeds the limit of {max} bytes")]
    PayloadTooLarge { max: usize, actual: usize },
}
