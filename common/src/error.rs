//! エラー型定義

use thiserror::Error;

/// ファイル検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Only .xlsx or .xls files are allowed.")]
    UnsupportedType,

    #[error("File must be smaller than {limit_mb}MB.")]
    TooLarge { limit_mb: u64 },
}

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// 通信失敗、またはリトライを使い切った5xx
    #[error("{0}")]
    Network(String),

    /// 想定外のContent-Type
    #[error("{0}")]
    Format(String),

    /// ワークブックの読み込み失敗（画面には合成行として出す）
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
