use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Common(#[from] skv_compare_common::Error),

    #[error("HTTPクライアントエラー: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("サーバエラー: {0}")]
    Server(String),

    #[error("比較に失敗しました: {0}")]
    Comparison(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CompareError>;
