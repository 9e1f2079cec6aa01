//! HTTP送信の抽象化
//!
//! CLI/プロキシはreqwest、WASMはfetch、テストはモックで実装する。

use crate::error::Result;
use crate::types::UploadedFile;
use std::time::Duration;

/// HTTPメソッド（このアプリで使うもののみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// multipartの1パート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub file: UploadedFile,
}

/// 送信リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// 空ならボディなし
    pub parts: Vec<FormPart>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            parts: Vec::new(),
        }
    }

    pub fn post_multipart(url: impl Into<String>, parts: Vec<FormPart>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            parts,
        }
    }
}

/// 受信レスポンス（ボディは読み切った状態）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// 2xxかどうか
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 5xxかどうか
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// HTTP送信と待機
///
/// リトライの待機もここを通す（モックでは記録のみ）。
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// リクエストを送信。通信自体の失敗は `Error::Network`
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;

    /// 指定時間待機
    async fn sleep(&self, duration: Duration);
}
