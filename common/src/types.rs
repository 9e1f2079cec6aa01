//! 比較結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - UploadedFile: ユーザーが選択したファイル
//! - ComparisonRow: 「SKV vs Tender」シートの1行
//! - ExtraFieldRow: 「Extra Tender Fields」シートの1行
//! - ParsedResult: パース済みの2シート + ダウンロード用の元データ

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 選択されたファイル（作成後は不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub content: Arc<[u8]>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, content: Vec<u8>) -> Self {
        let size = content.len() as u64;
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
            content: content.into(),
        }
    }
}

/// 比較シートの行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonRow {
    pub skv_standard: String,     // SKV規格の条項
    pub tender_brief: String,     // 入札資料の条項
    pub inference: String,        // 判定ラベル
    pub doc_reference: String,    // 資料名・ページ
}

impl ComparisonRow {
    pub fn fields(&self) -> [&str; 4] {
        [
            self.skv_standard.as_str(),
            self.tender_brief.as_str(),
            self.inference.as_str(),
            self.doc_reference.as_str(),
        ]
    }
}

/// 追加項目シートの行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraFieldRow {
    pub extra_field: String,
    pub value: String,
    pub doc_reference: String,
    pub comment: String,
}

impl ExtraFieldRow {
    pub fn fields(&self) -> [&str; 4] {
        [
            self.extra_field.as_str(),
            self.value.as_str(),
            self.doc_reference.as_str(),
            self.comment.as_str(),
        ]
    }
}

/// パース結果
///
/// `blob` はバックエンドから受け取ったバイト列そのもの。
/// ダウンロード時に無加工で書き出す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResult {
    pub comparison: Vec<ComparisonRow>,
    pub extra_fields: Vec<ExtraFieldRow>,
    #[serde(skip)]
    pub blob: Arc<[u8]>,
}
