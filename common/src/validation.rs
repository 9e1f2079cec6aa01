//! アップロードファイルの検証
//!
//! ブラウザ（またはCLI）が申告したMIMEタイプとサイズのみを見る。
//! 中身の判定はしないので、拡張子を偽ったファイルはパース時に失敗する。

use crate::error::ValidationError;
use std::path::Path;

/// .xlsx のMIMEタイプ
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// .xls のMIMEタイプ
pub const XLS_MIME: &str = "application/vnd.ms-excel";

/// 受け付けるMIMEタイプ
pub const ALLOWED_TYPES: &[&str] = &[XLSX_MIME, XLS_MIME];

/// 上限サイズ（MB）
pub const MAX_SIZE_MB: u64 = 10;

/// 上限サイズ（バイト）。ちょうど上限は許可
pub const MAX_SIZE_BYTES: u64 = MAX_SIZE_MB * 1024 * 1024;

/// ファイルを検証
///
/// # Arguments
/// * `content_type` - 申告されたMIMEタイプ
/// * `size` - バイト数
///
/// # Returns
/// * `Ok(())` - 受付可
/// * `Err(ValidationError)` - 形式外、またはサイズ超過
pub fn validate_excel_file(content_type: &str, size: u64) -> Result<(), ValidationError> {
    if !ALLOWED_TYPES.contains(&content_type) {
        return Err(ValidationError::UnsupportedType);
    }

    if size > MAX_SIZE_BYTES {
        return Err(ValidationError::TooLarge { limit_mb: MAX_SIZE_MB });
    }

    Ok(())
}

/// ファイルサイズを表示用に整形（KB/MB、小数2桁）
pub fn format_file_size(size_in_bytes: u64) -> String {
    let kb = size_in_bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{:.2} KB", kb)
    } else {
        format!("{:.2} MB", kb / 1024.0)
    }
}

/// 拡張子からMIMEタイプを推定
///
/// CLIにはブラウザの申告がないため、拡張子で代用する。
/// 対象外の拡張子は `application/octet-stream` となり検証で弾かれる。
pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" => XLSX_MIME,
        "xls" => XLS_MIME,
        _ => "application/octet-stream",
    }
}
