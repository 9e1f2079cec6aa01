//! ブラウザのファイル入出力

use crate::transport::{bytes_to_blob, js_message};
use js_sys::Uint8Array;
use skv_compare_common::{validate_excel_file, UploadedFile, ValidationError, XLSX_MIME};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlAnchorElement, Url};

/// ブラウザが申告した型とサイズで検証（中身は読まない）
pub fn check_declared(content_type: &str, size: f64) -> Result<(), ValidationError> {
    // f64→u64は飽和変換、端数は切り上げ
    validate_excel_file(content_type, size.ceil() as u64)
}

/// 選択されたFileを検証してから読み込む
///
/// 失敗時は画面に出すメッセージを返す。
pub async fn read_upload(file: File) -> Result<UploadedFile, String> {
    check_declared(&file.type_(), file.size()).map_err(|e| e.to_string())?;

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| read_error_message(&e))?;
    let content = Uint8Array::new(&buffer).to_vec();
    Ok(UploadedFile::new(file.name(), file.type_(), content))
}

fn read_error_message(value: &JsValue) -> String {
    match js_message(value) {
        Some(reason) => format!("Failed to read file: {}", reason),
        None => "Failed to read file".to_string(),
    }
}

/// 受け取ったままのExcelをダウンロードさせる
pub fn download_xlsx(bytes: &[u8], file_name: &str) -> Result<(), JsValue> {
    let blob = bytes_to_blob(bytes, XLSX_MIME)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is not available"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url)
}
