//! 比較結果Excelのパーサー
//!
//! バックエンドが返すワークブックから2枚のシートを読み、型付きの行に変換する。
//! - 「SKV vs Tender」 → ComparisonRow
//! - 「Extra Tender Fields」 → ExtraFieldRow
//!
//! 失敗しても例外にはせず、エラーを示す合成行を1行だけ返す。

use crate::error::{Error, Result};
use crate::types::{ComparisonRow, ExtraFieldRow, ParsedResult};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::sync::Arc;

/// 比較シート名
pub const COMPARISON_SHEET: &str = "SKV vs Tender";

/// 追加項目シート名
pub const EXTRA_FIELDS_SHEET: &str = "Extra Tender Fields";

/// シートの列定義
///
/// ヘッダー行に4列すべての見出しがあれば見出し名で列を引く。
/// 1つでも欠けていれば先頭から順に0〜3列目とみなす。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub headers: [&'static str; 4],
}

/// 「SKV vs Tender」の列
pub const COMPARISON_COLUMNS: ColumnLayout = ColumnLayout {
    headers: ["SKV Standards", "Tender Brief", "Inference", "Doc Name and Page Number"],
};

/// 「Extra Tender Fields」の列
pub const EXTRA_FIELDS_COLUMNS: ColumnLayout = ColumnLayout {
    headers: ["Tender Brief Extra Field", "Value", "Doc Name and Page Number", "Comment"],
};

impl ColumnLayout {
    /// ヘッダー行から各フィールドの列番号を決める
    pub fn resolve(&self, header: &[String]) -> [usize; 4] {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let found: Vec<Option<usize>> = self.headers.iter().map(|&name| find(name)).collect();
        if let [Some(a), Some(b), Some(c), Some(d)] = found[..] {
            return [a, b, c, d];
        }

        if !header.iter().all(|h| h.is_empty()) {
            tracing::warn!(
                expected = ?self.headers,
                actual = ?header,
                "header row does not match expected columns, falling back to positional mapping"
            );
        }
        [0, 1, 2, 3]
    }
}

/// バイト列をパース（失敗時は合成エラー行）
///
/// # Arguments
/// * `blob` - バックエンドのレスポンスボディ
///
/// # Returns
/// 2シート分の行と、元のバイト列
pub fn parse_excel_response(blob: Arc<[u8]>) -> ParsedResult {
    match read_workbook(&blob) {
        Ok((comparison, extra_fields)) => ParsedResult {
            comparison,
            extra_fields,
            blob,
        },
        Err(e) => {
            tracing::error!(error = %e, "Error parsing Excel file");
            ParsedResult {
                comparison: vec![parse_error_row()],
                extra_fields: Vec::new(),
                blob,
            }
        }
    }
}

/// パース失敗を示す合成行
pub fn parse_error_row() -> ComparisonRow {
    ComparisonRow {
        skv_standard: "Unable to parse Excel file".into(),
        tender_brief: "Please download the file to view results".into(),
        inference: "❌ Parsing Error".into(),
        doc_reference: "N/A".into(),
    }
}

/// ワークブックから2シートを読む
pub fn read_workbook(blob: &[u8]) -> Result<(Vec<ComparisonRow>, Vec<ExtraFieldRow>)> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(blob))
        .map_err(|e| Error::Parse(e.to_string()))?;
    let sheet_names = workbook.sheet_names();

    let comparison = if sheet_names.iter().any(|n| n == COMPARISON_SHEET) {
        let range = workbook
            .worksheet_range(COMPARISON_SHEET)
            .map_err(|e| Error::Parse(format!("{}: {}", COMPARISON_SHEET, e)))?;
        comparison_rows(&range)
    } else {
        Vec::new()
    };

    let extra_fields = if sheet_names.iter().any(|n| n == EXTRA_FIELDS_SHEET) {
        let range = workbook
            .worksheet_range(EXTRA_FIELDS_SHEET)
            .map_err(|e| Error::Parse(format!("{}: {}", EXTRA_FIELDS_SHEET, e)))?;
        extra_field_rows(&range)
    } else {
        Vec::new()
    };

    Ok((comparison, extra_fields))
}

/// 比較シートの行を変換（1・2列目とも空の行は除外）
fn comparison_rows(range: &Range<Data>) -> Vec<ComparisonRow> {
    map_rows(range, &COMPARISON_COLUMNS)
        .into_iter()
        .map(|[skv_standard, tender_brief, inference, doc_reference]| ComparisonRow {
            skv_standard,
            tender_brief,
            inference,
            doc_reference,
        })
        .filter(|row| !row.skv_standard.is_empty() || !row.tender_brief.is_empty())
        .collect()
}

/// 追加項目シートの行を変換（1列目が空の行は除外）
fn extra_field_rows(range: &Range<Data>) -> Vec<ExtraFieldRow> {
    map_rows(range, &EXTRA_FIELDS_COLUMNS)
        .into_iter()
        .map(|[extra_field, value, doc_reference, comment]| ExtraFieldRow {
            extra_field,
            value,
            doc_reference,
            comment,
        })
        .filter(|row| !row.extra_field.is_empty())
        .collect()
}

/// シートの1行目（ヘッダー）を捨て、各行を4列の文字列に変換
fn map_rows(range: &Range<Data>, layout: &ColumnLayout) -> Vec<[String; 4]> {
    // 使用範囲がA1から始まらない場合も行・列はA1=(0,0)で数える
    let (start_row, start_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    let absolute = |row: &[Data]| -> Vec<String> {
        std::iter::repeat(String::new())
            .take(start_col)
            .chain(row.iter().map(cell_text))
            .collect()
    };

    let mut rows = range.rows();
    // 1行目が空なら使用範囲は2行目以降から始まり、ヘッダーはない
    let header = if start_row == 0 {
        match rows.next() {
            Some(header) => absolute(header),
            None => return Vec::new(),
        }
    } else {
        Vec::new()
    };
    let columns = layout.resolve(&header);

    rows.map(|row| {
        let cells = absolute(row);
        let cell = |idx: usize| cells.get(idx).cloned().unwrap_or_default();
        [cell(columns[0]), cell(columns[1]), cell(columns[2]), cell(columns[3])]
    })
    .collect()
}

/// セル値を文字列に変換
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
