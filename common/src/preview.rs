//! 結果プレビュー用の集計と検索

use crate::types::{ComparisonRow, ExtraFieldRow, ParsedResult};
use serde::Serialize;

/// ダウンロード時のファイル名
pub const DOWNLOAD_FILE_NAME: &str = "SKV_Tender_Comparison_Result.xlsx";

/// 判定の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InferenceKind {
    Match,
    Clarification,
    Conflict,
}

impl InferenceKind {
    /// 判定ラベルから分類（"Match" → "Clarification" の順に部分一致、それ以外は Conflict）
    pub fn classify(inference: &str) -> Self {
        if inference.contains("Match") {
            InferenceKind::Match
        } else if inference.contains("Clarification") {
            InferenceKind::Clarification
        } else {
            InferenceKind::Conflict
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceKind::Match => "match",
            InferenceKind::Clarification => "clarification",
            InferenceKind::Conflict => "conflict",
        }
    }
}

/// 件数サマリ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub matches: usize,
    pub clarifications: usize,
    pub conflicts: usize,
    pub extra_fields: usize,
}

impl Summary {
    pub fn of(result: &ParsedResult) -> Self {
        let mut summary = Summary {
            total: result.comparison.len(),
            extra_fields: result.extra_fields.len(),
            ..Default::default()
        };

        for row in &result.comparison {
            match InferenceKind::classify(&row.inference) {
                InferenceKind::Match => summary.matches += 1,
                InferenceKind::Clarification => summary.clarifications += 1,
                InferenceKind::Conflict => summary.conflicts += 1,
            }
        }

        summary
    }
}

fn matches_term(fields: [&str; 4], needle: &str) -> bool {
    fields.iter().any(|f| f.to_lowercase().contains(needle))
}

/// 比較行を検索（大文字小文字を区別しない部分一致）
///
/// 返すインデックスは元の行番号。絞り込んでも表示番号は変わらない。
pub fn filter_comparisons<'a>(rows: &'a [ComparisonRow], term: &str) -> Vec<(usize, &'a ComparisonRow)> {
    let needle = term.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| matches_term(row.fields(), &needle))
        .collect()
}

/// 追加項目を検索
pub fn filter_extra_fields<'a>(rows: &'a [ExtraFieldRow], term: &str) -> Vec<(usize, &'a ExtraFieldRow)> {
    let needle = term.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| matches_term(row.fields(), &needle))
        .collect()
}
