//! 比較結果のターミナル表示

use skv_compare_common::{
    filter_comparisons, filter_extra_fields, InferenceKind, ParsedResult, Summary,
};
use std::fmt::Write;

fn inference_mark(kind: InferenceKind) -> &'static str {
    match kind {
        InferenceKind::Match => "✅",
        InferenceKind::Clarification => "⚠",
        InferenceKind::Conflict => "❌",
    }
}

/// 件数サマリ
pub fn render_summary(summary: &Summary) -> String {
    format!(
        "比較 {}件（一致 {} / 要確認 {} / 相違 {}）、追加項目 {}件",
        summary.total, summary.matches, summary.clarifications, summary.conflicts, summary.extra_fields
    )
}

/// 両テーブルを整形（`search` が空なら全件）
pub fn render_tables(result: &ParsedResult, search: Option<&str>) -> String {
    let term = search.unwrap_or("").trim();
    let comparisons = filter_comparisons(&result.comparison, term);
    let extras = filter_extra_fields(&result.extra_fields, term);

    let mut out = String::new();

    let _ = writeln!(out, "■ 比較結果 ({}/{})", comparisons.len(), result.comparison.len());
    if comparisons.is_empty() {
        let _ = writeln!(out, "  該当なし");
    }
    for (index, row) in comparisons {
        let kind = InferenceKind::classify(&row.inference);
        let _ = writeln!(out, "#{} {} {}", index + 1, inference_mark(kind), row.inference);
        let _ = writeln!(out, "  SKV:    {}", row.skv_standard);
        let _ = writeln!(out, "  入札:   {}", row.tender_brief);
        let _ = writeln!(out, "  参照:   {}", row.doc_reference);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "■ 追加項目 ({}/{})", extras.len(), result.extra_fields.len());
    if extras.is_empty() {
        let _ = writeln!(out, "  該当なし");
    }
    for (index, row) in extras {
        let _ = writeln!(out, "#{} {}: {}", index + 1, row.extra_field, row.value);
        let _ = writeln!(out, "  参照:   {}", row.doc_reference);
        if !row.comment.is_empty() {
            let _ = writeln!(out, "  備考:   {}", row.comment);
        }
    }

    out
}
