//! 比較結果の表示
//!
//! 検索で絞り込んでも行番号は元の位置のまま。

use crate::files::download_xlsx;
use leptos::prelude::*;
use skv_compare_common::{
    filter_comparisons, filter_extra_fields, ComparisonRow, Controller, ExtraFieldRow,
    InferenceKind, ParsedResult, Summary, DOWNLOAD_FILE_NAME,
};

#[component]
pub fn ResultsView(state: RwSignal<Controller>) -> impl IntoView {
    let result = Memo::new(move |_| state.with(|s| s.result().cloned()));
    let (search, set_search) = signal(String::new());

    // リセットで検索語も消す
    Effect::new(move |_| {
        if result.with(|r| r.is_none()) {
            set_search.set(String::new());
        }
    });

    view! {
        {move || result.get().map(|result| view! {
            <ResultsBody result=result search=search set_search=set_search />
        })}
    }
}

#[component]
fn ResultsBody(
    result: ParsedResult,
    search: ReadSignal<String>,
    set_search: WriteSignal<String>,
) -> impl IntoView {
    let summary = Summary::of(&result);
    let blob = result.blob.clone();
    let comparison = StoredValue::new(result.comparison);
    let extra_fields = StoredValue::new(result.extra_fields);

    let comparison_rows = move || {
        let term = search.get();
        comparison.with_value(|rows| {
            filter_comparisons(rows, term.trim())
                .into_iter()
                .map(|(index, row)| (index, row.clone()))
                .collect::<Vec<_>>()
        })
    };
    let extra_rows = move || {
        let term = search.get();
        extra_fields.with_value(|rows| {
            filter_extra_fields(rows, term.trim())
                .into_iter()
                .map(|(index, row)| (index, row.clone()))
                .collect::<Vec<_>>()
        })
    };

    let on_download = move |_| {
        if let Err(e) = download_xlsx(&blob, DOWNLOAD_FILE_NAME) {
            web_sys::console::error_1(&e);
        }
    };

    view! {
        <section class="results">
            <div class="summary">
                <span>{format!("{} clauses", summary.total)}</span>
                <span class="match">{format!("{} match", summary.matches)}</span>
                <span class="clarification">{format!("{} need clarification", summary.clarifications)}</span>
                <span class="conflict">{format!("{} conflict", summary.conflicts)}</span>
                <span>{format!("{} extra fields", summary.extra_fields)}</span>
            </div>

            <div class="results-toolbar">
                <input
                    type="search"
                    placeholder="Search results..."
                    prop:value=move || search.get()
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
                <button class="btn btn-secondary" on:click=on_download>
                    "Download Excel"
                </button>
            </div>

            <h2>"SKV vs Tender"</h2>
            <table class="results-table">
                <thead>
                    <tr>
                        <th>"#"</th>
                        <th>"SKV Standards"</th>
                        <th>"Tender Brief"</th>
                        <th>"Inference"</th>
                        <th>"Doc Name and Page Number"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || comparison_rows().into_iter().map(comparison_row).collect_view()}
                </tbody>
            </table>

            <h2>"Extra Tender Fields"</h2>
            <table class="results-table">
                <thead>
                    <tr>
                        <th>"#"</th>
                        <th>"Tender Brief Extra Field"</th>
                        <th>"Value"</th>
                        <th>"Doc Name and Page Number"</th>
                        <th>"Comment"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || extra_rows().into_iter().map(extra_field_row).collect_view()}
                </tbody>
            </table>
        </section>
    }
}

fn comparison_row((index, row): (usize, ComparisonRow)) -> impl IntoView {
    let kind = InferenceKind::classify(&row.inference);
    view! {
        <tr>
            <td>{index + 1}</td>
            <td>{row.skv_standard}</td>
            <td>{row.tender_brief}</td>
            <td class=format!("inference {}", kind.as_str())>{row.inference}</td>
            <td>{row.doc_reference}</td>
        </tr>
    }
}

fn extra_field_row((index, row): (usize, ExtraFieldRow)) -> impl IntoView {
    view! {
        <tr>
            <td>{index + 1}</td>
            <td>{row.extra_field}</td>
            <td>{row.value}</td>
            <td>{row.doc_reference}</td>
            <td>{row.comment}</td>
        </tr>
    }
}
