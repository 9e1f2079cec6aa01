//! ファイル選択欄

use crate::files::read_upload;
use leptos::prelude::*;
use leptos::task::spawn_local;
use skv_compare_common::{format_file_size, Controller, FileSlot, UploadedFile, Phase};
use web_sys::HtmlInputElement;

#[component]
pub fn UploadSlot<F>(
    slot: FileSlot,
    label: &'static str,
    state: RwSignal<Controller>,
    on_file: F,
) -> impl IntoView
where
    F: Fn(Result<UploadedFile, String>) + 'static + Clone,
{
    let selected = move || {
        state.with(|s| s.file(slot).map(|f| (f.name.clone(), format_file_size(f.size))))
    };
    // 処理中と結果表示中は選び直せない
    let is_locked = move || {
        state.with(|s| matches!(s.phase(), Phase::Processing | Phase::Succeeded(_)))
    };

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // 同じファイルを選び直せるように値を消す
        input.set_value("");

        let on_file = on_file.clone();
        // 型とサイズは読み込み前に確認される
        spawn_local(async move { on_file(read_upload(file).await) });
    };

    view! {
        <label class=move || if selected().is_some() { "upload-slot selected" } else { "upload-slot" }>
            <span class="upload-label">{label}</span>
            <input
                type="file"
                accept=".xlsx,.xls"
                name=slot.field_name()
                disabled=is_locked
                on:change=on_change
            />
            {move || match selected() {
                Some((name, size)) => view! {
                    <span class="file-name">{name}</span>
                    <span class="text-muted">{size}</span>
                }.into_any(),
                None => view! {
                    <span class="text-muted">"Choose an .xlsx or .xls file (max 10MB)"</span>
                }.into_any(),
            }}
        </label>
    }
}
