use leptos::prelude::*;
use skv_compare_common::Controller;

#[component]
pub fn Alerts(state: RwSignal<Controller>) -> impl IntoView {
    let error = move || state.with(|s| s.error().map(str::to_string));
    let success = move || state.with(|s| s.success().map(str::to_string));

    view! {
        {move || error().map(|message| view! {
            <div class="alert alert-error" role="alert">{message}</div>
        })}
        {move || success().map(|message| view! {
            <div class="alert alert-success">{message}</div>
        })}
    }
}
