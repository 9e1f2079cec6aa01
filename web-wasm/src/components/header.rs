//! ヘッダーコンポーネント（バックエンドの状態表示つき）

use leptos::prelude::*;
use skv_compare_common::Controller;

#[component]
pub fn Header(state: RwSignal<Controller>) -> impl IntoView {
    let status = move || {
        state.with(|s| {
            let health = s.health();
            if health.is_loading {
                ("checking", "Checking backend...".to_string())
            } else if health.is_healthy {
                ("online", "Backend online".to_string())
            } else {
                let label = match health.error.as_deref() {
                    Some(reason) => format!("Backend offline ({})", reason),
                    None => "Backend offline".to_string(),
                };
                ("offline", label)
            }
        })
    };

    view! {
        <header class="header">
            <h1>"SKV vs Tender Comparator"</h1>
            <p class="text-muted">"Upload the SKV standards and the tender document to compare them clause by clause."</p>
            <span class=move || format!("health-badge {}", status().0)>
                {move || status().1}
            </span>
        </header>
    }
}
