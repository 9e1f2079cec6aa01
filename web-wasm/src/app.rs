//! メインアプリケーションコンポーネント
//!
//! 状態はすべて `Controller` が持ち、ここでは効果（送信・タイマー）を実行するだけ。

use crate::components::{
    alerts::Alerts,
    header::Header,
    progress_bar::ProgressBar,
    results_view::ResultsView,
    upload_slot::UploadSlot,
};
use crate::transport::FetchTransport;
use gloo::timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use skv_compare_common::progress::TICK_INTERVAL;
use skv_compare_common::{
    build_comparison_request, check_health, Controller, Effect, Event, FileSlot, Transport,
    UploadedFile,
};

/// 比較API（同一オリジンのプロキシ）
fn compare_url() -> &'static str {
    option_env!("SKV_COMPARE_URL").unwrap_or("/api/compare")
}

/// 死活確認先
fn health_url() -> &'static str {
    option_env!("SKV_HEALTH_URL").unwrap_or("http://localhost:5000")
}

/// ファイル選択の結果をイベントにする
fn selection_event(slot: FileSlot, outcome: Result<UploadedFile, String>) -> Event {
    match outcome {
        Ok(file) => Event::FileSelected { slot, file },
        Err(message) => Event::FileRejected(message),
    }
}

/// イベントをコントローラへ流し、返ってきた効果を実行する
#[derive(Clone, Copy)]
pub struct Dispatcher {
    pub state: RwSignal<Controller>,
    /// 進行中のタイマーの世代（変われば古いタイマーは止まる）
    timer: StoredValue<u64>,
}

impl Dispatcher {
    fn new() -> Self {
        Self {
            state: RwSignal::new(Controller::new()),
            timer: StoredValue::new(0),
        }
    }

    pub fn dispatch(self, event: Event) {
        let effects = self
            .state
            .try_update(|current| {
                let transition = std::mem::take(current).handle(event);
                *current = transition.state;
                transition.effects
            })
            .unwrap_or_default();

        for effect in effects {
            self.run(effect);
        }
    }

    fn run(self, effect: Effect) {
        match effect {
            Effect::StartProgressTimer => {
                self.timer.update_value(|g| *g += 1);
                let generation = self.timer.get_value();
                spawn_local(async move {
                    loop {
                        TimeoutFuture::new(TICK_INTERVAL.as_millis() as u32).await;
                        if self.timer.try_get_value() != Some(generation) {
                            break;
                        }
                        self.dispatch(Event::ProgressTick);
                    }
                });
            }
            Effect::StopProgressTimer => self.timer.update_value(|g| *g += 1),
            Effect::SendComparison { skv, tender } => {
                spawn_local(async move {
                    let request = build_comparison_request(compare_url(), skv, tender);
                    let event = match FetchTransport.send(&request).await {
                        Ok(response) => Event::ResponseReceived(response),
                        Err(e) => Event::RequestFailed(e.to_string()),
                    };
                    self.dispatch(event);
                });
            }
        }
    }

    fn check_backend(self) {
        spawn_local(async move {
            let status = check_health(&FetchTransport, health_url()).await;
            self.dispatch(Event::HealthChanged(status));
        });
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let dispatcher = Dispatcher::new();
    let state = dispatcher.state;
    dispatcher.check_backend();

    let is_processing = Memo::new(move |_| state.with(|s| s.is_processing()));
    let can_submit = Memo::new(move |_| state.with(|s| s.can_submit()));
    let can_reset = Memo::new(move |_| state.with(|s| s.can_reset()));
    let progress = Signal::derive(move || state.with(|s| s.progress()));

    let on_select = move |slot: FileSlot| {
        move |outcome: Result<UploadedFile, String>| dispatcher.dispatch(selection_event(slot, outcome))
    };

    view! {
        <div class="container">
            <Header state=state />

            <div class="upload-grid">
                <UploadSlot
                    slot=FileSlot::Skv
                    label="SKV Standards"
                    state=state
                    on_file=on_select(FileSlot::Skv)
                />
                <UploadSlot
                    slot=FileSlot::Tender
                    label="Tender Document"
                    state=state
                    on_file=on_select(FileSlot::Tender)
                />
            </div>

            <div class="actions">
                <button
                    class="btn btn-primary"
                    disabled=move || !can_submit.get()
                    on:click=move |_| dispatcher.dispatch(Event::Submit)
                >
                    {move || if is_processing.get() { "Processing..." } else { "Compare Documents" }}
                </button>

                <Show when=move || can_reset.get()>
                    <button
                        class="btn btn-secondary"
                        on:click=move |_| dispatcher.dispatch(Event::Reset)
                    >
                        "Reset"
                    </button>
                </Show>
            </div>

            <Show when=move || is_processing.get()>
                <ProgressBar progress=progress />
            </Show>

            <Alerts state=state />

            <ResultsView state=state />
        </div>
    }
}
