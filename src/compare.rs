//! CLIからの比較実行
//!
//! 画面と同じコントローラを駆動し、効果（送信・タイマー）をtokioで実行する。

use crate::error::{CompareError, Result};
use skv_compare_common::progress::TICK_INTERVAL;
use skv_compare_common::{
    build_comparison_request, check_health, content_type_for_path, fetch_with_retry, Controller,
    Effect, Event, FileSlot, Phase, RetryOptions, Transport, UploadedFile,
};
use std::path::Path;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// 送信先の設定
#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub url: String,
    pub health_url: String,
    pub retry: RetryOptions,
}

/// ローカルファイルをアップロード用に読み込む
pub fn load_upload(path: &Path) -> Result<UploadedFile> {
    if !path.exists() {
        return Err(CompareError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(UploadedFile::new(name, content_type_for_path(path), content))
}

/// 2ファイルの比較を最後まで実行
///
/// `on_progress` にはタイマー毎の進捗（0-100）が渡される。
/// 成功時は結果を保持したコントローラを返す。
pub async fn run_comparison<T, F>(
    transport: &T,
    options: &CompareOptions,
    skv: UploadedFile,
    tender: UploadedFile,
    mut on_progress: F,
) -> Result<Controller>
where
    T: Transport,
    F: FnMut(u8),
{
    let health = check_health(transport, &options.health_url).await;
    tracing::debug!(?health, "health check finished");
    let mut state = Controller::new().handle(Event::HealthChanged(health)).state;

    for (slot, file) in [(FileSlot::Skv, skv), (FileSlot::Tender, tender)] {
        state = state.handle(Event::FileSelected { slot, file }).state;
        if let Some(message) = state.error() {
            return Err(CompareError::Comparison(message.to_string()));
        }
    }

    let transition = state.handle(Event::Submit);
    state = transition.state;
    if let Some(message) = state.error() {
        return Err(CompareError::Comparison(message.to_string()));
    }

    let Some((skv, tender)) = transition.effects.into_iter().find_map(|effect| match effect {
        Effect::SendComparison { skv, tender } => Some((skv, tender)),
        _ => None,
    }) else {
        return Err(CompareError::Comparison("送信が開始されませんでした".into()));
    };

    let request = build_comparison_request(&options.url, skv, tender);
    let send = fetch_with_retry(transport, &request, options.retry);
    tokio::pin!(send);

    let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    on_progress(state.progress());

    let outcome = loop {
        tokio::select! {
            biased;
            outcome = &mut send => break outcome,
            _ = ticker.tick() => {
                state = state.handle(Event::ProgressTick).state;
                on_progress(state.progress());
            }
        }
    };

    let event = match outcome {
        Ok(response) => Event::ResponseReceived(response),
        Err(e) => Event::RequestFailed(e.to_string()),
    };
    state = state.handle(event).state;

    if let Phase::Failed(message) = state.phase() {
        return Err(CompareError::Comparison(message.clone()));
    }
    on_progress(state.progress());
    Ok(state)
}
