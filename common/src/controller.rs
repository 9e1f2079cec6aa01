//! 画面の状態遷移
//!
//! 状態は `Controller` 1つにまとめ、イベントを受けて
//! 「次の状態 + 実行すべき副作用」を返す純粋関数で遷移する。
//! 通信やタイマーの実行は呼び出し側（CLI / WASM）が担う。
//!
//! ```text
//! Idle ─FileSelected→ FilesSelected ─Submit→ Processing ─┬→ Succeeded
//!   ↑                                                    └→ Failed
//!   └──────────────────────── Reset ─────────────────────────┘
//! ```

use crate::health::HealthStatus;
use crate::parser::parse_excel_response;
use crate::progress::FakeProgress;
use crate::transport::{FormPart, HttpRequest, HttpResponse};
use crate::types::{ParsedResult, UploadedFile};
use crate::validation::{validate_excel_file, XLSX_MIME};

/// multipartのフィールド名（SKV）
pub const SKV_FIELD: &str = "skv_file";

/// multipartのフィールド名（入札資料）
pub const TENDER_FIELD: &str = "tender_file";

pub const MSG_MISSING_FILES: &str = "Please upload both files before processing.";
pub const MSG_BACKEND_OFFLINE: &str = "Backend is offline";
pub const MSG_UNEXPECTED_FORMAT: &str = "Unexpected response format";
pub const MSG_SUCCESS: &str =
    "Analysis completed successfully! You can now preview and download the results.";

/// ファイルの置き場所
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot {
    Skv,
    Tender,
}

impl FileSlot {
    pub fn field_name(&self) -> &'static str {
        match self {
            FileSlot::Skv => SKV_FIELD,
            FileSlot::Tender => TENDER_FIELD,
        }
    }
}

/// 画面のフェーズ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    FilesSelected,
    Processing,
    Succeeded(ParsedResult),
    Failed(String),
}

/// 入力イベント
#[derive(Debug, Clone)]
pub enum Event {
    FileSelected { slot: FileSlot, file: UploadedFile },
    /// 読み込む前に弾いたファイル（型・サイズ違反や読み込み失敗）
    FileRejected(String),
    HealthChanged(HealthStatus),
    Submit,
    ProgressTick,
    ResponseReceived(HttpResponse),
    RequestFailed(String),
    Reset,
}

/// 呼び出し側が実行する副作用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartProgressTimer,
    StopProgressTimer,
    SendComparison { skv: UploadedFile, tender: UploadedFile },
}

/// 遷移結果
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: Controller,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn new(state: Controller) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: Controller, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

/// 画面状態
#[derive(Debug, Clone, Default)]
pub struct Controller {
    skv_file: Option<UploadedFile>,
    tender_file: Option<UploadedFile>,
    phase: Phase,
    progress: FakeProgress,
    error: Option<String>,
    success: Option<String>,
    health: HealthStatus,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn file(&self, slot: FileSlot) -> Option<&UploadedFile> {
        match slot {
            FileSlot::Skv => self.skv_file.as_ref(),
            FileSlot::Tender => self.tender_file.as_ref(),
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress.value()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn health(&self) -> &HealthStatus {
        &self.health
    }

    pub fn is_processing(&self) -> bool {
        self.phase == Phase::Processing
    }

    pub fn result(&self) -> Option<&ParsedResult> {
        match &self.phase {
            Phase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// 送信ボタンを有効にできるか
    pub fn can_submit(&self) -> bool {
        self.skv_file.is_some()
            && self.tender_file.is_some()
            && self.health.is_healthy
            && matches!(self.phase, Phase::FilesSelected | Phase::Failed(_))
    }

    /// リセットボタンを出せるか
    pub fn can_reset(&self) -> bool {
        !self.is_processing()
            && (self.skv_file.is_some() || self.tender_file.is_some() || self.result().is_some())
    }

    /// イベントを適用
    pub fn handle(mut self, event: Event) -> Transition {
        match event {
            Event::FileSelected { slot, file } => self.on_file_selected(slot, file),
            Event::FileRejected(message) => {
                if !matches!(self.phase, Phase::Succeeded(_)) {
                    self.error = Some(message);
                    self.success = None;
                }
                Transition::new(self)
            }
            Event::HealthChanged(status) => {
                self.health = status;
                Transition::new(self)
            }
            Event::Submit => self.on_submit(),
            Event::ProgressTick => {
                if self.is_processing() {
                    self.progress.tick();
                }
                Transition::new(self)
            }
            Event::ResponseReceived(response) => self.on_response(response),
            Event::RequestFailed(message) => {
                if !self.is_processing() {
                    return Transition::new(self);
                }
                self.fail(message);
                Transition::with(self, vec![Effect::StopProgressTimer])
            }
            Event::Reset => Transition::new(Controller {
                health: self.health,
                ..Controller::default()
            }),
        }
    }

    fn on_file_selected(mut self, slot: FileSlot, file: UploadedFile) -> Transition {
        // 結果表示中はリセットしてから選び直す
        if matches!(self.phase, Phase::Succeeded(_)) {
            return Transition::new(self);
        }

        if let Err(e) = validate_excel_file(&file.content_type, file.size) {
            self.error = Some(e.to_string());
            return Transition::new(self);
        }

        match slot {
            FileSlot::Skv => self.skv_file = Some(file),
            FileSlot::Tender => self.tender_file = Some(file),
        }
        self.error = None;
        self.success = None;
        if !self.is_processing() {
            self.phase = Phase::FilesSelected;
        }
        Transition::new(self)
    }

    fn on_submit(mut self) -> Transition {
        if self.is_processing() || matches!(self.phase, Phase::Succeeded(_)) {
            return Transition::new(self);
        }

        let (Some(skv), Some(tender)) = (self.skv_file.clone(), self.tender_file.clone()) else {
            self.error = Some(MSG_MISSING_FILES.into());
            return Transition::new(self);
        };

        if !self.health.is_healthy {
            self.error = Some(MSG_BACKEND_OFFLINE.into());
            return Transition::new(self);
        }

        self.phase = Phase::Processing;
        self.progress.reset();
        self.error = None;
        self.success = None;

        Transition::with(
            self,
            vec![Effect::StartProgressTimer, Effect::SendComparison { skv, tender }],
        )
    }

    fn on_response(mut self, response: HttpResponse) -> Transition {
        // リセット後に届いたレスポンスは捨てる
        if !self.is_processing() {
            return Transition::new(self);
        }
        let effects = vec![Effect::StopProgressTimer];

        if !response.is_success() {
            self.fail(format!("HTTP error! status: {}", response.status));
            return Transition::with(self, effects);
        }

        let is_excel = response
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains(XLSX_MIME));
        if !is_excel {
            self.fail(MSG_UNEXPECTED_FORMAT.into());
            return Transition::with(self, effects);
        }

        let parsed = parse_excel_response(response.body.into());
        self.phase = Phase::Succeeded(parsed);
        self.progress.complete();
        self.success = Some(MSG_SUCCESS.into());
        Transition::with(self, effects)
    }

    /// 失敗に遷移（プログレスは止まった位置のまま）
    fn fail(&mut self, message: String) {
        tracing::warn!(error = %message, "comparison failed");
        self.error = Some(message.clone());
        self.phase = Phase::Failed(message);
    }
}

/// 2ファイルをmultipartにまとめたリクエストを作る
pub fn build_comparison_request(url: &str, skv: UploadedFile, tender: UploadedFile) -> HttpRequest {
    HttpRequest::post_multipart(
        url,
        vec![
            FormPart {
                name: SKV_FIELD.into(),
                file: skv,
            },
            FormPart {
                name: TENDER_FIELD.into(),
                file: tender,
            },
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{fetch_with_retry, RetryOptions};
    use crate::transport::mock::MockTransport;
    use crate::transport::Method;
    use crate::validation::XLS_MIME;
    use futures::executor::block_on;
    use rust_xlsxwriter::Workbook;
    use std::time::Duration;

    fn xlsx_file(name: &str) -> UploadedFile {
        UploadedFile::new(name, XLSX_MIME, vec![0x50, 0x4b, 0x03, 0x04])
    }

    fn ready() -> Controller {
        let mut state = Controller::new();
        for event in [
            Event::HealthChanged(HealthStatus::healthy()),
            Event::FileSelected { slot: FileSlot::Skv, file: xlsx_file("Standard.xlsx") },
            Event::FileSelected { slot: FileSlot::Tender, file: xlsx_file("Topsheet.xlsx") },
        ] {
            state = state.handle(event).state;
        }
        state
    }

    fn processing() -> Controller {
        ready().handle(Event::Submit).state
    }

    fn result_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("SKV vs Tender").unwrap();
        let rows = [
            ["SKV Standards", "Tender Brief", "Inference", "Doc Name and Page Number"],
            ["Payment in 30 days", "Payment in 30 days", "✅ Match", "Tender p.2"],
            ["Liability capped", "Unlimited liability", "❌ Conflict", "Tender p.5"],
            ["Insurance", "Insurance TBD", "⚠️ Needs Clarification", "Tender p.7"],
        ];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name("Extra Tender Fields").unwrap();
        let rows = [
            ["Tender Brief Extra Field", "Value", "Doc Name and Page Number", "Comment"],
            ["Site visit", "Mandatory", "Tender p.1", "Not in SKV"],
            ["Bid bond", "2%", "Tender p.3", "Not in SKV"],
        ];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }

        workbook.save_to_buffer().unwrap()
    }

    fn excel_response(body: Vec<u8>) -> HttpResponse {
        HttpResponse {
            status: 200,
            content_type: Some(XLSX_MIME.into()),
            body,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = Controller::new();
        assert_eq!(state.phase(), &Phase::Idle);
        assert_eq!(state.progress(), 0);
        assert!(state.health().is_loading);
        assert!(!state.can_submit());
    }

    #[test]
    fn test_invalid_file_is_not_stored() {
        let file = UploadedFile::new("notes.csv", "text/csv", vec![1, 2, 3]);
        let t = Controller::new().handle(Event::FileSelected { slot: FileSlot::Skv, file });

        assert!(t.state.file(FileSlot::Skv).is_none());
        assert_eq!(t.state.error(), Some("Only .xlsx or .xls files are allowed."));
        assert_eq!(t.state.phase(), &Phase::Idle);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_too_large_file_is_rejected() {
        let file = UploadedFile::new("big.xls", XLS_MIME, vec![0u8; 10 * 1024 * 1024 + 1]);
        let t = Controller::new().handle(Event::FileSelected { slot: FileSlot::Tender, file });

        assert!(t.state.file(FileSlot::Tender).is_none());
        assert!(t.state.error().unwrap().contains("10MB"));
    }

    #[test]
    fn test_rejected_file_keeps_previous_selection() {
        let state = ready()
            .handle(Event::FileRejected("File must be smaller than 10MB.".into()))
            .state;

        assert_eq!(state.error(), Some("File must be smaller than 10MB."));
        assert_eq!(state.file(FileSlot::Skv).unwrap().name, "Standard.xlsx");
        assert_eq!(state.phase(), &Phase::FilesSelected);
        assert!(state.can_submit());
    }

    #[test]
    fn test_rejected_file_is_ignored_while_showing_results() {
        let mut state = processing();
        state.phase = Phase::Succeeded(ParsedResult {
            comparison: Vec::new(),
            extra_fields: Vec::new(),
            blob: Vec::new().into(),
        });
        let state = state.handle(Event::FileRejected("Failed to read file".into())).state;

        assert!(state.error().is_none());
        assert!(state.result().is_some());
    }

    #[test]
    fn test_valid_file_clears_error() {
        let bad = UploadedFile::new("notes.csv", "text/csv", vec![]);
        let state = Controller::new()
            .handle(Event::FileSelected { slot: FileSlot::Skv, file: bad })
            .state
            .handle(Event::FileSelected { slot: FileSlot::Skv, file: xlsx_file("a.xlsx") })
            .state;

        assert!(state.error().is_none());
        assert_eq!(state.phase(), &Phase::FilesSelected);
        assert_eq!(state.file(FileSlot::Skv).unwrap().name, "a.xlsx");
    }

    #[test]
    fn test_submit_without_both_files() {
        let state = Controller::new()
            .handle(Event::HealthChanged(HealthStatus::healthy()))
            .state
            .handle(Event::FileSelected { slot: FileSlot::Skv, file: xlsx_file("a.xlsx") })
            .state;

        let t = state.handle(Event::Submit);

        assert_eq!(t.state.error(), Some(MSG_MISSING_FILES));
        assert_eq!(t.state.phase(), &Phase::FilesSelected);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_submit_requires_healthy_backend() {
        let state = ready()
            .handle(Event::HealthChanged(HealthStatus::unhealthy("connection refused")))
            .state;
        assert!(!state.can_submit());

        let t = state.handle(Event::Submit);

        assert_eq!(t.state.error(), Some(MSG_BACKEND_OFFLINE));
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_submit_starts_processing() {
        let state = ready();
        assert!(state.can_submit());

        let t = state.handle(Event::Submit);

        assert!(t.state.is_processing());
        assert_eq!(t.state.progress(), 0);
        assert_eq!(t.effects.len(), 2);
        assert_eq!(t.effects[0], Effect::StartProgressTimer);
        match &t.effects[1] {
            Effect::SendComparison { skv, tender } => {
                assert_eq!(skv.name, "Standard.xlsx");
                assert_eq!(tender.name, "Topsheet.xlsx");
            }
            other => panic!("unexpected effect: {:?}", other),
        }
    }

    #[test]
    fn test_second_submit_is_ignored_while_processing() {
        let t = processing().handle(Event::Submit);
        assert!(t.state.is_processing());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_ticks_stop_below_completion() {
        let mut state = processing();
        for _ in 0..100 {
            state = state.handle(Event::ProgressTick).state;
        }
        assert_eq!(state.progress(), 90);
    }

    #[test]
    fn test_tick_outside_processing_is_ignored() {
        let state = ready().handle(Event::ProgressTick).state;
        assert_eq!(state.progress(), 0);
    }

    #[test]
    fn test_http_error_fails_and_keeps_progress() {
        let mut state = processing();
        for _ in 0..5 {
            state = state.handle(Event::ProgressTick).state;
        }

        let t = state.handle(Event::ResponseReceived(HttpResponse {
            status: 500,
            content_type: None,
            body: vec![],
        }));

        assert_eq!(t.state.phase(), &Phase::Failed("HTTP error! status: 500".into()));
        assert_eq!(t.state.error(), Some("HTTP error! status: 500"));
        assert_eq!(t.state.progress(), 15);
        assert_eq!(t.effects, vec![Effect::StopProgressTimer]);
    }

    #[test]
    fn test_unexpected_content_type_fails() {
        let t = processing().handle(Event::ResponseReceived(HttpResponse {
            status: 200,
            content_type: Some("application/json".into()),
            body: b"{}".to_vec(),
        }));

        assert_eq!(t.state.phase(), &Phase::Failed(MSG_UNEXPECTED_FORMAT.into()));
    }

    #[test]
    fn test_request_failed() {
        let t = processing().handle(Event::RequestFailed("connection refused".into()));

        assert_eq!(t.state.phase(), &Phase::Failed("connection refused".into()));
        assert_eq!(t.effects, vec![Effect::StopProgressTimer]);
        // 失敗後は再送信できる
        assert!(t.state.can_submit());
    }

    #[test]
    fn test_reset_clears_everything_but_health() {
        let state = processing()
            .handle(Event::ResponseReceived(excel_response(result_workbook())))
            .state;
        assert!(state.result().is_some());

        let state = state.handle(Event::Reset).state;

        assert_eq!(state.phase(), &Phase::Idle);
        assert!(state.file(FileSlot::Skv).is_none());
        assert!(state.file(FileSlot::Tender).is_none());
        assert!(state.error().is_none());
        assert!(state.success().is_none());
        assert_eq!(state.progress(), 0);
        assert!(state.health().is_healthy);
    }

    #[test]
    fn test_response_after_reset_is_ignored() {
        let state = processing().handle(Event::Reset).state;

        let t = state.handle(Event::ResponseReceived(excel_response(result_workbook())));

        assert_eq!(t.state.phase(), &Phase::Idle);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_build_comparison_request() {
        let request = build_comparison_request(
            "http://localhost:5000/api/compare",
            xlsx_file("s.xlsx"),
            xlsx_file("t.xlsx"),
        );

        assert_eq!(request.method, Method::Post);
        let names: Vec<&str> = request.parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["skv_file", "tender_file"]);
        assert_eq!(request.parts[1].file.name, "t.xlsx");
    }

    /// 送信→リトライ付き取得→パース→表示までの通し
    #[test]
    fn test_end_to_end_with_mock_backend() {
        let body = result_workbook();
        let transport = MockTransport::with_replies(vec![
            MockTransport::status(503),
            Ok(excel_response(body.clone())),
        ]);
        let options = RetryOptions {
            max_retries: 3,
            delay: Duration::from_millis(1),
        };

        let t = ready().handle(Event::Submit);
        let mut state = t.state;
        assert!(state.is_processing());

        let mut events = Vec::new();
        for effect in t.effects {
            if let Effect::SendComparison { skv, tender } = effect {
                let request = build_comparison_request("http://backend/api/compare", skv, tender);
                let event = match block_on(fetch_with_retry(&transport, &request, options)) {
                    Ok(response) => Event::ResponseReceived(response),
                    Err(e) => Event::RequestFailed(e.to_string()),
                };
                events.push(event);
            }
        }

        // 応答前の進捗は100にならない
        state = state.handle(Event::ProgressTick).state;
        assert!(state.progress() < 100);

        for event in events {
            state = state.handle(event).state;
        }

        let result = state.result().expect("Succeededになるはず");
        assert_eq!(result.comparison.len(), 3);
        assert_eq!(result.extra_fields.len(), 2);
        assert_eq!(&result.blob[..], &body[..]);
        assert_eq!(state.progress(), 100);
        assert_eq!(state.success(), Some(MSG_SUCCESS));
        assert_eq!(transport.call_count(), 2);
        assert!(state.can_reset());
    }
}
