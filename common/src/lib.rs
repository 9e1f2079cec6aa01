//! SKV vs Tender Comparator Common Library
//!
//! CLI・プロキシとWeb(WASM)で共有される型とロジック

pub mod types;
pub mod error;
pub mod validation;
pub mod transport;
pub mod retry;
pub mod parser;
pub mod progress;
pub mod preview;
pub mod health;
pub mod controller;

pub use types::{ComparisonRow, ExtraFieldRow, ParsedResult, UploadedFile};
pub use error::{Error, Result, ValidationError};
pub use validation::{validate_excel_file, format_file_size, content_type_for_path, XLSX_MIME, XLS_MIME};
pub use transport::{FormPart, HttpRequest, HttpResponse, Method, Transport};
pub use retry::{fetch_with_retry, RetryOptions};
pub use parser::parse_excel_response;
pub use progress::FakeProgress;
pub use preview::{filter_comparisons, filter_extra_fields, InferenceKind, Summary, DOWNLOAD_FILE_NAME};
pub use health::{check_health, HealthStatus};
pub use controller::{build_comparison_request, Controller, Effect, Event, FileSlot, Phase, Transition};
