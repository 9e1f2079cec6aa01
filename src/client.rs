//! reqwestによる送信
//!
//! CLIとプロキシの両方から使う。

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use skv_compare_common::{Error, FormPart, HttpRequest, HttpResponse, Method, Transport};
use std::time::Duration;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> skv_compare_common::Result<HttpResponse> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        let builder = if request.parts.is_empty() {
            builder
        } else {
            builder.multipart(build_form(&request.parts)?)
        };

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(network_error)?.to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// 共通のパート定義をreqwestのフォームに変換
fn build_form(parts: &[FormPart]) -> skv_compare_common::Result<Form> {
    let mut form = Form::new();
    for part in parts {
        let mime = if part.file.content_type.is_empty() {
            FALLBACK_MIME
        } else {
            part.file.content_type.as_str()
        };
        let body = Part::bytes(part.file.content.to_vec())
            .file_name(part.file.name.clone())
            .mime_str(mime)
            .map_err(network_error)?;
        form = form.part(part.name.clone(), body);
    }
    Ok(form)
}

fn network_error(e: reqwest::Error) -> Error {
    Error::Network(e.to_string())
}
