//! ブラウザfetchによる送信

use js_sys::{Array, Uint8Array};
use skv_compare_common::{Error, FormPart, HttpRequest, HttpResponse, Method, Result, Transport};
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let opts = RequestInit::new();
        opts.set_mode(RequestMode::Cors);
        match request.method {
            Method::Get => opts.set_method("GET"),
            Method::Post => opts.set_method("POST"),
        }
        if !request.parts.is_empty() {
            let form = build_form_data(&request.parts).map_err(js_error)?;
            opts.set_body(&form.into());
        }

        let js_request = Request::new_with_str_and_init(&request.url, &opts).map_err(js_error)?;
        let window = web_sys::window().ok_or_else(|| Error::Network("window is not available".into()))?;
        let value = JsFuture::from(window.fetch_with_request(&js_request))
            .await
            .map_err(js_error)?;
        let response: Response = value.dyn_into().map_err(js_error)?;

        let content_type = response.headers().get("content-type").map_err(js_error)?;
        let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
            .await
            .map_err(js_error)?;

        Ok(HttpResponse {
            status: response.status(),
            content_type,
            body: Uint8Array::new(&buffer).to_vec(),
        })
    }

    async fn sleep(&self, duration: Duration) {
        gloo::timers::future::TimeoutFuture::new(duration.as_millis() as u32).await;
    }
}

/// バイト列からBlobを作る
pub fn bytes_to_blob(bytes: &[u8], content_type: &str) -> std::result::Result<Blob, JsValue> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let bag = BlobPropertyBag::new();
    if !content_type.is_empty() {
        bag.set_type(content_type);
    }
    Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
}

fn build_form_data(parts: &[FormPart]) -> std::result::Result<FormData, JsValue> {
    let form = FormData::new()?;
    for part in parts {
        let blob = bytes_to_blob(&part.file.content, &part.file.content_type)?;
        form.append_with_blob_and_filename(&part.name, &blob, &part.file.name)?;
    }
    Ok(form)
}

/// JSの例外からメッセージを取り出す
pub fn js_message(value: &JsValue) -> Option<String> {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
}

/// JSの例外をネットワークエラーに変換
fn js_error(value: JsValue) -> Error {
    Error::Network(js_message(&value).unwrap_or_else(|| "Failed to fetch".to_string()))
}
