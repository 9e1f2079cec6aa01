//! リトライ付きHTTP送信
//!
//! 5xxと通信エラーのみ再試行する。待機は線形
//! （1回目の後に delay、2回目の後に 2*delay ...）。

use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use std::time::Duration;

/// リトライ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOptions {
    /// 初回に加えて再試行する回数
    pub max_retries: u32,
    /// 待機時間の基準値
    pub delay: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryOptions {
    /// attempt回目（0始まり）の失敗後の待機時間
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.delay * (attempt + 1)
    }
}

/// リクエストを送信し、失敗時は再試行
///
/// - 2xx/4xx はそのまま返す
/// - 5xx は残り回数があれば再試行、最終回ならそのまま返す
/// - 通信エラーは最終回まで再試行し、最後のエラーを返す
pub async fn fetch_with_retry<T: Transport>(
    transport: &T,
    request: &HttpRequest,
    options: RetryOptions,
) -> Result<HttpResponse> {
    let mut last_error = Error::Network("Unknown error".into());

    for attempt in 0..=options.max_retries {
        match transport.send(request).await {
            Ok(response) if response.is_server_error() && attempt < options.max_retries => {
                last_error = Error::Network(format!("Server error: {}", response.status));
            }
            Ok(response) => return Ok(response),
            Err(e) => last_error = e,
        }

        if attempt == options.max_retries {
            break;
        }

        let wait = options.backoff(attempt);
        tracing::warn!(
            url = %request.url,
            attempt = attempt + 1,
            max_retries = options.max_retries,
            wait_ms = wait.as_millis() as u64,
            error = %last_error,
            "request failed, retrying"
        );
        transport.sleep(wait).await;
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use futures::executor::block_on;

    fn request() -> HttpRequest {
        HttpRequest::get("http://backend/api/compare")
    }

    #[test]
    fn test_default_options() {
        let options = RetryOptions::default();
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_backoff_is_linear() {
        let options = RetryOptions::default();
        assert_eq!(options.backoff(0), Duration::from_millis(1000));
        assert_eq!(options.backoff(1), Duration::from_millis(2000));
        assert_eq!(options.backoff(2), Duration::from_millis(3000));
    }

    #[test]
    fn test_three_503_then_200() {
        let transport = MockTransport::with_replies(vec![
            MockTransport::status(503),
            MockTransport::status(503),
            MockTransport::status(503),
            MockTransport::status(200),
        ]);

        let response = block_on(fetch_with_retry(&transport, &request(), RetryOptions::default()))
            .expect("最終的に200が返るはず");

        assert_eq!(response.status, 200);
        assert_eq!(transport.call_count(), 4);

        let delays = transport.delays.borrow();
        assert!(delays.len() >= 3);
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(
            *delays,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(3000),
            ]
        );
    }

    #[test]
    fn test_404_returns_immediately() {
        let transport = MockTransport::with_replies(vec![MockTransport::status(404)]);

        let response = block_on(fetch_with_retry(&transport, &request(), RetryOptions::default()))
            .expect("404はエラーにしない");

        assert_eq!(response.status, 404);
        assert_eq!(transport.call_count(), 1);
        assert!(transport.delays.borrow().is_empty());
    }

    #[test]
    fn test_final_5xx_is_returned_not_raised() {
        let options = RetryOptions {
            max_retries: 2,
            delay: Duration::from_millis(10),
        };
        let transport = MockTransport::with_replies(vec![
            MockTransport::status(500),
            MockTransport::status(502),
            MockTransport::status(504),
        ]);

        let response = block_on(fetch_with_retry(&transport, &request(), options))
            .expect("最終回の5xxはレスポンスとして返る");

        assert_eq!(response.status, 504);
        assert_eq!(transport.delays.borrow().len(), 2);
    }

    #[test]
    fn test_transport_error_is_retried_then_raised() {
        let options = RetryOptions {
            max_retries: 2,
            delay: Duration::from_millis(5),
        };
        let transport = MockTransport::with_replies(vec![
            Err(Error::Network("connection refused".into())),
            Err(Error::Network("connection reset".into())),
            Err(Error::Network("timed out".into())),
        ]);

        let err = block_on(fetch_with_retry(&transport, &request(), options)).unwrap_err();

        // 最後のエラーが返る
        assert_eq!(err, Error::Network("timed out".into()));
        assert_eq!(transport.call_count(), 3);
        assert_eq!(
            *transport.delays.borrow(),
            vec![Duration::from_millis(5), Duration::from_millis(10)]
        );
    }

    #[test]
    fn test_transport_error_then_success() {
        let transport = MockTransport::with_replies(vec![
            Err(Error::Network("connection refused".into())),
            MockTransport::status(200),
        ]);

        let response = block_on(fetch_with_retry(&transport, &request(), RetryOptions::default()))
            .expect("2回目で成功するはず");

        assert_eq!(response.status, 200);
        assert_eq!(*transport.delays.borrow(), vec![Duration::from_millis(1000)]);
    }

    #[test]
    fn test_zero_retries_returns_5xx() {
        let options = RetryOptions {
            max_retries: 0,
            delay: Duration::from_millis(1000),
        };
        let transport = MockTransport::with_replies(vec![MockTransport::status(503)]);

        let response = block_on(fetch_with_retry(&transport, &request(), options)).unwrap();

        assert_eq!(response.status, 503);
        assert!(transport.delays.borrow().is_empty());
    }
}
