use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response};
use axum::middleware::Next;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub fn security_headers<B>(mut response: Response<B>) -> Response<B> {
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );

    response
}

pub async fn apply_security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let response = next.run(request).await;
    security_headers(response)
}

/// Counts failed sign-in attempts per key inside a sliding window.
pub struct LoginThrottle {
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
    max_attempts: usize,
    window: Duration,
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(900))
    }
}

impl LoginThrottle {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            attempts: Mutex::new(HashMap::new()),
            max_attempts,
            window,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Instant>>> {
        self.attempts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// False while `key` has used up its failed attempts for the window.
    pub fn allows(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut attempts = self.lock();
        let Some(entry) = attempts.get_mut(key) else {
            return true;
        };
        entry.retain(|t| now.duration_since(*t) < self.window);
        if entry.is_empty() {
            attempts.remove(key);
            return true;
        }
        entry.len() < self.max_attempts
    }

    pub fn record_failure(&self, key: &str) {
        self.lock().entry(key.to_string()).or_default().push(Instant::now());
    }

    pub fn clear(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Drops every key whose failures have all aged out of the window.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.lock().retain(|_, entry| {
            entry.retain(|t| now.duration_since(*t) < self.window);
            !entry.is_empty()
        });
    }

    #[cfg(test)]
    pub(crate) fn tracked_keys(&self) -> usize {
        self.lock().len()
    }
}
