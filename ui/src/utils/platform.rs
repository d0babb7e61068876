//! Platform helpers that differ between the browser and native builds
//!
//! Time and sleeping go through here so that store and chain logic can run
//! under `tokio::test` as well as in the browser.

use std::time::Duration;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::TimeoutFuture::new(duration.as_millis() as u32).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Origin of the page (`https://host:port`), used to build absolute URLs for
/// same-origin assets
#[cfg(target_arch = "wasm32")]
pub fn page_origin() -> Option<String> {
    web_sys::window().and_then(|w| w.location().origin().ok())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn page_origin() -> Option<String> {
    None
}

/// Whether the browser exposes WebHID (`navigator.hid`)
#[cfg(target_arch = "wasm32")]
pub fn supports_webhid() -> bool {
    web_sys::window()
        .map(|w| {
            let navigator = w.navigator();
            js_sys::Reflect::get(&navigator, &"hid".into())
                .map(|hid| !hid.is_undefined())
                .unwrap_or(false)
        })
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn supports_webhid() -> bool {
    false
}
