//! Utility functions for the module library picker: a toast notification,
//! the delayed page reload after a successful copy, and a small typed GET
//! helper shared by the fetches in `update.rs`.

use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Fetches `url` and decodes the JSON body, mapping every failure mode
/// (transport error, non-200 status, decode error) to a message string.
pub async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url).send().await.map_err(|e| e.to_string())?;
    if response.status() != 200 {
        let status = response.status();
        return Err(response
            .text()
            .await
            .unwrap_or_else(|_| format!("Request failed with status {}", status)));
    }
    response.json::<T>().await.map_err(|e| e.to_string())
}

/// Displays a temporary notification message at the bottom of the screen.
///
/// The toast is a styled `div` injected into the DOM that removes itself
/// after a few seconds. Used for both success notices and endpoint errors.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Reloads the page after the given delay so the copied module becomes
/// visible in the course view.
pub fn reload_after(millis: u32) {
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(millis).await;
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    });
}
