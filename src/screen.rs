use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::layout::Viewport;

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("no document available")]
    NoDocument,
    #[error("{0} is not supported here")]
    Unsupported(String),
    #[error("fullscreen request rejected: {0}")]
    Rejected(String),
}

/// Invoked when the host turns a fullscreen request down after it was issued.
pub type RejectHandler = Box<dyn FnOnce(ScreenError)>;

/// Viewport queries and fullscreen control supplied by the host page.
///
/// Fullscreen calls fail in two ways: synchronously (`Err`) or later, when the
/// host rejects the pending request; the latter goes to `on_reject`. At most
/// one of the two happens per call.
pub trait Screen {
    fn viewport(&self) -> Viewport;
    fn request_fullscreen(&self, on_reject: RejectHandler) -> Result<(), ScreenError>;
    fn exit_fullscreen(&self, on_reject: RejectHandler) -> Result<(), ScreenError>;
}

/// `window` / `document` backed screen.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScreen;

impl BrowserScreen {
    fn document() -> Result<web_sys::Document, ScreenError> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or(ScreenError::NoDocument)
    }

    /// Calls `target[method]()` and routes a rejected Promise to `on_reject`.
    fn call_promise_api(
        target: &JsValue,
        method: &str,
        on_reject: RejectHandler,
    ) -> Result<(), ScreenError> {
        let f = js_sys::Reflect::get(target, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| ScreenError::Unsupported(method.to_string()))?;
        let ret = f
            .call0(target)
            .map_err(|e| ScreenError::Rejected(format!("{:?}", e)))?;
        // older engines return undefined rather than a Promise
        if let Ok(promise) = ret.dyn_into::<js_sys::Promise>() {
            let catch = Closure::once(move |e: JsValue| {
                on_reject(ScreenError::Rejected(format!("{:?}", e)));
            });
            let _ = promise.catch(&catch);
            // one small closure per user-triggered request
            catch.forget();
        }
        Ok(())
    }
}

impl Screen for BrowserScreen {
    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::default();
        };
        let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
        };
        let fullscreen = window
            .document()
            .and_then(|d| d.fullscreen_element())
            .is_some();
        Viewport {
            width: dim(window.inner_width(), 800.0),
            height: dim(window.inner_height(), 600.0),
            fullscreen,
        }
    }

    fn request_fullscreen(&self, on_reject: RejectHandler) -> Result<(), ScreenError> {
        let root = Self::document()?
            .document_element()
            .ok_or(ScreenError::NoDocument)?;
        Self::call_promise_api(root.as_ref(), "requestFullscreen", on_reject)
    }

    fn exit_fullscreen(&self, on_reject: RejectHandler) -> Result<(), ScreenError> {
        let doc = Self::document()?;
        if doc.fullscreen_element().is_none() {
            return Ok(());
        }
        Self::call_promise_api(doc.as_ref(), "exitFullscreen", on_reject)
    }
}
