//! Browser DOM helpers
//!
//! Thin wrappers over `web_sys` used by the wasm entry point. Missing
//! elements are logged and skipped, never fatal.

/// How long an error toast stays on screen
pub const ERROR_TOAST_MS: i32 = 5000;

/// Text shown in the error toast
pub fn error_toast_text(message: &str) -> String {
    format!("ERROR: {}", message)
}

/// Errors always go to the log; the toast is a developer tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorReporter {
    toasts: bool,
}

impl ErrorReporter {
    pub fn new(debug_tools: bool) -> Self {
        Self { toasts: debug_tools }
    }

    /// Log `message`; returns the toast text when toasts are enabled
    pub fn report(&self, message: &str) -> Option<String> {
        log::error!("{}", message);
        self.toasts.then(|| error_toast_text(message))
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::{ERROR_TOAST_MS, ErrorReporter};

    pub fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    /// Look up an element, warning when it is absent
    pub fn element_by_id(id: &str) -> Option<web_sys::Element> {
        let el = document()?.get_element_by_id(id);
        if el.is_none() {
            log::warn!("Element #{} not found", id);
        }
        el
    }

    /// Like `element_by_id` but silent; for optional page sections
    pub fn try_element(id: &str) -> Option<web_sys::Element> {
        document()?.get_element_by_id(id)
    }

    pub fn set_text(id: &str, text: &str) {
        if let Some(el) = element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn set_html(el: &web_sys::Element, html: &str) {
        el.set_inner_html(html);
    }

    fn style_of(el: &web_sys::Element) -> Option<web_sys::CssStyleDeclaration> {
        el.dyn_ref::<web_sys::HtmlElement>().map(|h| h.style())
    }

    pub fn set_style(el: &web_sys::Element, property: &str, value: &str) {
        if let Some(style) = style_of(el) {
            let _ = style.set_property(property, value);
        }
    }

    pub fn set_display(el: &web_sys::Element, visible: bool) {
        set_style(el, "display", if visible { "block" } else { "none" });
    }

    pub fn set_class(el: &web_sys::Element, class: &str, on: bool) {
        let _ = el.class_list().toggle_with_force(class, on);
    }

    pub fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    pub fn prefers_reduced_motion() -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .is_some_and(|mq| mq.matches())
    }

    pub fn navigate(page: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(page) {
                log::error!("Navigation to {} failed: {:?}", page, e);
            }
        }
    }

    /// Value of a text input or textarea
    pub fn input_value(el: &web_sys::Element) -> Option<String> {
        if let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>() {
            return Some(input.value());
        }
        el.dyn_ref::<web_sys::HtmlTextAreaElement>().map(|t| t.value())
    }

    /// Focused element's `data-input` kind and value, if it is one of ours
    pub fn focused_input() -> Option<(String, String)> {
        let el = document()?.active_element()?;
        let kind = el.get_attribute("data-input")?;
        let value = input_value(&el)?;
        Some((kind, value))
    }

    /// True while the user is typing into any form field
    pub fn typing_in_field() -> bool {
        document()
            .and_then(|d| d.active_element())
            .is_some_and(|el| {
                let tag = el.tag_name();
                tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea")
            })
    }

    /// Report an error; with developer tools on, also show a fixed-position
    /// toast in the corner, removed after `ERROR_TOAST_MS`
    pub fn show_error(reporter: ErrorReporter, message: &str) {
        let Some(text) = reporter.report(message) else {
            return;
        };
        let Some(document) = document() else {
            return;
        };
        let Some(body) = document.body() else {
            return;
        };
        let Ok(toast) = document.create_element("div") else {
            return;
        };
        toast.set_class_name("fun-error-toast");
        toast.set_text_content(Some(&text));
        set_style(&toast, "position", "fixed");
        set_style(&toast, "bottom", "16px");
        set_style(&toast, "right", "16px");
        set_style(&toast, "background", "#c62828");
        set_style(&toast, "color", "#fff");
        set_style(&toast, "padding", "10px 16px");
        set_style(&toast, "border-radius", "6px");
        set_style(&toast, "z-index", "10001");
        if body.append_child(&toast).is_err() {
            return;
        }

        let closure = Closure::<dyn FnMut()>::new(move || toast.remove());
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                ERROR_TOAST_MS,
            );
        }
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_toast_text() {
        assert_eq!(error_toast_text("level 4 failed"), "ERROR: level 4 failed");
    }

    #[test]
    fn test_toasts_only_with_debug_tools() {
        assert_eq!(ErrorReporter::default().report("boom"), None);
        assert_eq!(ErrorReporter::new(false).report("boom"), None);
        assert_eq!(
            ErrorReporter::new(true).report("boom").as_deref(),
            Some("ERROR: boom")
        );
    }
}
