//! Printable output helpers.
//!
//! `echo` writes to stdout. `log` and `debug` go through `tracing`, so they
//! land wherever the application's subscriber sends them.

use crate::editor::EditOptions;
use crate::serializer::PrintOptions;
use crate::settings::Settings;
use crate::value::{OnError, Value};
use serde::Serialize;

/// Printable rendering of `x` after applying `edit`. Anything the bridge
/// cannot convert renders as `null`.
pub fn render<T: Serialize + ?Sized>(x: &T, title: Option<&str>, edit: &EditOptions, settings: &Settings) -> String {
    let value = Value::from_object_with(x, OnError::Ignore).unwrap_or_default();
    let value = value.clone_with(edit);
    let mut options = PrintOptions::from_settings(settings);
    options.title = title.map(str::to_owned);
    value.to_printable(&options)
}

/// Print `x` to stdout and return the printed text.
pub fn echo<T: Serialize + ?Sized>(x: &T, title: Option<&str>, edit: &EditOptions, settings: &Settings) -> String {
    let text = render(x, title, edit, settings);
    println!("{}", text);
    text
}

/// Emit `x` as an `info` event.
pub fn log<T: Serialize + ?Sized>(x: &T, title: Option<&str>, edit: &EditOptions, settings: &Settings) {
    tracing::info!("{}", render(x, title, edit, settings));
}

/// Emit `x` as a `debug` event, only when `settings.debug_output` is on.
/// Returns whether anything was emitted.
pub fn debug<T: Serialize + ?Sized>(x: &T, title: Option<&str>, edit: &EditOptions, settings: &Settings) -> bool {
    if !settings.debug_output {
        return false;
    }
    tracing::debug!("{}", render(x, title, edit, settings));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn render_applies_edit_options() {
        let mut m = BTreeMap::new();
        m.insert("token", "abc");
        m.insert("user", "ann");
        let edit = EditOptions::default().with_hide_keys(["token"]);
        let text = render(&m, Some("Login"), &edit, &Settings::default());
        assert_eq!(text, "Login: {\n  token: \"***\",\n  user: \"ann\"\n}");
    }

    #[test]
    fn debug_is_gated_by_settings() {
        let settings = Settings::default();
        assert!(!debug(&1, None, &EditOptions::default(), &settings));
        let settings = settings.with_debug_output(true);
        assert!(debug(&1, None, &EditOptions::default(), &settings));
    }

    #[test]
    fn unconvertible_input_renders_null() {
        let mut bad = BTreeMap::new();
        bad.insert(vec![1], 2);
        assert_eq!(render(&bad, None, &EditOptions::default(), &Settings::default()), "null");
    }
}
