//! Configuration passed explicitly to the parse and render entry points.
//!
//! There is no process-wide state: callers own a `Settings` value, and
//! `Settings::reset` restores the startup defaults between independent runs.

/// Which text grammar `Value::from_json` uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    /// JSON plus bare identifier keys and Lisp-style `( ("k" v) ... )` lists.
    /// Numbers keep their exact decimal text.
    #[default]
    Relaxed,
    /// Standard JSON only, parsed by `serde_json`.
    Strict,
}

/// Default nesting limit for the relaxed parser.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Grammar used by `Value::from_json`.
    pub parser: Syntax,
    /// Gates `console::debug` output.
    pub debug_output: bool,
    /// Prefix printable composites with their origin type name.
    pub show_detail: bool,
    /// Escape every non-ASCII character in JSON output.
    pub force_ascii: bool,
    /// Maximum container nesting accepted by the relaxed parser.
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parser: Syntax::Relaxed,
            debug_output: false,
            show_detail: false,
            force_ascii: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Settings {
    /// Restore every field to its startup default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Builder: select the parser grammar.
    pub fn with_parser(mut self, parser: Syntax) -> Self {
        self.parser = parser;
        self
    }

    /// Builder: toggle origin prefixes in printable output.
    pub fn with_show_detail(mut self, show_detail: bool) -> Self {
        self.show_detail = show_detail;
        self
    }

    /// Builder: toggle ASCII-only JSON output.
    pub fn with_force_ascii(mut self, force_ascii: bool) -> Self {
        self.force_ascii = force_ascii;
        self
    }

    /// Builder: toggle `console::debug` output.
    pub fn with_debug_output(mut self, debug_output: bool) -> Self {
        self.debug_output = debug_output;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_defaults() {
        let mut settings = Settings::default()
            .with_parser(Syntax::Strict)
            .with_show_detail(true)
            .with_force_ascii(true)
            .with_debug_output(true);
        settings.max_depth = 4;
        assert_ne!(settings, Settings::default());

        settings.reset();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.parser, Syntax::Relaxed);
        assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
    }
}
