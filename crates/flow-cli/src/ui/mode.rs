//! Output mode routing logic.

/// How results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON only
    Json,
    /// Plain `key=value` text, stable for scripts
    #[default]
    Plain,
    /// Human-friendly with colors and tables (TTY only)
    Pretty,
}

impl OutputMode {
    /// Resolve the output mode.
    ///
    /// `--json` wins, `TERM=dumb` forces plain, and pretty output needs a TTY.
    pub fn resolve(json_flag: bool, is_tty: bool, term_is_dumb: bool) -> Self {
        if json_flag {
            return Self::Json;
        }
        if term_is_dumb || !is_tty {
            return Self::Plain;
        }
        Self::Pretty
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
