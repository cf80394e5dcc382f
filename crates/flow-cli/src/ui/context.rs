//! UI context for environment detection and configuration.

use std::io::IsTerminal;

use super::mode::OutputMode;

/// Terminal and environment context for UI decisions.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether stdin and stdout are both terminals
    pub interactive: bool,
    /// Whether color output is enabled
    pub color: bool,
    /// Whether unicode symbols are enabled
    pub unicode: bool,
    /// Terminal width (columns)
    pub width: usize,
    pub mode: OutputMode,
}

impl UiContext {
    /// Create context from the environment and CLI flags.
    pub fn from_env(json_flag: bool, no_color_flag: bool, ascii_flag: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var("NO_COLOR").is_ok();

        let color = is_tty && !no_color_flag && !no_color_env && !term_is_dumb;

        Self {
            interactive: is_tty && std::io::stdin().is_terminal(),
            color,
            unicode: !ascii_flag,
            width: terminal_width().unwrap_or(80),
            mode: OutputMode::resolve(json_flag, is_tty, term_is_dumb),
        }
    }
}

/// Get terminal width from `COLUMNS` or the tty.
fn terminal_width() -> Option<usize> {
    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 {
                return Some(width);
            }
        }
    }

    #[cfg(unix)]
    {
        use std::mem::MaybeUninit;

        let mut winsize = MaybeUninit::<libc::winsize>::uninit();
        // SAFETY: TIOCGWINSZ writes a winsize into the pointer on success only.
        let result =
            unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, winsize.as_mut_ptr()) };
        if result == 0 {
            // SAFETY: initialized by the successful ioctl above.
            let ws = unsafe { winsize.assume_init() };
            if ws.ws_col > 0 {
                return Some(ws.ws_col as usize);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_mode_from_flag() {
        let ctx = UiContext::from_env(true, false, false);
        assert_eq!(ctx.mode, OutputMode::Json);
    }

    #[test]
    fn test_ascii_disables_unicode() {
        assert!(!UiContext::from_env(false, false, true).unicode);
    }

    #[test]
    fn test_no_color_disables_color() {
        assert!(!UiContext::from_env(false, true, false).color);
    }
}
