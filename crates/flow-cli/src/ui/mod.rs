//! UI primitives for the Flow CLI.
//!
//! - **Context**: environment detection (TTY, width, color, unicode)
//! - **Mode**: output mode resolution (json, plain, pretty)
//! - **Theme**: badges and styles
//! - **Render**: tables, headers, receipts, hints
//! - **Format**: short ids, truncation, dates, money
//!
//! ```ignore
//! let ui = ctx.ui_context(args.json);
//! if ui.mode.is_json() {
//!     return print_json(&rows);
//! }
//! println!("{}", header(&ui, "tasks", Some("Work")));
//! println!("{}", simple_table(&ui, &columns, &rows));
//! ```

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{
    badge, header, hint, kv, print, print_error, print_json, receipt, simple_table, Column,
};

pub use format::{format_date, short_id, truncate};
