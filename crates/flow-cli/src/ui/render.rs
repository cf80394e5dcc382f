//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, NOTHING, UTF8_FULL};
use comfy_table::{Attribute, Cell, ContentArrangement, Table as ComfyTable};
use serde::Serialize;

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "Flow · command (context)". Plain mode: "flow command".
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Flow", styles::bold(), ctx.color);
            match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            }
        }
        OutputMode::Plain => format!("flow {}", command),
        OutputMode::Json => String::new(),
    }
}

pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key. Plain mode: "key=value".
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a summary block after an action.
///
/// Pretty mode: badge plus indented pairs. Plain mode: `status=ok` plus pairs.
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }
    lines.join("\n")
}

/// Column definition for table rendering.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self { header }
    }
}

/// Render a borderless table.
///
/// Pretty mode: dim headers with padded columns. Plain mode: one
/// tab-separated line per row, no header.
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut table = ComfyTable::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(ctx.width.min(u16::MAX as usize) as u16);

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|c| {
            let cell = Cell::new(c.header);
            if ctx.color {
                cell.add_attribute(Attribute::Dim)
            } else {
                cell
            }
        })
        .collect();
    table.set_header(header_cells);

    for i in 0..columns.len() {
        if let Some(column) = table.column_mut(i) {
            column.set_padding((0, 2));
        }
    }
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Render a bordered table (used for summaries).
pub fn table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return simple_table(ctx, columns, rows);
    }

    let mut table = ComfyTable::new();
    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(columns.iter().map(|c| c.header).collect::<Vec<_>>());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Print a line unless the output is JSON.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(hint(ctx, h));
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h));
        }
    }
    lines.join("\n")
}

pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_ctx() -> UiContext {
        UiContext {
            interactive: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    fn pretty_ctx() -> UiContext {
        UiContext {
            interactive: true,
            color: false,
            unicode: true,
            width: 80,
            mode: OutputMode::Pretty,
        }
    }

    #[test]
    fn test_header_modes() {
        assert_eq!(header(&plain_ctx(), "tasks", None), "flow tasks");
        let pretty = header(&pretty_ctx(), "tasks", Some("Work"));
        assert!(pretty.contains("Flow"));
        assert!(pretty.contains("(Work)"));
    }

    #[test]
    fn test_kv_plain() {
        assert_eq!(kv(&plain_ctx(), "User Id", "u1"), "user_id=u1");
    }

    #[test]
    fn test_receipt_plain() {
        let out = receipt(&plain_ctx(), "Task added", &[("ID", "abc")]);
        assert_eq!(out, "status=ok\nid=abc");
    }

    #[test]
    fn test_simple_table_plain_rows() {
        let columns = [Column::new("ID"), Column::new("Title")];
        let rows = vec![
            vec!["a1".to_string(), "First".to_string()],
            vec!["b2".to_string(), "Second".to_string()],
        ];
        let out = simple_table(&plain_ctx(), &columns, &rows);
        assert_eq!(out, "a1\tFirst\nb2\tSecond");
    }

    #[test]
    fn test_simple_table_pretty_has_headers() {
        let columns = [Column::new("ID"), Column::new("Title")];
        let rows = vec![vec!["a1".to_string(), "First".to_string()]];
        let out = simple_table(&pretty_ctx(), &columns, &rows);
        assert!(out.contains("ID"));
        assert!(out.contains("First"));
    }

    #[test]
    fn test_error_message_plain() {
        let out = error_message(&plain_ctx(), "boom", Some("try again"));
        assert_eq!(out, "error=boom\nhint=try again");
    }
}
