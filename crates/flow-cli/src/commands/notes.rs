use flow_core::lock::Passphrase;
use flow_core::model::{Note, NoteDraft};
use flow_core::views::{NotePreview, NotesView};

use crate::app::AppContext;
use crate::cli::{DeleteArgs, JsonArgs, NoteAddArgs, NoteEditArgs, NoteShowArgs};
use crate::helpers::{confirm_delete, prompt_note_passphrase, read_body, resolve_id};
use crate::ui::theme::{styled, styles};
use crate::ui::{
    badge, format_date, header, hint, kv, print, print_json, receipt, short_id, simple_table,
    truncate, Badge, Column, UiContext,
};

fn mount(ctx: &AppContext) -> anyhow::Result<NotesView> {
    Ok(NotesView::mount(ctx.store()?, ctx.session()?)?)
}

fn lock_mark(ui_ctx: &UiContext, note: &Note) -> String {
    match (note.locked, ui_ctx.unicode) {
        (true, true) => "\u{1F512}".to_string(),
        (true, false) => "L".to_string(),
        (false, _) => String::new(),
    }
}

fn preview_text(ui_ctx: &UiContext, preview: &NotePreview) -> String {
    match preview {
        NotePreview::Text(text) => truncate(text, 50, ui_ctx.unicode),
        other => styled(other.as_text(), styles::dim(), ui_ctx.color),
    }
}

/// Ask for the note's passphrase if it is still locked in this view.
fn unlock_input(
    view: &NotesView,
    note: &Note,
    interactive: bool,
) -> anyhow::Result<Option<Passphrase>> {
    if view.is_unlocked(note) {
        return Ok(None);
    }
    prompt_note_passphrase(interactive, false).map(Some)
}

pub fn handle_list(ctx: &AppContext, args: &JsonArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let view = mount(ctx)?;
    let notes = view.notes();

    if ui_ctx.mode.is_json() {
        let values: Vec<serde_json::Value> = notes
            .iter()
            .map(|note| {
                serde_json::json!({
                    "id": note.id,
                    "title": note.title,
                    "locked": note.locked,
                    "lastModified": note.last_modified,
                    "preview": view.preview(note).as_text(),
                })
            })
            .collect();
        return print_json(&values);
    }

    if !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "notes", None));
    }
    if notes.is_empty() {
        if !ctx.quiet() {
            print(&ui_ctx, &hint(&ui_ctx, "flow notes add \"Title\" --body \"...\""));
        }
        return Ok(());
    }

    let columns = [
        Column::new("ID"),
        Column::new(""),
        Column::new("Title"),
        Column::new("Preview"),
        Column::new("Modified"),
    ];
    let rows: Vec<Vec<String>> = notes
        .iter()
        .map(|note| {
            vec![
                short_id(&note.id).to_string(),
                lock_mark(&ui_ctx, note),
                truncate(&note.title, 32, ui_ctx.unicode),
                preview_text(&ui_ctx, &view.preview(note)),
                format_date(&note.last_modified),
            ]
        })
        .collect();
    print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}

pub fn handle_add(ctx: &AppContext, args: &NoteAddArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let interactive = ui_ctx.interactive && !args.no_input;
    let mut view = mount(ctx)?;

    let body = read_body(!interactive, args.body.clone(), None)?.unwrap_or_default();
    let mut draft = NoteDraft::new(args.title.clone(), body);
    if args.lock {
        draft = draft.locked_with(prompt_note_passphrase(interactive, true)?);
    }

    let id = view.save(draft, None)?;
    if !ctx.quiet() {
        let title = if args.lock { "Locked note saved" } else { "Note saved" };
        print(&ui_ctx, &receipt(&ui_ctx, title, &[("ID", id.as_str())]));
    }
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &NoteShowArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let interactive = ui_ctx.interactive && !args.no_input;
    let mut view = mount(ctx)?;

    let note = resolve_id(view.notes(), &args.id)?.clone();
    let passphrase = unlock_input(&view, &note, interactive)?;
    let content = view.view_note(&note.id, passphrase.as_ref().map(Passphrase::expose))?;

    if ui_ctx.mode.is_json() {
        return print_json(&serde_json::json!({
            "id": note.id,
            "title": note.title,
            "locked": note.locked,
            "lastModified": note.last_modified,
            "content": content,
        }));
    }

    if !ctx.quiet() {
        let title = if note.locked {
            badge(&ui_ctx, Badge::Locked, &note.title)
        } else {
            styled(&note.title, styles::bold(), ui_ctx.color)
        };
        print(&ui_ctx, &title);
        print(&ui_ctx, &kv(&ui_ctx, "ID", &note.id));
        print(
            &ui_ctx,
            &kv(&ui_ctx, "Modified", &note.last_modified.to_rfc3339()),
        );
        print(&ui_ctx, "");
    }
    if content.is_empty() {
        print(&ui_ctx, NotePreview::EMPTY_TEXT);
    } else {
        print(&ui_ctx, &content);
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &NoteEditArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let interactive = ui_ctx.interactive && !args.no_input;
    let mut view = mount(ctx)?;

    let note = resolve_id(view.notes(), &args.id)?.clone();
    let entered = unlock_input(&view, &note, interactive)?;
    let mut draft = view.start_edit(&note.id, entered.as_ref().map(Passphrase::expose))?;

    if let Some(title) = &args.title {
        draft.title = title.clone();
    }
    if let Some(body) = read_body(!interactive, args.body.clone(), Some(&draft.content))? {
        draft.content = body;
    }

    if args.unlock {
        draft = draft.unlocked();
    } else if args.lock {
        draft = draft.locked_with(prompt_note_passphrase(interactive, true)?);
    } else if draft.locked {
        // Staying locked: seal again with the password just entered.
        let passphrase = match entered {
            Some(passphrase) => passphrase,
            None => prompt_note_passphrase(interactive, false)?,
        };
        draft = draft.locked_with(passphrase);
    }

    let id = view.save(draft, Some(&note.id))?;
    if !ctx.quiet() {
        print(&ui_ctx, &receipt(&ui_ctx, "Note updated", &[("ID", id.as_str())]));
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let mut view = mount(ctx)?;
    let note = resolve_id(view.notes(), &args.id)?.clone();

    let what = format!("note \"{}\"", note.title);
    if !confirm_delete(ui_ctx.interactive, args.yes, &what)? {
        print(&ui_ctx, "Cancelled");
        return Ok(());
    }
    view.delete(&note.id)?;
    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Note deleted", &[("ID", note.id.as_str())]),
        );
    }
    Ok(())
}
