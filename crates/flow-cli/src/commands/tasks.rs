use flow_core::model::{Task, TaskDraft, ALL_LISTS};
use flow_core::views::TasksView;

use crate::app::AppContext;
use crate::cli::{DeleteArgs, IdArgs, JsonArgs, TaskAddArgs, TaskEditArgs, TaskListArgs};
use crate::helpers::{confirm_delete, parse_datetime, parse_priority, resolve_id};
use crate::ui::theme::{styled, styles};
use crate::ui::{
    format_date, header, hint, print, print_json, receipt, short_id, simple_table, truncate,
    Column, UiContext,
};

fn mount(ctx: &AppContext) -> anyhow::Result<TasksView> {
    Ok(TasksView::mount(ctx.store()?, ctx.session()?)?)
}

fn done_mark(ui_ctx: &UiContext, task: &Task) -> String {
    match (task.is_completed, ui_ctx.unicode) {
        (true, true) => styled("\u{2713}", styles::ok(), ui_ctx.color),
        (true, false) => "x".to_string(),
        (false, _) => " ".to_string(),
    }
}

pub fn handle_list(ctx: &AppContext, args: &TaskListArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let mut view = mount(ctx)?;
    if let Some(list) = &args.list {
        view.set_filter(list.clone());
    }
    let tasks = view.visible();

    if ui_ctx.mode.is_json() {
        return print_json(&tasks);
    }

    if !ctx.quiet() {
        let context = (view.filter() != ALL_LISTS).then(|| view.filter());
        print(&ui_ctx, &header(&ui_ctx, "tasks", context));
    }
    if tasks.is_empty() {
        if !ctx.quiet() {
            print(&ui_ctx, &hint(&ui_ctx, "flow tasks add \"Title\" --list Work"));
        }
        return Ok(());
    }

    let columns = [
        Column::new("ID"),
        Column::new("Done"),
        Column::new("Priority"),
        Column::new("Title"),
        Column::new("List"),
        Column::new("Deadline"),
    ];
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|task| {
            vec![
                short_id(&task.id).to_string(),
                done_mark(&ui_ctx, task),
                task.priority.label().to_string(),
                truncate(&task.title, 48, ui_ctx.unicode),
                task.list_name.clone(),
                task.deadline.as_ref().map(format_date).unwrap_or_default(),
            ]
        })
        .collect();
    print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}

pub fn handle_add(ctx: &AppContext, args: &TaskAddArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let view = mount(ctx)?;

    let mut draft =
        TaskDraft::new(args.title.clone()).with_priority(parse_priority(&args.priority)?);
    if let Some(list) = &args.list {
        draft = draft.with_list(list.clone());
    }
    if let Some(deadline) = &args.deadline {
        draft = draft.with_deadline(parse_datetime(deadline)?);
    }
    draft.description = args.description.clone();

    let id = view.save(draft, None)?;
    if !ctx.quiet() {
        print(&ui_ctx, &receipt(&ui_ctx, "Task added", &[("ID", id.as_str())]));
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &TaskEditArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let view = mount(ctx)?;
    let task = resolve_id(view.tasks(), &args.id)?;

    let mut draft = TaskDraft::from_task(task);
    if let Some(title) = &args.title {
        draft.title = title.clone();
    }
    if let Some(priority) = &args.priority {
        draft.priority = parse_priority(priority)?;
    }
    if let Some(list) = &args.list {
        draft.list_name = list.clone();
    }
    if let Some(deadline) = &args.deadline {
        draft.deadline = Some(parse_datetime(deadline)?);
    }
    if args.clear_deadline {
        draft.deadline = None;
    }
    if let Some(description) = &args.description {
        draft.description = Some(description.clone());
    }

    let id = task.id.clone();
    view.save(draft, Some(&id))?;
    if !ctx.quiet() {
        print(&ui_ctx, &receipt(&ui_ctx, "Task updated", &[("ID", id.as_str())]));
    }
    Ok(())
}

pub fn handle_done(ctx: &AppContext, args: &IdArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let view = mount(ctx)?;
    let id = resolve_id(view.tasks(), &args.id)?.id.clone();

    let completed = view.toggle_complete(&id)?;
    if !ctx.quiet() {
        let title = if completed {
            "Task completed"
        } else {
            "Task reopened"
        };
        print(&ui_ctx, &receipt(&ui_ctx, title, &[("ID", id.as_str())]));
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let view = mount(ctx)?;
    let task = resolve_id(view.tasks(), &args.id)?;
    let id = task.id.clone();

    let what = format!("task \"{}\"", task.title);
    if !confirm_delete(ui_ctx.interactive, args.yes, &what)? {
        print(&ui_ctx, "Cancelled");
        return Ok(());
    }
    view.delete(&id)?;
    if !ctx.quiet() {
        print(&ui_ctx, &receipt(&ui_ctx, "Task deleted", &[("ID", id.as_str())]));
    }
    Ok(())
}

pub fn handle_lists(ctx: &AppContext, args: &JsonArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let view = mount(ctx)?;
    let lists = view.lists();

    if ui_ctx.mode.is_json() {
        return print_json(&lists);
    }
    for name in lists {
        let count = view
            .tasks()
            .iter()
            .filter(|t| name == ALL_LISTS || t.list_name == name)
            .count();
        print(&ui_ctx, &format!("{}\t{}", name, count));
    }
    Ok(())
}
