use chrono::Utc;

use flow_core::model::{Summary, Transaction, TransactionDraft};
use flow_core::views::FinanceView;

use crate::app::AppContext;
use crate::cli::{DeleteArgs, JsonArgs, TransactionAddArgs, TransactionEditArgs};
use crate::helpers::{confirm_delete, parse_amount, parse_datetime, resolve_id};
use crate::ui::render::table;
use crate::ui::theme::{styled, styles};
use crate::ui::{
    format_date, header, hint, print, print_json, receipt, short_id, simple_table, truncate,
    Column, UiContext,
};

fn mount(ctx: &AppContext) -> anyhow::Result<FinanceView> {
    Ok(FinanceView::mount(ctx.store()?, ctx.session()?)?)
}

fn money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

fn colored_amount(ui_ctx: &UiContext, transaction: &Transaction) -> String {
    let style = if transaction.is_income {
        styles::ok()
    } else {
        styles::err()
    };
    styled(&transaction.display_amount(), style, ui_ctx.color)
}

pub fn handle_list(ctx: &AppContext, args: &JsonArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let view = mount(ctx)?;
    let transactions = view.transactions();

    if ui_ctx.mode.is_json() {
        return print_json(transactions);
    }

    if !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "finance", None));
    }
    if transactions.is_empty() {
        if !ctx.quiet() {
            print(&ui_ctx, &hint(&ui_ctx, "flow finance add \"Coffee\" 3.50"));
        }
        return Ok(());
    }

    let columns = [
        Column::new("ID"),
        Column::new("Date"),
        Column::new("Description"),
        Column::new("Amount"),
    ];
    let rows: Vec<Vec<String>> = transactions
        .iter()
        .map(|t| {
            vec![
                short_id(&t.id).to_string(),
                format_date(&t.date),
                truncate(&t.description, 40, ui_ctx.unicode),
                colored_amount(&ui_ctx, t),
            ]
        })
        .collect();
    print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}

pub fn handle_add(ctx: &AppContext, args: &TransactionAddArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let view = mount(ctx)?;

    let amount = parse_amount(&args.amount)?;
    let date = match &args.date {
        Some(value) => parse_datetime(value)?,
        None => Utc::now(),
    };
    let draft = if args.income {
        TransactionDraft::income(args.description.clone(), amount, date)
    } else {
        TransactionDraft::expense(args.description.clone(), amount, date)
    };

    let id = view.save(draft, None)?;
    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Transaction added", &[("ID", id.as_str())]),
        );
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &TransactionEditArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let view = mount(ctx)?;
    let transaction = resolve_id(view.transactions(), &args.id)?;

    let mut draft = TransactionDraft::from_transaction(transaction);
    if let Some(description) = &args.description {
        draft.description = description.clone();
    }
    if let Some(amount) = &args.amount {
        draft.amount = parse_amount(amount)?;
    }
    if let Some(date) = &args.date {
        draft.date = parse_datetime(date)?;
    }
    if args.income {
        draft.is_income = true;
    }
    if args.expense {
        draft.is_income = false;
    }

    let id = transaction.id.clone();
    view.save(draft, Some(&id))?;
    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Transaction updated", &[("ID", id.as_str())]),
        );
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let view = mount(ctx)?;
    let transaction = resolve_id(view.transactions(), &args.id)?;
    let id = transaction.id.clone();

    let what = format!(
        "transaction \"{}\" ({})",
        transaction.description,
        transaction.display_amount()
    );
    if !confirm_delete(ui_ctx.interactive, args.yes, &what)? {
        print(&ui_ctx, "Cancelled");
        return Ok(());
    }
    view.delete(&id)?;
    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Transaction deleted", &[("ID", id.as_str())]),
        );
    }
    Ok(())
}

pub fn handle_summary(ctx: &AppContext, args: &JsonArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let view = mount(ctx)?;
    let summary: Summary = view.summary();

    if ui_ctx.mode.is_json() {
        return print_json(&serde_json::json!({
            "income": summary.income,
            "expense": summary.expense,
            "balance": summary.balance(),
        }));
    }

    if !ctx.quiet() {
        print(&ui_ctx, &header(&ui_ctx, "finance", Some("summary")));
    }
    let columns = [
        Column::new("Income"),
        Column::new("Expense"),
        Column::new("Balance"),
    ];
    let rows = vec![vec![
        money(summary.income),
        money(summary.expense),
        money(summary.balance()),
    ]];
    print(&ui_ctx, &table(&ui_ctx, &columns, &rows));
    Ok(())
}
