//! Flow CLI - tasks, money, and notes from the terminal
//!
//! This is the command-line front end for Flow. Each invocation mounts the views it
//! needs against the local document store, performs one action, and exits.

mod app;
mod cli;
mod commands;
mod config;
mod helpers;
mod logging;
mod ui;

use clap::Parser;
use flow_core::{FlowError, VERSION};

use crate::app::AppContext;
use crate::cli::{Cli, Commands, FinanceSubcommand, NotesSubcommand, TasksSubcommand};
use crate::commands::{account, finance, init, misc, notes, tasks};
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false);
        let error_msg = match e.downcast_ref::<FlowError>() {
            Some(flow) => flow.user_message(),
            None => format!("{}", e),
        };
        let (message, hint) = split_hint(&error_msg);
        let hint = hint.or_else(|| contextual_hint(message));

        print_error(&ui_ctx, message, hint.as_deref());
        std::process::exit(1);
    }
}

/// Split an explicit "\nHint: ..." suffix off an error message.
fn split_hint(error: &str) -> (&str, Option<String>) {
    match error.find("\nHint:") {
        Some(idx) => (
            error[..idx].trim_end(),
            Some(error[idx + "\nHint:".len()..].trim().to_string()),
        ),
        None => (error, None),
    }
}

/// Hints for common failures that do not carry their own.
fn contextual_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("config file not found") {
        return Some("Run `flow init` to get started.".to_string());
    }
    if error_lower.contains("task not found") {
        return Some("Run `flow tasks list` to find task IDs.".to_string());
    }
    if error_lower.contains("transaction not found") {
        return Some("Run `flow finance list` to find transaction IDs.".to_string());
    }
    if error_lower.contains("note not found") {
        return Some("Run `flow notes list` to find note IDs.".to_string());
    }
    if error_lower.contains("incorrect password!") || error_lower.contains("failed to decrypt") {
        return Some(
            "Check the note's password. Set FLOW_NOTE_PASSPHRASE when running without a TTY."
                .to_string(),
        );
    }
    if error_lower.contains("invalid email or password") {
        return Some("Run `flow register <email>` to create an account.".to_string());
    }

    None
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args)?,
        Some(Commands::Register(args)) => account::handle_register(ctx, args)?,
        Some(Commands::Login(args)) => account::handle_login(ctx, args)?,
        Some(Commands::Logout) => account::handle_logout(ctx)?,
        Some(Commands::Whoami(args)) => account::handle_whoami(ctx, args)?,
        Some(Commands::Tasks(args)) => match &args.command {
            TasksSubcommand::List(list_args) => tasks::handle_list(ctx, list_args)?,
            TasksSubcommand::Add(add_args) => tasks::handle_add(ctx, add_args)?,
            TasksSubcommand::Edit(edit_args) => tasks::handle_edit(ctx, edit_args)?,
            TasksSubcommand::Done(id_args) => tasks::handle_done(ctx, id_args)?,
            TasksSubcommand::Delete(delete_args) => tasks::handle_delete(ctx, delete_args)?,
            TasksSubcommand::Lists(json_args) => tasks::handle_lists(ctx, json_args)?,
        },
        Some(Commands::Finance(args)) => match &args.command {
            FinanceSubcommand::List(json_args) => finance::handle_list(ctx, json_args)?,
            FinanceSubcommand::Add(add_args) => finance::handle_add(ctx, add_args)?,
            FinanceSubcommand::Edit(edit_args) => finance::handle_edit(ctx, edit_args)?,
            FinanceSubcommand::Delete(delete_args) => finance::handle_delete(ctx, delete_args)?,
            FinanceSubcommand::Summary(json_args) => finance::handle_summary(ctx, json_args)?,
        },
        Some(Commands::Notes(args)) => match &args.command {
            NotesSubcommand::List(json_args) => notes::handle_list(ctx, json_args)?,
            NotesSubcommand::Add(add_args) => notes::handle_add(ctx, add_args)?,
            NotesSubcommand::Show(show_args) => notes::handle_show(ctx, show_args)?,
            NotesSubcommand::Edit(edit_args) => notes::handle_edit(ctx, edit_args)?,
            NotesSubcommand::Delete(delete_args) => notes::handle_delete(ctx, delete_args)?,
        },
        Some(Commands::Completions(args)) => misc::handle_completions(args)?,
        None => {
            println!("Flow v{}", VERSION);
            println!("\nQuickstart:");
            println!("  flow init");
            println!("  flow register you@example.com");
            println!("  flow tasks add \"Ship it\" --list Work");
            println!("  flow finance add \"Coffee\" 3.50");
            println!("  flow notes add \"Ideas\" --body \"...\" --lock");
            println!("\nRun `flow --help` for full usage.");
        }
    }

    Ok(())
}
