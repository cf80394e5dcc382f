use flow_core::{AuthProvider, VERSION};

use crate::app::AppContext;
use crate::cli::{AccountArgs, WhoamiArgs};
use crate::helpers::{prompt_email, prompt_password};
use crate::ui::{hint, kv, print, print_json, receipt};

pub fn handle_register(ctx: &AppContext, args: &AccountArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let interactive = ui_ctx.interactive && !args.no_input;

    let email = prompt_email(interactive, args.email.as_deref())?;
    let password = prompt_password(interactive, true)?;
    let user = ctx.auth()?.sign_up(&email, &password)?;

    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Account created",
                &[("Email", user.email.as_str()), ("User ID", user.id.as_str())],
            ),
        );
        print(&ui_ctx, &hint(&ui_ctx, "flow tasks add \"My first task\""));
    }
    Ok(())
}

pub fn handle_login(ctx: &AppContext, args: &AccountArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let interactive = ui_ctx.interactive && !args.no_input;

    let email = prompt_email(interactive, args.email.as_deref())?;
    let password = prompt_password(interactive, false)?;
    let user = ctx.auth()?.sign_in(&email, &password)?;

    if !ctx.quiet() {
        print(
            &ui_ctx,
            &receipt(&ui_ctx, "Signed in", &[("Email", user.email.as_str())]),
        );
    }
    Ok(())
}

pub fn handle_logout(ctx: &AppContext) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    ctx.auth()?.sign_out()?;
    if !ctx.quiet() {
        print(&ui_ctx, &receipt(&ui_ctx, "Signed out", &[]));
    }
    Ok(())
}

pub fn handle_whoami(ctx: &AppContext, args: &WhoamiArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let session = ctx.session()?;
    let user = session.user();

    if ui_ctx.mode.is_json() {
        return print_json(&serde_json::json!({
            "id": user.id,
            "email": user.email,
            "version": VERSION,
        }));
    }

    print(&ui_ctx, &kv(&ui_ctx, "Email", &user.email));
    print(&ui_ctx, &kv(&ui_ctx, "User ID", &user.id));
    print(&ui_ctx, &kv(&ui_ctx, "Version", VERSION));
    Ok(())
}
