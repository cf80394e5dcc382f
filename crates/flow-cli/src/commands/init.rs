use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_auth_path, default_store_path, write_config, FlowConfig};
use crate::ui::theme::{styled, styles};
use crate::ui::{hint, print, receipt, UiContext};

fn prompt_path(
    ui_ctx: &UiContext,
    interactive: bool,
    given: Option<&str>,
    label: &str,
    help: &str,
    default: PathBuf,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = given {
        return Ok(PathBuf::from(path));
    }
    if !interactive {
        return Ok(default);
    }

    if ui_ctx.mode.is_pretty() {
        println!("  {}", styled(help, styles::dim(), ui_ctx.color));
    }
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .default(default.to_string_lossy().to_string())
        .interact_text()?;
    Ok(PathBuf::from(value.trim()))
}

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let interactive = ui_ctx.interactive && !args.no_input;

    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists: {}\nHint: Pass --force to overwrite it.",
            config_path.display()
        ));
    }

    let store_path = prompt_path(
        &ui_ctx,
        interactive,
        args.store_path.as_deref(),
        "Store file",
        "Tasks, transactions, and notes are kept here.",
        default_store_path()?,
    )?;
    let auth_path = prompt_path(
        &ui_ctx,
        interactive,
        args.auth_path.as_deref(),
        "Accounts file",
        "Local accounts and the current sign-in are kept here.",
        default_auth_path()?,
    )?;

    for path in [&store_path, &auth_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
            })?;
        }
    }

    let config = FlowConfig::new(store_path.clone(), auth_path.clone());
    write_config(&config_path, &config)?;
    tracing::info!(config = %config_path.display(), "config written");

    if !ctx.quiet() {
        let config_display = config_path.display().to_string();
        let store_display = store_path.display().to_string();
        let auth_display = auth_path.display().to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Flow is ready",
                &[
                    ("Config", config_display.as_str()),
                    ("Store", store_display.as_str()),
                    ("Accounts", auth_display.as_str()),
                ],
            ),
        );
        print(&ui_ctx, &hint(&ui_ctx, "flow register <email>"));
    }
    Ok(())
}
