//! Interactive input with environment-variable fallbacks.

use std::io::{self, IsTerminal, Read};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use dialoguer::{Confirm, Input, Password};
use zeroize::Zeroizing;

use flow_core::lock::Passphrase;

pub const PASSWORD_ENV: &str = "FLOW_PASSWORD";
pub const NOTE_PASSPHRASE_ENV: &str = "FLOW_NOTE_PASSPHRASE";

fn from_env(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .map(Zeroizing::new)
}

pub fn prompt_email(interactive: bool, given: Option<&str>) -> anyhow::Result<String> {
    if let Some(email) = given {
        return Ok(email.to_string());
    }
    if !interactive {
        return Err(anyhow::anyhow!("No email provided and no TTY available."));
    }
    Input::<String>::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read email: {}", e))
}

/// Account password from FLOW_PASSWORD, or a prompt (confirmed when `confirm`).
pub fn prompt_password(interactive: bool, confirm: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = from_env(PASSWORD_ENV) {
        return Ok(value);
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ));
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Note passphrase from FLOW_NOTE_PASSPHRASE, or a prompt.
///
/// A new lock asks twice; unlocking asks once.
pub fn prompt_note_passphrase(interactive: bool, new_lock: bool) -> anyhow::Result<Passphrase> {
    let raw = match from_env(NOTE_PASSPHRASE_ENV) {
        Some(value) => value,
        None if !interactive => {
            return Err(anyhow::anyhow!(
                "This note needs a password and no TTY is available. Set {}.",
                NOTE_PASSPHRASE_ENV
            ))
        }
        None => {
            let mut prompt = Password::new().with_prompt("Note password");
            if new_lock {
                prompt = prompt.with_confirmation("Confirm note password", "Passwords do not match");
            }
            prompt
                .interact()
                .map(Zeroizing::new)
                .map_err(|e| anyhow::anyhow!("Failed to read note password: {}", e))?
        }
    };
    Passphrase::new(raw.as_str()).map_err(|e| anyhow::anyhow!("{}", e))
}

/// Ask before deleting unless `--yes` was given.
pub fn confirm_delete(interactive: bool, yes: bool, what: &str) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "Refusing to delete without confirmation.\nHint: Pass --yes to delete non-interactively."
        ));
    }
    Confirm::new()
        .with_prompt(format!("Delete {}?", what))
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

/// Read a note body from --body, stdin, or $EDITOR.
///
/// `None` means the caller should keep its current body.
pub fn read_body(
    no_input: bool,
    body: Option<String>,
    initial_body: Option<&str>,
) -> anyhow::Result<Option<String>> {
    if body.is_some() {
        return Ok(body);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end();
        return Ok((!trimmed.is_empty()).then(|| trimmed.to_string()));
    }

    if no_input {
        return Ok(None);
    }

    read_body_from_editor(initial_body).map(Some)
}

fn read_body_from_editor(initial_body: Option<&str>) -> anyhow::Result<String> {
    let editor = std::env::var("EDITOR").map_err(|_| {
        anyhow::anyhow!("$EDITOR is not set; use --body or pipe content via stdin")
    })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let filename = format!("flow_note_{}_{}.md", std::process::id(), nanos);
    let path = std::env::temp_dir().join(filename);

    std::fs::write(&path, initial_body.unwrap_or(""))
        .map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;

    let status = Command::new(editor)
        .arg(&path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        let _ = std::fs::remove_file(&path);
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e));
    let _ = std::fs::remove_file(&path);

    Ok(contents?.trim_end().to_string())
}
