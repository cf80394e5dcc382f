//! Input and parsing helpers for the CLI.
//!
//! - Password, passphrase, confirmation, and body input (`input`)
//! - Datetime, amount, and id prefix parsing (`parsing`)

mod input;
mod parsing;

pub use input::{confirm_delete, prompt_email, prompt_note_passphrase, prompt_password, read_body};
pub use parsing::{parse_amount, parse_datetime, parse_priority, resolve_id};
