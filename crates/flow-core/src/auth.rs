//! Authentication provider and sessions.
//!
//! Views never look up "the current user" themselves: they are handed a
//! [`Session`] when mounted. [`LocalAuth`] is a self-contained provider that keeps
//! accounts in a JSON file with Argon2id password hashes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FlowError, Result};
use crate::fs::write_atomic;
use crate::store::{Collection, CollectionPath};

/// Minimum password length for local accounts.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Salt length in bytes.
const SALT_LENGTH: usize = 16;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Explicit session context passed to every view and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// The session user's collection.
    pub fn path(&self, collection: Collection) -> CollectionPath {
        CollectionPath::new(self.user.id.clone(), collection)
    }
}

/// Authentication provider interface.
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<User>;

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Auth` if the email is taken, and `FlowError::Validation`
    /// for a malformed email or a short password.
    fn sign_up(&self, email: &str, password: &str) -> Result<User>;

    /// Sign in with email and password.
    fn sign_in(&self, email: &str, password: &str) -> Result<User>;

    /// Sign out. Signing out with no active session is not an error.
    fn sign_out(&self) -> Result<()>;

    /// Session changes. The current value is delivered first.
    fn watch(&self) -> Receiver<Option<User>>;

    /// Session for the signed-in user.
    fn session(&self) -> Option<Session> {
        self.current_user().map(Session::new)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    id: String,
    email: String,
    password_hash: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AuthState {
    #[serde(default)]
    accounts: BTreeMap<String, Account>,
    /// Email of the signed-in account
    #[serde(default)]
    current: Option<String>,
}

impl AuthState {
    fn current_user(&self) -> Option<User> {
        let email = self.current.as_ref()?;
        self.accounts
            .get(email)
            .map(|account| User::new(account.id.clone(), account.email.clone()))
    }
}

/// Email/password accounts stored locally.
pub struct LocalAuth {
    path: Option<PathBuf>,
    state: Mutex<AuthState>,
    watchers: Mutex<Vec<Sender<Option<User>>>>,
}

impl LocalAuth {
    /// Accounts that live only as long as this value.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(AuthState::default()),
            watchers: Mutex::new(Vec::new()),
        }
    }

    /// Load accounts from `path` (created on first write).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                FlowError::Auth(format!("Failed to read accounts {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&contents).map_err(|e| {
                FlowError::Auth(format!("Failed to parse accounts {}: {}", path.display(), e))
            })?
        } else {
            AuthState::default()
        };
        Ok(Self {
            path: Some(path),
            state: Mutex::new(state),
            watchers: Mutex::new(Vec::new()),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, AuthState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, state: &AuthState) -> Result<()> {
        if let Some(path) = &self.path {
            let bytes = serde_json::to_vec_pretty(state)?;
            write_atomic(path, &bytes).map_err(|e| {
                FlowError::Auth(format!("Failed to write accounts {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn notify(&self, user: Option<User>) {
        let mut watchers = self
            .watchers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        watchers.retain(|sender| sender.send(user.clone()).is_ok());
    }
}

impl AuthProvider for LocalAuth {
    fn current_user(&self) -> Option<User> {
        self.lock_state().current_user()
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        let user = {
            let mut state = self.lock_state();
            if state.accounts.contains_key(&email) {
                return Err(FlowError::Auth(format!(
                    "An account already exists for {}",
                    email
                )));
            }
            let account = Account {
                id: Uuid::new_v4().simple().to_string(),
                email: email.clone(),
                password_hash: hash_password(password)?,
            };
            let user = User::new(account.id.clone(), account.email.clone());
            let mut next = state.clone();
            next.accounts.insert(email.clone(), account);
            next.current = Some(email);
            self.persist(&next)?;
            *state = next;
            user
        };

        tracing::info!(user = %user.id, "account created");
        self.notify(Some(user.clone()));
        Ok(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email)?;
        let user = {
            let mut state = self.lock_state();
            let account = state
                .accounts
                .get(&email)
                .filter(|account| verify_password(password, &account.password_hash))
                .ok_or_else(|| FlowError::Auth("Invalid email or password".to_string()))?;
            let user = User::new(account.id.clone(), account.email.clone());
            let mut next = state.clone();
            next.current = Some(email);
            self.persist(&next)?;
            *state = next;
            user
        };

        tracing::info!(user = %user.id, "signed in");
        self.notify(Some(user.clone()));
        Ok(user)
    }

    fn sign_out(&self) -> Result<()> {
        {
            let mut state = self.lock_state();
            if state.current.is_none() {
                return Ok(());
            }
            let mut next = state.clone();
            next.current = None;
            self.persist(&next)?;
            *state = next;
        }
        tracing::info!("signed out");
        self.notify(None);
        Ok(())
    }

    fn watch(&self) -> Receiver<Option<User>> {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(self.current_user());
        self.watchers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(sender);
        receiver
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(FlowError::Validation(format!(
            "'{}' is not a valid email address",
            email
        ))),
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FlowError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; SALT_LENGTH];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| FlowError::Auth(format!("Failed to generate salt: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| FlowError::Auth(format!("Failed to encode salt: {}", e)))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| FlowError::Auth(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sign_up_signs_in() {
        let auth = LocalAuth::in_memory();
        let user = auth.sign_up("Ada@Example.com", "correct horse").unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(auth.current_user(), Some(user.clone()));
        assert_eq!(auth.session().unwrap().user_id(), user.id);
    }

    #[test]
    fn test_duplicate_sign_up_rejected() {
        let auth = LocalAuth::in_memory();
        auth.sign_up("ada@example.com", "correct horse").unwrap();
        assert!(matches!(
            auth.sign_up("ada@example.com", "another pw"),
            Err(FlowError::Auth(_))
        ));
    }

    #[test]
    fn test_sign_in_checks_password() {
        let auth = LocalAuth::in_memory();
        let user = auth.sign_up("ada@example.com", "correct horse").unwrap();
        auth.sign_out().unwrap();

        assert!(auth.sign_in("ada@example.com", "wrong horse").is_err());
        assert!(auth.current_user().is_none());
        assert_eq!(auth.sign_in("ada@example.com", "correct horse").unwrap(), user);
    }

    #[test]
    fn test_validation() {
        let auth = LocalAuth::in_memory();
        assert!(matches!(
            auth.sign_up("not-an-email", "long enough"),
            Err(FlowError::Validation(_))
        ));
        assert!(matches!(
            auth.sign_up("ada@example.com", "short"),
            Err(FlowError::Validation(_))
        ));
    }

    #[test]
    fn test_watch_delivers_changes() {
        let auth = LocalAuth::in_memory();
        let changes = auth.watch();
        assert_eq!(changes.try_recv().unwrap(), None);

        let user = auth.sign_up("ada@example.com", "correct horse").unwrap();
        assert_eq!(changes.try_recv().unwrap(), Some(user));

        auth.sign_out().unwrap();
        assert_eq!(changes.try_recv().unwrap(), None);

        // Signing out again changes nothing.
        auth.sign_out().unwrap();
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn test_accounts_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.json");

        let user = LocalAuth::open(&path)
            .unwrap()
            .sign_up("ada@example.com", "correct horse")
            .unwrap();

        let reopened = LocalAuth::open(&path).unwrap();
        assert_eq!(reopened.current_user(), Some(user));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("correct horse"));
        assert!(contents.contains("$argon2id$"));
    }

    #[test]
    fn test_failed_sign_up_write_leaves_no_session() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();

        let auth = LocalAuth::open(blocker.join("accounts.json")).unwrap();
        let changes = auth.watch();
        assert_eq!(changes.try_recv().unwrap(), None);

        assert!(matches!(
            auth.sign_up("ada@example.com", "correct horse"),
            Err(FlowError::Auth(_))
        ));
        assert!(auth.current_user().is_none());
        assert!(changes.try_recv().is_err());
        // The account was never created either.
        assert!(matches!(
            auth.sign_in("ada@example.com", "correct horse"),
            Err(FlowError::Auth(msg)) if msg == "Invalid email or password"
        ));
    }

    #[test]
    fn test_failed_sign_in_write_stays_signed_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        let auth = LocalAuth::open(&path).unwrap();
        auth.sign_up("ada@example.com", "correct horse").unwrap();
        auth.sign_out().unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(auth.sign_in("ada@example.com", "correct horse").is_err());
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_session_paths() {
        let session = Session::new(User::new("u1", "a@b.co"));
        assert_eq!(session.path(Collection::Tasks).to_string(), "users/u1/tasks");
    }
}
