use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const PASSWORD: &str = "hunter22";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_flow"))
}

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("c")).expect("create config dir");
        std::fs::create_dir_all(dir.path().join("d")).expect("create data dir");
        Self { dir }
    }

    fn config_home(&self) -> PathBuf {
        self.dir.path().join("c")
    }

    fn data_home(&self) -> PathBuf {
        self.dir.path().join("d")
    }

    fn store_file(&self) -> PathBuf {
        self.data_home().join("flow").join("store.json")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(bin());
        cmd.args(args)
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.data_home())
            .env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env("FLOW_PASSWORD", PASSWORD)
            .env_remove("FLOW_CONFIG")
            .env_remove("FLOW_STORE")
            .env_remove("FLOW_LOG")
            .env_remove("FLOW_NOTE_PASSPHRASE");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("run flow")
    }

    fn run_with(&self, args: &[&str], vars: &[(&str, &str)]) -> Output {
        let mut cmd = self.command(args);
        for (key, value) in vars {
            cmd.env(key, value);
        }
        cmd.output().expect("run flow")
    }

    fn signed_in() -> Self {
        let sandbox = Self::new();
        let init = sandbox.run(&["init", "--no-input"]);
        assert_success(&init, "init");
        let register = sandbox.run(&["register", "me@example.com", "--no-input"]);
        assert_success(&register, "register");
        sandbox
    }
}

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{} failed: {}",
        what,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn plain_value(output: &Output, key: &str) -> String {
    let prefix = format!("{}=", key);
    stdout(output)
        .lines()
        .find_map(|line| line.strip_prefix(&prefix).map(str::to_string))
        .unwrap_or_else(|| panic!("no {} in output: {}", key, stdout(output)))
}

fn config_exists(config_home: &Path) -> bool {
    config_home.join("flow").join("config.toml").exists()
}

#[test]
fn init_writes_config_and_register_signs_in() {
    let sandbox = Sandbox::signed_in();
    assert!(config_exists(&sandbox.config_home()));

    let whoami = sandbox.run(&["whoami", "--json"]);
    assert_success(&whoami, "whoami");
    let value = json(&whoami);
    assert_eq!(value["email"], "me@example.com");
    assert!(value["id"].as_str().is_some_and(|id| !id.is_empty()));

    let again = sandbox.run(&["init", "--no-input"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("--force"));
}

#[test]
fn commands_without_config_point_at_init() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["tasks", "list"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Config file not found"), "stderr: {}", err);
    assert!(err.contains("flow init"), "stderr: {}", err);
}

#[test]
fn tasks_list_high_priority_first_and_done_toggles() {
    let sandbox = Sandbox::signed_in();

    let home = sandbox.run(&["tasks", "add", "Water plants", "-p", "low", "-l", "Home"]);
    assert_success(&home, "tasks add home");
    let work = sandbox.run(&["tasks", "add", "Ship release", "-l", "Work"]);
    assert_success(&work, "tasks add work");
    let work_id = plain_value(&work, "id");

    let list = sandbox.run(&["tasks", "list", "--json"]);
    assert_success(&list, "tasks list");
    let tasks = json(&list);
    let titles: Vec<&str> = tasks
        .as_array()
        .expect("task array")
        .iter()
        .filter_map(|task| task["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Ship release", "Water plants"]);

    let done = sandbox.run(&["tasks", "done", &work_id[..8]]);
    assert_success(&done, "tasks done");

    let filtered = sandbox.run(&["tasks", "list", "--list", "Work", "--json"]);
    assert_success(&filtered, "tasks list work");
    let tasks = json(&filtered);
    let tasks = tasks.as_array().expect("task array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["isCompleted"], true);

    let lists = sandbox.run(&["tasks", "lists", "--json"]);
    assert_success(&lists, "tasks lists");
    let lists = json(&lists);
    let names: Vec<&str> = lists
        .as_array()
        .expect("list array")
        .iter()
        .filter_map(|name| name.as_str())
        .collect();
    assert!(names.contains(&"Home"));
    assert!(names.contains(&"Work"));
}

#[test]
fn delete_without_tty_needs_yes() {
    let sandbox = Sandbox::signed_in();
    let add = sandbox.run(&["tasks", "add", "Temporary"]);
    assert_success(&add, "tasks add");
    let id = plain_value(&add, "id");

    let refused = sandbox.run(&["tasks", "delete", &id]);
    assert!(!refused.status.success());
    assert!(stderr(&refused).contains("--yes"));

    let deleted = sandbox.run(&["tasks", "delete", &id, "--yes"]);
    assert_success(&deleted, "tasks delete");

    let list = sandbox.run(&["tasks", "list", "--json"]);
    assert_eq!(json(&list).as_array().map(Vec::len), Some(0));
}

#[test]
fn finance_summary_balances_income_and_expense() {
    let sandbox = Sandbox::signed_in();

    let salary = sandbox.run(&[
        "finance", "add", "Salary", "2,000", "--income", "--date", "2024-01-15",
    ]);
    assert_success(&salary, "finance add salary");
    let rent = sandbox.run(&["finance", "add", "Rent", "$800", "--date", "2024-02-01"]);
    assert_success(&rent, "finance add rent");

    let list = sandbox.run(&["finance", "list", "--json"]);
    assert_success(&list, "finance list");
    let transactions = json(&list);
    let descriptions: Vec<&str> = transactions
        .as_array()
        .expect("transaction array")
        .iter()
        .filter_map(|t| t["description"].as_str())
        .collect();
    assert_eq!(descriptions, vec!["Rent", "Salary"]);

    let summary = sandbox.run(&["finance", "summary", "--json"]);
    assert_success(&summary, "finance summary");
    let summary = json(&summary);
    assert_eq!(summary["income"].as_f64(), Some(2000.0));
    assert_eq!(summary["expense"].as_f64(), Some(800.0));
    assert_eq!(summary["balance"].as_f64(), Some(1200.0));

    let negative = sandbox.run(&["finance", "add", "Oops", "-5"]);
    assert!(!negative.status.success());
}

#[test]
fn locked_note_needs_the_right_password() {
    let sandbox = Sandbox::signed_in();

    let add = sandbox.run_with(
        &["notes", "add", "Launch", "--body", "the code is 1234", "--lock"],
        &[("FLOW_NOTE_PASSPHRASE", "sesame")],
    );
    assert_success(&add, "notes add");
    let id = plain_value(&add, "id");

    let raw = std::fs::read_to_string(sandbox.store_file()).expect("read store file");
    assert!(!raw.contains("the code is 1234"));

    let list = sandbox.run(&["notes", "list", "--json"]);
    assert_success(&list, "notes list");
    let notes = json(&list);
    assert_eq!(notes[0]["locked"], true);
    assert_eq!(notes[0]["preview"], "This note is locked");

    let wrong = sandbox.run_with(
        &["notes", "show", &id, "--no-input"],
        &[("FLOW_NOTE_PASSPHRASE", "open")],
    );
    assert!(!wrong.status.success());
    assert!(stderr(&wrong).contains("Incorrect password!"));

    let missing = sandbox.run(&["notes", "show", &id, "--no-input"]);
    assert!(!missing.status.success());
    assert!(stderr(&missing).contains("FLOW_NOTE_PASSPHRASE"));

    let right = sandbox.run_with(
        &["notes", "show", &id, "--json", "--no-input"],
        &[("FLOW_NOTE_PASSPHRASE", "sesame")],
    );
    assert_success(&right, "notes show");
    assert_eq!(json(&right)["content"], "the code is 1234");
}

#[test]
fn unlocking_a_note_stores_it_in_the_clear() {
    let sandbox = Sandbox::signed_in();
    let add = sandbox.run_with(
        &["notes", "add", "Diary", "--body", "dear diary", "--lock"],
        &[("FLOW_NOTE_PASSPHRASE", "sesame")],
    );
    assert_success(&add, "notes add");
    let id = plain_value(&add, "id");

    let edit = sandbox.run_with(
        &["notes", "edit", &id, "--unlock", "--no-input"],
        &[("FLOW_NOTE_PASSPHRASE", "sesame")],
    );
    assert_success(&edit, "notes edit");

    let show = sandbox.run(&["notes", "show", &id, "--json", "--no-input"]);
    assert_success(&show, "notes show");
    let note = json(&show);
    assert_eq!(note["locked"], false);
    assert_eq!(note["content"], "dear diary");
}

#[test]
fn logout_requires_signing_in_again() {
    let sandbox = Sandbox::signed_in();
    let logout = sandbox.run(&["logout"]);
    assert_success(&logout, "logout");

    let list = sandbox.run(&["tasks", "list"]);
    assert!(!list.status.success());
    let err = stderr(&list);
    assert!(err.contains("Not signed in"), "stderr: {}", err);

    let bad = sandbox.run_with(&["login", "me@example.com", "--no-input"], &[("FLOW_PASSWORD", "wrong-one")]);
    assert!(!bad.status.success());

    let login = sandbox.run(&["login", "me@example.com", "--no-input"]);
    assert_success(&login, "login");
    let list = sandbox.run(&["tasks", "list", "--json"]);
    assert_success(&list, "tasks list");
}
