//! Application-level plumbing for the Flow CLI.
//!
//! - Application context: CLI flags plus lazily loaded config and backends
//! - Path resolution for the config, store, and account files

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::resolve_config_path;
