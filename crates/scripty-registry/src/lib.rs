//! Scripty Registration Bookkeeping
//!
//! This crate manages the lifecycle of user-script rules around the
//! scripty-core matcher: persisting rules, regenerating their match-pattern
//! lists at save time, preparing snippets for injection, and driving the
//! browser-side injection host with per-rule error isolation.
//!
//! # Modules
//!
//! - `config`: explicit configuration passed in at construction
//! - `store`: JSON-backed rule store
//! - `prepare`: snippet cleaning and injection-ready script records
//! - `host`: the injection host seam to the browser APIs
//! - `registry`: the script manager tying it all together

pub mod config;
pub mod host;
pub mod prepare;
pub mod registry;
pub mod store;

pub use config::Config;
pub use host::{HostError, InjectionHost};
pub use prepare::{clean_source, PreparedScript};
pub use registry::{RegistryError, ScriptManager};
pub use store::{RuleStore, StoreError};
