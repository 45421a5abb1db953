//! Injection host seam
//!
//! The browser side of script registration: in the extension this is the
//! `userScripts` and `scripting` APIs, in tests a recording double. The
//! registry only ever talks to the browser through this trait.

use crate::prepare::PreparedScript;

/// Error reported by the injection host. Host failures are per-rule and
/// recoverable; the registry logs them and keeps the other rules running.
#[derive(Debug, Clone, thiserror::Error)]
#[error("injection host error: {0}")]
pub struct HostError(pub String);

/// Browser-side registration and execution of prepared snippets.
pub trait InjectionHost {
    /// Register a snippet for injection on its match patterns.
    fn register(&mut self, script: &PreparedScript) -> Result<(), HostError>;

    /// Replace a previously registered snippet.
    fn update(&mut self, script: &PreparedScript) -> Result<(), HostError>;

    /// Remove a registered snippet. Unknown ids are not an error.
    fn unregister(&mut self, id: &str) -> Result<(), HostError>;

    /// Run a snippet in the page execution context of the current tab.
    /// Runtime errors inside the snippet are the host's to report; they
    /// must not take down other snippets.
    fn execute(&mut self, script: &PreparedScript) -> Result<(), HostError>;
}

/// Test double recording every host call.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub registered: Vec<String>,
    pub updated: Vec<String>,
    pub unregistered: Vec<String>,
    pub executed: Vec<String>,
    /// Ids whose `register` call should fail.
    pub fail_register: Vec<String>,
    /// Ids whose `execute` call should fail.
    pub fail_execute: Vec<String>,
}

impl InjectionHost for RecordingHost {
    fn register(&mut self, script: &PreparedScript) -> Result<(), HostError> {
        if self.fail_register.iter().any(|id| id == &script.id) {
            return Err(HostError(format!("registration of {} rejected", script.id)));
        }
        self.registered.push(script.id.clone());
        Ok(())
    }

    fn update(&mut self, script: &PreparedScript) -> Result<(), HostError> {
        self.updated.push(script.id.clone());
        Ok(())
    }

    fn unregister(&mut self, id: &str) -> Result<(), HostError> {
        self.unregistered.push(id.to_string());
        Ok(())
    }

    fn execute(&mut self, script: &PreparedScript) -> Result<(), HostError> {
        if self.fail_execute.iter().any(|id| id == &script.id) {
            return Err(HostError(format!("script {} threw", script.id)));
        }
        self.executed.push(script.id.clone());
        Ok(())
    }
}
