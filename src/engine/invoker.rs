//! engine::invoker
//!
//! Transaction invoker: executes reversible commands and unwinds them.
//!
//! # Unwind Order
//!
//! The invoker records commands in execution order, so popping from the
//! tail during `undo_all` gives the correct reverse undo order.
//!
//! # Best-Effort Unwind
//!
//! An unwind pass always drains the full history. An undo that fails is
//! recorded in the [`UnwindReport`] and logged, and the pass moves on to
//! the next command; one stuck step must not prevent the cleanup of the
//! steps before it. The report makes the best-effort nature an explicit,
//! testable contract: `complete` is true only when every undo succeeded,
//! and a failed step leaves the device in a state where that one step was
//! not reverted.

use tracing::{debug, warn};
use uuid::Uuid;

use super::command::{CommandError, Reversible};

/// Unique identifier for one logical transaction.
///
/// Used only for log correlation; the invoker itself is process-local.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxnId(String);

impl TxnId {
    /// Generate a new unique transaction id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TxnId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TxnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of an unwind pass.
#[derive(Debug, Default)]
pub struct UnwindReport {
    /// Labels of commands whose undo succeeded, in undo order.
    pub undone: Vec<String>,
    /// Commands whose undo failed, with their errors.
    pub failed: Vec<(String, CommandError)>,
    /// Whether every undo succeeded.
    pub complete: bool,
}

impl UnwindReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self {
            undone: vec![],
            failed: vec![],
            complete: true,
        }
    }

    /// Record a successful undo.
    pub fn record_success(&mut self, label: String) {
        self.undone.push(label);
    }

    /// Record a failed undo.
    pub fn record_failure(&mut self, label: String, error: CommandError) {
        self.failed.push((label, error));
        self.complete = false;
    }

    /// Check if there were any failures.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        if self.complete {
            format!("Undid {} commands successfully", self.undone.len())
        } else {
            format!(
                "Partial unwind: {} undone, {} failed",
                self.undone.len(),
                self.failed.len()
            )
        }
    }
}

/// Executes reversible commands for one logical transaction.
///
/// The invoker owns its history and the commands within it. History holds
/// exactly the commands that executed successfully and have not yet been
/// undone, in execution order.
///
/// # Example
///
/// ```ignore
/// let mut invoker = Invoker::new("attach-port");
///
/// invoker.execute(Box::new(create_nw)).await?;
/// if let Err(e) = invoker.execute(Box::new(attach_tp)).await {
///     let report = invoker.undo_all().await;
///     warn!("{}: {}", e, report.summary());
/// }
/// ```
pub struct Invoker {
    txn_id: TxnId,
    label: String,
    history: Vec<Box<dyn Reversible>>,
}

impl Invoker {
    /// Create an invoker for a new transaction.
    ///
    /// `label` names the operation for logs (e.g. the caller's verb).
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            txn_id: TxnId::new(),
            label: label.into(),
            history: vec![],
        }
    }

    /// This transaction's id.
    pub fn txn_id(&self) -> &TxnId {
        &self.txn_id
    }

    /// Number of commands currently in history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Run a command and record it on success.
    ///
    /// If the command fails, the error propagates and the command is *not*
    /// added to history: it never succeeded, so it must not be undone.
    ///
    /// # Errors
    ///
    /// Returns the command's own execution error.
    pub async fn execute(&mut self, command: Box<dyn Reversible>) -> Result<(), CommandError> {
        command.execute().await?;
        debug!(txn = %self.txn_id, label = %self.label, command = %command.describe(), "command applied");
        self.history.push(command);
        Ok(())
    }

    /// Undo every recorded command, most recent first.
    ///
    /// Individual undo failures are recorded and logged but do not stop
    /// the pass; the history is always fully drained. This method never
    /// fails.
    pub async fn undo_all(&mut self) -> UnwindReport {
        let mut report = UnwindReport::new();

        while let Some(command) = self.history.pop() {
            let label = command.describe();
            match command.undo().await {
                Ok(()) => {
                    debug!(txn = %self.txn_id, command = %label, "command undone");
                    report.record_success(label);
                }
                Err(error) => {
                    warn!(txn = %self.txn_id, command = %label, %error, "undo failed; continuing unwind");
                    report.record_failure(label, error);
                }
            }
        }

        report
    }
}
