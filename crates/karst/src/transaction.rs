//! Transaction and savepoint state machine.
//!
//! Nesting depth lives in an atomic counter on the connection; savepoint
//! names encode the depth at creation time (`S<token>D<depth>`) so that a
//! partial rollback can restore the counter from the name alone. The
//! counter is atomic even though a connection serves one thread at a time.

use crate::connection::Connection;
use karst_core::{Error, Result};
use rand::Rng;
use std::sync::atomic::Ordering::{AcqRel, Acquire, Release};

/// Result classes after which the engine recommends issuing an explicit
/// ROLLBACK.
const RECOVERABLE: [i32; 5] = [
    rusqlite::ffi::SQLITE_IOERR,
    rusqlite::ffi::SQLITE_FULL,
    rusqlite::ffi::SQLITE_BUSY,
    rusqlite::ffi::SQLITE_NOMEM,
    rusqlite::ffi::SQLITE_INTERRUPT,
];

fn is_recoverable(err: &Error) -> bool {
    err.sqlite_code()
        .is_some_and(|code| RECOVERABLE.contains(&code))
}

fn is_busy(err: &Error) -> bool {
    err.sqlite_code() == Some(rusqlite::ffi::SQLITE_BUSY)
}

impl Connection {
    /// Whether a transaction or savepoint is currently open.
    pub fn in_transaction(&self) -> bool {
        self.depth.load(Acquire) > 0
    }

    /// Begins an outermost transaction. Valid only when none is open;
    /// calling it inside a transaction is a caller error and issues no
    /// native command.
    pub fn begin_transaction(&self) -> Result<()> {
        if self.depth.compare_exchange(0, 1, AcqRel, Acquire).is_err() {
            return Err(Error::invalid_operation(
                "cannot begin a transaction while already in a transaction",
            ));
        }

        if let Err(err) = self.execute_raw("begin transaction") {
            self.begin_failed(&err);
            return Err(err);
        }

        Ok(())
    }

    /// Creates a savepoint at the current point in the transaction
    /// timeline, beginning a transaction if none is open, and returns its
    /// generated name.
    pub fn savepoint(&self) -> Result<String> {
        let depth = self.depth.fetch_add(1, AcqRel);
        let token = rand::thread_rng().gen_range(0..i16::MAX as i32);
        let name = format!("S{token}D{depth}");

        if let Err(err) = self.execute_raw(&format!("savepoint {name}")) {
            self.begin_failed(&err);
            return Err(err);
        }

        Ok(name)
    }

    /// Failure policy shared by begin and savepoint: a recoverable engine
    /// failure forces a full rollback to the idle state as a safety net;
    /// anything else restores the previous depth.
    fn begin_failed(&self, err: &Error) {
        if is_recoverable(err) {
            self.force_rollback();
        } else {
            self.depth.fetch_sub(1, AcqRel);
        }
    }

    /// Full rollback with its own failure discarded; used only on cleanup
    /// paths where the original error must not be masked.
    fn force_rollback(&self) {
        if self.depth.swap(0, AcqRel) > 0 {
            let _ = self.execute_raw("rollback");
        }
    }

    /// Rolls back everything and leaves the transaction stack empty; a
    /// no-op when no transaction is open.
    pub fn rollback(&self) -> Result<()> {
        if self.depth.swap(0, AcqRel) > 0 {
            self.execute_raw("rollback")?;
        }
        Ok(())
    }

    /// Rolls back to a savepoint returned by [`Connection::savepoint`],
    /// undoing only the work performed after it.
    pub fn rollback_to(&self, savepoint: &str) -> Result<()> {
        self.savepoint_execute(savepoint, "rollback to ")
    }

    /// Releases a savepoint, making the work since it permanent (pending
    /// the outer transaction, if one encloses it). A Busy failure gets a
    /// best-effort full rollback before the original error re-raises.
    pub fn release(&self, savepoint: &str) -> Result<()> {
        match self.savepoint_execute(savepoint, "release ") {
            Err(err) if is_busy(&err) => {
                let _ = self.execute_raw("rollback");
                Err(err)
            }
            other => other,
        }
    }

    fn savepoint_execute(&self, savepoint: &str, command: &str) -> Result<()> {
        let invalid = || {
            Error::invalid_operation(format!(
                "savepoint `{savepoint}` is not valid; it should be the result of a call to savepoint()"
            ))
        };

        let depth = Self::savepoint_depth(savepoint).ok_or_else(invalid)?;
        let current = self.depth.load(Acquire);
        if depth < 0 || depth >= current {
            return Err(invalid());
        }

        self.depth.store(depth, Release);
        self.execute_raw(&format!("{command}{savepoint}"))?;
        Ok(())
    }

    /// Depth encoded in a savepoint name, e.g. 2 for `S1384D2`.
    fn savepoint_depth(savepoint: &str) -> Option<i32> {
        let marker = savepoint.find('D')?;
        if marker < 2 || marker + 1 >= savepoint.len() {
            return None;
        }
        savepoint[marker + 1..].parse().ok()
    }

    /// Commits the open transaction; a no-op when none is open. A commit
    /// failure gets a best-effort rollback before the original error
    /// re-raises.
    pub fn commit(&self) -> Result<()> {
        if self.depth.swap(0, AcqRel) != 0 {
            if let Err(err) = self.execute_raw("commit") {
                let _ = self.execute_raw("rollback");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Runs `action` inside a savepoint: released on success, fully rolled
    /// back (not just to the savepoint) on failure, with the action's
    /// error re-raised.
    pub fn run_in_transaction<R>(&self, action: impl FnOnce(&Self) -> Result<R>) -> Result<R> {
        let savepoint = self.savepoint()?;
        match action(self) {
            Ok(value) => {
                self.release(&savepoint)?;
                Ok(value)
            }
            Err(err) => {
                let _ = self.rollback();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn savepoint_depth_parsing() {
        assert_eq!(Connection::savepoint_depth("S1384D2"), Some(2));
        assert_eq!(Connection::savepoint_depth("S0D0"), Some(0));
        assert_eq!(Connection::savepoint_depth("S12D10"), Some(10));
        assert_eq!(Connection::savepoint_depth("D2"), None);
        assert_eq!(Connection::savepoint_depth("S1384D"), None);
        assert_eq!(Connection::savepoint_depth("nonsense"), None);
    }
}
