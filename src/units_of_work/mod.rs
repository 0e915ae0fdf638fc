//! Unit-of-work pattern.
//!
//! A unit of work draws an atomic boundary around a batch of repository
//! work: everything inside a scope commits together or not at all. Units of
//! work are also the place the bus harvests domain events from between
//! messages.

use anyhow::Result;

use crate::messages::Message;

pub mod eventful;
#[cfg(feature = "progress")]
pub mod progressive;
pub mod sessioned;

pub use eventful::EventfulUnitOfWork;
#[cfg(feature = "progress")]
pub use progressive::ProgressiveUnitOfWork;
pub use sessioned::{Session, SessionedUnitOfWork};

/// Atomic boundary around a batch of repository work.
pub trait UnitOfWork {
    /// Commit changes.
    fn commit(&mut self) -> Result<()>;

    /// Roll back changes.
    fn rollback(&mut self) -> Result<()>;

    /// Hook invoked when a scope is entered.
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Hook invoked when a scope is left.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Drain the events raised since the last collection.
    fn collect_events(&mut self) -> Vec<Box<dyn Message>> {
        Vec::new()
    }
}

/// Scoped execution over a unit of work.
pub trait UnitOfWorkExt: UnitOfWork {
    /// Run `work` inside a scope.
    ///
    /// `begin` runs first. On success the scope commits when `auto_commit`
    /// is set; on failure it rolls back and propagates the error. The scope
    /// is closed either way.
    fn scoped<T>(
        &mut self,
        auto_commit: bool,
        work: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T>
    where
        Self: Sized,
    {
        self.begin()?;
        match work(self) {
            Ok(value) => {
                if auto_commit {
                    self.commit()?;
                }
                self.close()?;
                Ok(value)
            }
            Err(error) => {
                // Keep the original failure even when rollback also fails.
                let _ = self.rollback();
                self.close()?;
                Err(error)
            }
        }
    }
}

impl<U: UnitOfWork> UnitOfWorkExt for U {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeUnitOfWork;
    use anyhow::anyhow;

    #[test]
    fn test_scoped_commits_on_success_when_auto_commit() {
        let mut uow = FakeUnitOfWork::new();
        let result = uow.scoped(true, |_| Ok(42));
        assert_eq!(result.unwrap(), 42);
        assert!(uow.committed());
        assert!(!uow.rolled_back());
    }

    #[test]
    fn test_scoped_skips_commit_without_auto_commit() {
        let mut uow = FakeUnitOfWork::new();
        uow.scoped(false, |_| Ok(())).unwrap();
        assert!(!uow.committed());
    }

    #[test]
    fn test_scoped_rolls_back_on_failure() {
        let mut uow = FakeUnitOfWork::new();
        let result: Result<()> = uow.scoped(true, |_| Err(anyhow!("boom")));
        assert!(result.is_err());
        assert!(uow.rolled_back());
        assert!(!uow.committed());
    }
}
