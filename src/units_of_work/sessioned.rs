//! Unit of work backed by an externally managed session.

use anyhow::Result;

use super::UnitOfWork;

/// A connection-like resource with transactional semantics.
pub trait Session {
    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Unit of work that opens a fresh session per scope.
///
/// The factory runs on `begin`; `commit` and `rollback` are forwarded to the
/// live session, and leaving the scope closes and drops it.
pub struct SessionedUnitOfWork<S, F>
where
    S: Session,
    F: FnMut() -> Result<S>,
{
    factory: F,
    session: Option<S>,
}

impl<S, F> SessionedUnitOfWork<S, F>
where
    S: Session,
    F: FnMut() -> Result<S>,
{
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            session: None,
        }
    }

    /// The live session, when a scope is open.
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }
}

impl<S, F> UnitOfWork for SessionedUnitOfWork<S, F>
where
    S: Session,
    F: FnMut() -> Result<S>,
{
    fn commit(&mut self) -> Result<()> {
        if let Some(session) = self.session.as_mut() {
            session.commit()?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if let Some(session) = self.session.as_mut() {
            session.rollback()?;
        }
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        self.session = Some((self.factory)()?);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            session.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units_of_work::UnitOfWorkExt;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Journal {
        committed: bool,
        rolled_back: bool,
        closed: bool,
    }

    struct RecordingSession {
        journal: Rc<RefCell<Journal>>,
    }

    impl Session for RecordingSession {
        fn commit(&mut self) -> Result<()> {
            self.journal.borrow_mut().committed = true;
            Ok(())
        }

        fn rollback(&mut self) -> Result<()> {
            self.journal.borrow_mut().rolled_back = true;
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.journal.borrow_mut().closed = true;
            Ok(())
        }
    }

    #[test]
    fn test_opens_session_per_scope_and_closes_it() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let handle = Rc::clone(&journal);
        let mut uow = SessionedUnitOfWork::new(move || {
            Ok(RecordingSession {
                journal: Rc::clone(&handle),
            })
        });

        uow.scoped(true, |uow| {
            assert!(uow.session().is_some());
            Ok(())
        })
        .unwrap();

        assert!(uow.session().is_none());
        assert!(journal.borrow().committed);
        assert!(journal.borrow().closed);
    }

    #[test]
    fn test_rolls_back_session_on_failure() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let handle = Rc::clone(&journal);
        let mut uow = SessionedUnitOfWork::new(move || {
            Ok(RecordingSession {
                journal: Rc::clone(&handle),
            })
        });

        let result: Result<()> = uow.scoped(true, |_| Err(anyhow::anyhow!("boom")));
        assert!(result.is_err());
        assert!(journal.borrow().rolled_back);
        assert!(!journal.borrow().committed);
        assert!(journal.borrow().closed);
    }
}
