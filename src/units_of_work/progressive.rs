//! Unit of work that carries a progress bar across its scope.

use anyhow::Result;

use super::UnitOfWork;
use crate::messages::Message;
use crate::progress::ProgressBar;

/// Wraps another unit of work and reports progress alongside it.
///
/// Leaving the scope closes a non-persistent bar; a bar constructed to
/// outlive the scope stays rendered.
pub struct ProgressiveUnitOfWork<U, P>
where
    U: UnitOfWork,
    P: ProgressBar,
{
    inner: U,
    progress: P,
}

impl<U, P> ProgressiveUnitOfWork<U, P>
where
    U: UnitOfWork,
    P: ProgressBar,
{
    pub fn new(inner: U, progress: P) -> Self {
        Self { inner, progress }
    }

    pub fn progress(&mut self) -> &mut P {
        &mut self.progress
    }

    pub fn inner(&self) -> &U {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut U {
        &mut self.inner
    }
}

impl<U, P> UnitOfWork for ProgressiveUnitOfWork<U, P>
where
    U: UnitOfWork,
    P: ProgressBar,
{
    fn commit(&mut self) -> Result<()> {
        self.inner.commit()
    }

    fn rollback(&mut self) -> Result<()> {
        self.inner.rollback()
    }

    fn begin(&mut self) -> Result<()> {
        self.inner.begin()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()?;
        if !self.progress.leave() {
            self.progress.close();
        }
        Ok(())
    }

    fn collect_events(&mut self) -> Vec<Box<dyn Message>> {
        self.inner.collect_events()
    }
}
