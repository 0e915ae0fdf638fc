//! SQLite-backed sessions for sessioned repositories.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

use crate::units_of_work::Session;

/// Transactional session over a SQLite connection.
///
/// `begin` opens an explicit transaction; `commit` and `rollback` end it.
/// Statements executed outside a transaction autocommit, as SQLite does.
pub struct SqlSession {
    connection: Connection,
    in_transaction: bool,
}

impl SqlSession {
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        Ok(Self {
            connection,
            in_transaction: false,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().context("failed to open in-memory database")?;
        Ok(Self {
            connection,
            in_transaction: false,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Open an explicit transaction.
    pub fn begin(&mut self) -> Result<()> {
        if !self.in_transaction {
            self.connection.execute_batch("BEGIN")?;
            self.in_transaction = true;
        }
        Ok(())
    }

    /// Execute a statement, returning the number of affected rows.
    pub fn execute<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<usize> {
        let affected = self
            .connection
            .execute(sql, params)
            .with_context(|| format!("failed to execute: {}", sql))?;
        Ok(affected)
    }

    /// Run a query, mapping every row through `map`.
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: rusqlite::Params,
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let mut statement = self
            .connection
            .prepare(sql)
            .with_context(|| format!("failed to prepare: {}", sql))?;
        let rows = statement.query_map(params, map)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

impl Session for SqlSession {
    fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            debug!("committing sql session");
            self.connection.execute_batch("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if self.in_transaction {
            debug!("rolling back sql session");
            self.connection.execute_batch("ROLLBACK")?;
            self.in_transaction = false;
        }
        Ok(())
    }
}

/// Repository whose durability is delegated to an underlying session.
pub trait SessionedRepository {
    type Session: Session;

    fn session(&self) -> &Self::Session;

    fn session_mut(&mut self) -> &mut Self::Session;

    /// Commit through the session.
    fn commit_session(&mut self) -> Result<()> {
        self.session_mut().commit()
    }

    /// Roll back through the session.
    fn rollback_session(&mut self) -> Result<()> {
        self.session_mut().rollback()
    }
}
