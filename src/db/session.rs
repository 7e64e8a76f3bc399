use sqlx::{Postgres, Transaction};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::Engine;
use crate::Result;

/// Produces sessions bound to one engine.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    engine: Engine,
}

impl SessionFactory {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// A fresh session. No connection is taken until the session runs a query.
    pub fn session(&self) -> Session {
        Session::new(self.engine.clone())
    }
}

/// Unit of work for a single request.
///
/// The first statement checks out a connection and begins a transaction that
/// stays open until [`Session::commit`] or [`Session::rollback`]. Closing a
/// session rolls back explicitly. Dropping one leaves the rollback to sqlx's
/// `Transaction` drop, which queues it on the connection before returning it
/// to the pool.
pub struct Session {
    id: Uuid,
    engine: Engine,
    transaction: Option<Transaction<'static, Postgres>>,
}

impl Session {
    fn new(engine: Engine) -> Self {
        Self {
            id: Uuid::new_v4(),
            engine,
            transaction: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// The session's transaction, begun on first call.
    pub async fn transaction(&mut self) -> Result<&mut Transaction<'static, Postgres>> {
        let transaction = match self.transaction.take() {
            Some(transaction) => transaction,
            None => {
                debug!(session = %self.id, "Beginning transaction");
                self.engine.pool().begin().await?
            }
        };
        Ok(self.transaction.insert(transaction))
    }

    /// Run a statement and return the number of rows it affected.
    pub async fn execute(&mut self, sql: &str) -> Result<u64> {
        let transaction = self.transaction().await?;
        let result = sqlx::query(sql).execute(&mut **transaction).await?;
        Ok(result.rows_affected())
    }

    /// Run a query returning a single `bigint`.
    pub async fn fetch_scalar_i64(&mut self, sql: &str) -> Result<i64> {
        let transaction = self.transaction().await?;
        let value: i64 = sqlx::query_scalar(sql).fetch_one(&mut **transaction).await?;
        Ok(value)
    }

    pub async fn commit(&mut self) -> Result<()> {
        if let Some(transaction) = self.transaction.take() {
            debug!(session = %self.id, "Committing transaction");
            transaction.commit().await?;
        }
        Ok(())
    }

    pub async fn rollback(&mut self) -> Result<()> {
        if let Some(transaction) = self.transaction.take() {
            debug!(session = %self.id, "Rolling back transaction");
            transaction.rollback().await?;
        }
        Ok(())
    }

    /// Release the session, discarding uncommitted work.
    pub async fn close(mut self) -> Result<()> {
        self.rollback().await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            warn!(session = %self.id, "Session dropped with an open transaction; sqlx rolls it back when the transaction drops");
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("engine", &self.engine.url())
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}
