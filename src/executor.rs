//! Runs [`Statement`]s against the pool with a deadline and a retry policy.

use std::time::Duration;

use crate::error::SqlGatewayError;
use crate::pool::ConfigAndPool;
use crate::results::ResultSet;
use crate::statement::{CommitDirective, Statement, StatementKind};
use crate::translation::CompiledStatement;

/// Deadline and retry settings applied to every statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorOptions {
    pub statement_timeout: Duration,
    /// Extra attempts for a read that failed with a database or timeout error.
    pub read_retries: u32,
    /// Delay before the first retry; doubled for each further one.
    pub retry_backoff: Duration,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            statement_timeout: Duration::from_secs(10),
            read_retries: 2,
            retry_backoff: Duration::from_millis(50),
        }
    }
}

/// What a statement produced.
#[derive(Debug, Clone)]
pub enum Outcome {
    Rows(ResultSet),
    Affected(usize),
}

/// Shared entry point from the HTTP layer to the database.
#[derive(Debug, Clone)]
pub struct Gateway {
    cap: ConfigAndPool,
    opts: ExecutorOptions,
}

impl Gateway {
    #[must_use]
    pub fn new(cap: ConfigAndPool, opts: ExecutorOptions) -> Self {
        Self { cap, opts }
    }

    #[must_use]
    pub fn config_and_pool(&self) -> &ConfigAndPool {
        &self.cap
    }

    #[must_use]
    pub fn options(&self) -> ExecutorOptions {
        self.opts
    }

    /// Run a statement, dispatching on whether it reads or writes.
    ///
    /// # Errors
    /// See [`Gateway::fetch`] and [`Gateway::apply`].
    pub async fn execute(&self, stmt: &Statement) -> Result<Outcome, SqlGatewayError> {
        match stmt.kind() {
            StatementKind::Read => self.fetch(stmt).await.map(Outcome::Rows),
            StatementKind::Write => self.apply(stmt).await.map(Outcome::Affected),
        }
    }

    /// Run a read statement, retrying transient failures with exponential backoff.
    ///
    /// # Errors
    /// Returns `SqlGatewayError::InvalidInput` for a write statement, or the last error once
    /// the retries are used up. Non-retryable errors are returned at once.
    pub async fn fetch(&self, stmt: &Statement) -> Result<ResultSet, SqlGatewayError> {
        if stmt.kind() != StatementKind::Read {
            return Err(SqlGatewayError::invalid_input(format!(
                "{} changes rows; use apply",
                stmt.operation()
            )));
        }
        let operation = stmt.operation().name();
        let compiled = stmt.compile(self.cap.placeholder_style())?;

        let mut attempt: u32 = 0;
        loop {
            match self.fetch_once(operation, &compiled).await {
                Ok(rs) => {
                    tracing::debug!(operation, rows = rs.len(), attempt, "read finished");
                    return Ok(rs);
                }
                Err(e) if e.is_retryable_read() && attempt < self.opts.read_retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        operation,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "read failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run a write statement once and commit it.
    ///
    /// The connection is checked out first, under the pool's checkout timeout; the statement
    /// deadline only starts once the write is handed to the database.
    ///
    /// # Errors
    /// Returns `SqlGatewayError::InvalidInput` for a read statement and
    /// `SqlGatewayError::ConnectionError` when no connection frees up. Errors raised before
    /// the commit are returned as they are; a timeout or a failed commit is reported as
    /// [`SqlGatewayError::AmbiguousWrite`] since the row may or may not have changed.
    pub async fn apply(&self, stmt: &Statement) -> Result<usize, SqlGatewayError> {
        if stmt.commit() != CommitDirective::Commit {
            return Err(SqlGatewayError::invalid_input(format!(
                "{} only reads; use fetch",
                stmt.operation()
            )));
        }
        let operation = stmt.operation().name();
        let compiled = stmt.compile(self.cap.placeholder_style())?;

        // nothing has reached the database if this fails
        let mut conn = self.cap.checkout().await?;

        match tokio::time::timeout(self.opts.statement_timeout, conn.dml(operation, &compiled))
            .await
        {
            Ok(Ok(affected)) => {
                tracing::debug!(operation, affected, "write committed");
                Ok(affected)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(SqlGatewayError::AmbiguousWrite {
                operation,
                reason: format!("no reply within {} ms", self.timeout_millis()),
            }),
        }
    }

    async fn fetch_once(
        &self,
        operation: &'static str,
        compiled: &CompiledStatement,
    ) -> Result<ResultSet, SqlGatewayError> {
        tokio::time::timeout(self.opts.statement_timeout, self.cap.select(compiled))
            .await
            .map_err(|_| SqlGatewayError::Timeout {
                operation,
                millis: self.timeout_millis(),
            })?
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.opts
            .retry_backoff
            .saturating_mul(1_u32 << attempt.min(16))
    }

    fn timeout_millis(&self) -> u64 {
        u64::try_from(self.opts.statement_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Log pool occupancy and release it. Connections close once in-flight requests drop
    /// their checkouts.
    pub fn shutdown(self) {
        let status = self.cap.status();
        tracing::info!(
            connections = status.connections,
            idle = status.idle_connections,
            "closing database pool"
        );
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::pool::PoolOptions;
    use crate::sqlite::SqliteOptions;
    use crate::statement::{Fields, StatementBuilder};
    use crate::types::RowValues;

    async fn gateway(dir: &tempfile::TempDir, opts: ExecutorOptions) -> Gateway {
        gateway_with_pool(dir, PoolOptions::default(), opts).await
    }

    async fn gateway_with_pool(
        dir: &tempfile::TempDir,
        pool: PoolOptions,
        opts: ExecutorOptions,
    ) -> Gateway {
        let cap = ConfigAndPool::new_sqlite(SqliteOptions::new(dir.path().join("gw.db")), pool)
            .await
            .unwrap();
        Gateway::new(cap, opts)
    }

    fn single_connection(checkout_timeout: Duration) -> PoolOptions {
        PoolOptions {
            max_size: 1,
            checkout_timeout,
        }
    }

    fn insert_kim() -> Statement {
        StatementBuilder::build(
            "student.insert",
            &Fields::new().with("stuNo", "1").with("name", "Kim").with("dept", "CS"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(&dir, ExecutorOptions::default()).await;
        crate::schema::init_schema(gw.config_and_pool()).await.unwrap();

        let insert = StatementBuilder::build(
            "student.insert",
            &Fields::new().with("stuNo", "1").with("name", "Kim").with("dept", "CS"),
        )
        .unwrap();
        assert!(matches!(gw.execute(&insert).await.unwrap(), Outcome::Affected(1)));

        let search =
            StatementBuilder::build("student.search", &Fields::new().with("stuNo", 1)).unwrap();
        let rs = gw.fetch(&search).await.unwrap();
        assert_eq!(rs.get(0, "STU_NAME"), Some(&RowValues::Text("Kim".into())));
    }

    #[tokio::test]
    async fn wrong_entry_point_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(&dir, ExecutorOptions::default()).await;
        let list = StatementBuilder::build("student.list", &Fields::new()).unwrap();
        let delete =
            StatementBuilder::build("student.delete", &Fields::new().with("stuNo", 1)).unwrap();
        assert!(matches!(gw.apply(&list).await, Err(SqlGatewayError::InvalidInput(_))));
        assert!(matches!(gw.fetch(&delete).await, Err(SqlGatewayError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn failing_reads_are_retried_with_backoff() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(
            &dir,
            ExecutorOptions {
                statement_timeout: Duration::from_secs(5),
                read_retries: 2,
                retry_backoff: Duration::from_millis(20),
            },
        )
        .await;
        // no schema: every attempt fails with "no such table"
        let list = StatementBuilder::build("student.list", &Fields::new()).unwrap();
        let started = std::time::Instant::now();
        let err = gw.fetch(&list).await.unwrap_err();
        assert!(matches!(err, SqlGatewayError::SqliteError(_)));
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn failing_writes_are_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway(
            &dir,
            ExecutorOptions {
                statement_timeout: Duration::from_secs(5),
                read_retries: 3,
                retry_backoff: Duration::from_secs(1),
            },
        )
        .await;
        let delete =
            StatementBuilder::build("student.delete", &Fields::new().with("stuNo", 1)).unwrap();
        let started = std::time::Instant::now();
        assert!(matches!(gw.apply(&delete).await, Err(SqlGatewayError::SqliteError(_))));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn reads_past_the_deadline_time_out_and_are_retried() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway_with_pool(
            &dir,
            single_connection(Duration::from_secs(5)),
            ExecutorOptions {
                statement_timeout: Duration::from_millis(50),
                read_retries: 2,
                retry_backoff: Duration::from_millis(10),
            },
        )
        .await;
        let held = gw.config_and_pool().checkout().await.unwrap();

        let list = StatementBuilder::build("student.list", &Fields::new()).unwrap();
        let started = std::time::Instant::now();
        let err = gw.fetch(&list).await.unwrap_err();
        // three 50 ms attempts plus 10 ms and 20 ms of backoff
        assert!(started.elapsed() >= Duration::from_millis(180));
        assert!(matches!(
            err,
            SqlGatewayError::Timeout {
                operation: "student.list",
                millis: 50
            }
        ));
        drop(held);
    }

    #[tokio::test]
    async fn write_waiting_for_a_connection_is_a_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway_with_pool(
            &dir,
            single_connection(Duration::from_millis(150)),
            ExecutorOptions {
                statement_timeout: Duration::from_millis(50),
                read_retries: 2,
                retry_backoff: Duration::from_secs(1),
            },
        )
        .await;
        crate::schema::init_schema(gw.config_and_pool()).await.unwrap();
        let held = gw.config_and_pool().checkout().await.unwrap();

        let started = std::time::Instant::now();
        let err = gw.apply(&insert_kim()).await.unwrap_err();
        assert!(matches!(err, SqlGatewayError::ConnectionError(_)), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(1));

        drop(held);
        let list = StatementBuilder::build("student.list", &Fields::new()).unwrap();
        assert!(gw.fetch(&list).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_stuck_in_the_database_is_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        let gw = gateway_with_pool(
            &dir,
            single_connection(Duration::from_secs(5)),
            ExecutorOptions {
                statement_timeout: Duration::from_millis(100),
                read_retries: 0,
                retry_backoff: Duration::from_millis(10),
            },
        )
        .await;
        crate::schema::init_schema(gw.config_and_pool()).await.unwrap();

        // a second writer holds the database lock; the insert waits on its busy timeout
        let blocker = rusqlite::Connection::open(dir.path().join("gw.db")).unwrap();
        blocker.execute_batch("BEGIN IMMEDIATE;").unwrap();

        let err = gw.apply(&insert_kim()).await.unwrap_err();
        assert!(
            matches!(
                err,
                SqlGatewayError::AmbiguousWrite {
                    operation: "student.insert",
                    ..
                }
            ),
            "{err:?}"
        );

        blocker.execute_batch("ROLLBACK;").unwrap();
        drop(blocker);

        // the timed-out insert still finishes once the lock is gone
        let list = StatementBuilder::build("student.list", &Fields::new())
            .unwrap()
            .compile(gw.config_and_pool().placeholder_style())
            .unwrap();
        let rs = gw.config_and_pool().select(&list).await.unwrap();
        assert_eq!(rs.len(), 1);
    }
}
