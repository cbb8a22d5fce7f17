//! PostgreSQL gateway built on tokio-postgres.
//!
//! `?` placeholders are rewritten to `$n` here, right before the statement is sent;
//! everything upstream of the gateway only sees the generic form.

use super::{FailurePolicy, FetchMode, Gateway, GatewayConfig, Outcome, truncate_sql};
use crate::assemble::Statement;
use crate::error::{QolaError, QolaResult};
use crate::row::Row;
use tokio::sync::Mutex;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Socket, Transaction};

/// PostgreSQL gateway over a single lazily opened connection.
///
/// The connection is opened on first use and reused afterwards (and reopened if
/// the server closed it). Concurrent callers are serialized on an async mutex.
/// Every statement runs in its own transaction: committed on success, rolled back
/// on failure.
///
/// # Example
///
/// ```ignore
/// let gateway = PgGateway::new(GatewayConfig::from_env()?)?;
/// let rows = Query::new(USERS).and_where("age > ?", 18).fetch(&gateway).await?;
/// ```
pub struct PgGateway<T = NoTls> {
    config: GatewayConfig,
    pg_config: tokio_postgres::Config,
    tls: T,
    client: Mutex<Option<Client>>,
}

impl PgGateway<NoTls> {
    /// Create a gateway without TLS.
    pub fn new(config: GatewayConfig) -> QolaResult<Self> {
        Self::with_tls(config, NoTls)
    }
}

impl<T> PgGateway<T>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    /// Create a gateway using a custom TLS connector.
    pub fn with_tls(config: GatewayConfig, tls: T) -> QolaResult<Self> {
        let pg_config = config.pg_config()?;
        Ok(Self {
            config,
            pg_config,
            tls,
            client: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Drop the connection, if one is open.
    pub async fn close(&self) {
        if self.client.lock().await.take().is_some() {
            tracing::debug!(target: "qola.sql", "connection closed");
        }
    }

    async fn connect(&self) -> QolaResult<Client> {
        let (client, connection) = self
            .pg_config
            .connect(self.tls.clone())
            .await
            .map_err(|e| QolaError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "qola.sql", error = %e, "connection error");
            }
        });

        tracing::debug!(target: "qola.sql", "connection established");
        Ok(client)
    }

    async fn run(&self, statement: &Statement, fetch: FetchMode) -> QolaResult<Outcome> {
        let sql = statement.to_numbered()?;
        if self.config.log_sql {
            tracing::debug!(
                target: "qola.sql",
                fetch = ?fetch,
                param_count = statement.params.len(),
                sql = %truncate_sql(&sql, self.config.max_sql_length),
            );
        }

        let mut slot = self.client.lock().await;
        if slot.as_ref().is_none_or(Client::is_closed) {
            *slot = Some(self.connect().await?);
        }
        let client = slot
            .as_mut()
            .ok_or_else(|| QolaError::Connection("connection unavailable".to_string()))?;

        let params: Vec<&(dyn ToSql + Sync)> = statement
            .params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();

        let tx = client
            .transaction()
            .await
            .map_err(QolaError::from_db_error)?;

        match run_in(&tx, &sql, &params, fetch).await {
            Ok(outcome) => {
                tx.commit().await.map_err(QolaError::from_db_error)?;
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(target: "qola.sql", error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

async fn run_in(
    tx: &Transaction<'_>,
    sql: &str,
    params: &[&(dyn ToSql + Sync)],
    fetch: FetchMode,
) -> QolaResult<Outcome> {
    match fetch {
        FetchMode::None => {
            let affected = tx.execute(sql, params).await.map_err(QolaError::from_db_error)?;
            Ok(Outcome::Done { affected })
        }
        FetchMode::One => {
            let rows = tx.query(sql, params).await.map_err(QolaError::from_db_error)?;
            let row = rows.first().map(Row::from_pg).transpose()?;
            Ok(Outcome::row(row))
        }
        FetchMode::All => {
            let rows = tx.query(sql, params).await.map_err(QolaError::from_db_error)?;
            let rows = rows.iter().map(Row::from_pg).collect::<QolaResult<Vec<_>>>()?;
            Ok(Outcome::rows(rows))
        }
    }
}

impl<T> Gateway for PgGateway<T>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    fn execute(
        &self,
        statement: &Statement,
        fetch: FetchMode,
    ) -> impl std::future::Future<Output = Outcome> + Send {
        async move {
            match self.run(statement, fetch).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(
                        target: "qola.sql",
                        error = %err,
                        sql = %truncate_sql(&statement.sql, self.config.max_sql_length),
                        "statement failed",
                    );
                    Outcome::Failed(err)
                }
            }
        }
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.config.failure_policy
    }
}

impl<T> std::fmt::Debug for PgGateway<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
