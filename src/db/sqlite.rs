use crate::config::Config;
use crate::db::models::{Account, AccountPatch, NewAccount};
use crate::db::schema::{ACCOUNTS_TABLE, ADDED_COLUMNS, SQLITE_INIT};
use crate::error::StoreError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::future::Future;
use std::str::FromStr;
use tracing::{debug, error, info, warn};

pub type SqlitePool = Pool<Sqlite>;

const MIN_CONNECTIONS: u32 = 1;
const MAX_CONNECTIONS: u32 = 10;

/// Pool-backed store for `gemini_accounts`.
///
/// Without a database URL the store is disabled: reads come back empty and
/// writes are dropped. Clones share the same pool.
#[derive(Clone, Default)]
pub struct AccountStore {
    pool: Option<SqlitePool>,
}

impl std::fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl AccountStore {
    /// A store with no pool; every operation degrades to a no-op.
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Connect using `DATABASE_URL` from the environment.
    pub async fn connect_from_env() -> Result<Self, StoreError> {
        let cfg = Config::from_env()?;
        Self::connect(cfg.database_url.as_deref()).await
    }

    /// Open the pool and initialize the schema. `None` yields a disabled store.
    pub async fn connect(database_url: Option<&str>) -> Result<Self, StoreError> {
        let Some(url) = database_url.filter(|u| !u.trim().is_empty()) else {
            warn!("DATABASE_URL not set; account store disabled");
            return Ok(Self::disabled());
        };

        match Self::open(url).await {
            Ok(store) => {
                info!(
                    max_connections = MAX_CONNECTIONS,
                    "account store connected"
                );
                Ok(store)
            }
            Err(e) => {
                error!(error = %e, "account store connection failed");
                Err(e)
            }
        }
    }

    async fn open(url: &str) -> Result<Self, StoreError> {
        let connect_opts = SqliteConnectOptions::from_str(url)?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .min_connections(MIN_CONNECTIONS)
            .max_connections(MAX_CONNECTIONS)
            .connect_with(connect_opts)
            .await?;
        let store = Self { pool: Some(pool) };
        if let Err(e) = store.init_schema().await {
            store.disconnect().await;
            return Err(e);
        }
        Ok(store)
    }

    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    pub fn pool(&self) -> Option<&SqlitePool> {
        self.pool.as_ref()
    }

    /// Close the pool. No-op for a disabled store.
    pub async fn disconnect(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("account store disconnected");
        }
    }

    /// Run `op` against the pool, or return `T::default()` when disabled.
    async fn run_or_default<T, F, Fut>(&self, op: F) -> Result<T, StoreError>
    where
        T: Default,
        F: FnOnce(SqlitePool) -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        match &self.pool {
            Some(pool) => Ok(op(pool.clone()).await?),
            None => Ok(T::default()),
        }
    }

    /// Create the table, add missing columns, and create the index.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        self.run_or_default(|pool| async move {
            // sqlx::query runs one statement at a time
            for stmt in SQLITE_INIT.split(';') {
                let s = stmt.trim();
                if s.is_empty() {
                    continue;
                }
                sqlx::query(s).execute(&pool).await?;
            }

            for &(column, ddl) in ADDED_COLUMNS {
                let (present,): (i64,) = sqlx::query_as(
                    "SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?",
                )
                .bind(ACCOUNTS_TABLE)
                .bind(column)
                .fetch_one(&pool)
                .await?;
                if present == 0 {
                    info!(table = ACCOUNTS_TABLE, column, "adding missing column");
                    sqlx::query(ddl).execute(&pool).await?;
                }
            }
            Ok(())
        })
        .await
    }

    /// Active accounts, least recently used first; never-used accounts lead.
    pub async fn fetch_active_accounts(&self) -> Result<Vec<Account>, StoreError> {
        self.run_or_default(|pool| async move {
            sqlx::query_as::<_, Account>(
                r#"SELECT id, name, secure_c_ses, host_c_oses, csesidx, config_id,
                   is_active, request_count, last_used_at, created_at
                   FROM gemini_accounts
                   WHERE is_active = 1
                   ORDER BY last_used_at ASC NULLS FIRST, id ASC"#,
            )
            .fetch_all(&pool)
            .await
        })
        .await
    }

    /// Stamp `last_used_at` and bump `request_count` in one statement.
    pub async fn increment_account_usage(&self, id: i64) -> Result<(), StoreError> {
        self.run_or_default(|pool| async move {
            let res = sqlx::query(
                r#"UPDATE gemini_accounts
                   SET last_used_at = ?, request_count = request_count + 1
                   WHERE id = ?"#,
            )
            .bind(Utc::now())
            .bind(id)
            .execute(&pool)
            .await?;
            debug!(id, rows = res.rows_affected(), "account usage incremented");
            Ok(())
        })
        .await
    }

    /// Stamp `last_used_at` only; `request_count` is left alone.
    pub async fn update_account_usage(&self, id: i64) -> Result<(), StoreError> {
        self.run_or_default(|pool| async move {
            sqlx::query("UPDATE gemini_accounts SET last_used_at = ? WHERE id = ?")
                .bind(Utc::now())
                .bind(id)
                .execute(&pool)
                .await?;
            Ok(())
        })
        .await
    }

    /// Insert a fresh, active, never-used account. Returns the row id, or
    /// `None` when the store is disabled and nothing was written.
    pub async fn add_account(&self, account: NewAccount) -> Result<Option<i64>, StoreError> {
        self.run_or_default(|pool| async move {
            let res = sqlx::query(
                r#"INSERT INTO gemini_accounts (
                    name, secure_c_ses, host_c_oses, csesidx, config_id,
                    is_active, request_count, last_used_at, created_at
                ) VALUES (?, ?, ?, ?, ?, 1, 0, NULL, ?)"#,
            )
            .bind(account.name)
            .bind(account.secure_session)
            .bind(account.host_session)
            .bind(account.session_index)
            .bind(account.config_id)
            .bind(Utc::now())
            .execute(&pool)
            .await?;
            let id = res.last_insert_rowid();
            info!(id, "account added");
            Ok(Some(id))
        })
        .await
    }

    pub async fn get_all_accounts(&self) -> Result<Vec<Account>, StoreError> {
        self.run_or_default(|pool| async move {
            sqlx::query_as::<_, Account>(
                r#"SELECT id, name, secure_c_ses, host_c_oses, csesidx, config_id,
                   is_active, request_count, last_used_at, created_at
                   FROM gemini_accounts ORDER BY id ASC"#,
            )
            .fetch_all(&pool)
            .await
        })
        .await
    }

    /// Write the populated slots of `patch`. An empty patch issues no statement.
    pub async fn update_account(&self, id: i64, patch: AccountPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            debug!(id, "empty account patch; nothing to update");
            return Ok(());
        }

        self.run_or_default(|pool| async move {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE gemini_accounts SET ");
            let mut set = qb.separated(", ");
            if let Some(name) = patch.name {
                set.push("name = ").push_bind_unseparated(name);
            }
            if let Some(secure) = patch.secure_session {
                set.push("secure_c_ses = ").push_bind_unseparated(secure);
            }
            if let Some(host) = patch.host_session {
                set.push("host_c_oses = ").push_bind_unseparated(host);
            }
            if let Some(index) = patch.session_index {
                set.push("csesidx = ").push_bind_unseparated(index);
            }
            if let Some(config_id) = patch.config_id {
                set.push("config_id = ").push_bind_unseparated(config_id);
            }
            if let Some(active) = patch.is_active {
                set.push("is_active = ").push_bind_unseparated(active);
            }
            qb.push(" WHERE id = ").push_bind(id);

            qb.build().execute(&pool).await?;
            info!(id, "account updated");
            Ok(())
        })
        .await
    }

    /// Hard delete. Unknown ids are not an error.
    pub async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        self.run_or_default(|pool| async move {
            let res = sqlx::query("DELETE FROM gemini_accounts WHERE id = ?")
                .bind(id)
                .execute(&pool)
                .await?;
            info!(id, removed = res.rows_affected(), "account deleted");
            Ok(())
        })
        .await
    }
}
