use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tracing::{debug, info};

use crate::storage::models::StoredEntry;
use crate::utils::GatewayResult;

/// 客户端本地键值存储，相当于浏览器里的 localStorage
#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub async fn new(database_url: &str) -> GatewayResult<Self> {
        // 单连接：内存库每个连接都是独立的数据库
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(
                database_url.parse::<sqlx::sqlite::SqliteConnectOptions>()?
                    .create_if_missing(true)
            )
            .await?;

        info!("本地存储连接成功: {}", database_url);
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// 按文件路径打开，自动创建父目录
    pub async fn open(path: &str) -> GatewayResult<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Self::new(&format!("sqlite:{}", path)).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("本地存储已关闭");
    }

    pub async fn init_schema(&self) -> GatewayResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM local_storage WHERE key = ?"
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    pub async fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!("已写入本地存储: {}", key);
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> GatewayResult<()> {
        sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!("已删除本地存储: {}", key);
        Ok(())
    }

    pub async fn entries(&self) -> GatewayResult<Vec<StoredEntry>> {
        let rows = sqlx::query_as::<_, StoredEntry>(
            "SELECT key, value, updated_at FROM local_storage ORDER BY key"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
