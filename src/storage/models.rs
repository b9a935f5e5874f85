use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// local_storage 表中的一行
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredEntry {
    pub key: String,
    pub value: String,
    pub updated_at: Option<String>,
}
