use anyhow::Result;
use libsql::{Builder, Connection};
use std::{path::Path, sync::Arc};
use tokio::sync::RwLock;

use crate::constants::DATABASE_FILE_NAME;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id        TEXT PRIMARY KEY,
    username  TEXT UNIQUE NOT NULL,
    password  TEXT NOT NULL
);
"#;

const CREATE_CATEGORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT,
    type  TEXT CHECK(type IN ('income', 'expense'))
);
"#;

const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id           TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL,
    type         TEXT CHECK(type IN ('income', 'expense')),
    category     INTEGER,
    amount       REAL NOT NULL,
    date         TEXT,
    description  TEXT,
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (category) REFERENCES categories(id)
);
"#;

const CREATE_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS transaction_id ON transactions(id);",
    "CREATE INDEX IF NOT EXISTS users_id ON users(id);",
    "CREATE INDEX IF NOT EXISTS transactions_user_id ON transactions(user_id);",
];

pub type Db = Arc<RwLock<Connection>>;

/// Opens (creating if needed) `tracker.db` under `data_dir` and bootstraps the schema.
pub async fn init_db(data_dir: &str) -> Result<Db> {
    tokio::fs::create_dir_all(data_dir).await?;
    let path = Path::new(data_dir).join(DATABASE_FILE_NAME);
    let db = Builder::new_local(path).build().await?;
    let conn = db.connect()?;

    // libsql enforces foreign keys by default. Categories are a weak lookup
    // that nothing here creates, so references to them must not be checked.
    conn.execute("PRAGMA foreign_keys = OFF", ()).await?;
    create_schema(&conn).await?;
    tracing::info!(data_dir, "database ready");
    Ok(Arc::new(RwLock::new(conn)))
}

/// Idempotent; safe to run against an already initialized database.
pub async fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_USERS_TABLE, ()).await?;
    conn.execute(CREATE_CATEGORIES_TABLE, ()).await?;
    conn.execute(CREATE_TRANSACTIONS_TABLE, ()).await?;
    for statement in CREATE_INDEXES {
        conn.execute(statement, ()).await?;
    }
    Ok(())
}

pub fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}
