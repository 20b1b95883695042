//! Local user store: a convenience mirror of provider-issued customer
//! ids keyed against signup details, used by webhook resolution and
//! email delivery. The billing ledger itself lives at the provider.

use crate::domain::model::UserRecord;
use crate::utils::error::Result;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
}

impl UserStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                customer_id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                first_name TEXT,
                full_name TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert or refresh a user row. `created_at` is preserved on update.
    pub fn upsert_user(&self, user: &UserRecord) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users(customer_id, email, first_name, full_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(customer_id) DO UPDATE SET
                 email = excluded.email,
                 first_name = excluded.first_name,
                 full_name = excluded.full_name",
            params![
                user.customer_id,
                user.email,
                user.first_name,
                user.full_name,
                user.created_at
            ],
        )?;
        Ok(())
    }

    pub fn get_by_customer_id(&self, customer_id: &str) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT customer_id, email, first_name, full_name, created_at
                 FROM users WHERE customer_id = ?1",
                params![customer_id],
                |row| {
                    Ok(UserRecord {
                        customer_id: row.get(0)?,
                        email: row.get(1)?,
                        first_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        full_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}
