//! Runtime settings.
//!
//! Process-level settings (database path, port, acting user) come from the
//! environment and are captured once into an `AppSettings` that is injected
//! into the Actix application state. Plugin configuration (the template
//! category and the keep-temp-backups flag) lives in the host `config`
//! table and is read at each use site.

use crate::host::db::DEFAULT_CATEGORY_ID;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

pub const TEMPLATE_CATEGORY_KEY: &str = "template_category";
pub const KEEP_TEMP_BACKUPS_KEY: &str = "keep_temp_backups";

/// Process-level settings, shared across handlers as `web::Data`.
#[derive(Clone)]
pub struct AppSettings {
    pub db_path: PathBuf,
    /// The user all operations act as. The host platform would take this
    /// from the session; this standalone server is single-user.
    pub acting_user: i64,
}

impl AppSettings {
    pub fn from_env() -> Self {
        let db_path = std::env::var("MODULELIB_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("modulelib.sqlite"));
        let acting_user = std::env::var("MODULELIB_USER")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        AppSettings {
            db_path,
            acting_user,
        }
    }
}

pub fn port() -> u16 {
    std::env::var("MODULELIB_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080)
}

pub fn get_config(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

pub fn set_config(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO config(key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

/// The configured template category, or the platform default when unset or
/// unparsable.
pub fn template_category(conn: &Connection) -> i64 {
    get_config(conn, TEMPLATE_CATEGORY_KEY)
        .ok()
        .flatten()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CATEGORY_ID)
}

pub fn keep_temp_backups(conn: &Connection) -> bool {
    matches!(
        get_config(conn, KEEP_TEMP_BACKUPS_KEY).ok().flatten(),
        Some(v) if v == "1" || v == "true"
    )
}
