//! Role assignments and the scoped manager grant used around the backup
//! step. The acting user usually has no role in a template course, so the
//! orchestrator grants the manager role for the duration of the backup and
//! revokes it unconditionally afterwards, success or failure.

use anyhow::Context;
use rusqlite::{params, Connection};

pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_EDITING_TEACHER: &str = "editingteacher";

pub fn assign_role(
    conn: &Connection,
    role: &str,
    userid: i64,
    contextid: i64,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO role_assignments(role, userid, contextid) VALUES (?1, ?2, ?3)",
        params![role, userid, contextid],
    )
    .context("failed to assign role")?;
    Ok(conn.last_insert_rowid())
}

pub fn unassign_role(
    conn: &Connection,
    role: &str,
    userid: i64,
    contextid: i64,
) -> anyhow::Result<()> {
    conn.execute(
        "DELETE FROM role_assignments WHERE role = ?1 AND userid = ?2 AND contextid = ?3",
        params![role, userid, contextid],
    )
    .context("failed to unassign role")?;
    Ok(())
}

/// Whether the user holds a role in the context that permits backing up
/// course content.
pub fn has_backup_capability(
    conn: &Connection,
    userid: i64,
    contextid: i64,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM role_assignments
         WHERE userid = ?1 AND contextid = ?2 AND role IN (?3, ?4)",
        params![userid, contextid, ROLE_MANAGER, ROLE_EDITING_TEACHER],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Runs `f` with a manager role temporarily assigned to `userid` in the
/// given context. The grant is revoked on both the success and the failure
/// path before this function returns.
pub fn with_manager_role<T>(
    conn: &Connection,
    userid: i64,
    contextid: i64,
    f: impl FnOnce(&Connection) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    assign_role(conn, ROLE_MANAGER, userid, contextid)?;
    let result = f(conn);
    let revoked = unassign_role(conn, ROLE_MANAGER, userid, contextid);
    match result {
        Err(e) => Err(e),
        Ok(value) => {
            revoked?;
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{db, metadata, provision};
    use anyhow::anyhow;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_db(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "{}-{}.sqlite",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ))
    }

    #[test]
    fn scoped_grant_revokes_on_success_and_failure() {
        let conn = db::open_db(&temp_db("modulelib-roles")).expect("open db");
        let course = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "C", "c")
            .expect("create course");
        let ctx = metadata::course_context_id(&conn, course).expect("context");

        let value = with_manager_role(&conn, 7, ctx, |conn| {
            assert!(has_backup_capability(conn, 7, ctx).expect("capability"));
            Ok(99)
        })
        .expect("scoped grant");
        assert_eq!(value, 99);
        assert!(!has_backup_capability(&conn, 7, ctx).expect("capability"));

        let err = with_manager_role(&conn, 7, ctx, |_| -> anyhow::Result<()> {
            Err(anyhow!("engine exploded"))
        })
        .unwrap_err();
        assert!(err.to_string().contains("engine exploded"));
        assert!(!has_backup_capability(&conn, 7, ctx).expect("capability"));
    }
}
