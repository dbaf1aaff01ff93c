use rusqlite::Connection;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Category every installation starts with; the template-category setting
/// falls back to it when unset.
pub const DEFAULT_CATEGORY_ID: i64 = 1;

pub fn open_db(db_path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(db_path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_categories(
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            sortorder INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses(
            id INTEGER PRIMARY KEY,
            category INTEGER NOT NULL,
            fullname TEXT NOT NULL,
            shortname TEXT NOT NULL,
            FOREIGN KEY(category) REFERENCES course_categories(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_courses_category ON courses(category)",
        [],
    )?;

    // `sequence` holds the ordered course-module ids of the section as a
    // comma-separated list. Section 0 exists for every course.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_sections(
            id INTEGER PRIMARY KEY,
            course INTEGER NOT NULL,
            section INTEGER NOT NULL,
            name TEXT,
            sequence TEXT NOT NULL DEFAULT '',
            visible INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY(course) REFERENCES courses(id),
            UNIQUE(course, section)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_course_sections_course ON course_sections(course)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS activity_instances(
            id INTEGER PRIMARY KEY,
            module_type TEXT NOT NULL,
            name TEXT NOT NULL,
            intro TEXT NOT NULL DEFAULT '',
            config TEXT NOT NULL DEFAULT '{}'
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_modules(
            id INTEGER PRIMARY KEY,
            course INTEGER NOT NULL,
            section_id INTEGER NOT NULL,
            module_type TEXT NOT NULL,
            instance INTEGER NOT NULL,
            visible INTEGER NOT NULL DEFAULT 1,
            added INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(course) REFERENCES courses(id),
            FOREIGN KEY(section_id) REFERENCES course_sections(id),
            FOREIGN KEY(instance) REFERENCES activity_instances(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_course_modules_course ON course_modules(course)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_course_modules_instance ON course_modules(instance)",
        [],
    )?;

    // User-generated data attached to an activity instance (submissions,
    // personal records). Never part of a copy.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS user_records(
            id INTEGER PRIMARY KEY,
            instance INTEGER NOT NULL,
            userid INTEGER NOT NULL,
            data TEXT NOT NULL,
            FOREIGN KEY(instance) REFERENCES activity_instances(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_user_records_instance ON user_records(instance)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS contexts(
            id INTEGER PRIMARY KEY,
            level TEXT NOT NULL,
            instanceid INTEGER NOT NULL,
            UNIQUE(level, instanceid)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS role_assignments(
            id INTEGER PRIMARY KEY,
            role TEXT NOT NULL,
            userid INTEGER NOT NULL,
            contextid INTEGER NOT NULL,
            FOREIGN KEY(contextid) REFERENCES contexts(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_role_assignments_context ON role_assignments(contextid)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS calendar_events(
            id INTEGER PRIMARY KEY,
            course INTEGER NOT NULL,
            instance INTEGER NOT NULL,
            name TEXT NOT NULL,
            timestart INTEGER NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_calendar_events_instance ON calendar_events(instance)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS event_log(
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            courseid INTEGER NOT NULL,
            cmid INTEGER NOT NULL,
            timecreated INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_cache(
            course INTEGER PRIMARY KEY,
            structure TEXT NOT NULL,
            rebuilt_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS config(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO course_categories(id, name, sortorder) VALUES (?1, 'Miscellaneous', 0)",
        [DEFAULT_CATEGORY_ID],
    )?;

    Ok(conn)
}

pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
