//! Course provisioning: the host-side write operations that create
//! categories, courses, sections, and activities. The restore path of the
//! engine uses the low-level `insert_instance`/`attach_module` pair; the
//! composed helpers build complete courses for tests and seeding.

use crate::host::db::now_secs;
use crate::host::metadata::{self, join_sequence};
use anyhow::Context;
use rusqlite::{params, Connection};

pub fn create_category(conn: &Connection, name: &str) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO course_categories(name, sortorder) VALUES (?1, 0)",
        [name],
    )
    .context("failed to create category")?;
    Ok(conn.last_insert_rowid())
}

/// Creates a course with its section 0 and course context.
pub fn create_course(
    conn: &Connection,
    category: i64,
    fullname: &str,
    shortname: &str,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO courses(category, fullname, shortname) VALUES (?1, ?2, ?3)",
        params![category, fullname, shortname],
    )
    .context("failed to create course")?;
    let course = conn.last_insert_rowid();
    create_section(conn, course, 0, None)?;
    metadata::course_context_id(conn, course)?;
    Ok(course)
}

pub fn create_section(
    conn: &Connection,
    course: i64,
    section_number: i64,
    name: Option<&str>,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO course_sections(course, section, name, sequence, visible)
         VALUES (?1, ?2, ?3, '', 1)",
        params![course, section_number, name],
    )
    .context("failed to create section")?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_instance(
    conn: &Connection,
    module_type: &str,
    name: &str,
    intro: &str,
    config: &str,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO activity_instances(module_type, name, intro, config)
         VALUES (?1, ?2, ?3, ?4)",
        params![module_type, name, intro, config],
    )
    .context("failed to create activity instance")?;
    Ok(conn.last_insert_rowid())
}

/// Places an instance into a course: inserts the cm row, appends it to the
/// section's sequence, and creates its module context.
pub fn attach_module(
    conn: &Connection,
    course: i64,
    section_id: i64,
    module_type: &str,
    instance: i64,
    visible: bool,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO course_modules(course, section_id, module_type, instance, visible, added)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![course, section_id, module_type, instance, visible as i64, now_secs()],
    )
    .context("failed to create course module")?;
    let cmid = conn.last_insert_rowid();
    append_to_sequence(conn, section_id, cmid)?;
    metadata::module_context_id(conn, cmid)?;
    Ok(cmid)
}

/// Creates a complete activity (instance + cm) in the given section of a
/// course. Returns `(cmid, instance_id)`.
pub fn add_activity(
    conn: &Connection,
    course: i64,
    section_number: i64,
    module_type: &str,
    name: &str,
    config: &str,
) -> anyhow::Result<(i64, i64)> {
    let section = metadata::get_section(conn, course, section_number)?;
    let instance = insert_instance(conn, module_type, name, "", config)?;
    let cmid = attach_module(conn, course, section.id, module_type, instance, true)?;
    Ok((cmid, instance))
}

pub fn add_user_record(
    conn: &Connection,
    instance: i64,
    userid: i64,
    data: &str,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO user_records(instance, userid, data) VALUES (?1, ?2, ?3)",
        params![instance, userid, data],
    )
    .context("failed to create user record")?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn append_to_sequence(
    conn: &Connection,
    section_id: i64,
    cmid: i64,
) -> anyhow::Result<()> {
    let sequence: String = conn.query_row(
        "SELECT sequence FROM course_sections WHERE id = ?1",
        [section_id],
        |row| row.get(0),
    )?;
    let mut cmids = metadata::parse_sequence(&sequence);
    cmids.push(cmid);
    conn.execute(
        "UPDATE course_sections SET sequence = ?1 WHERE id = ?2",
        params![join_sequence(&cmids), section_id],
    )?;
    Ok(())
}
