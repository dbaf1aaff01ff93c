//! Read-only lookups over the host course tables: courses, categories,
//! section info, and course-module (cm) info with the display name resolved
//! from the activity instance.

use crate::host::error::NotFound;
use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone)]
pub struct Course {
    pub id: i64,
    pub fullname: String,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SectionInfo {
    pub id: i64,
    pub section: i64,
    pub name: Option<String>,
    pub sequence: Vec<i64>,
}

/// Course-module info: the placement of one activity instance in a course,
/// with the display name joined in from `activity_instances`.
#[derive(Debug, Clone)]
pub struct CmInfo {
    pub id: i64,
    pub course: i64,
    pub section: i64,
    pub module_type: String,
    pub instance: i64,
    pub name: String,
    pub visible: bool,
}

pub fn get_course(conn: &Connection, course_id: i64) -> anyhow::Result<Course> {
    conn.query_row(
        "SELECT id, fullname FROM courses WHERE id = ?1",
        [course_id],
        |row| {
            Ok(Course {
                id: row.get(0)?,
                fullname: row.get(1)?,
            })
        },
    )
    .optional()
    .context("failed to query course")?
    .ok_or_else(|| NotFound::new(format!("course {}", course_id)).into())
}

pub fn get_category(conn: &Connection, category_id: i64) -> anyhow::Result<Category> {
    conn.query_row(
        "SELECT id, name FROM course_categories WHERE id = ?1",
        [category_id],
        |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()
    .context("failed to query category")?
    .ok_or_else(|| NotFound::new(format!("category {}", category_id)).into())
}

/// Direct courses of a category, in sort order.
pub fn category_courses(conn: &Connection, category_id: i64) -> anyhow::Result<Vec<Course>> {
    let mut stmt = conn.prepare(
        "SELECT id, fullname FROM courses WHERE category = ?1 ORDER BY fullname, id",
    )?;
    let rows = stmt.query_map([category_id], |row| {
        Ok(Course {
            id: row.get(0)?,
            fullname: row.get(1)?,
        })
    })?;
    let mut courses = Vec::new();
    for row in rows {
        courses.push(row?);
    }
    Ok(courses)
}

/// All sections of a course ordered by section number, section 0 included.
pub fn section_info_all(conn: &Connection, course_id: i64) -> anyhow::Result<Vec<SectionInfo>> {
    let mut stmt = conn.prepare(
        "SELECT id, section, name, sequence FROM course_sections
         WHERE course = ?1 ORDER BY section",
    )?;
    let rows = stmt.query_map([course_id], |row| {
        Ok(SectionInfo {
            id: row.get(0)?,
            section: row.get(1)?,
            name: row.get(2)?,
            sequence: parse_sequence(&row.get::<_, String>(3)?),
        })
    })?;
    let mut sections = Vec::new();
    for row in rows {
        sections.push(row?);
    }
    Ok(sections)
}

pub fn get_section(
    conn: &Connection,
    course_id: i64,
    section_number: i64,
) -> anyhow::Result<SectionInfo> {
    conn.query_row(
        "SELECT id, section, name, sequence FROM course_sections
         WHERE course = ?1 AND section = ?2",
        params![course_id, section_number],
        |row| {
            Ok(SectionInfo {
                id: row.get(0)?,
                section: row.get(1)?,
                name: row.get(2)?,
                sequence: parse_sequence(&row.get::<_, String>(3)?),
            })
        },
    )
    .optional()
    .context("failed to query section")?
    .ok_or_else(|| {
        NotFound::new(format!("section {} of course {}", section_number, course_id)).into()
    })
}

/// All cms of a course, ordered by section number and by position within
/// each section's sequence.
pub fn course_cms(conn: &Connection, course_id: i64) -> anyhow::Result<Vec<CmInfo>> {
    let mut stmt = conn.prepare(
        "SELECT cm.id, cm.course, cs.section, cm.module_type, cm.instance, ai.name, cm.visible
         FROM course_modules cm
         JOIN course_sections cs ON cs.id = cm.section_id
         JOIN activity_instances ai ON ai.id = cm.instance
         WHERE cm.course = ?1",
    )?;
    let rows = stmt.query_map([course_id], |row| {
        Ok(CmInfo {
            id: row.get(0)?,
            course: row.get(1)?,
            section: row.get(2)?,
            module_type: row.get(3)?,
            instance: row.get(4)?,
            name: row.get(5)?,
            visible: row.get::<_, i64>(6)? != 0,
        })
    })?;
    let mut by_id = std::collections::HashMap::new();
    for row in rows {
        let cm = row?;
        by_id.insert(cm.id, cm);
    }

    // Section sequences are the source of ordering truth.
    let mut ordered = Vec::with_capacity(by_id.len());
    for section in section_info_all(conn, course_id)? {
        for cmid in &section.sequence {
            if let Some(cm) = by_id.remove(cmid) {
                ordered.push(cm);
            }
        }
    }
    Ok(ordered)
}

pub fn get_cm(conn: &Connection, cmid: i64) -> anyhow::Result<CmInfo> {
    cm_row(
        conn,
        "SELECT cm.id, cm.course, cs.section, cm.module_type, cm.instance, ai.name, cm.visible
         FROM course_modules cm
         JOIN course_sections cs ON cs.id = cm.section_id
         JOIN activity_instances ai ON ai.id = cm.instance
         WHERE cm.id = ?1",
        cmid,
    )?
    .ok_or_else(|| NotFound::new(format!("course module {}", cmid)).into())
}

/// Resolve the cm that holds a given activity instance.
pub fn cm_by_instance(conn: &Connection, instance_id: i64) -> anyhow::Result<CmInfo> {
    cm_row(
        conn,
        "SELECT cm.id, cm.course, cs.section, cm.module_type, cm.instance, ai.name, cm.visible
         FROM course_modules cm
         JOIN course_sections cs ON cs.id = cm.section_id
         JOIN activity_instances ai ON ai.id = cm.instance
         WHERE cm.instance = ?1",
        instance_id,
    )?
    .ok_or_else(|| NotFound::new(format!("module instance {}", instance_id)).into())
}

fn cm_row(conn: &Connection, sql: &str, id: i64) -> anyhow::Result<Option<CmInfo>> {
    conn.query_row(sql, [id], |row| {
        Ok(CmInfo {
            id: row.get(0)?,
            course: row.get(1)?,
            section: row.get(2)?,
            module_type: row.get(3)?,
            instance: row.get(4)?,
            name: row.get(5)?,
            visible: row.get::<_, i64>(6)? != 0,
        })
    })
    .optional()
    .context("failed to query course module")
}

/// Context id of a course, created on first use.
pub fn course_context_id(conn: &Connection, course_id: i64) -> anyhow::Result<i64> {
    context_id(conn, "course", course_id)
}

/// Context id of a course module, created on first use.
pub fn module_context_id(conn: &Connection, cmid: i64) -> anyhow::Result<i64> {
    context_id(conn, "module", cmid)
}

fn context_id(conn: &Connection, level: &str, instanceid: i64) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO contexts(level, instanceid) VALUES (?1, ?2)",
        params![level, instanceid],
    )?;
    let id = conn.query_row(
        "SELECT id FROM contexts WHERE level = ?1 AND instanceid = ?2",
        params![level, instanceid],
        |row| row.get(0),
    )?;
    Ok(id)
}

pub(crate) fn parse_sequence(sequence: &str) -> Vec<i64> {
    sequence
        .split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect()
}

pub(crate) fn join_sequence(cmids: &[i64]) -> String {
    cmids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{db, provision};
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
    fn sequence_roundtrip_skips_garbage() {
        assert_eq!(parse_sequence("3,1,2"), vec![3, 1, 2]);
        assert_eq!(parse_sequence(""), Vec::<i64>::new());
        assert_eq!(parse_sequence("4, x,5"), vec![4, 5]);
        assert_eq!(join_sequence(&[7, 8]), "7,8");
    }

    #[test]
    fn missing_course_is_not_found() {
        let conn = db::open_db(&temp_db("modulelib-meta")).expect("open db");
        let err = get_course(&conn, 42).unwrap_err();
        assert!(crate::host::error::is_not_found(&err));
    }

    #[test]
    fn cms_follow_section_sequence_order() {
        let conn = db::open_db(&temp_db("modulelib-meta-order")).expect("open db");
        let course = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "C", "c")
            .expect("create course");
        provision::create_section(&conn, course, 1, Some("Topic 1")).expect("section");
        let (a, _) =
            provision::add_activity(&conn, course, 1, "page", "First", "{}").expect("add");
        let (b, _) =
            provision::add_activity(&conn, course, 1, "quiz", "Second", "{}").expect("add");

        let cms = course_cms(&conn, course).expect("cms");
        assert_eq!(
            cms.iter().map(|cm| cm.id).collect::<Vec<_>>(),
            vec![a, b]
        );
        assert_eq!(cms[0].name, "First");
        assert_eq!(cms[1].module_type, "quiz");
    }
}
