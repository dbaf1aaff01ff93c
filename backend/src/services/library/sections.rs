//! Target-sections endpoint: every section of a course, including section
//! 0, as `(number, name)` pairs for the copy form's dropdown. A section
//! without a name gets a synthesized "Section N".

use crate::config::AppSettings;
use crate::host::db;
use crate::host::error::is_not_found;
use crate::host::metadata;
use actix_web::web;
use common::model::section::SectionRef;
use rusqlite::Connection;

/// Actix web handler for `GET /api/library/sections/{course_id}`.
pub async fn process(
    settings: web::Data<AppSettings>,
    course_id: web::Path<i64>,
) -> impl actix_web::Responder {
    let conn = match db::open_db(&settings.db_path) {
        Ok(conn) => conn,
        Err(e) => {
            return actix_web::HttpResponse::ServiceUnavailable()
                .body(format!("Error opening course database: {:#}", e))
        }
    };
    match get_target_sections(&conn, course_id.into_inner()) {
        Ok(sections) => actix_web::HttpResponse::Ok().json(sections),
        Err(e) if is_not_found(&e) => actix_web::HttpResponse::NotFound().body(e.to_string()),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error retrieving course sections: {:#}", e)),
    }
}

pub fn get_target_sections(
    conn: &Connection,
    course_id: i64,
) -> anyhow::Result<Vec<SectionRef>> {
    metadata::get_course(conn, course_id)?;
    let sections = metadata::section_info_all(conn, course_id)?
        .into_iter()
        .map(|s| SectionRef {
            section: s.section,
            name: s
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("Section {}", s.section)),
        })
        .collect();
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::provision;
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
    fn every_entry_has_a_nonempty_name_and_nonnegative_number() {
        let conn = db::open_db(&temp_db("modulelib-sections")).expect("open db");
        let course = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "T", "t")
            .expect("course");
        provision::create_section(&conn, course, 1, Some("Named")).expect("s1");
        provision::create_section(&conn, course, 2, None).expect("s2");
        provision::create_section(&conn, course, 3, Some("")).expect("s3");

        let sections = get_target_sections(&conn, course).expect("sections");
        assert_eq!(sections.len(), 4);
        assert!(sections.iter().all(|s| !s.name.is_empty() && s.section >= 0));
        assert_eq!(sections[0].name, "Section 0");
        assert_eq!(sections[1].name, "Named");
        assert_eq!(sections[2].name, "Section 2");
        assert_eq!(sections[3].name, "Section 3");
    }

    #[test]
    fn unknown_course_fails_not_found() {
        let conn = db::open_db(&temp_db("modulelib-sections-404")).expect("open db");
        assert!(is_not_found(&get_target_sections(&conn, 9).unwrap_err()));
    }
}
