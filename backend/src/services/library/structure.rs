//! # Template Structure Service
//!
//! Backend logic for `GET /api/library/structure/{course_id}`: the course
//! title plus the ordered sections of a template course, each with its
//! ordered activities.
//!
//! Two projection rules apply, both inherited from how template courses are
//! presented to instructors:
//! - Section 0 is never part of the response, whatever it contains.
//! - Sections without any activities are omitted.
//!
//! The course id must resolve to an existing course (404 otherwise); this
//! endpoint performs no writes.

use crate::config::AppSettings;
use crate::host::db;
use crate::host::error::is_not_found;
use crate::host::metadata;
use actix_web::web;
use common::model::structure::{TemplateModule, TemplateSection, TemplateStructure};
use rusqlite::Connection;

/// Actix web handler for `GET /api/library/structure/{course_id}`.
///
/// # Returns
/// - `200 OK` with the `TemplateStructure` JSON payload.
/// - `404 Not Found` when the course id does not resolve.
/// - `503 Service Unavailable` on any other failure.
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
    match get_structure(&conn, course_id.into_inner()) {
        Ok(structure) => actix_web::HttpResponse::Ok().json(structure),
        Err(e) if is_not_found(&e) => actix_web::HttpResponse::NotFound().body(e.to_string()),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error retrieving course structure: {:#}", e)),
    }
}

/// Builds the template-structure projection for one course.
pub fn get_structure(conn: &Connection, course_id: i64) -> anyhow::Result<TemplateStructure> {
    let course = metadata::get_course(conn, course_id)?;
    let cms = metadata::course_cms(conn, course_id)?;

    let mut sections = Vec::new();
    for section in metadata::section_info_all(conn, course_id)? {
        // Section 0 of a template is never offered for copying.
        if section.section == 0 {
            continue;
        }
        let modules: Vec<TemplateModule> = cms
            .iter()
            .filter(|cm| cm.section == section.section)
            .map(|cm| TemplateModule {
                cmid: cm.id,
                modname: cm.module_type.clone(),
                name: cm.name.clone(),
                instance: cm.instance,
            })
            .collect();
        if modules.is_empty() {
            continue;
        }
        sections.push(TemplateSection {
            section: section.section,
            name: section.name.clone().unwrap_or_default(),
            modules,
        });
    }

    Ok(TemplateStructure {
        title: course.fullname,
        sections,
    })
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
    fn section_zero_content_yields_an_empty_section_list() {
        let conn = db::open_db(&temp_db("modulelib-structure-empty")).expect("open db");
        let course = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "T", "t")
            .expect("course");
        provision::add_activity(&conn, course, 0, "forum", "News", "{}").expect("activity");

        let structure = get_structure(&conn, course).expect("structure");
        assert_eq!(structure.title, "T");
        assert!(structure.sections.is_empty());
    }

    #[test]
    fn section_zero_and_empty_sections_are_omitted() {
        let conn = db::open_db(&temp_db("modulelib-structure")).expect("open db");
        let course = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "T", "t")
            .expect("course");
        provision::create_section(&conn, course, 1, Some("Topic 1")).expect("s1");
        provision::create_section(&conn, course, 2, None).expect("s2");
        provision::add_activity(&conn, course, 0, "forum", "News", "{}").expect("a0");
        provision::add_activity(&conn, course, 1, "page", "Welcome", "{}").expect("a1");

        let structure = get_structure(&conn, course).expect("structure");
        assert_eq!(structure.sections.len(), 1);
        assert_eq!(structure.sections[0].section, 1);
        assert_eq!(structure.sections[0].name, "Topic 1");
        assert_eq!(structure.sections[0].modules.len(), 1);
        assert_eq!(structure.sections[0].modules[0].modname, "page");
        assert!(structure.sections.iter().all(|s| s.section != 0));
    }

    #[test]
    fn unknown_course_fails_not_found() {
        let conn = db::open_db(&temp_db("modulelib-structure-404")).expect("open db");
        let err = get_structure(&conn, 123).unwrap_err();
        assert!(is_not_found(&err));
    }
}
