//! Target-modules endpoint: the user-visible activities of a course as a
//! flat list annotated with their section numbers.

use crate::config::AppSettings;
use crate::host::db;
use crate::host::error::is_not_found;
use crate::host::metadata;
use actix_web::web;
use common::model::module::TargetModule;
use rusqlite::Connection;

/// Actix web handler for `GET /api/library/modules/{course_id}`.
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
    match get_target_modules(&conn, course_id.into_inner()) {
        Ok(modules) => actix_web::HttpResponse::Ok().json(modules),
        Err(e) if is_not_found(&e) => actix_web::HttpResponse::NotFound().body(e.to_string()),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error retrieving course modules: {:#}", e)),
    }
}

pub fn get_target_modules(
    conn: &Connection,
    course_id: i64,
) -> anyhow::Result<Vec<TargetModule>> {
    metadata::get_course(conn, course_id)?;
    let modules = metadata::course_cms(conn, course_id)?
        .into_iter()
        .filter(|cm| cm.visible)
        .map(|cm| TargetModule {
            id: cm.id,
            section: cm.section,
            modname: cm.module_type,
            name: cm.name,
        })
        .collect();
    Ok(modules)
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
    fn hidden_modules_are_excluded() {
        let conn = db::open_db(&temp_db("modulelib-modules")).expect("open db");
        let course = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "T", "t")
            .expect("course");
        provision::create_section(&conn, course, 1, None).expect("s1");
        provision::add_activity(&conn, course, 1, "page", "Visible", "{}").expect("a1");

        let section = metadata::get_section(&conn, course, 1).expect("section");
        let hidden = provision::insert_instance(&conn, "quiz", "Hidden", "", "{}")
            .expect("instance");
        provision::attach_module(&conn, course, section.id, "quiz", hidden, false)
            .expect("attach");

        let modules = get_target_modules(&conn, course).expect("modules");
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "Visible");
        assert_eq!(modules[0].section, 1);
    }
}
