//! Widget-shell course list: the direct courses of the configured template
//! category. Any failure here (unset category, deleted category, query
//! error) degrades to an empty list so the block still renders.

use crate::config::{self, AppSettings};
use crate::host::db;
use crate::host::metadata;
use actix_web::web;
use common::model::course::CourseSummary;
use log::warn;
use rusqlite::Connection;

/// Actix web handler for `GET /api/library/courses`.
pub async fn process(settings: web::Data<AppSettings>) -> impl actix_web::Responder {
    let courses = match db::open_db(&settings.db_path) {
        Ok(conn) => get_template_courses(&conn),
        Err(e) => {
            warn!("course database unavailable for the course list: {:#}", e);
            Vec::new()
        }
    };
    actix_web::HttpResponse::Ok().json(courses)
}

pub fn get_template_courses(conn: &Connection) -> Vec<CourseSummary> {
    let category_id = config::template_category(conn);
    let result = metadata::get_category(conn, category_id).and_then(|category| {
        log::debug!("listing template courses from category '{}'", category.name);
        metadata::category_courses(conn, category.id)
    });
    match result {
        Ok(courses) => courses
            .into_iter()
            .map(|c| CourseSummary {
                id: c.id,
                fullname: c.fullname,
            })
            .collect(),
        Err(e) => {
            warn!(
                "template category {} could not be listed: {:#}",
                category_id, e
            );
            Vec::new()
        }
    }
}
