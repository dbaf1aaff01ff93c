mod courses;
mod modules;
mod sections;
mod structure;

use actix_web::web;

const API_PATH: &str = "/api/library";

/// Configures and returns the Actix `Scope` for the library read endpoints.
pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH)
        .route("/courses", web::get().to(courses::process))
        .route("/structure/{course_id}", web::get().to(structure::process))
        .route("/sections/{course_id}", web::get().to(sections::process))
        .route("/modules/{course_id}", web::get().to(modules::process))
}

#[cfg(test)]
mod tests {
    use crate::config::AppSettings;
    use crate::host::{db, provision};
    use actix_web::{test, web, App};
    use common::model::structure::TemplateStructure;
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

    #[actix_web::test]
    async fn structure_route_returns_projection_and_missing_course_is_404() {
        let db_path = temp_db("modulelib-routes");
        let conn = db::open_db(&db_path).expect("open db");
        let course = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "Templates", "tpl")
            .expect("course");
        provision::create_section(&conn, course, 1, Some("Topic 1")).expect("section");
        provision::add_activity(&conn, course, 1, "page", "Welcome", "{}").expect("activity");
        drop(conn);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppSettings {
                    db_path,
                    acting_user: 1,
                }))
                .service(super::configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/library/structure/{}", course))
            .to_request();
        let structure: TemplateStructure = test::call_and_read_body_json(&app, req).await;
        assert_eq!(structure.title, "Templates");
        assert_eq!(structure.sections.len(), 1);
        assert_eq!(structure.sections[0].modules[0].name, "Welcome");

        let req = test::TestRequest::get()
            .uri("/api/library/structure/9999")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
