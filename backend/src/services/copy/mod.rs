mod activity;
mod module;

use actix_web::web;

const API_PATH: &str = "/api/copy";

/// Configures and returns the Actix `Scope` for the copy write endpoints.
pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH)
        .route("/activity", web::post().to(activity::process))
        .route("/module", web::post().to(module::process))
}

#[cfg(test)]
mod tests {
    use crate::config::AppSettings;
    use crate::host::{db, provision};
    use actix_web::{test, web, App};
    use common::model::copy::CopyOutcome;
    use common::requests::CopyActivityRequest;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_db(prefix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir.join("modulelib.sqlite")
    }

    #[actix_web::test]
    async fn copy_route_returns_a_success_outcome() {
        let db_path = temp_db("modulelib-copy-route");
        let conn = db::open_db(&db_path).expect("open db");
        let source = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "S", "s")
            .expect("source");
        provision::create_section(&conn, source, 1, None).expect("s1");
        let (cmid, _) =
            provision::add_activity(&conn, source, 1, "page", "Welcome", "{}").expect("page");
        let target = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "T", "t")
            .expect("target");
        provision::create_section(&conn, target, 1, None).expect("t1");
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

        let req = test::TestRequest::post()
            .uri("/api/copy/activity")
            .set_json(CopyActivityRequest {
                source_cmid: cmid,
                target_course_id: target,
                target_section: 1,
            })
            .to_request();
        let outcome: CopyOutcome = test::call_and_read_body_json(&app, req).await;
        assert!(outcome.status, "copy failed: {}", outcome.message);
    }
}
