//! Copy-module wrapper: `POST /api/copy/module` addresses the source
//! activity by its instance id, resolves the owning cm, and delegates to
//! the activity copy sequence.

use crate::config::AppSettings;
use crate::host::db;
use crate::host::error::is_not_found;
use crate::host::metadata;
use crate::services::copy::activity::copy_activity_blocking;
use actix_web::web;
use common::model::copy::CopyOutcome;
use common::requests::{CopyActivityRequest, CopyModuleRequest};
use std::path::Path;

/// Actix web handler for `POST /api/copy/module`.
pub async fn process(
    settings: web::Data<AppSettings>,
    payload: web::Json<CopyModuleRequest>,
) -> impl actix_web::Responder {
    let req = payload.into_inner();
    let db_path = settings.db_path.clone();
    let userid = settings.acting_user;

    let handle =
        tokio::task::spawn_blocking(move || copy_module_blocking(&db_path, userid, &req));
    match handle.await {
        Ok(Ok(outcome)) => actix_web::HttpResponse::Ok().json(outcome),
        Ok(Err(e)) if is_not_found(&e) => {
            actix_web::HttpResponse::NotFound().body(e.to_string())
        }
        Ok(Err(e)) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error copying module: {:#}", e)),
        Err(e) => actix_web::HttpResponse::InternalServerError()
            .body(format!("Task join error: {}", e)),
    }
}

fn copy_module_blocking(
    db_path: &Path,
    userid: i64,
    req: &CopyModuleRequest,
) -> anyhow::Result<CopyOutcome> {
    let cm = {
        let conn = db::open_db(db_path)?;
        metadata::cm_by_instance(&conn, req.instance_id)?
    };
    copy_activity_blocking(
        db_path,
        userid,
        &CopyActivityRequest {
            source_cmid: cm.id,
            target_course_id: req.target_course_id,
            target_section: req.target_section,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::provision;
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

    #[test]
    fn wrapper_resolves_the_owning_cm_and_copies() {
        let db_path = temp_db("modulelib-copy-module");
        let conn = db::open_db(&db_path).expect("open db");
        let source = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "S", "s")
            .expect("source");
        provision::create_section(&conn, source, 1, None).expect("s1");
        let (_cmid, instance) =
            provision::add_activity(&conn, source, 1, "page", "Welcome", "{}").expect("page");
        let target = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "T", "t")
            .expect("target");
        provision::create_section(&conn, target, 1, None).expect("t1");
        drop(conn);

        let outcome = copy_module_blocking(
            &db_path,
            1,
            &CopyModuleRequest {
                instance_id: instance,
                target_course_id: target,
                target_section: 1,
            },
        )
        .expect("copy");
        assert!(outcome.status, "copy failed: {}", outcome.message);

        let conn = db::open_db(&db_path).expect("open db");
        let section = metadata::get_section(&conn, target, 1).expect("section");
        assert_eq!(section.sequence.len(), 1);
    }

    #[test]
    fn unknown_instance_is_not_found() {
        let db_path = temp_db("modulelib-copy-module-404");
        let _conn = db::open_db(&db_path).expect("open db");
        let err = copy_module_blocking(
            &db_path,
            1,
            &CopyModuleRequest {
                instance_id: 31337,
                target_course_id: 1,
                target_section: 0,
            },
        )
        .unwrap_err();
        assert!(is_not_found(&err));
    }
}
