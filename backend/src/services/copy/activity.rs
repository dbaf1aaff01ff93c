//! # Activity Copy Service
//!
//! `POST /api/copy/activity`: clone a single activity from a template
//! course into a target course at a chosen section, through the host
//! backup/restore engine.
//!
//! ## Workflow
//!
//! 1. Resolve the source cm, its owning course, and the target course.
//!    A missing source activity or target course is a hard 404; nothing has
//!    been mutated at that point.
//! 2. Back up the activity under a scoped manager grant in the source
//!    course context (the acting user normally holds no role in a template
//!    course); the grant is revoked on success and failure alike. User data
//!    is always excluded from the backup.
//! 3. Restore the bundle into the target course and pick the restored task
//!    whose old context id matches the source module's context.
//! 4. Relocate the clone to the requested section (0 appends after the
//!    course's last section content), refresh its calendar entries, and
//!    emit the `module_created` event.
//! 5. Drop the temp bundle unless configured to keep it, and rebuild the
//!    target course's structure cache.
//!
//! Every engine failure after step 1 is converted into a uniform
//! `{status:false, message}` outcome. There is no retry and no idempotence:
//! calling twice produces two independent clones.

use crate::config::AppSettings;
use crate::host::backup::{self, BackupOptions};
use crate::host::db;
use crate::host::error::is_not_found;
use crate::host::metadata::{self, CmInfo, Course};
use crate::host::roles;
use actix_web::web;
use common::model::copy::CopyOutcome;
use common::requests::CopyActivityRequest;
use log::{info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Actix web handler for `POST /api/copy/activity`.
///
/// The blocking backup/restore work runs on the blocking thread pool; the
/// response is only produced once the whole sequence has finished or
/// failed.
pub async fn process(
    settings: web::Data<AppSettings>,
    payload: web::Json<CopyActivityRequest>,
) -> impl actix_web::Responder {
    let req = payload.into_inner();
    let db_path = settings.db_path.clone();
    let userid = settings.acting_user;

    let handle =
        tokio::task::spawn_blocking(move || copy_activity_blocking(&db_path, userid, &req));
    match handle.await {
        Ok(Ok(outcome)) => actix_web::HttpResponse::Ok().json(outcome),
        Ok(Err(e)) if is_not_found(&e) => {
            actix_web::HttpResponse::NotFound().body(e.to_string())
        }
        Ok(Err(e)) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error copying activity: {:#}", e)),
        Err(e) => actix_web::HttpResponse::InternalServerError()
            .body(format!("Task join error: {}", e)),
    }
}

/// Resolves the endpoints of the copy and runs the clone sequence.
///
/// Resolution failures propagate as errors (`NotFound` for missing ids);
/// everything after resolution is caught and reported through the outcome's
/// status flag.
pub(crate) fn copy_activity_blocking(
    db_path: &Path,
    userid: i64,
    req: &CopyActivityRequest,
) -> anyhow::Result<CopyOutcome> {
    let conn = db::open_db(db_path)?;

    let cm = metadata::get_cm(&conn, req.source_cmid)?;
    metadata::get_course(&conn, cm.course)?;
    let target = metadata::get_course(&conn, req.target_course_id)?;

    // Bundles are staged next to the database, like the rest of the host's
    // working data.
    let staging_root = db_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.join("backup_temp"));

    match clone_activity(&conn, userid, &cm, &target, req.target_section, staging_root) {
        Ok(message) => {
            info!(
                "copied cm {} into course {} (section {})",
                cm.id, target.id, req.target_section
            );
            Ok(CopyOutcome {
                status: true,
                message,
            })
        }
        Err(e) => {
            warn!(
                "copy of cm {} into course {} failed: {:#}",
                cm.id, target.id, e
            );
            Ok(CopyOutcome {
                status: false,
                message: format!("Backup/restore failed: {:#}", e),
            })
        }
    }
}

fn clone_activity(
    conn: &Connection,
    userid: i64,
    cm: &CmInfo,
    target: &Course,
    target_section: i64,
    staging_root: Option<PathBuf>,
) -> anyhow::Result<String> {
    let source_context = metadata::module_context_id(conn, cm.id)?;
    let course_context = metadata::course_context_id(conn, cm.course)?;

    let backup = roles::with_manager_role(conn, userid, course_context, |conn| {
        backup::backup_single_activity(
            conn,
            cm.id,
            userid,
            &BackupOptions {
                include_user_data: false,
                staging_root,
            },
        )
    })?;

    let report = backup::restore_into_course(conn, &backup.bundle_path, target.id, userid)?;

    let new_cmid = report
        .tasks
        .iter()
        .find(|task| task.old_context_id == source_context)
        .map(|task| task.new_cmid);

    if let Some(new_cmid) = new_cmid {
        let section_number = if target_section == 0 {
            // Append at the end: after the last section's existing content.
            metadata::section_info_all(conn, target.id)?
                .last()
                .map(|s| s.section)
                .unwrap_or(0)
        } else {
            target_section
        };
        backup::move_to_section(conn, new_cmid, target.id, section_number)?;
        backup::refresh_calendar_events(conn, new_cmid)?;
        backup::emit_module_created(conn, new_cmid)?;
    }

    if !crate::config::keep_temp_backups(conn) {
        backup::discard_backup(&backup.base_path)?;
    }
    backup::rebuild_course_cache(conn, target.id)?;

    Ok("Activity restored into target course (experimental).".to_string())
}
