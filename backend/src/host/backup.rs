//! Backup/restore engine facade.
//!
//! A backup of a single activity is a zip bundle written to a fresh temp
//! directory: `manifest.json` (format tag, backup id, and the source
//! module's context id as the correlation token) plus `activity.json` (the
//! structural payload). User-generated records are only bundled when
//! explicitly requested; the copy orchestrator never requests them.
//!
//! A restore imports the bundle into an existing course: the activity lands
//! in the target's section 0 pending relocation, and the report echoes the
//! manifest's correlation token next to the new cmid so the caller can tell
//! which restored task corresponds to which source activity.

use crate::host::error::NotFound;
use crate::host::metadata::{self, join_sequence};
use crate::host::provision;
use crate::host::roles;
use crate::host::db::now_secs;
use anyhow::{anyhow, Context};
use rusqlite::{params, Connection};
use serde_json::json;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const BUNDLE_FORMAT: &str = "modulelib-activity-v1";

const MANIFEST_ENTRY: &str = "manifest.json";
const ACTIVITY_ENTRY: &str = "activity.json";
const USERDATA_ENTRY: &str = "userdata.json";

#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    pub include_user_data: bool,
    /// Where to stage the bundle directory; the system temp dir when unset.
    pub staging_root: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BackupResult {
    pub backup_id: String,
    /// Temp directory holding the bundle; removed by `discard_backup`
    /// unless configuration says to retain it.
    pub base_path: PathBuf,
    pub bundle_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RestoredActivity {
    pub old_context_id: i64,
    pub new_cmid: i64,
}

#[derive(Debug, Clone)]
pub struct RestoreReport {
    pub tasks: Vec<RestoredActivity>,
}

/// Serializes one activity into a zip bundle. Requires backup capability in
/// the source course context.
pub fn backup_single_activity(
    conn: &Connection,
    cmid: i64,
    userid: i64,
    options: &BackupOptions,
) -> anyhow::Result<BackupResult> {
    let cm = metadata::get_cm(conn, cmid)?;
    let course_context = metadata::course_context_id(conn, cm.course)?;
    if !roles::has_backup_capability(conn, userid, course_context)? {
        return Err(anyhow!(
            "user {} may not back up activities of course {}",
            userid,
            cm.course
        ));
    }

    let source_context = metadata::module_context_id(conn, cmid)?;
    let (intro, config) = instance_payload(conn, cm.instance)?;

    let backup_id = Uuid::new_v4().to_string();
    let mut builder = tempfile::Builder::new();
    builder.prefix("modulelib-backup-");
    let staging = match &options.staging_root {
        Some(root) => {
            std::fs::create_dir_all(root).with_context(|| {
                format!("failed to create staging root {}", root.to_string_lossy())
            })?;
            builder.tempdir_in(root)
        }
        None => builder.tempdir(),
    };
    let base_path = staging
        .context("failed to create backup temp directory")?
        .keep();
    let bundle_path = base_path.join(format!("{}.zip", backup_id));

    let out_file = File::create(&bundle_path).with_context(|| {
        format!("failed to create bundle {}", bundle_path.to_string_lossy())
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let manifest = json!({
        "format": BUNDLE_FORMAT,
        "version": 1,
        "backup_id": backup_id,
        "source_cmid": cm.id,
        "source_context": source_context,
        "module_type": cm.module_type,
        "exported_at": now_secs(),
    });
    write_entry(&mut zip, MANIFEST_ENTRY, &manifest, opts)?;

    let activity = json!({
        "module_type": cm.module_type,
        "name": cm.name,
        "intro": intro,
        "config": config,
        "visible": cm.visible,
    });
    write_entry(&mut zip, ACTIVITY_ENTRY, &activity, opts)?;

    if options.include_user_data {
        let records = user_records(conn, cm.instance)?;
        write_entry(&mut zip, USERDATA_ENTRY, &json!(records), opts)?;
    }

    zip.finish().context("failed to finalize bundle")?;

    Ok(BackupResult {
        backup_id,
        base_path,
        bundle_path,
    })
}

/// Imports a bundle into an existing course. The new cm is appended to the
/// target's section 0; relocation is a separate step.
pub fn restore_into_course(
    conn: &Connection,
    bundle_path: &Path,
    target_course_id: i64,
    _userid: i64,
) -> anyhow::Result<RestoreReport> {
    metadata::get_course(conn, target_course_id)?;

    let in_file = File::open(bundle_path).with_context(|| {
        format!("failed to open bundle {}", bundle_path.to_string_lossy())
    })?;
    let mut archive = ZipArchive::new(in_file).context("invalid bundle archive")?;

    let manifest: serde_json::Value = read_entry(&mut archive, MANIFEST_ENTRY)?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }
    let old_context_id = manifest
        .get("source_context")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| anyhow!("bundle manifest has no source context"))?;

    let activity: serde_json::Value = read_entry(&mut archive, ACTIVITY_ENTRY)?;
    let module_type = json_str(&activity, "module_type")?;
    let name = json_str(&activity, "name")?;
    let intro = activity
        .get("intro")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let config = activity
        .get("config")
        .cloned()
        .unwrap_or_else(|| json!({}));
    let visible = activity
        .get("visible")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);

    let instance = provision::insert_instance(
        conn,
        &module_type,
        &name,
        intro,
        &serde_json::to_string(&config).context("failed to serialize instance config")?,
    )?;
    let section_zero = metadata::get_section(conn, target_course_id, 0)?;
    let new_cmid = provision::attach_module(
        conn,
        target_course_id,
        section_zero.id,
        &module_type,
        instance,
        visible,
    )?;

    if let Ok(mut entry) = archive.by_name(USERDATA_ENTRY) {
        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .context("failed to read user data entry")?;
        let records: Vec<serde_json::Value> =
            serde_json::from_str(&text).context("user data entry is invalid JSON")?;
        for record in records {
            let userid = record.get("userid").and_then(|v| v.as_i64()).unwrap_or(0);
            let data = record.get("data").and_then(|v| v.as_str()).unwrap_or("");
            provision::add_user_record(conn, instance, userid, data)?;
        }
    }

    Ok(RestoreReport {
        tasks: vec![RestoredActivity {
            old_context_id,
            new_cmid,
        }],
    })
}

/// Relocates a cm into the given section of a course, appending it at the
/// end of that section's sequence.
pub fn move_to_section(
    conn: &Connection,
    cmid: i64,
    course: i64,
    section_number: i64,
) -> anyhow::Result<()> {
    let cm = metadata::get_cm(conn, cmid)?;
    if cm.course != course {
        return Err(NotFound::new(format!("course module {} in course {}", cmid, course)).into());
    }
    let target = metadata::get_section(conn, course, section_number)?;
    let current = metadata::get_section(conn, cm.course, cm.section)?;

    let mut remaining = current.sequence.clone();
    remaining.retain(|id| *id != cmid);
    conn.execute(
        "UPDATE course_sections SET sequence = ?1 WHERE id = ?2",
        params![join_sequence(&remaining), current.id],
    )?;
    provision::append_to_sequence(conn, target.id, cmid)?;
    conn.execute(
        "UPDATE course_modules SET section_id = ?1 WHERE id = ?2",
        params![target.id, cmid],
    )?;
    Ok(())
}

/// Recreates the calendar entries of a cm's instance from its config.
pub fn refresh_calendar_events(conn: &Connection, cmid: i64) -> anyhow::Result<()> {
    let cm = metadata::get_cm(conn, cmid)?;
    let (_intro, config) = instance_payload(conn, cm.instance)?;
    conn.execute(
        "DELETE FROM calendar_events WHERE instance = ?1",
        [cm.instance],
    )?;
    if let Some(duedate) = config.get("duedate").and_then(|v| v.as_i64()) {
        conn.execute(
            "INSERT INTO calendar_events(course, instance, name, timestart)
             VALUES (?1, ?2, ?3, ?4)",
            params![cm.course, cm.instance, cm.name, duedate],
        )?;
    }
    Ok(())
}

/// Appends a `module_created` entry to the host event log so other
/// subsystems observe the new cm.
pub fn emit_module_created(conn: &Connection, cmid: i64) -> anyhow::Result<()> {
    let cm = metadata::get_cm(conn, cmid)?;
    conn.execute(
        "INSERT INTO event_log(name, courseid, cmid, timecreated) VALUES (?1, ?2, ?3, ?4)",
        params!["module_created", cm.course, cm.id, now_secs()],
    )?;
    Ok(())
}

/// Recomputes the denormalized structure cache of a course.
pub fn rebuild_course_cache(conn: &Connection, course: i64) -> anyhow::Result<()> {
    let sections: Vec<serde_json::Value> = metadata::section_info_all(conn, course)?
        .into_iter()
        .map(|s| {
            json!({
                "section": s.section,
                "name": s.name,
                "cmids": s.sequence,
            })
        })
        .collect();
    let structure = json!({ "course": course, "sections": sections });
    conn.execute(
        "INSERT OR REPLACE INTO course_cache(course, structure, rebuilt_at)
         VALUES (?1, ?2, ?3)",
        params![course, structure.to_string(), now_secs()],
    )?;
    Ok(())
}

/// Removes a backup's temp directory.
pub fn discard_backup(base_path: &Path) -> anyhow::Result<()> {
    std::fs::remove_dir_all(base_path).with_context(|| {
        format!(
            "failed to remove backup directory {}",
            base_path.to_string_lossy()
        )
    })
}

fn instance_payload(
    conn: &Connection,
    instance: i64,
) -> anyhow::Result<(String, serde_json::Value)> {
    let (intro, config): (String, String) = conn.query_row(
        "SELECT intro, config FROM activity_instances WHERE id = ?1",
        [instance],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let config =
        serde_json::from_str(&config).context("activity instance config is invalid JSON")?;
    Ok((intro, config))
}

fn user_records(conn: &Connection, instance: i64) -> anyhow::Result<Vec<serde_json::Value>> {
    let mut stmt =
        conn.prepare("SELECT userid, data FROM user_records WHERE instance = ?1 ORDER BY id")?;
    let rows = stmt.query_map([instance], |row| {
        Ok(json!({
            "userid": row.get::<_, i64>(0)?,
            "data": row.get::<_, String>(1)?,
        }))
    })?;
    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

fn write_entry(
    zip: &mut ZipWriter<File>,
    entry: &str,
    value: &serde_json::Value,
    opts: FileOptions,
) -> anyhow::Result<()> {
    zip.start_file(entry, opts)
        .with_context(|| format!("failed to start bundle entry {}", entry))?;
    zip.write_all(
        serde_json::to_string_pretty(value)
            .with_context(|| format!("failed to serialize {}", entry))?
            .as_bytes(),
    )
    .with_context(|| format!("failed to write bundle entry {}", entry))?;
    Ok(())
}

fn read_entry(
    archive: &mut ZipArchive<File>,
    entry: &str,
) -> anyhow::Result<serde_json::Value> {
    let mut text = String::new();
    archive
        .by_name(entry)
        .with_context(|| format!("bundle missing {}", entry))?
        .read_to_string(&mut text)
        .with_context(|| format!("failed to read {}", entry))?;
    serde_json::from_str(&text).with_context(|| format!("{} is invalid JSON", entry))
}

fn json_str(value: &serde_json::Value, key: &str) -> anyhow::Result<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("bundle activity entry has no {}", key))
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

    fn course_with_page(conn: &Connection) -> (i64, i64, i64) {
        let course = provision::create_course(conn, db::DEFAULT_CATEGORY_ID, "Source", "src")
            .expect("create course");
        provision::create_section(conn, course, 1, Some("Topic 1")).expect("section");
        let (cmid, instance) =
            provision::add_activity(conn, course, 1, "page", "Welcome", "{\"body\":\"hi\"}")
                .expect("add activity");
        (course, cmid, instance)
    }

    fn backed_up(conn: &Connection, cmid: i64, course: i64) -> BackupResult {
        let ctx = metadata::course_context_id(conn, course).expect("context");
        roles::with_manager_role(conn, 1, ctx, |conn| {
            backup_single_activity(conn, cmid, 1, &BackupOptions::default())
        })
        .expect("backup")
    }

    #[test]
    fn backup_requires_capability_in_source_course() {
        let conn = db::open_db(&temp_db("modulelib-backup-cap")).expect("open db");
        let (_course, cmid, _) = course_with_page(&conn);
        let err = backup_single_activity(&conn, cmid, 1, &BackupOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("may not back up"));
    }

    #[test]
    fn bundle_excludes_user_data_unless_requested() {
        let conn = db::open_db(&temp_db("modulelib-backup-users")).expect("open db");
        let (course, cmid, instance) = course_with_page(&conn);
        provision::add_user_record(&conn, instance, 5, "submission").expect("user record");

        let backup = backed_up(&conn, cmid, course);
        let file = File::open(&backup.bundle_path).expect("open bundle");
        let mut archive = ZipArchive::new(file).expect("zip");
        assert!(archive.by_name(USERDATA_ENTRY).is_err());
        discard_backup(&backup.base_path).expect("cleanup");
    }

    #[test]
    fn restore_reports_the_correlation_token_and_lands_in_section_zero() {
        let conn = db::open_db(&temp_db("modulelib-restore")).expect("open db");
        let (course, cmid, _) = course_with_page(&conn);
        let target = provision::create_course(&conn, db::DEFAULT_CATEGORY_ID, "Target", "tgt")
            .expect("target course");

        let source_context = metadata::module_context_id(&conn, cmid).expect("context");
        let backup = backed_up(&conn, cmid, course);
        let report =
            restore_into_course(&conn, &backup.bundle_path, target, 1).expect("restore");

        assert_eq!(report.tasks.len(), 1);
        assert_eq!(report.tasks[0].old_context_id, source_context);
        let new_cm = metadata::get_cm(&conn, report.tasks[0].new_cmid).expect("new cm");
        assert_eq!(new_cm.course, target);
        assert_eq!(new_cm.section, 0);
        assert_eq!(new_cm.name, "Welcome");
        discard_backup(&backup.base_path).expect("cleanup");
    }

    #[test]
    fn move_to_section_reorders_sequences() {
        let conn = db::open_db(&temp_db("modulelib-move")).expect("open db");
        let (course, cmid, _) = course_with_page(&conn);
        provision::create_section(&conn, course, 2, None).expect("section 2");

        move_to_section(&conn, cmid, course, 2).expect("move");
        let old = metadata::get_section(&conn, course, 1).expect("section 1");
        let new = metadata::get_section(&conn, course, 2).expect("section 2");
        assert!(old.sequence.is_empty());
        assert_eq!(new.sequence, vec![cmid]);
        let cm = metadata::get_cm(&conn, cmid).expect("cm");
        assert_eq!(cm.section, 2);
    }
}
