//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the tracker use-cases to Dart via FRB as sync calls.
//! - Translate core errors into response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call loads a fresh session from the configured database, so every
//!   call observes the last saved state.
//! - A `None` name behaves exactly like a cancelled prompt.

use log::warn;
use medtrack_core::db::open_db;
use medtrack_core::{
    core_version as core_version_inner, format_date, init_logging as init_logging_inner,
    parse_date, today, NaiveDate, SqliteKeyValueStore, TrackerError, TrackerService,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "medtrack.sqlite3";
const DB_PATH_ENV: &str = "MEDTRACK_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the tracker database file for this process.
///
/// # FFI contract
/// - `path` must be absolute.
/// - Repeating the same path is accepted; a different path after the first
///   call (or after any tracker call resolved the default) is rejected.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() || !Path::new(trimmed).is_absolute() {
        return format!("db path must be an absolute path, got `{trimmed}`");
    }

    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One roster member as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberView {
    /// Position in the roster; the handle other calls take.
    pub index: u32,
    /// Stable id used in log keys.
    pub member_id: String,
    /// Display name as stored (may be empty).
    pub name: String,
    /// Medicines in insertion order, duplicates included.
    pub medicines: Vec<String>,
}

/// Roster response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterResponse {
    /// Whether the roster could be loaded.
    pub ok: bool,
    /// All members in index order; empty on failure.
    pub members: Vec<MemberView>,
    /// Error detail when `ok` is false; empty otherwise.
    pub message: String,
}

/// Result of add-member / add-medicine calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the call completed without any error.
    pub ok: bool,
    /// Whether in-memory state changed (also `true` for unsaved changes).
    pub applied: bool,
    /// Index of the member created or extended, when applied.
    pub member_index: Option<u32>,
    /// Human-readable outcome or error detail.
    pub message: String,
}

impl ActionResponse {
    fn applied(message: impl Into<String>, member_index: usize) -> Self {
        Self {
            ok: true,
            applied: true,
            member_index: Some(to_u32(member_index)),
            message: message.into(),
        }
    }

    fn cancelled() -> Self {
        Self {
            ok: true,
            applied: false,
            member_index: None,
            message: "Cancelled.".to_string(),
        }
    }

    fn failure(err: impl std::fmt::Display, applied: bool) -> Self {
        Self {
            ok: false,
            applied,
            member_index: None,
            message: err.to_string(),
        }
    }
}

/// One medicine row of a day view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineStatus {
    /// Medicine label from the member's list.
    pub name: String,
    /// Whether it is marked taken on the view's date.
    pub taken: bool,
}

/// Checklist for one member on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    /// Whether the view could be built.
    pub ok: bool,
    /// Resolved `YYYY-MM-DD` date.
    pub date: String,
    /// `None` when the index does not address a member.
    pub member_name: Option<String>,
    /// One row per listed medicine, in list order.
    pub medicines: Vec<MedicineStatus>,
    /// Error detail when `ok` is false; empty otherwise.
    pub message: String,
}

/// Result of a toggle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResponse {
    /// Whether the toggle was applied and saved.
    pub ok: bool,
    /// Membership after the call; meaningful when `ok` or unsaved.
    pub taken: bool,
    /// Error detail when `ok` is false; empty otherwise.
    pub message: String,
}

/// Export artifact envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    /// Whether the export body could be produced.
    pub ok: bool,
    /// Suggested file name, `medicine-log.json`.
    pub file_name: String,
    /// MIME type of `body`, `application/json`.
    pub content_type: String,
    /// Full log as two-space indented JSON.
    pub body: String,
    /// Error detail when `ok` is false; empty otherwise.
    pub message: String,
}

/// Returns the full roster in index order.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_snapshot() -> RosterResponse {
    match with_service(|service| {
        service
            .roster()
            .members()
            .iter()
            .enumerate()
            .map(|(index, member)| MemberView {
                index: to_u32(index),
                member_id: member.id.clone(),
                name: member.name.clone(),
                medicines: member.medicines.clone(),
            })
            .collect::<Vec<_>>()
    }) {
        Ok(members) => RosterResponse {
            ok: true,
            members,
            message: String::new(),
        },
        Err(message) => RosterResponse {
            ok: false,
            members: Vec::new(),
            message,
        },
    }
}

/// Adds a family member; `None` or empty `name` is a cancelled prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn add_member(name: Option<String>) -> ActionResponse {
    let mut answer = name;
    let outcome = with_service(|service| {
        service.add_member(&mut |_: &str| -> Option<String> { answer.take() })
    });
    match outcome {
        Ok(Ok(Some(index))) => ActionResponse::applied("Member added.", index),
        Ok(Ok(None)) => ActionResponse::cancelled(),
        Ok(Err(err)) => action_failure(err),
        Err(message) => ActionResponse::failure(message, false),
    }
}

/// Adds a medicine to member `member_index`; `None` or empty `name` is a
/// cancelled prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn add_medicine(member_index: u32, name: Option<String>) -> ActionResponse {
    let index = member_index as usize;
    let mut answer = name;
    let outcome = with_service(|service| {
        service.add_medicine(index, &mut |_: &str| -> Option<String> { answer.take() })
    });
    match outcome {
        Ok(Ok(true)) => ActionResponse::applied("Medicine added.", index),
        Ok(Ok(false)) => ActionResponse::cancelled(),
        Ok(Err(err)) => action_failure(err),
        Err(message) => ActionResponse::failure(message, false),
    }
}

/// Flips `medicine` for member `member_index` on `date` (today when `None`).
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_medicine(
    member_index: u32,
    date: Option<String>,
    medicine: String,
) -> ToggleResponse {
    let outcome = resolve_date(date).and_then(|day| {
        with_service(|service| {
            let result = service.toggle(member_index as usize, day, &medicine);
            let taken = service.is_taken(member_index as usize, day, &medicine);
            (result, taken)
        })
    });
    match outcome {
        Ok((Ok(taken), _)) => ToggleResponse {
            ok: true,
            taken,
            message: String::new(),
        },
        Ok((Err(err), taken)) => ToggleResponse {
            ok: false,
            taken,
            message: err.to_string(),
        },
        Err(message) => ToggleResponse {
            ok: false,
            taken: false,
            message,
        },
    }
}

/// Returns the checklist for member `member_index` on `date` (today when
/// `None`). An unknown member yields an empty checklist.
#[flutter_rust_bridge::frb(sync)]
pub fn day_view(member_index: u32, date: Option<String>) -> DayView {
    let outcome = resolve_date(date).and_then(|day| {
        with_service(|service| {
            let index = member_index as usize;
            let member = service.roster().member(index);
            let medicines = member
                .map(|member| {
                    member
                        .medicines
                        .iter()
                        .map(|name| MedicineStatus {
                            name: name.clone(),
                            taken: service.is_taken(index, day, name),
                        })
                        .collect()
                })
                .unwrap_or_default();
            DayView {
                ok: true,
                date: format_date(day),
                member_name: member.map(|member| member.name.clone()),
                medicines,
                message: String::new(),
            }
        })
    });
    outcome.unwrap_or_else(|message| DayView {
        ok: false,
        date: String::new(),
        member_name: None,
        medicines: Vec::new(),
        message,
    })
}

/// Returns the `medicine-log.json` artifact for the UI to save or share.
#[flutter_rust_bridge::frb(sync)]
pub fn export_log() -> ExportResponse {
    match with_service(|service| service.export_log()) {
        Ok(Ok(export)) => ExportResponse {
            ok: true,
            file_name: export.file_name.to_string(),
            content_type: export.content_type.to_string(),
            body: export.body,
            message: String::new(),
        },
        Ok(Err(err)) => export_failure(err.to_string()),
        Err(message) => export_failure(message),
    }
}

fn action_failure(err: TrackerError) -> ActionResponse {
    if err.mutation_applied() {
        warn!("event=ffi_call module=ffi status=not_durable error={err}");
    }
    ActionResponse::failure(&err, err.mutation_applied())
}

fn export_failure(message: String) -> ExportResponse {
    ExportResponse {
        ok: false,
        file_name: String::new(),
        content_type: String::new(),
        body: String::new(),
        message,
    }
}

fn resolve_date(date: Option<String>) -> Result<NaiveDate, String> {
    match date {
        Some(text) => parse_date(&text).map_err(|err| err.to_string()),
        None => Ok(today()),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_service<T>(
    f: impl FnOnce(&mut TrackerService<SqliteKeyValueStore<'_>>) -> T,
) -> Result<T, String> {
    let conn =
        open_db(resolve_db_path()).map_err(|err| format!("tracker DB open failed: {err}"))?;
    let store = SqliteKeyValueStore::try_new(&conn)
        .map_err(|err| format!("tracker store init failed: {err}"))?;
    let mut service = TrackerService::initialize(store);
    Ok(f(&mut service))
}

fn to_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
