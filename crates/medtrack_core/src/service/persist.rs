//! Slot load/save helpers shared by both stores.

use crate::model::codec::CodecResult;
use crate::service::tracker_service::TrackerError;
use crate::storage::kv_store::KeyValueStore;
use log::{debug, error, info, warn};

/// Reads and parses one slot.
///
/// Returns `None` (after logging) when the slot is empty, unreadable or does
/// not parse; callers fall back to their default.
pub(crate) fn load_slot<S, T>(
    storage: &S,
    slot: &'static str,
    parse: impl FnOnce(&str) -> CodecResult<T>,
) -> Option<T>
where
    S: KeyValueStore + ?Sized,
{
    let payload = match storage.get(slot) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            debug!("event=slot_load module=service status=absent slot={slot}");
            return None;
        }
        Err(err) => {
            warn!(
                "event=slot_load module=service status=fallback slot={slot} error_code=slot_read_failed error={err}"
            );
            return None;
        }
    };

    match parse(&payload) {
        Ok(value) => {
            info!(
                "event=slot_load module=service status=ok slot={slot} bytes={}",
                payload.len()
            );
            Some(value)
        }
        Err(err) => {
            warn!(
                "event=slot_load module=service status=fallback slot={slot} error_code=slot_parse_failed error={err}"
            );
            None
        }
    }
}

/// Writes one full snapshot into a slot.
///
/// # Errors
/// - `TrackerError::Encode` or `TrackerError::NotDurable`; the caller's
///   in-memory state is left as is in both cases.
pub(crate) fn save_slot<S>(
    storage: &S,
    slot: &'static str,
    payload: CodecResult<String>,
) -> Result<(), TrackerError>
where
    S: KeyValueStore + ?Sized,
{
    let payload = payload.map_err(|err| {
        error!(
            "event=slot_save module=service status=error slot={slot} error_code=slot_encode_failed error={err}"
        );
        TrackerError::Encode(err)
    })?;

    storage.set(slot, &payload).map_err(|err| {
        error!(
            "event=slot_save module=service status=error slot={slot} error_code=slot_write_failed error={err}"
        );
        TrackerError::NotDurable { slot, source: err }
    })?;

    debug!(
        "event=slot_save module=service status=ok slot={slot} bytes={}",
        payload.len()
    );
    Ok(())
}
