//! Audit trail - append-only notes and pause history

use chrono::Utc;

use crate::core::error::CaseError;
use crate::core::identity::CaseId;
use crate::core::store::CaseStore;
use crate::core::vocabulary::NoteType;
use crate::entities::case::{CaseNote, PauseRecord};

/// Append a note to a case
///
/// Blank text is stored as-is; callers decide whether that is acceptable.
pub fn add_note(
    store: &mut CaseStore,
    id: &CaseId,
    author: &str,
    text: &str,
    note_type: NoteType,
) -> Result<CaseNote, CaseError> {
    let mut case = store.get_owned(id)?;
    let note = CaseNote::new(author, text, note_type, Utc::now());
    case.notes.push(note.clone());
    store.replace(id, case)?;
    tracing::debug!(case = %id, note = %note.id, kind = %note_type, "added note");
    Ok(note)
}

/// Notes on a case, oldest first, optionally filtered by type
pub fn notes(
    store: &CaseStore,
    id: &CaseId,
    note_type: Option<NoteType>,
) -> Result<Vec<CaseNote>, CaseError> {
    let case = store.require(id)?;
    Ok(case
        .notes
        .iter()
        .filter(|n| note_type.map_or(true, |t| n.note_type == t))
        .cloned()
        .collect())
}

pub fn pause_history(store: &CaseStore, id: &CaseId) -> Result<Vec<PauseRecord>, CaseError> {
    Ok(store.require(id)?.pause_history.clone())
}

/// The pause record still awaiting a resume, if any
pub fn open_pause(store: &CaseStore, id: &CaseId) -> Result<Option<PauseRecord>, CaseError> {
    Ok(store.require(id)?.open_pause().cloned())
}
