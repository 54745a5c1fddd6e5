//! Attachment registry - file references carried by a case
//!
//! Only the reference is recorded. Storage and retrieval of the file itself
//! happen elsewhere.

use crate::core::error::CaseError;
use crate::core::identity::CaseId;
use crate::core::store::CaseStore;
use crate::entities::case::Attachment;

/// Append an attachment reference
pub fn add_attachment(
    store: &mut CaseStore,
    id: &CaseId,
    attachment: Attachment,
) -> Result<Attachment, CaseError> {
    let mut case = store.get_owned(id)?;
    if case.attachments.iter().any(|a| a.id == attachment.id) {
        return Err(CaseError::Validation {
            fields: vec![format!("attachment id {} already present", attachment.id)],
        });
    }

    case.attachments.push(attachment.clone());
    store.replace(id, case)?;
    tracing::debug!(case = %id, attachment = %attachment.id, "added attachment");
    Ok(attachment)
}

/// Remove an attachment reference by ID, returning what was removed
pub fn remove_attachment(
    store: &mut CaseStore,
    id: &CaseId,
    attachment_id: &str,
) -> Result<Attachment, CaseError> {
    let mut case = store.get_owned(id)?;
    let pos = case
        .attachments
        .iter()
        .position(|a| a.id.to_string().eq_ignore_ascii_case(attachment_id.trim()))
        .ok_or_else(|| CaseError::AttachmentNotFound {
            case: id.clone(),
            attachment: attachment_id.to_string(),
        })?;

    let removed = case.attachments.remove(pos);
    store.replace(id, case)?;
    tracing::debug!(case = %id, attachment = %removed.id, "removed attachment");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::{AttachmentKind, Category, FixedMaterial};
    use crate::entities::case::CaseInput;
    use chrono::NaiveDate;

    fn setup() -> (CaseStore, CaseId) {
        let mut store = CaseStore::default();
        let mut input = CaseInput {
            category: Some(Category::Fixed),
            doctor_name: "Dr. Ortiz".to_string(),
            patient_name: "J. Doe".to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 5, 1),
            ..Default::default()
        };
        input.options.fixed_material = Some(FixedMaterial::Pfm);
        let id = store.create(input).unwrap().id;
        (store, id)
    }

    #[test]
    fn test_add_and_remove() {
        let (mut store, id) = setup();
        let att = Attachment::new("scan.stl", "s3://lab/scan.stl", AttachmentKind::File, "Sam");
        add_attachment(&mut store, &id, att.clone()).unwrap();
        assert_eq!(store.require(&id).unwrap().attachments.len(), 1);

        let removed = remove_attachment(&mut store, &id, &att.id.to_string()).unwrap();
        assert_eq!(removed.name, "scan.stl");
        assert!(store.require(&id).unwrap().attachments.is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let (mut store, id) = setup();
        let att = Attachment::new("shade.jpg", "file:///tmp/shade.jpg", AttachmentKind::Image, "Sam");
        add_attachment(&mut store, &id, att.clone()).unwrap();
        let err = add_attachment(&mut store, &id, att).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.require(&id).unwrap().revision, 1);
    }

    #[test]
    fn test_remove_missing_attachment() {
        let (mut store, id) = setup();
        let err = remove_attachment(&mut store, &id, "ATT-01KDGJC92W6EBFGZ5SJW6MFGW6").unwrap_err();
        assert!(matches!(err, CaseError::AttachmentNotFound { .. }));
    }
}
