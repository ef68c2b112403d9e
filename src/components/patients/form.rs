//! Draft and snapshot of the record shown on the detail screen.

use crate::models::{Patient, PatientUpdate};

/// Whether fields are read-only or interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    View,
    Edit,
}

/// Holds the record being edited next to the last state confirmed by the
/// backend. The draft always starts as, and is reset to, the snapshot.
#[derive(Debug, Clone)]
pub struct PatientForm {
    draft: Patient,
    snapshot: Patient,
    mode: Mode,
}

impl PatientForm {
    pub fn new(loaded: Patient) -> Self {
        Self {
            draft: loaded.clone(),
            snapshot: loaded,
            mode: Mode::View,
        }
    }

    pub fn draft(&self) -> &Patient {
        &self.draft
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> &Patient {
        &self.snapshot
    }

    #[cfg(test)]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Edit
    }

    pub fn begin_edit(&mut self) {
        self.mode = Mode::Edit;
    }

    /// Applies one field change to the draft. Ignored in view mode.
    pub fn apply(&mut self, update: PatientUpdate) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.draft.apply(update);
        true
    }

    /// Drops every draft change and returns to view mode.
    pub fn cancel(&mut self) {
        self.draft = self.snapshot.clone();
        self.mode = Mode::View;
    }

    /// Records the draft as saved and returns to view mode.
    pub fn commit(&mut self) {
        self.snapshot = self.draft.clone();
        self.mode = Mode::View;
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressKind, Addresses, PatientField};

    fn loaded() -> Patient {
        Patient {
            id: Some("7".to_string()),
            name: Some("Dewi".to_string()),
            phones: vec!["0812".to_string()],
            addresses: Addresses {
                ktp: Some("Bandung".to_string()),
                domisili: Some("Cimahi".to_string()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn starts_in_view_with_draft_equal_to_snapshot() {
        let form = PatientForm::new(loaded());
        assert_eq!(form.mode(), Mode::View);
        assert_eq!(form.draft(), &loaded());
        assert_eq!(form.snapshot(), &loaded());
    }

    #[test]
    fn view_mode_rejects_edits() {
        let mut form = PatientForm::new(loaded());
        assert!(!form.apply(PatientUpdate::Field(PatientField::Name, "X".into())));
        assert!(!form.is_dirty());
    }

    #[test]
    fn cancel_restores_every_field_including_addresses() {
        let mut form = PatientForm::new(loaded());
        form.begin_edit();
        form.apply(PatientUpdate::Field(PatientField::Name, "Dewi L".into()));
        form.apply(PatientUpdate::Address(AddressKind::Ktp, "Garut".into()));
        form.apply(PatientUpdate::Address(AddressKind::Domisili, "".into()));
        form.apply(PatientUpdate::Phones("1, 2".into()));
        assert!(form.is_dirty());

        form.cancel();
        assert_eq!(form.mode(), Mode::View);
        assert_eq!(form.draft(), &loaded());
        assert_eq!(form.snapshot(), &loaded());
    }

    #[test]
    fn commit_moves_draft_into_snapshot() {
        let mut form = PatientForm::new(loaded());
        form.begin_edit();
        form.apply(PatientUpdate::Phones("0812-111-222, 0812-333-444 ,, 0812-555".into()));
        form.commit();

        assert_eq!(form.mode(), Mode::View);
        assert_eq!(
            form.snapshot().phones,
            vec!["0812-111-222", "0812-333-444", "0812-555"]
        );
        assert_eq!(form.draft(), form.snapshot());
    }
}
