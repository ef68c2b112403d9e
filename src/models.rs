//! Data models for Klinik.
//!
//! The patient record arrives from the backend as JSON. Fields the screen
//! knows about are named here; anything else is kept in `extra` so an update
//! writes back exactly what was loaded.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents a patient record as served by the records API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Backend identifier used to address the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Medical record number (NORM).
    #[serde(default)]
    pub norm: Option<String>,
    /// National identity number (NIK).
    #[serde(default)]
    pub nik: Option<String>,
    /// National health insurance number (BPJS).
    #[serde(default)]
    pub bpjs_number: Option<String>,
    /// SATUSEHAT patient number (IHS).
    #[serde(default)]
    pub ihs_number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    /// Raw gender code, "L" or "P". See [`Patient::gender`].
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub addresses: Addresses,
    /// Age in years, derived by the backend. Never edited here.
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Fields the backend sent that this screen does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patient {
    /// Returns the typed gender, `None` when the code is missing or unknown.
    pub fn gender(&self) -> Option<Gender> {
        self.gender.as_deref().and_then(Gender::from_code)
    }

    /// Name used when referring to the patient in dialogs.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "-",
        }
    }

    /// Reads one top-level scalar field.
    pub fn field(&self, field: PatientField) -> Option<&str> {
        match field {
            PatientField::Norm => self.norm.as_deref(),
            PatientField::Name => self.name.as_deref(),
            PatientField::Nik => self.nik.as_deref(),
            PatientField::BpjsNumber => self.bpjs_number.as_deref(),
            PatientField::IhsNumber => self.ihs_number.as_deref(),
            PatientField::BirthDate => self.birth_date.as_deref(),
            PatientField::FamilyName => self.family_name.as_deref(),
            PatientField::Email => self.email.as_deref(),
        }
    }

    fn field_mut(&mut self, field: PatientField) -> &mut Option<String> {
        match field {
            PatientField::Norm => &mut self.norm,
            PatientField::Name => &mut self.name,
            PatientField::Nik => &mut self.nik,
            PatientField::BpjsNumber => &mut self.bpjs_number,
            PatientField::IhsNumber => &mut self.ihs_number,
            PatientField::BirthDate => &mut self.birth_date,
            PatientField::FamilyName => &mut self.family_name,
            PatientField::Email => &mut self.email,
        }
    }

    /// Applies a single mutation. Only the addressed field changes.
    pub fn apply(&mut self, update: PatientUpdate) {
        match update {
            PatientUpdate::Field(field, value) => *self.field_mut(field) = Some(value),
            PatientUpdate::Address(kind, value) => *self.addresses.get_mut(kind) = Some(value),
            PatientUpdate::Phones(text) => self.phones = parse_phones(&text),
            PatientUpdate::Gender(gender) => self.gender = gender.map(|g| g.code().to_string()),
        }
    }
}

/// Nested address mapping. A missing key displays as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Addresses {
    /// Address printed on the identity card (KTP).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ktp: Option<String>,
    /// Current residence address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domisili: Option<String>,
}

impl Addresses {
    pub fn get(&self, kind: AddressKind) -> Option<&str> {
        match kind {
            AddressKind::Ktp => self.ktp.as_deref(),
            AddressKind::Domisili => self.domisili.as_deref(),
        }
    }

    fn get_mut(&mut self, kind: AddressKind) -> &mut Option<String> {
        match kind {
            AddressKind::Ktp => &mut self.ktp,
            AddressKind::Domisili => &mut self.domisili,
        }
    }
}

/// Coded gender values understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    /// Code "L" (laki-laki).
    Male,
    /// Code "P" (perempuan).
    Female,
}

impl Gender {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(Gender::Male),
            "P" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "L",
            Gender::Female => "P",
        }
    }

    /// Cycles unset -> L -> P -> unset.
    pub fn cycle(current: Option<Gender>) -> Option<Gender> {
        match current {
            None => Some(Gender::Male),
            Some(Gender::Male) => Some(Gender::Female),
            Some(Gender::Female) => None,
        }
    }
}

/// Top-level scalar fields of a patient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientField {
    Norm,
    Name,
    Nik,
    BpjsNumber,
    IhsNumber,
    BirthDate,
    FamilyName,
    Email,
}

impl PatientField {
    pub const ALL: [PatientField; 8] = [
        PatientField::Norm,
        PatientField::Name,
        PatientField::Nik,
        PatientField::BpjsNumber,
        PatientField::IhsNumber,
        PatientField::BirthDate,
        PatientField::FamilyName,
        PatientField::Email,
    ];

    /// Wire key of the field.
    pub fn key(self) -> &'static str {
        match self {
            PatientField::Norm => "norm",
            PatientField::Name => "name",
            PatientField::Nik => "nik",
            PatientField::BpjsNumber => "bpjs_number",
            PatientField::IhsNumber => "ihs_number",
            PatientField::BirthDate => "birth_date",
            PatientField::FamilyName => "family_name",
            PatientField::Email => "email",
        }
    }
}

/// Keys of the nested address mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Ktp,
    Domisili,
}

impl AddressKind {
    /// Key under `addresses`.
    pub fn key(self) -> &'static str {
        match self {
            AddressKind::Ktp => "ktp",
            AddressKind::Domisili => "domisili",
        }
    }
}

/// A single edit to the draft record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientUpdate {
    Field(PatientField, String),
    Address(AddressKind, String),
    /// Free text, comma separated.
    Phones(String),
    Gender(Option<Gender>),
}

/// Error returned by [`PatientUpdate::from_key`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field key: {0}")]
pub struct UnknownKey(pub String);

impl PatientUpdate {
    /// Builds an update from a form key such as `name` or `addresses.ktp`.
    ///
    /// Only one level of nesting exists, under `addresses`.
    pub fn from_key(key: &str, value: impl Into<String>) -> Result<Self, UnknownKey> {
        let value = value.into();
        if let Some(nested) = key.strip_prefix("addresses.") {
            return match nested {
                "ktp" => Ok(PatientUpdate::Address(AddressKind::Ktp, value)),
                "domisili" => Ok(PatientUpdate::Address(AddressKind::Domisili, value)),
                _ => Err(UnknownKey(key.to_string())),
            };
        }
        match key {
            "phones" => Ok(PatientUpdate::Phones(value)),
            "gender" => Ok(PatientUpdate::Gender(Gender::from_code(&value))),
            _ => PatientField::ALL
                .into_iter()
                .find(|field| field.key() == key)
                .map(|field| PatientUpdate::Field(field, value))
                .ok_or_else(|| UnknownKey(key.to_string())),
        }
    }
}

/// Splits comma separated phone text into the stored list.
///
/// Segments are trimmed and empty ones dropped. Order and duplicates are kept.
pub fn parse_phones(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of [`parse_phones`] for populating the input line.
pub fn join_phones(phones: &[String]) -> String {
    phones.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Patient {
        Patient {
            name: Some("Siti Aminah".to_string()),
            nik: Some("3201010101010001".to_string()),
            addresses: Addresses {
                ktp: Some("Jl. Merdeka 1".to_string()),
                domisili: Some("Jl. Sudirman 2".to_string()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn phone_text_is_split_trimmed_and_compacted() {
        assert_eq!(
            parse_phones("0812-111-222, 0812-333-444 ,, 0812-555"),
            vec!["0812-111-222", "0812-333-444", "0812-555"]
        );
        assert!(parse_phones(" , ,").is_empty());
        assert_eq!(parse_phones("1,1"), vec!["1", "1"]);
    }

    #[test]
    fn top_level_edit_touches_only_that_field() {
        let before = sample();
        let mut after = before.clone();
        after.apply(PatientUpdate::Field(PatientField::Name, "Siti".to_string()));

        assert_eq!(after.name.as_deref(), Some("Siti"));
        after.name = before.name.clone();
        assert_eq!(after, before);
    }

    #[test]
    fn address_edit_leaves_sibling_and_top_level_alone() {
        let before = sample();
        let mut after = before.clone();
        after.apply(PatientUpdate::from_key("addresses.ktp", "Jl. Baru 9").unwrap());

        assert_eq!(after.addresses.ktp.as_deref(), Some("Jl. Baru 9"));
        assert_eq!(after.addresses.domisili, before.addresses.domisili);
        after.addresses.ktp = before.addresses.ktp.clone();
        assert_eq!(after, before);
    }

    #[test]
    fn from_key_rejects_unknown_and_deep_keys() {
        assert!(PatientUpdate::from_key("nama", "x").is_err());
        assert!(PatientUpdate::from_key("addresses.kantor", "x").is_err());
        assert!(PatientUpdate::from_key("addresses.ktp.rt", "x").is_err());
        assert_eq!(
            PatientUpdate::from_key("bpjs_number", "000123").unwrap(),
            PatientUpdate::Field(PatientField::BpjsNumber, "000123".to_string())
        );
    }

    #[test]
    fn gender_code_round_trip_and_cycle() {
        let mut patient = sample();
        patient.apply(PatientUpdate::Gender(Some(Gender::Female)));
        assert_eq!(patient.gender.as_deref(), Some("P"));
        assert_eq!(patient.gender(), Some(Gender::Female));

        patient.gender = Some("X".to_string());
        assert_eq!(patient.gender(), None);

        assert_eq!(Gender::cycle(None), Some(Gender::Male));
        assert_eq!(Gender::cycle(Some(Gender::Male)), Some(Gender::Female));
        assert_eq!(Gender::cycle(Some(Gender::Female)), None);
    }

    #[test]
    fn unknown_backend_fields_survive_deserialize_serialize() {
        let value = json!({
            "id": "17",
            "name": "Budi",
            "phones": ["0812"],
            "addresses": { "ktp": "Bandung" },
            "religion": "Islam",
        });
        let patient: Patient = serde_json::from_value(value).unwrap();
        assert_eq!(patient.addresses.domisili, None);
        assert_eq!(patient.extra.get("religion"), Some(&json!("Islam")));

        let back = serde_json::to_value(&patient).unwrap();
        assert_eq!(back["religion"], json!("Islam"));
        assert_eq!(back["addresses"], json!({ "ktp": "Bandung" }));
    }
}
