//! Field table of the patient detail screen and the rule that renders one
//! field in either mode.

use crate::format::{format_date, format_gender, or_dash, EMPTY};
use crate::models::{
    join_phones, AddressKind, Gender, Patient, PatientField, PatientUpdate, UnknownKey,
};
use ratatui::{prelude::*, widgets::*};
use time::macros::format_description;

/// Where a field reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Scalar(PatientField),
    Address(AddressKind),
    Phones,
    Gender,
}

/// Accepted input, after the HTML input types the records form used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Date,
    Email,
    /// Not typed; Enter steps through the coded values.
    Choice,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub label: &'static str,
    pub key: FieldKey,
    pub input: InputKind,
    pub icon: Option<&'static str>,
}

const fn field(
    label: &'static str,
    key: FieldKey,
    input: InputKind,
    icon: Option<&'static str>,
) -> FieldSpec {
    FieldSpec {
        label,
        key,
        input,
        icon,
    }
}

const IDENTITY_LEN: usize = 8;
const CONTACT_LEN: usize = 3;

/// "Identitas Utama" column.
pub static IDENTITY_FIELDS: [FieldSpec; IDENTITY_LEN] = [
    field("Nama Lengkap", FieldKey::Scalar(PatientField::Name), InputKind::Text, Some("👤")),
    field("NIK", FieldKey::Scalar(PatientField::Nik), InputKind::Text, Some("💳")),
    field("No. BPJS", FieldKey::Scalar(PatientField::BpjsNumber), InputKind::Text, Some("💳")),
    field("No. IHS", FieldKey::Scalar(PatientField::IhsNumber), InputKind::Text, Some("📄")),
    field("Tanggal Lahir", FieldKey::Scalar(PatientField::BirthDate), InputKind::Date, Some("📅")),
    field("Jenis Kelamin", FieldKey::Gender, InputKind::Choice, None),
    field("Nama Keluarga", FieldKey::Scalar(PatientField::FamilyName), InputKind::Text, Some("👤")),
    field("Email", FieldKey::Scalar(PatientField::Email), InputKind::Email, Some("✉")),
];

/// "Kontak & Alamat" column.
pub static CONTACT_FIELDS: [FieldSpec; CONTACT_LEN] = [
    field("Nomor Telepon", FieldKey::Phones, InputKind::Text, Some("📞")),
    field("Alamat KTP", FieldKey::Address(AddressKind::Ktp), InputKind::Text, Some("📍")),
    field("Alamat Domisili", FieldKey::Address(AddressKind::Domisili), InputKind::Text, Some("📍")),
];

pub const FIELD_COUNT: usize = IDENTITY_LEN + CONTACT_LEN;

/// Field at a flat index: identity fields first, then contact fields.
pub fn field_at(index: usize) -> Option<&'static FieldSpec> {
    IDENTITY_FIELDS
        .get(index)
        .or_else(|| CONTACT_FIELDS.get(index.checked_sub(IDENTITY_LEN)?))
}

impl FieldKey {
    /// Raw value placed in the input line when editing starts.
    pub fn edit_value(self, patient: &Patient) -> String {
        match self {
            FieldKey::Scalar(field) => patient.field(field).unwrap_or_default().to_string(),
            FieldKey::Address(kind) => patient.addresses.get(kind).unwrap_or_default().to_string(),
            FieldKey::Phones => join_phones(&patient.phones),
            FieldKey::Gender => patient.gender.clone().unwrap_or_default(),
        }
    }

    /// Text shown in view mode.
    pub fn display_value(self, patient: &Patient) -> String {
        match self {
            FieldKey::Scalar(PatientField::BirthDate) => format_date(patient.birth_date.as_deref()),
            FieldKey::Scalar(field) => or_dash(patient.field(field)).to_string(),
            FieldKey::Address(kind) => or_dash(patient.addresses.get(kind)).to_string(),
            FieldKey::Phones if patient.phones.is_empty() => EMPTY.to_string(),
            FieldKey::Phones => patient.phones.join("  •  "),
            FieldKey::Gender => format_gender(patient.gender.as_deref()).to_string(),
        }
    }

    /// Dotted form key of the field, e.g. `name` or `addresses.ktp`.
    pub fn form_key(self) -> String {
        match self {
            FieldKey::Scalar(field) => field.key().to_string(),
            FieldKey::Address(kind) => format!("addresses.{}", kind.key()),
            FieldKey::Phones => "phones".to_string(),
            FieldKey::Gender => "gender".to_string(),
        }
    }

    /// Converts typed text into the draft mutation for this field. The gender
    /// field ignores `text` and steps to the next code.
    pub fn to_update(self, text: String, patient: &Patient) -> Result<PatientUpdate, UnknownKey> {
        match self {
            FieldKey::Gender => Ok(PatientUpdate::Gender(Gender::cycle(patient.gender()))),
            _ => PatientUpdate::from_key(&self.form_key(), text),
        }
    }
}

impl InputKind {
    /// Date inputs only ever hold an empty value or `YYYY-MM-DD`.
    pub fn accepts(self, text: &str) -> bool {
        match self {
            InputKind::Date => {
                text.is_empty()
                    || time::Date::parse(text, format_description!("[year]-[month]-[day]")).is_ok()
            }
            InputKind::Text | InputKind::Email | InputKind::Choice => true,
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            InputKind::Text => "teks",
            InputKind::Date => "YYYY-MM-DD",
            InputKind::Email => "email",
            InputKind::Choice => "Enter: ganti pilihan",
        }
    }
}

/// Renders one field as a table row.
///
/// In view mode the value is static text with a dash for empty values. In edit
/// mode the value is drawn as an input box; `typing` holds the live buffer
/// when this field currently has the cursor.
pub fn render_field(
    spec: &FieldSpec,
    patient: &Patient,
    editing: bool,
    typing: Option<&str>,
) -> Row<'static> {
    let label = match spec.icon {
        Some(icon) => format!("{icon} {}", spec.label),
        None => spec.label.to_string(),
    };
    let label_cell = Cell::from(label).style(
        Style::default()
            .fg(Color::Rgb(230, 230, 250))
            .add_modifier(Modifier::BOLD),
    );

    let value_cell = if !editing {
        Cell::from(spec.key.display_value(patient)).style(Style::default().fg(Color::Rgb(180, 180, 200)))
    } else if let Some(buffer) = typing {
        Cell::from(format!("[ {buffer}█ ]")).style(
            Style::default()
                .fg(Color::Rgb(140, 219, 140))
                .bg(Color::Rgb(40, 40, 60)),
        )
    } else {
        let value = match spec.key {
            FieldKey::Gender => spec.key.display_value(patient),
            _ => spec.key.edit_value(patient),
        };
        Cell::from(format!("[ {value} ]")).style(
            Style::default()
                .fg(Color::Rgb(220, 220, 240))
                .bg(Color::Rgb(32, 32, 48)),
        )
    };

    Row::new(vec![label_cell, value_cell]).height(1)
}
