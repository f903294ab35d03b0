//! Record model for skin-consultation intake forms
//!
//! A `Record` is one submitted intake. Field names serialize in camelCase
//! so the remote `data` payload column round-trips unchanged.

use serde::{Deserialize, Serialize};

/// One consultation intake record.
///
/// `id` is the local identifier, minted as Unix-epoch milliseconds at
/// first save and stable for the record's lifetime; it is the merge key
/// for the in-memory list. `remote_id` is assigned by the remote table on
/// first insert and carried forward on every update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub remote_id: Option<i64>,

    // Personal information
    pub full_name: String,
    pub dob: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub student_code: String,
    pub major: String,

    // Skin condition & history
    pub current_issues: Vec<String>,
    pub skin_type: String,
    pub history_acne_treatment: String,
    pub history_acne_treatment_note: String,
    pub history_doctor_prescription: String,
    pub history_doctor_prescription_note: String,
    pub history_retinoid: String,
    pub history_retinoid_note: String,
    pub history_allergy: String,
    pub history_allergy_note: String,

    // Care routine & lifestyle
    pub cleanser_times: Vec<String>,
    pub makeup_removal: String,
    pub moisturizer: String,
    pub sunscreen: String,
    pub sleep_well: String,
    pub stress: String,
    pub water_intake: String,
    pub spicy_sweet: String,
    pub products_using: String,

    // Face-region findings
    pub face_forehead: Vec<String>,
    pub face_brow: Vec<String>,
    pub face_nose: Vec<String>,
    pub face_inner_cheek: Vec<String>,
    pub face_outer_cheek: Vec<String>,
    pub face_chin: Vec<String>,
    pub face_jawline: Vec<String>,
    pub face_notes: String,

    // Goals & consent
    pub goals: Vec<String>,
    pub other_goal: String,
    pub consent_skin_check: String,
    pub consent_treatment: String,
    pub sign_date: String,
    pub created_at: String,

    // Derived display fields, computed at save time
    pub main_issues: String,
    pub main_goal: String,
}

impl Record {
    /// Whether a local identifier has ever been minted.
    pub fn has_local_id(&self) -> bool {
        self.id != 0
    }
}

/// Render an ISO date (`yyyy-mm-dd`, optionally with a time suffix) as
/// `dd/mm/yy` for display and export. Anything else passes through.
pub fn format_date_display(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let date_part = value.split('T').next().unwrap_or(value);
    let mut parts = date_part.split('-');
    if let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) {
        if !y.is_empty() && !m.is_empty() && !d.is_empty() {
            return format!("{}/{}/{}", d, m, last_two_chars(y));
        }
    }
    value.to_string()
}

// Character-based so arbitrary text in a date slot never splits a
// multi-byte character
fn last_two_chars(s: &str) -> &str {
    match s.char_indices().rev().nth(1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_display_plain_date() {
        assert_eq!(format_date_display("2004-05-17"), "17/05/04");
    }

    #[test]
    fn test_format_date_display_rfc3339() {
        assert_eq!(format_date_display("2026-08-29T07:00:00.000Z"), "29/08/26");
    }

    #[test]
    fn test_format_date_display_passthrough() {
        assert_eq!(format_date_display("17/05/2004"), "17/05/2004");
        assert_eq!(format_date_display(""), "");
    }

    #[test]
    fn test_format_date_display_multibyte_free_text() {
        // dob is free text; a dashed value ending in a multi-byte
        // character must not split it
        assert_eq!(format_date_display("ngày-05-17"), "17/05/ày");
        assert_eq!(format_date_display("đầu-năm-nay"), "nay/năm/ầu");
        assert_eq!(format_date_display("à-b-c"), "c/b/à");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = Record {
            full_name: "Anh Le".to_string(),
            remote_id: Some(12),
            ..Record::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["fullName"], "Anh Le");
        assert_eq!(value["remoteId"], 12);
        assert!(value.get("full_name").is_none());
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: Record = serde_json::from_str(r#"{"fullName":"Minh"}"#).unwrap();
        assert_eq!(record.full_name, "Minh");
        assert_eq!(record.id, 0);
        assert!(record.goals.is_empty());
    }
}
