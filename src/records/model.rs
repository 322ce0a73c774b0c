//! Applicant record model and its wire mapping
//!
//! The store has no date type, so a date of birth travels as an RFC 3339
//! string pinned to UTC midnight. Reading takes the UTC calendar date back
//! out, which keeps the date stable no matter what timezone either side
//! runs in.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::{Map, Value};

use crate::datastore::{Document, DocumentFields};
use crate::error::Error;

/// Date format used everywhere a date of birth is shown
pub const DOB_DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// One applicant record as held in the local mirror
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Store-assigned document id
    pub id: String,
    /// Client-assigned sequential id, unique within the collection
    pub custom_id: i64,
    pub name: String,
    pub mobile: String,
    pub coupon: String,
    pub aadhaar: String,
    pub dob: NaiveDate,
    /// Insertion timestamp, set by the store
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Build a record from a stored document
    pub fn from_document(doc: &Document) -> Result<Self, Error> {
        let custom_id = doc
            .field_i64("customId")
            .ok_or_else(|| Error::decode(format!("document {} has no customId", doc.id)))?;
        let dob_raw = doc
            .field_str("dob")
            .ok_or_else(|| Error::decode(format!("document {} has no dob", doc.id)))?;

        Ok(Self {
            id: doc.id.clone(),
            custom_id,
            name: require_str(doc, "name")?,
            mobile: require_str(doc, "mobile")?,
            coupon: require_str(doc, "coupon")?,
            aadhaar: require_str(doc, "aadhaar")?,
            dob: dob_from_wire(dob_raw)?,
            created_at: doc.created_at,
        })
    }

    /// Date of birth formatted for display
    pub fn display_dob(&self) -> String {
        self.dob.format(DOB_DISPLAY_FORMAT).to_string()
    }
}

fn require_str(doc: &Document, key: &str) -> Result<String, Error> {
    doc.field_str(key)
        .map(str::to_string)
        .ok_or_else(|| Error::decode(format!("document {} has no {}", doc.id, key)))
}

/// Encode a date of birth for storage
pub fn dob_to_wire(dob: NaiveDate) -> String {
    dob.and_time(NaiveTime::MIN).and_utc().to_rfc3339()
}

/// Decode a stored date of birth
///
/// Accepts the RFC 3339 form this client writes as well as a bare
/// `YYYY-MM-DD`, which older rows may carry.
pub fn dob_from_wire(raw: &str) -> Result<NaiveDate, Error> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| Error::decode(format!("unreadable dob: {}", raw)))
}

/// Parse a date of birth as a user would type it
///
/// Takes `YYYY-MM-DD` (date inputs) or `DD/MM/YYYY` (the display form).
pub fn parse_dob_input(raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, DOB_DISPLAY_FORMAT))
        .map_err(|_| Error::InvalidDob)
}

/// Form state for a record that has not been submitted yet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDraft {
    pub name: String,
    pub mobile: String,
    pub coupon: String,
    pub aadhaar: String,
    pub dob: Option<NaiveDate>,
}

impl RecordDraft {
    pub fn new(
        name: &str,
        mobile: &str,
        coupon: &str,
        aadhaar: &str,
        dob: NaiveDate,
    ) -> Self {
        Self {
            name: name.to_string(),
            mobile: mobile.to_string(),
            coupon: coupon.to_string(),
            aadhaar: aadhaar.to_string(),
            dob: Some(dob),
        }
    }

    /// Whether every field has been filled in
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.mobile.trim().is_empty()
            && !self.coupon.trim().is_empty()
            && !self.aadhaar.trim().is_empty()
            && self.dob.is_some()
    }

    /// Field payload for a create call, or None while the draft is incomplete
    pub fn to_fields(&self, custom_id: i64) -> Option<DocumentFields> {
        let dob = self.dob?;
        if !self.is_complete() {
            return None;
        }

        let mut fields = Map::new();
        fields.insert("customId".to_string(), Value::from(custom_id));
        fields.insert("name".to_string(), Value::from(self.name.trim()));
        fields.insert("mobile".to_string(), Value::from(self.mobile.trim()));
        fields.insert("coupon".to_string(), Value::from(self.coupon.trim()));
        fields.insert("aadhaar".to_string(), Value::from(self.aadhaar.trim()));
        fields.insert("dob".to_string(), Value::from(dob_to_wire(dob)));
        Some(fields)
    }
}

/// Changed fields of an edit, sparse so untouched fields stay untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub coupon: Option<String>,
    pub aadhaar: Option<String>,
    pub dob: Option<NaiveDate>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, value: &str) -> Self {
        self.name = Some(value.to_string());
        self
    }

    pub fn with_mobile(mut self, value: &str) -> Self {
        self.mobile = Some(value.to_string());
        self
    }

    pub fn with_coupon(mut self, value: &str) -> Self {
        self.coupon = Some(value.to_string());
        self
    }

    pub fn with_aadhaar(mut self, value: &str) -> Self {
        self.aadhaar = Some(value.to_string());
        self
    }

    pub fn with_dob(mut self, value: NaiveDate) -> Self {
        self.dob = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.mobile.is_none()
            && self.coupon.is_none()
            && self.aadhaar.is_none()
            && self.dob.is_none()
    }

    /// Field payload for an update call, holding only the changed fields
    pub fn to_fields(&self) -> DocumentFields {
        let mut fields = Map::new();
        if let Some(name) = &self.name {
            fields.insert("name".to_string(), Value::from(name.trim()));
        }
        if let Some(mobile) = &self.mobile {
            fields.insert("mobile".to_string(), Value::from(mobile.trim()));
        }
        if let Some(coupon) = &self.coupon {
            fields.insert("coupon".to_string(), Value::from(coupon.trim()));
        }
        if let Some(aadhaar) = &self.aadhaar {
            fields.insert("aadhaar".to_string(), Value::from(aadhaar.trim()));
        }
        if let Some(dob) = self.dob {
            fields.insert("dob".to_string(), Value::from(dob_to_wire(dob)));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(fields: serde_json::Value) -> Document {
        let mut body = json!({
            "$id": "doc-1",
            "$createdAt": "2025-03-12T09:15:00+00:00",
            "$updatedAt": "2025-03-12T09:15:00+00:00",
        });
        body.as_object_mut()
            .expect("body is an object")
            .extend(fields.as_object().expect("fields are an object").clone());
        serde_json::from_value(body).expect("document should deserialize")
    }

    #[test]
    fn dob_survives_the_wire_for_any_calendar_date() {
        for (y, m, d) in [
            (1990, 5, 17),
            (2000, 2, 29),
            (1987, 12, 31),
            (1969, 7, 20),
        ] {
            let dob = NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
            let wire = dob_to_wire(dob);
            assert_eq!(dob_from_wire(&wire).expect("decodes"), dob);
        }
    }

    #[test]
    fn wire_dob_read_back_in_any_offset_keeps_the_date() {
        // a reader in UTC+05:30 must not shift the day
        let dob = NaiveDate::from_ymd_opt(1995, 6, 15).expect("valid date");
        let wire = dob_to_wire(dob);
        let shifted = DateTime::parse_from_rfc3339(&wire)
            .expect("valid rfc3339")
            .with_timezone(&chrono::FixedOffset::east_opt(5 * 3600 + 1800).expect("valid offset"));
        assert_eq!(
            dob_from_wire(&shifted.to_rfc3339()).expect("decodes"),
            dob
        );
    }

    #[test]
    fn bare_dates_from_older_rows_still_decode() {
        assert_eq!(
            dob_from_wire("1990-04-03").expect("decodes"),
            NaiveDate::from_ymd_opt(1990, 4, 3).expect("valid date")
        );
    }

    #[test]
    fn record_round_trips_through_a_document() {
        let dob = NaiveDate::from_ymd_opt(1992, 11, 5).expect("valid date");
        let doc = document(json!({
            "customId": 4,
            "name": "Asha Rao",
            "mobile": "9876543210",
            "coupon": "PAN24",
            "aadhaar": "123456789012",
            "dob": dob_to_wire(dob),
        }));

        let record = Record::from_document(&doc).expect("record should decode");
        assert_eq!(record.custom_id, 4);
        assert_eq!(record.name, "Asha Rao");
        assert_eq!(record.dob, dob);
        assert_eq!(record.display_dob(), "05/11/1992");
    }

    #[test]
    fn missing_fields_are_decode_errors() {
        let doc = document(json!({ "customId": 4 }));
        let err = Record::from_document(&doc).expect_err("should fail");
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn draft_completeness_requires_every_field() {
        let dob = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date");
        let complete = RecordDraft::new("Asha", "9876543210", "PAN24", "123456789012", dob);
        assert!(complete.is_complete());
        assert!(complete.to_fields(1).is_some());

        let mut blank_name = complete.clone();
        blank_name.name = "  ".to_string();
        assert!(!blank_name.is_complete());
        assert!(blank_name.to_fields(1).is_none());

        let mut no_dob = complete;
        no_dob.dob = None;
        assert!(!no_dob.is_complete());
    }

    #[test]
    fn patch_carries_only_changed_fields() {
        let patch = RecordPatch::new().with_name("Usha").with_mobile("9123456780");
        let fields = patch.to_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("name"), Some(&json!("Usha")));
        assert!(!patch.is_empty());
        assert!(RecordPatch::new().is_empty());
    }

    #[test]
    fn dob_input_takes_both_entry_forms() {
        let expected = NaiveDate::from_ymd_opt(1990, 4, 3).expect("valid date");
        assert_eq!(parse_dob_input("1990-04-03").expect("decodes"), expected);
        assert_eq!(parse_dob_input("03/04/1990").expect("decodes"), expected);
        assert!(matches!(
            parse_dob_input("3rd April 1990"),
            Err(Error::InvalidDob)
        ));
    }
}
