//! The record manager: local mirror plus workflow state
//!
//! One manager instance owns the session's view of the collection. Every
//! mutation goes through `&mut self`, so the mirror has a single writer
//! and needs no interior locking. Remote writes happen first; the mirror
//! changes only after the store acknowledges.

use chrono::{DateTime, Days, Local, LocalResult, NaiveDate, NaiveTime, Utc};

use crate::datastore::{Datastore, Query};
use crate::error::Error;

use super::model::{Record, RecordDraft, RecordPatch};
use super::pagination::Pager;
use super::validate::{validate_aadhaar, validate_mobile};

/// Metrics for the insights card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insights {
    pub total_entries: usize,
    /// Records created on the current calendar day, local time
    pub today_entries: usize,
    /// Percentage on a scale that approaches but never reaches 100
    pub processing_rate: u32,
}

/// Manages applicant records against a backing store
pub struct RecordManager<S> {
    store: S,
    records: Vec<Record>,
    filter: String,
    pager: Pager,
    edit_id: Option<String>,
    pending_delete: Option<String>,
}

impl<S: Datastore> RecordManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            filter: String::new(),
            pager: Pager::new(),
            edit_id: None,
            pending_delete: None,
        }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The full mirror, newest first
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Fetch the whole collection and replace the mirror, newest first
    ///
    /// The mirror only changes when the fetch and decode both succeed, so
    /// a failed reload keeps the last good state.
    pub async fn load(&mut self) -> Result<(), Error> {
        let list = self.store.list(&[Query::order_desc("$createdAt")]).await?;

        let mut records = Vec::with_capacity(list.documents.len());
        for doc in &list.documents {
            records.push(Record::from_document(doc)?);
        }

        log::info!("loaded {} records", records.len());
        self.records = records;
        self.edit_id = None;
        self.pending_delete = None;
        let len = self.filtered_len();
        self.pager.clamp(len);
        Ok(())
    }

    /// Validate a draft and create its record
    ///
    /// An incomplete draft is ignored (`Ok(None)`), not an error; the form
    /// stays as typed. A complete draft is checked (mobile pattern, aadhaar
    /// pattern, aadhaar uniqueness) before the remote create. On success
    /// the stored record is prepended to the mirror and returned.
    pub async fn add(&mut self, draft: &RecordDraft) -> Result<Option<Record>, Error> {
        if !draft.is_complete() {
            log::warn!("ignoring submission with empty fields");
            return Ok(None);
        }

        validate_mobile(&draft.mobile)?;
        validate_aadhaar(&draft.aadhaar)?;

        let aadhaar = draft.aadhaar.trim();
        if self.records.iter().any(|r| r.aadhaar == aadhaar) {
            return Err(Error::DuplicateAadhaar);
        }

        let custom_id = self.next_custom_id();
        let Some(fields) = draft.to_fields(custom_id) else {
            return Ok(None);
        };

        let doc = self.store.create(&fields).await?;
        let record = Record::from_document(&doc)?;

        log::info!("added record {} with customId {}", record.id, custom_id);
        self.records.insert(0, record.clone());
        Ok(Some(record))
    }

    /// Next display number: one past the highest in the mirror
    fn next_custom_id(&self) -> i64 {
        self.records
            .iter()
            .map(|r| r.custom_id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Put a row into edit mode
    ///
    /// Refused while another row is editing, while the row has a delete
    /// confirmation open, or when the id is unknown. Asking for the row
    /// already in edit mode succeeds and changes nothing.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        match &self.edit_id {
            Some(current) if current == id => true,
            Some(_) => false,
            None => {
                if self.pending_delete.as_deref() == Some(id) {
                    return false;
                }
                if !self.records.iter().any(|r| r.id == id) {
                    return false;
                }
                self.edit_id = Some(id.to_string());
                true
            }
        }
    }

    /// Leave edit mode without writing anything
    pub fn cancel_edit(&mut self) {
        self.edit_id = None;
    }

    /// The id currently in edit mode
    pub fn editing_id(&self) -> Option<&str> {
        self.edit_id.as_deref()
    }

    /// Validate a patch and write it to the edited row
    ///
    /// A no-op (`Ok(None)`) when `id` is not the row in edit mode. An
    /// empty patch just leaves edit mode. Validation and remote failures
    /// keep edit mode active and the local record untouched; on success
    /// the store's response replaces the local record and edit mode ends.
    pub async fn commit_edit(
        &mut self,
        id: &str,
        patch: &RecordPatch,
    ) -> Result<Option<Record>, Error> {
        if self.edit_id.as_deref() != Some(id) {
            log::warn!("ignoring edit of {}: row is not in edit mode", id);
            return Ok(None);
        }

        if patch.is_empty() {
            self.edit_id = None;
            return Ok(None);
        }

        if let Some(mobile) = &patch.mobile {
            validate_mobile(mobile)?;
        }
        if let Some(aadhaar) = &patch.aadhaar {
            validate_aadhaar(aadhaar)?;
            let trimmed = aadhaar.trim();
            if self
                .records
                .iter()
                .any(|r| r.id != id && r.aadhaar == trimmed)
            {
                return Err(Error::DuplicateAadhaar);
            }
        }

        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            self.edit_id = None;
            return Err(Error::not_found(id));
        };

        let doc = self.store.update(id, &patch.to_fields()).await?;
        let record = Record::from_document(&doc)?;

        log::info!("updated record {}", id);
        self.records[index] = record.clone();
        self.edit_id = None;
        Ok(Some(record))
    }

    /// Open the delete confirmation gate for a row
    ///
    /// Refused for the row in edit mode and for unknown ids. A gate
    /// already open for another row moves to this one.
    pub fn request_delete(&mut self, id: &str) -> bool {
        if self.edit_id.as_deref() == Some(id) {
            log::debug!("refusing delete of {}: row is in edit mode", id);
            return false;
        }
        if !self.records.iter().any(|r| r.id == id) {
            return false;
        }
        self.pending_delete = Some(id.to_string());
        true
    }

    /// Close the confirmation gate without deleting
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// The id awaiting delete confirmation
    pub fn pending_delete_id(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Delete the row behind the open confirmation gate
    ///
    /// `Ok(None)` when no gate is open. The gate closes whether the remote
    /// delete succeeds or fails; the mirror only changes on success. When
    /// the deletion empties the current page of a multi-page view, the
    /// page steps back by one.
    pub async fn confirm_delete(&mut self) -> Result<Option<String>, Error> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };

        let visible_before = self.visible_records().len();

        self.store.delete(&id).await?;

        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() < before {
            self.pager.step_back_if_page_emptied(visible_before);
        }
        let len = self.filtered_len();
        self.pager.clamp(len);

        log::info!("deleted record {}", id);
        Ok(Some(id))
    }

    /// Commit a settled search term
    ///
    /// Matching is a case-insensitive substring test on name or mobile,
    /// computed purely against the mirror. The current page is pulled back
    /// into the new range rather than reset.
    pub fn set_filter(&mut self, term: &str) {
        self.filter = term.to_string();
        let len = self.filtered_len();
        self.pager.clamp(len);
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    fn filtered_records(&self) -> Vec<&Record> {
        let term = self.filter.trim().to_lowercase();
        if term.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&term) || r.mobile.contains(&term))
            .collect()
    }

    /// Number of records matching the current filter
    pub fn filtered_len(&self) -> usize {
        self.filtered_records().len()
    }

    /// The current page of the filtered mirror, for the view to render
    pub fn visible_records(&self) -> Vec<&Record> {
        let filtered = self.filtered_records();
        self.pager.slice(&filtered).to_vec()
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.filtered_len())
    }

    pub fn set_page(&mut self, page: usize) {
        let len = self.filtered_len();
        self.pager.set_page(page, len);
    }

    pub fn next_page(&mut self) {
        let len = self.filtered_len();
        self.pager.next_page(len);
    }

    pub fn prev_page(&mut self) {
        self.pager.prev_page();
    }

    /// Change the rows-per-page and return to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.pager.set_page_size(page_size);
    }

    /// Metrics over the mirror
    pub fn insights(&self) -> Insights {
        let total = self.records.len();
        let today = Local::now().date_naive();
        let today_entries = self
            .records
            .iter()
            .filter(|r| r.created_at.with_timezone(&Local).date_naive() == today)
            .count();
        let processing_rate = ((total as f64) / (total as f64 + 1.0) * 100.0).round() as u32;

        Insights {
            total_entries: total,
            today_entries,
            processing_rate,
        }
    }

    /// Store-side count of records created today, local time
    pub async fn today_count_remote(&self) -> Result<u64, Error> {
        let (start, end) = local_day_bounds();
        let list = self
            .store
            .list(&[
                Query::greater_than_equal("$createdAt", start.to_rfc3339()),
                Query::less_than("$createdAt", end.to_rfc3339()),
                Query::limit(1),
            ])
            .await?;
        Ok(list.total)
    }
}

/// Start and end of the current local day, in UTC
fn local_day_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Local::now().date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    (local_midnight(today), local_midnight(tomorrow))
}

fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    match date.and_time(NaiveTime::MIN).and_local_timezone(Local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // midnight skipped by a DST jump; fall back to the UTC reading
        LocalResult::None => date.and_time(NaiveTime::MIN).and_utc(),
    }
}
