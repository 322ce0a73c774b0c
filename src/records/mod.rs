//! Applicant record management
//!
//! [`RecordManager`] holds the local mirror of the remote collection and
//! runs the whole workflow: add with validation and de-duplication, edit
//! behind an explicit edit mode, delete behind a confirmation gate, plus
//! search, pagination, and the insights metrics.

pub mod debounce;
pub mod manager;
pub mod model;
pub mod pagination;
pub mod validate;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use manager::{Insights, RecordManager};
pub use model::{
    dob_from_wire, dob_to_wire, parse_dob_input, Record, RecordDraft, RecordPatch,
    DOB_DISPLAY_FORMAT,
};
pub use pagination::{Pager, DEFAULT_PAGE_SIZE, PAGE_SIZE_CHOICES};
pub use validate::{digits_only, validate_aadhaar, validate_mobile};
