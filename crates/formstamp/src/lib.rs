//! formstamp: locate fields on fixed-layout PDF forms and stamp text or
//! yes/no marks onto them.
//!
//! This is the public API facade crate. It re-exports types from
//! formstamp-core and uses formstamp-parse for reading pages and merging
//! overlays.
//!
//! # Architecture
//!
//! - **formstamp-core**: Backend-independent types, word grouping, anchor
//!   resolution and overlay rendering
//! - **formstamp-parse**: Content stream interpretation and page merging on lopdf
//! - **formstamp** (this crate): Documents, form templates, leave records and
//!   the form filler
//!
//! # Example
//!
//! ```ignore
//! use formstamp::{Document, FormFiller, FormTemplate, LeaveRecord};
//!
//! let template = FormTemplate::medical_leave()?;
//! let record = LeaveRecord::from_json(&json)?;
//! let requests = record.to_requests(&template)?;
//! let report = FormFiller::default().fill_file("blank.pdf", "out/filled.pdf", &requests)?;
//! ```

mod document;
mod filler;
mod record;
mod search;
mod template;

pub use formstamp_core;
pub use formstamp_parse;

pub use document::{Document, LINE_TOLERANCE, Page};
pub use filler::{AppliedField, FillFailure, FillOptions, FillReport, FormFiller, SkippedField};
pub use formstamp_core::{
    Anchor, AnchorLocator, AnchorStrategy, BBox, FieldSpec, FillError, FillRequest, Mark, Offset,
    PdfError, Point, RoleContext, SearchHit, TextLine, Word, WordOptions,
};
pub use record::{
    CareRequirements, EmployeeInformation, LeaveRecord, MedicalCondition, PatientInformation,
    WorkCapacity, YesNo,
};
pub use search::{SearchOptions, TermMatch, find_term, search_words};
pub use template::{FormTemplate, OffsetDef, StrategyDef, TemplateError, TemplateField};
