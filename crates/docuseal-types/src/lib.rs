//! Typed models for the DocuSeal REST API
//!
//! Upstream payloads are decoded into explicit structs with exhaustive status
//! enums. Keys this crate does not model are kept in each struct's `extra`
//! map. To hand a client exactly what the upstream sent, decode through
//! [`check`] or [`check_page`]: the typed value is validated and the original
//! JSON is what gets serialized.

pub mod decode;
pub mod request;
pub mod submission;
pub mod submitter;
pub mod template;

pub use decode::{
    check, check_page, decode, decode_page, decode_page_bytes, decode_value, Checked, DecodeError,
    Page, Pagination, Resource,
};
pub use request::{
    CreateSubmissionRequest, CreateSubmitterRequest, FieldConfig, SubmitterMessage,
    ValidationError,
};
pub use submission::{StatusFilter, Submission, SubmissionStatus};
pub use submitter::{Submitter, SubmitterStatus};
pub use template::{DocumentUpload, Template, TemplateDocument, UploadKind, UploadedDocument};
