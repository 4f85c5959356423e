//! fhir-core: Shared FHIR R4 types and utilities
//!
//! This crate provides the resource shapes the client exchanges with a
//! server: search result Bundles and OperationOutcome error reports.

pub mod bundle;
pub mod outcome;

// Re-export our types
pub use bundle::{Bundle, BundleEntry, BundleLink, BundleType, LINK_NEXT, LINK_PREVIOUS, LINK_SELF};
pub use outcome::{
    CodeableConcept, GENERIC_ERROR_MESSAGE, IssueSeverity, IssueType, OperationOutcome,
    OperationOutcomeIssue, extract_messages,
};
