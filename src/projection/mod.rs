//! Projection module
//!
//! Maps internal records to the externally visible summary and detail views,
//! and wraps them in resource-named envelopes.

mod envelope;
mod views;

pub use envelope::Envelope;
pub use views::{ArrayView, AttachmentView, ViewMode, VolumeView};
