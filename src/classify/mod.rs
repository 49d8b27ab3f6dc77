//! Classification of canonical URLs
//!
//! Discovered pages are attributed to an owning [`SourceId`] by host and to a
//! [`DocType`] bucket by path markers. Both sets are closed: nothing outside
//! these enums ever reaches storage.

mod doc_type;
mod source;

pub use doc_type::{infer_doc_type, infer_doc_type_str, DocType};
pub use source::{infer_source, SourceId};
