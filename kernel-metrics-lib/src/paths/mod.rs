//! Dotted field path resolution over semi-structured item data
//!
//! Items carry arbitrarily nested `fields` and `metadata` objects, and metric
//! definitions address values inside them with dotted paths such as
//! `fields.checklist` or `metadata.cap.correspondence.archive.retention`.
//!
//! # Implementation Model
//!
//! A dot is ambiguous: it may separate two nested objects, or it may be part of
//! a single namespaced key (`"cap.correspondence"`). The [`resolve`] function
//! settles this greedily. At every level it prefers the longest run of remaining
//! segments that exists as a literal key, shrinking one segment at a time until
//! only the single next segment is left.
//!
//! Resolution never fails. A missing key, or a non-object encountered midway,
//! yields `None` and callers substitute their own default via [`resolve_or`].

mod resolver;

pub use resolver::{resolve, resolve_or};
