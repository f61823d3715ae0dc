//! Frames are the intervals Watson records: project, start, stop, and for
//! QWatson-era files an optional message. The basic idea is:
//!  - Watson owns a `frames` file, a JSON array of rows.
//!  - [store::WatsonFrameFile] reads it into a [store::FrameStore] and
//!    rewrites it in place after edits.
//!  - Fields framesheet does not model (frame id, tags) pass through
//!    untouched so Watson keeps working on the same file.

pub mod entities;
pub mod store;
