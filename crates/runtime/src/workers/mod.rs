//! Background tasks that drive the persistence layer from outside.
//!
//! The state manager owns no clock; the autosave worker is the optional
//! external scheduler that calls its tick on an interval.

mod autosave;

pub use autosave::{AutoSaveHandle, AutoSaveWorker};
