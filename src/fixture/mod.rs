//! On-disk fixtures: the two storage formats, lookup, and capture.

pub mod format;
pub mod loader;
pub mod recorder;

pub use format::{Fixture, FullDescriptor, FULL_DESCRIPTOR_EXTENSION};
pub use loader::{candidates, FixtureLoader};
pub use recorder::{RecordPolicy, ResponseRecorder};
