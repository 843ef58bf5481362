//! Academic lifecycle core for the registrar service.
//!
//! The crate owns the pieces of the student record pipeline that carry real
//! invariants: grade entry and finalization, the classroom lifecycle state
//! machine, batch graduation/failure evaluation, and the atomic archival of
//! completed classrooms. Plain CRUD around programs, courses, and users lives
//! outside this crate and is consumed here only as read-only input.

pub mod academics;
pub mod config;
pub mod error;
pub mod telemetry;
