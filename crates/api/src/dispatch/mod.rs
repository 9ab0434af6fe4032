//! Campaign dispatch pipeline (PRD-18, PRD-21).
//!
//! The pipeline is a single request-scoped flow: resolve the playbook and
//! batch, run the quality gate, build the sequence, ramp sending accounts,
//! then create, fill, and activate the provider campaign (twice for A/B).
//! Any failure aborts the request; nothing already sent is rolled back.
//! Nothing serializes two concurrent dispatches of the same batch either;
//! both would go out. The UI is expected to disable its send button while
//! a dispatch is in flight.
//!
//! - [`send`] -- the real dispatch, plus the A/B split.
//! - [`test_send`] -- single-recipient dry run that never launches anything.
//! - [`report`] -- read-only pre-send validation checklist.
//! - [`context`] -- resolution and gate policy shared by all three.

pub mod context;
pub mod report;
pub mod send;
pub mod test_send;

pub use context::GateRejection;
