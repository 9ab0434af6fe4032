//! Domain logic shared across the Outflow crates: playbook parsing, the
//! lead-content quality gate, sequence scheduling, and A/B assignment.
//!
//! Everything in this crate is pure. Database and network concerns live in
//! `outflow-db` and `outflow-instantly`; the API crate wires them together.

pub mod campaign;
pub mod error;
pub mod playbook;
pub mod quality_gate;
pub mod sequence;
pub mod types;
