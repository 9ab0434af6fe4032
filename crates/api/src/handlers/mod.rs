//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `outflow_db` and to the
//! dispatch pipeline, mapping errors via [`crate::error::AppError`]. All
//! responses use the `{ "data": ... }` envelope.

pub mod campaigns;
pub mod dispatch;
pub mod lead_batches;
pub mod sent_campaigns;
pub mod workspaces;
