//! Review intake with LM enrichment.
//!
//! A review (star rating plus free text) is validated, enriched with a reply,
//! a summary, and recommended actions by an external text-generation
//! collaborator, and stored as one composite record. [`orchestrator`] holds the
//! submission state machine; [`enrichment`], [`store`] and [`notify`] define
//! the collaborators it drives.
pub mod config;
pub mod enrichment;
pub mod notify;
pub mod orchestrator;
pub mod review;
pub mod store;
mod util;
