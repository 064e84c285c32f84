//! # mygo-ref-dashboard
//!
//! Reference runtime for the MYGO conversational orchestration core.
//!
//! Walks the core through three dashboard workflows using canned data:
//!
//! 1. **Solution Discovery**: clarification, auto-chained proposal,
//!    refinement, prior-art search (including a failed search), improvise
//!    and the spec creation handoff.
//! 2. **Document Sync**: source listing, sync all, Cloud ALM project
//!    drill-down, an empty dashboard, and a reply that arrives after the
//!    user switched agents.
//! 3. **Artifact Refinement**: generating a specification, refining it
//!    twice, and downloading it, including a JSON error body.
//!
//! All data is hardcoded and fictional. No external API calls are made.

pub mod gateway;
pub mod mock_data;
pub mod router;
pub mod scenarios;

pub use gateway::{DashboardFixture, InMemoryGateway};
pub use router::RecordingRouter;
