//! The screening domain: role rubric suggestion, the CV ranking pipeline,
//! interview-notes recalibration, and their HTTP handlers.

pub mod categories;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod recalibrate;
