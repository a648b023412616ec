// avc — App model Verification Core
//
// Library root. Semantic verification over application models produced by
// the DSL parser: type safety, null safety, endpoint validation and
// reachability, aggregated into one verdict.

pub mod diag;
pub mod endpoint;
pub mod flow;
pub mod infer;
pub mod input;
pub mod lexer;
pub mod model;
pub mod null_safety;
pub mod pass;
pub mod reachability;
pub mod report;
pub mod type_safety;
pub mod types;
pub mod verify;

pub use verify::{verify, VerificationResult, Verifier};
