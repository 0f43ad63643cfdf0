//! AI-response normalization
//!
//! - `unwrap`: best candidate text from a chat completion
//! - `reasoning`: answer recovery from leaked reasoning transcripts
//! - `sanitize`: short single-language summaries
//! - `json`: JSON object recovery with a refinement stage
//! - `script`: target-script tables driving the heuristics

pub mod json;
pub mod reasoning;
pub mod sanitize;
pub mod script;
pub mod unwrap;

pub use json::{extract_json, extract_json_with, recover_json_span, try_parse_json};
pub use reasoning::{extract_summary_candidate, postprocess_candidate};
pub use sanitize::{SanitizeLimits, SummarySanitizer};
pub use script::{ScriptProfile, ScriptTable};
pub use unwrap::{UnwrapRule, Unwrapped, candidates, unwrap_response};
