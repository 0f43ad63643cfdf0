//! carelog domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for the AI providers (adapters)
//! - `normalize`: Turning inconsistent chat completions into clean text or JSON
//! - `policy`: Shape constraints on risk assessments
//! - `usecases`: Summary, risk and preview pipelines

pub mod model;
pub mod normalize;
pub mod policy;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use ports::*;
