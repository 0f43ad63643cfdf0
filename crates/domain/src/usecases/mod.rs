//! Application use cases / business logic

pub mod assess;
pub mod care_plan;
pub mod preview;
pub mod summarize;

pub use assess::RiskPipeline;
pub use care_plan::care_plan_items;
pub use preview::{LogPreviewUseCase, PreviewError};
pub use summarize::SummaryPipeline;
