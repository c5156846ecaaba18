pub mod envelope;
pub mod report;

pub use envelope::{json_u64, non_zero_id, record_count, records, results_count};
pub use report::{RunSummary, Step, StepReport};
