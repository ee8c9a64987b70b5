pub mod detail;
pub mod execution;
pub mod result_document;

pub use detail::{Detail, NewDetail, ResultCount};
pub use execution::{Execution, ExecutionSummary};
pub use result_document::ResultDocument;
