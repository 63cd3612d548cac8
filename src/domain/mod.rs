// ==========================================
// 车行后台管理系统 - 领域层
// ==========================================

pub mod context;
pub mod record;
pub mod types;

pub use context::{RequestContext, TenantId};
pub use record::{
    ImportBatch, ImportBatchLog, ImportRecord, ImportRunSummary, RawRow, SubmissionFailure,
    ValidationReport,
};
pub use types::{BikeStatus, Condition, FuelType, RecordKind, Transmission};
