// ==========================================
// 车行后台管理系统 - 导入批次 Repository Trait
// ==========================================
// 职责: 定义批次历史/失败队列的数据访问接口（不包含业务逻辑）
// 红线: 每个操作显式携带租户标识；Repository 不含业务规则
// ==========================================

use crate::domain::context::TenantId;
use crate::domain::record::{ImportBatchLog, SubmissionFailure};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ImportBatchRepository Trait
// ==========================================
// 用途: 批次历史与提交失败队列
// 实现者: ImportBatchRepositoryImpl（rusqlite）
#[async_trait]
pub trait ImportBatchRepository: Send + Sync {
    /// 写入一条批次历史
    async fn insert_batch_log(
        &self,
        tenant: &TenantId,
        log: ImportBatchLog,
    ) -> RepositoryResult<()>;

    /// 批量写入提交失败记录
    ///
    /// # 返回
    /// - Ok(usize): 写入条数（整体一个事务）
    async fn insert_failures(
        &self,
        tenant: &TenantId,
        failures: &[SubmissionFailure],
    ) -> RepositoryResult<usize>;

    /// 查询最近的导入批次（按导入时间倒序）
    async fn list_recent_batches(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> RepositoryResult<Vec<ImportBatchLog>>;

    /// 查询指定批次的失败记录（按行号升序）
    async fn list_failures_by_batch(
        &self,
        tenant: &TenantId,
        batch_id: &str,
    ) -> RepositoryResult<Vec<SubmissionFailure>>;
}
