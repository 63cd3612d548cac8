// ==========================================
// 车行后台管理系统 - 批次提交编排器
// ==========================================
// 依据: Dealer_Import_Design_v0.4.md - 提交主流程
// 流程: 全量重校验 → 逐条顺序提交 → 计数/进度 → 批次历史落库
// 红线: 存在任何错误记录时不发起任何网络调用；
//       单条失败不阻断后续记录，不重试
// ==========================================

use crate::domain::context::RequestContext;
use crate::domain::record::{ImportBatch, ImportBatchLog, ImportRunSummary, SubmissionFailure};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{ProgressSink, RecordSubmitter};
use crate::importer::record_validator;
use crate::repository::ImportBatchRepository;
use chrono::{Local, Utc};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// BatchImporter - 批次提交编排器
// ==========================================
pub struct BatchImporter<R>
where
    R: ImportBatchRepository,
{
    // 批次历史仓储
    batch_repo: R,

    // 远端建档接缝
    submitter: Box<dyn RecordSubmitter>,

    // 进度上报接缝
    progress: Box<dyn ProgressSink>,
}

impl<R> BatchImporter<R>
where
    R: ImportBatchRepository,
{
    pub fn new(batch_repo: R, submitter: Box<dyn RecordSubmitter>, progress: Box<dyn ProgressSink>) -> Self {
        Self {
            batch_repo,
            submitter,
            progress,
        }
    }

    /// 提交整个批次
    ///
    /// # 返回
    /// - Ok(ImportRunSummary): 最终 {success, errors, warnings} 计数
    /// - Err(ImportError::ValidationBlocked): 存在错误记录，未发起任何提交
    #[instrument(skip(self, ctx, batch), fields(batch_id = %batch.batch_id, tenant_id = %ctx.tenant))]
    pub async fn run(
        &self,
        ctx: &RequestContext,
        batch: &mut ImportBatch,
    ) -> ImportResult<ImportRunSummary> {
        if batch.is_empty() {
            return Err(ImportError::EmptyBatch);
        }

        let start_time = Instant::now();
        let today = Local::now().date_naive();

        // === 步骤 1: 全量重校验 ===
        debug!("步骤 1: 全量重校验");
        for record in batch.records.iter_mut() {
            record_validator::annotate(record, today);
        }

        let blocked = batch.records.iter().filter(|r| !r.errors.is_empty()).count();
        if blocked > 0 {
            warn!(blocked, "批次存在错误记录，提交中止");
            return Err(ImportError::ValidationBlocked { blocked });
        }

        // === 步骤 2: 逐条顺序提交（保持原始顺序，不并发）===
        debug!(total = batch.len(), "步骤 2: 逐条提交");
        let total = batch.len();
        let mut success = 0usize;
        let mut errors = 0usize;
        let mut warnings = 0usize;
        let mut failures: Vec<SubmissionFailure> = Vec::new();

        for (idx, record) in batch.records.iter().enumerate() {
            // 警告计数与提交结果无关
            if record.has_warnings() {
                warnings += 1;
            }

            match self.submitter.submit(ctx, record).await {
                Ok(()) => {
                    success += 1;
                    debug!(row_number = record.row_number, "记录提交成功");
                }
                Err(e) => {
                    // 单条失败：计数并入队，继续后续记录
                    errors += 1;
                    warn!(row_number = record.row_number, error = %e, "记录提交失败");
                    failures.push(SubmissionFailure {
                        failure_id: Uuid::new_v4().to_string(),
                        batch_id: batch.batch_id.clone(),
                        row_number: record.row_number,
                        record_name: record.name.clone(),
                        reason: e.to_string(),
                        created_at: Utc::now(),
                    });
                }
            }

            self.progress.report(idx + 1, total);
        }

        let elapsed = start_time.elapsed();

        // === 步骤 3: 批次历史与失败队列落库 ===
        debug!("步骤 3: 批次历史落库");
        let log = ImportBatchLog {
            batch_id: batch.batch_id.clone(),
            file_name: batch.source_file.clone(),
            entity_kind: batch.kind,
            total_rows: total as i32,
            success_rows: success as i32,
            error_rows: errors as i32,
            warning_rows: warnings as i32,
            imported_by: ctx.operator.clone(),
            imported_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as i64,
        };

        self.batch_repo
            .insert_batch_log(&ctx.tenant, log)
            .await
            .map_err(|e| ImportError::InternalError(format!("批次历史写入失败: {}", e)))?;

        if !failures.is_empty() {
            self.batch_repo
                .insert_failures(&ctx.tenant, &failures)
                .await
                .map_err(|e| ImportError::InternalError(format!("失败队列写入失败: {}", e)))?;
        }

        info!(
            total,
            success,
            errors,
            warnings,
            elapsed_ms = elapsed.as_millis(),
            "批次提交完成"
        );

        Ok(ImportRunSummary {
            total,
            success,
            errors,
            warnings,
            all_succeeded: errors == 0,
        })
    }
}
