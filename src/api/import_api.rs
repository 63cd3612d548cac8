// ==========================================
// 车行后台管理系统 - 导入API
// ==========================================
// 职责: 封装导入中心对外功能（解析/提交/历史查询/补全）
// 说明: 每个操作显式携带 RequestContext（租户 + 操作人）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::client::{HttpRecordClient, HttpVinClient};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::domain::context::RequestContext;
use crate::domain::record::{ImportBatch, ImportBatchLog, SubmissionFailure};
use crate::domain::types::RecordKind;
use crate::enrichment::VinEnricher;
use crate::i18n::t;
use crate::importer::batch_importer::BatchImporter;
use crate::importer::importer_trait::TracingProgress;
use crate::importer::record_builder::build_record;
use crate::importer::record_validator;
use crate::importer::UniversalFileParser;
use crate::repository::{ImportBatchRepository, ImportBatchRepositoryImpl};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// 文件解析响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseFileResponse {
    /// 解析出的批次（含每条记录的校验侧表）
    pub batch: ImportBatch,
    /// 总行数
    pub total_rows: usize,
    /// 含错误记录数
    pub error_rows: usize,
    /// 含警告记录数
    pub warning_rows: usize,
    /// 用户可读提示
    pub message: String,
}

/// 批次提交响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 批次ID
    pub batch_id: String,
    /// 记录总数
    pub total: usize,
    /// 提交成功数
    pub success: usize,
    /// 提交失败数
    pub errors: usize,
    /// 携带警告的记录数
    pub warnings: usize,
    /// 全部成功（调用方据此跳转）
    pub all_succeeded: bool,
    /// 用户可读提示
    pub message: String,
}

/// 导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// 解析上传文件为一个批次
    ///
    /// # 参数
    /// - ctx: 请求上下文
    /// - file_path: 文件路径（按扩展名分发解析器）
    /// - kind: 目标实体类型
    ///
    /// # 返回
    /// - Ok(ParseFileResponse): 批次 + 校验统计
    /// - Err(ApiError): 扩展名不支持/解析失败（不保留部分状态）
    #[instrument(skip(self, ctx), fields(tenant_id = %ctx.tenant))]
    pub async fn parse_file(
        &self,
        ctx: &RequestContext,
        file_path: &str,
        kind: RecordKind,
    ) -> ApiResult<ParseFileResponse> {
        let rows = UniversalFileParser.parse(file_path)?;

        let file_name = Path::new(file_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file_path)
            .to_string();

        let mut batch = ImportBatch::with_source_file(kind, file_name);
        let today = Local::now().date_naive();

        for (idx, row) in rows.iter().enumerate() {
            let mut record = build_record(kind, row, idx + 1);
            record_validator::annotate(&mut record, today);
            batch.records.push(record);
        }

        let total_rows = batch.len();
        let error_rows = batch.records.iter().filter(|r| !r.errors.is_empty()).count();
        let warning_rows = batch.records.iter().filter(|r| r.has_warnings()).count();

        info!(
            batch_id = %batch.batch_id,
            total_rows,
            error_rows,
            warning_rows,
            "文件解析完成"
        );

        Ok(ParseFileResponse {
            batch,
            total_rows,
            error_rows,
            warning_rows,
            message: t("import.parse_done"),
        })
    }

    /// 提交批次到远端建档服务
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 最终计数
    /// - Err(ApiError::ValidationError): 存在错误记录，未发起任何提交
    #[instrument(skip(self, ctx, batch), fields(batch_id = %batch.batch_id, tenant_id = %ctx.tenant))]
    pub async fn submit_batch(
        &self,
        ctx: &RequestContext,
        batch: &mut ImportBatch,
    ) -> ApiResult<ImportApiResponse> {
        let repo = ImportBatchRepositoryImpl::new(&self.db_path)?;
        let config = ConfigManager::new(&self.db_path)
            .map_err(|e| ApiError::InternalError(format!("配置读取器创建失败: {}", e)))?;

        let base_url = config
            .get_api_base_url(&ctx.tenant)
            .await
            .map_err(|e| ApiError::InternalError(format!("配置读取失败: {}", e)))?;

        let submitter = Box::new(HttpRecordClient::new(base_url));
        let importer = BatchImporter::new(repo, submitter, Box::new(TracingProgress));

        let summary = importer.run(ctx, batch).await?;

        let message = if summary.all_succeeded {
            t("import.batch_complete")
        } else {
            t("import.batch_partial")
        };

        Ok(ImportApiResponse {
            batch_id: batch.batch_id.clone(),
            total: summary.total,
            success: summary.success,
            errors: summary.errors,
            warnings: summary.warnings,
            all_succeeded: summary.all_succeeded,
            message,
        })
    }

    /// 查询最近的导入批次
    pub async fn list_recent_batches(
        &self,
        ctx: &RequestContext,
        limit: usize,
    ) -> ApiResult<Vec<ImportBatchLog>> {
        // 每页 1-100 条
        let limit = limit.clamp(1, 100);
        let repo = ImportBatchRepositoryImpl::new(&self.db_path)?;
        Ok(repo.list_recent_batches(&ctx.tenant, limit).await?)
    }

    /// 查询指定批次的提交失败记录
    pub async fn list_failures(
        &self,
        ctx: &RequestContext,
        batch_id: &str,
    ) -> ApiResult<Vec<SubmissionFailure>> {
        if batch_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("批次ID不能为空".to_string()));
        }
        let repo = ImportBatchRepositoryImpl::new(&self.db_path)?;
        Ok(repo.list_failures_by_batch(&ctx.tenant, batch_id).await?)
    }

    /// 创建 VIN 补全服务（地址取自租户配置）
    pub async fn create_vin_enricher(&self, ctx: &RequestContext) -> ApiResult<VinEnricher> {
        let config = ConfigManager::new(&self.db_path)
            .map_err(|e| ApiError::InternalError(format!("配置读取器创建失败: {}", e)))?;

        let lookup_url = config
            .get_vin_lookup_url(&ctx.tenant)
            .await
            .map_err(|e| ApiError::InternalError(format!("配置读取失败: {}", e)))?;

        Ok(VinEnricher::new(Arc::new(HttpVinClient::new(lookup_url))))
    }
}
