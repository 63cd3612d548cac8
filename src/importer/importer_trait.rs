// ==========================================
// 车行后台管理系统 - 导入管道接口
// ==========================================
// 职责: 定义导入管道的外部接缝（不包含实现）
// ==========================================

use crate::client::ClientError;
use crate::domain::context::RequestContext;
use crate::domain::record::{ImportRecord, RawRow};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser / ExcelParser / PdfParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行（表头与单元格按位置对齐）
    fn parse(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// RecordSubmitter Trait
// ==========================================
// 用途: 单条记录提交到远端建档接口（阶段 4）
// 实现者: HttpRecordClient；测试中用内存 mock
#[async_trait]
pub trait RecordSubmitter: Send + Sync {
    /// 提交一条记录
    ///
    /// # 返回
    /// - Ok(()): 远端确认建档成功
    /// - Err: 传输失败或远端返回非成功响应（均计为该条失败）
    async fn submit(&self, ctx: &RequestContext, record: &ImportRecord)
        -> Result<(), ClientError>;
}

// ==========================================
// ProgressSink Trait
// ==========================================
// 用途: 批次提交进度上报（每条记录之后一次）
pub trait ProgressSink: Send + Sync {
    /// 上报进度，分数进度 = processed / total
    fn report(&self, processed: usize, total: usize);
}

/// 默认进度上报：写结构化日志
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, processed: usize, total: usize) {
        let fraction = if total == 0 {
            1.0
        } else {
            processed as f64 / total as f64
        };
        tracing::debug!(processed, total, fraction, "批次提交进度");
    }
}
