// ==========================================
// 车行后台管理系统 - 库存导入中心核心库
// ==========================================
// 技术栈: Rust + SQLite + 远端建档服务
// 系统定位: 后台导入管道（文件 → 记录 → 校验 → 顺序提交）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 解析/提取/归一/校验/编排
pub mod importer;

// 补全层 - VIN 异步补全
pub mod enrichment;

// 客户端层 - 远端建档与 VIN 查询
pub mod client;

// 数据仓储层 - 批次历史与失败队列
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BikeStatus, Condition, FuelType, RecordKind, Transmission};

// 领域实体
pub use domain::{
    ImportBatch, ImportBatchLog, ImportRecord, ImportRunSummary, RawRow, RequestContext,
    SubmissionFailure, TenantId, ValidationReport,
};

// 导入管道
pub use importer::{
    BatchImporter, CsvParser, ExcelParser, ImportError, PdfParser, UniversalFileParser,
};

// 补全
pub use enrichment::VinEnricher;

// API
pub use api::ImportApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车行后台管理系统 - 库存导入中心";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
