// ==========================================
// 车行后台管理系统 - 导入层
// ==========================================
// 职责: 文件 → 原始行 → 记录 → 校验 → 顺序提交
// 支持: CSV / Excel / PDF(占位) / 手工录入
// ==========================================

// 模块声明
pub mod batch_importer;
pub mod error;
pub mod field_extractor;
pub mod file_parser;
pub mod importer_trait;
pub mod normalizer;
pub mod record_builder;
pub mod record_validator;

// 重导出核心类型
pub use batch_importer::BatchImporter;
pub use error::{ImportError, ImportResult};
pub use field_extractor::{extract_field, FieldAliasTable, BIKE_ALIASES, PART_ALIASES, TRANSACTION_ALIASES};
pub use file_parser::{CsvParser, ExcelParser, PdfParser, UniversalFileParser};
pub use normalizer::{
    normalize_condition, normalize_fuel_type, normalize_status, normalize_transmission,
};
pub use record_builder::build_record;
pub use record_validator::{annotate, validate};

// 重导出 Trait 接口
pub use importer_trait::{FileParser as FileParserTrait, ProgressSink, RecordSubmitter, TracingProgress};
