// ==========================================
// 车行后台管理系统 - 导入领域模型
// ==========================================
// 依据: Dealer_Data_Dictionary_v0.3.md - 导入实体
// 红线: errors 侧表为空是记录可提交的唯一前提
// ==========================================

use crate::domain::types::{BikeStatus, Condition, FuelType, RecordKind, Transmission};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// RawRow - 原始行
// ==========================================
// 用途: 格式解析器输出（表头与单元格按位置对齐）
// 生命周期: 仅在导入管道内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    pub headers: Vec<String>, // 表头（已小写、TRIM）
    pub cells: Vec<String>,   // 单元格原始值
}

// ==========================================
// ValidationReport - 校验结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,   // 阻断性错误（阻止整批提交）
    pub warnings: Vec<String>, // 非阻断警告（计数，不阻止提交）
}

// ==========================================
// ImportRecord - 导入记录
// ==========================================
// 一条扁平记录，覆盖整车/配件/流水三类实体的字段全集；
// 未涉及的字段保持空值，由校验器按 kind 选择规则
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub kind: RecordKind,  // 实体类型
    pub row_number: usize, // 源文件行号（手工记录为追加序号）

    // ===== 通用字段 =====
    pub name: String,        // 展示名称（空则由 年+品牌+型号 派生）
    pub brand: String,       // 品牌
    pub model: String,       // 型号
    pub category: String,    // 分类
    pub description: String, // 描述/摘要

    // ===== 整车字段 =====
    pub year: Option<i32>,          // 年款
    pub vin: String,                // 车架号（17位，可选字段）
    pub mileage_km: Option<f64>,    // 里程（km）
    pub status: BikeStatus,         // 整车状态
    pub fuel_type: FuelType,        // 燃料类型
    pub transmission: Transmission, // 变速类型
    pub condition: Condition,       // 车况

    // ===== 配件字段 =====
    pub part_number: String,    // 配件号
    pub location: String,       // 库位
    pub stock_qty: Option<i32>, // 库存数量
    pub weight_kg: Option<f64>, // 重量（kg）

    // ===== 价格/财务字段 =====
    pub price: Option<f64>,         // 售价（整车/配件必填）
    pub cost: Option<f64>,          // 成本
    pub amount: Option<f64>,        // 交易金额（流水必填）
    pub tax: Option<f64>,           // 税额
    pub txn_date: Option<NaiveDate>, // 交易日期

    // ===== 校验侧表（最近一次校验结果）=====
    pub errors: Vec<String>,
    pub warnings: Vec<String>,

    // 名称是否为自动派生（决定 year/brand/model 变更时是否重派生）
    #[serde(skip)]
    pub(crate) name_auto: bool,

    // VIN 补全代数：每次 VIN 编辑 +1，陈旧响应按代数丢弃
    #[serde(skip)]
    pub(crate) enrich_generation: u64,
}

impl ImportRecord {
    /// 创建空白记录（手工新增入口）
    pub fn new(kind: RecordKind, row_number: usize) -> Self {
        Self {
            kind,
            row_number,
            name: String::new(),
            brand: String::new(),
            model: String::new(),
            category: String::new(),
            description: String::new(),
            year: None,
            vin: String::new(),
            mileage_km: None,
            status: BikeStatus::default(),
            fuel_type: FuelType::default(),
            transmission: Transmission::default(),
            condition: Condition::default(),
            part_number: String::new(),
            location: String::new(),
            stock_qty: None,
            weight_kg: None,
            price: None,
            cost: None,
            amount: None,
            tax: None,
            txn_date: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            name_auto: true,
            enrich_generation: 0,
        }
    }

    /// 由 年+品牌+型号 派生名称（空分量跳过，单空格连接）
    pub fn derived_name(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(y) = self.year {
            parts.push(y.to_string());
        }
        if !self.brand.is_empty() {
            parts.push(self.brand.clone());
        }
        if !self.model.is_empty() {
            parts.push(self.model.clone());
        }
        parts.join(" ")
    }

    /// 应用名称派生规则（仅当名称处于自动派生态）
    pub fn apply_name_rule(&mut self) {
        if self.name_auto {
            self.name = self.derived_name();
        }
    }

    /// 设置名称；置空会回到自动派生态
    pub fn set_name(&mut self, name: &str) {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            self.name_auto = true;
            self.apply_name_rule();
        } else {
            self.name_auto = false;
            self.name = trimmed.to_string();
        }
    }

    /// 设置年款并按需重派生名称
    pub fn set_year(&mut self, year: Option<i32>) {
        self.year = year;
        self.apply_name_rule();
    }

    /// 设置品牌并按需重派生名称
    pub fn set_brand(&mut self, brand: &str) {
        self.brand = brand.trim().to_string();
        self.apply_name_rule();
    }

    /// 设置型号并按需重派生名称
    pub fn set_model(&mut self, model: &str) {
        self.model = model.trim().to_string();
        self.apply_name_rule();
    }

    /// 设置 VIN，返回是否应触发补全查询
    ///
    /// 每次编辑都会使补全代数 +1（使在途查询陈旧化）；
    /// 仅在长度恰为 17 时触发查询
    pub fn set_vin(&mut self, vin: &str) -> bool {
        self.vin = vin.trim().to_uppercase();
        self.enrich_generation += 1;
        self.vin.len() == 17
    }

    /// 当前补全代数
    pub fn enrich_generation(&self) -> u64 {
        self.enrich_generation
    }

    /// 写入最近一次校验结果
    pub fn set_validation(&mut self, report: ValidationReport) {
        self.errors = report.errors;
        self.warnings = report.warnings;
    }

    /// 记录可提交 iff 无阻断错误
    pub fn is_import_eligible(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// ==========================================
// ImportBatch - 导入批次（内存工作集）
// ==========================================
// 一次导入会话的全部记录；会话结束即丢弃，
// 持久化的只有 ImportBatchLog / SubmissionFailure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,            // 批次 ID（UUID）
    pub kind: RecordKind,            // 实体类型
    pub source_file: Option<String>, // 源文件名（手工批次为 None）
    pub records: Vec<ImportRecord>,  // 有序记录集
}

impl ImportBatch {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            kind,
            source_file: None,
            records: Vec::new(),
        }
    }

    pub fn with_source_file(kind: RecordKind, file_name: impl Into<String>) -> Self {
        let mut batch = Self::new(kind);
        batch.source_file = Some(file_name.into());
        batch
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 手工追加一条空白记录，返回其行号
    pub fn add_manual_record(&mut self) -> usize {
        let row_number = self.next_row_number();
        self.records.push(ImportRecord::new(self.kind, row_number));
        row_number
    }

    /// 按行号删除记录
    pub fn remove_record(&mut self, row_number: usize) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.row_number != row_number);
        self.records.len() != before
    }

    /// 按行号取可变引用（行内编辑入口）
    pub fn record_mut(&mut self, row_number: usize) -> Option<&mut ImportRecord> {
        self.records.iter_mut().find(|r| r.row_number == row_number)
    }

    /// 是否存在任何阻断错误
    pub fn has_blocking_errors(&self) -> bool {
        self.records.iter().any(|r| !r.errors.is_empty())
    }

    fn next_row_number(&self) -> usize {
        self.records.iter().map(|r| r.row_number).max().unwrap_or(0) + 1
    }
}

// ==========================================
// ImportRunSummary - 批次提交汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRunSummary {
    pub total: usize,        // 记录总数
    pub success: usize,      // 提交成功数
    pub errors: usize,       // 提交失败数
    pub warnings: usize,     // 携带警告的记录数（与提交结果无关）
    pub all_succeeded: bool, // 全部成功（调用方据此跳转）
}

// ==========================================
// ImportBatchLog - 批次历史（持久化）
// ==========================================
// 对齐: schema import_batch 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatchLog {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub entity_kind: RecordKind,
    pub total_rows: i32,
    pub success_rows: i32,
    pub error_rows: i32,
    pub warning_rows: i32,
    pub imported_by: String,
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

// ==========================================
// SubmissionFailure - 提交失败记录（持久化）
// ==========================================
// 用途: 单条提交失败入队，供事后排查；不重试
// 对齐: schema import_failure 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionFailure {
    pub failure_id: String, // UUID
    pub batch_id: String,
    pub row_number: usize,
    pub record_name: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
