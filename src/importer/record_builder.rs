// ==========================================
// 车行后台管理系统 - 记录构造器
// ==========================================
// 依据: Import_Field_Mapping_v0.2.md - 行到记录的装配
// 职责: 原始行 → ImportRecord（提取 + 归一化 + 宽松类型转换）
// ==========================================

use crate::domain::record::{ImportRecord, RawRow};
use crate::domain::types::RecordKind;
use crate::importer::field_extractor::{
    extract_field, BIKE_ALIASES, PART_ALIASES, TRANSACTION_ALIASES,
};
use crate::importer::normalizer::{
    normalize_condition, normalize_fuel_type, normalize_status, normalize_transmission,
};
use chrono::NaiveDate;

/// 由原始行装配一条导入记录
pub fn build_record(kind: RecordKind, row: &RawRow, row_number: usize) -> ImportRecord {
    match kind {
        RecordKind::Bike => build_bike_record(row, row_number),
        RecordKind::Part => build_part_record(row, row_number),
        RecordKind::Transaction => build_transaction_record(row, row_number),
    }
}

fn build_bike_record(row: &RawRow, row_number: usize) -> ImportRecord {
    let mut record = ImportRecord::new(RecordKind::Bike, row_number);
    let field = |name: &str| extract_field(row, BIKE_ALIASES.candidates(name));

    record.brand = field("brand");
    record.model = field("model");
    record.year = parse_int(&field("year"));
    record.vin = field("vin").to_uppercase();
    record.mileage_km = parse_number(&field("mileage"));
    record.price = parse_number(&field("price"));
    record.cost = parse_number(&field("cost"));
    record.status = normalize_status(&field("status"));
    record.fuel_type = normalize_fuel_type(&field("fuel_type"));
    record.transmission = normalize_transmission(&field("transmission"));
    record.condition = normalize_condition(&field("condition"));
    record.category = field("category");
    record.description = field("description");

    // 名称缺失时由 年+品牌+型号 派生（set_name 置空即回到自动派生态）
    record.set_name(&field("name"));
    record
}

fn build_part_record(row: &RawRow, row_number: usize) -> ImportRecord {
    let mut record = ImportRecord::new(RecordKind::Part, row_number);
    let field = |name: &str| extract_field(row, PART_ALIASES.candidates(name));

    record.part_number = field("part_number");
    record.brand = field("brand");
    record.category = field("category");
    record.location = field("location");
    record.price = parse_number(&field("price"));
    record.cost = parse_number(&field("cost"));
    record.stock_qty = parse_int(&field("stock"));
    record.weight_kg = parse_number(&field("weight"));
    record.description = field("description");

    record.set_name(&field("name"));
    record
}

fn build_transaction_record(row: &RawRow, row_number: usize) -> ImportRecord {
    let mut record = ImportRecord::new(RecordKind::Transaction, row_number);
    let field = |name: &str| extract_field(row, TRANSACTION_ALIASES.candidates(name));

    record.description = field("description");
    record.category = field("category");
    record.amount = parse_number(&field("amount"));
    record.tax = parse_number(&field("tax"));
    record.txn_date = parse_date(&field("date"));

    // 流水的展示名直接用摘要
    let summary = record.description.clone();
    record.set_name(&summary);
    record
}

/// 宽松数值解析：剥离货币符号/千分位后解析，失败视为缺失
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '¥' | '$' | '€' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 宽松整数解析（Excel 常把整数导成 "2023.0"）
fn parse_int(raw: &str) -> Option<i32> {
    parse_number(raw).map(|v| v.trunc() as i32)
}

/// 宽松日期解析：常见格式逐个尝试，失败视为缺失
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    const FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}
