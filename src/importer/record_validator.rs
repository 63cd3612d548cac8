// ==========================================
// 车行后台管理系统 - 记录校验器
// ==========================================
// 依据: Import_Field_Mapping_v0.2.md - 数据质量规则
// 规则独立应用（不短路），幂等；
// 错误阻断整批提交，警告只计数
// ==========================================

use crate::domain::record::{ImportRecord, ValidationReport};
use crate::domain::types::RecordKind;
use chrono::{Datelike, NaiveDate};

/// 年款下限
const MIN_YEAR: i32 = 1900;

/// VIN 标准长度
const VIN_LEN: usize = 17;

/// 校验一条记录（纯函数，只依赖字段值与 today）
pub fn validate(record: &ImportRecord, today: NaiveDate) -> ValidationReport {
    let mut report = ValidationReport::default();

    match record.kind {
        RecordKind::Bike => validate_bike(record, today, &mut report),
        RecordKind::Part => validate_part(record, &mut report),
        RecordKind::Transaction => validate_transaction(record, today, &mut report),
    }

    report
}

/// 校验并把结果写回记录侧表
pub fn annotate(record: &mut ImportRecord, today: NaiveDate) {
    let report = validate(record, today);
    record.set_validation(report);
}

fn validate_bike(record: &ImportRecord, today: NaiveDate, report: &mut ValidationReport) {
    require_text(&record.name, "名称", report);
    require_text(&record.brand, "品牌", report);
    require_text(&record.model, "型号", report);

    require_positive_amount(record.price, "售价", report);

    // VIN 为可选字段：存在但长度异常只给警告，从不阻断
    if !record.vin.is_empty() && record.vin.len() != VIN_LEN {
        report.warnings.push(format!(
            "VIN 长度应为 {} 位（当前 {} 位）",
            VIN_LEN,
            record.vin.len()
        ));
    }

    if let Some(year) = record.year {
        let max_year = today.year() + 1;
        if year < MIN_YEAR || year > max_year {
            report
                .warnings
                .push(format!("年款 {} 超出合理范围 [{}, {}]", year, MIN_YEAR, max_year));
        }
    }

    warn_negative(record.cost, "成本", report);
    warn_negative(record.mileage_km, "里程", report);

    if let (Some(cost), Some(price)) = (record.cost, record.price) {
        if cost > price {
            report.warnings.push("成本高于售价".to_string());
        }
    }
}

fn validate_part(record: &ImportRecord, report: &mut ValidationReport) {
    require_text(&record.name, "名称", report);
    require_text(&record.part_number, "配件号", report);
    require_text(&record.category, "分类", report);
    require_text(&record.location, "库位", report);

    require_positive_amount(record.price, "售价", report);

    warn_negative(record.cost, "成本", report);
    warn_negative(record.weight_kg, "重量", report);
    warn_negative(record.stock_qty.map(f64::from), "库存数量", report);

    if let (Some(cost), Some(price)) = (record.cost, record.price) {
        if cost > price {
            report.warnings.push("成本高于售价".to_string());
        }
    }
}

fn validate_transaction(record: &ImportRecord, today: NaiveDate, report: &mut ValidationReport) {
    require_text(&record.description, "摘要", report);
    require_text(&record.category, "分类", report);

    require_positive_amount(record.amount, "交易金额", report);

    warn_negative(record.tax, "税额", report);

    if let (Some(tax), Some(amount)) = (record.tax, record.amount) {
        if tax > amount {
            report.warnings.push("税额超过交易金额".to_string());
        }
    }

    if let Some(date) = record.txn_date {
        if date > today {
            report
                .warnings
                .push(format!("交易日期 {} 晚于今天", date));
        }
    }
}

/// 必填文本为空 → 错误
fn require_text(value: &str, label: &str, report: &mut ValidationReport) {
    if value.trim().is_empty() {
        report.errors.push(format!("{}不能为空", label));
    }
}

/// 必填金额缺失或 ≤ 0 → 错误
fn require_positive_amount(value: Option<f64>, label: &str, report: &mut ValidationReport) {
    match value {
        None => report.errors.push(format!("{}不能为空", label)),
        Some(v) if v <= 0.0 => report.errors.push(format!("{}必须大于 0", label)),
        Some(_) => {}
    }
}

/// 次要数值为负 → 警告
fn warn_negative(value: Option<f64>, label: &str, report: &mut ValidationReport) {
    if let Some(v) = value {
        if v < 0.0 {
            report.warnings.push(format!("{}为负数: {}", label, v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RecordKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn valid_bike() -> ImportRecord {
        let mut r = ImportRecord::new(RecordKind::Bike, 1);
        r.set_brand("Honda");
        r.set_model("CBR600RR");
        r.set_year(Some(2023));
        r.price = Some(12500.0);
        r
    }

    #[test]
    fn test_valid_bike_has_no_errors() {
        let report = validate(&valid_bike(), today());
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_required_fields_one_message_each() {
        let r = ImportRecord::new(RecordKind::Bike, 1);
        let report = validate(&r, today());
        // 名称/品牌/型号/售价 各一条错误
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn test_price_zero_is_error() {
        let mut r = valid_bike();
        r.price = Some(0.0);
        let report = validate(&r, today());
        assert_eq!(report.errors, vec!["售价必须大于 0"]);
    }

    #[test]
    fn test_vin_length_boundary() {
        let mut r = valid_bike();

        r.set_vin("A".repeat(16).as_str());
        assert_eq!(validate(&r, today()).warnings.len(), 1);

        r.set_vin("A".repeat(17).as_str());
        assert!(validate(&r, today()).warnings.is_empty());

        r.set_vin("A".repeat(18).as_str());
        assert_eq!(validate(&r, today()).warnings.len(), 1);

        // VIN 异常永不阻断
        assert!(validate(&r, today()).errors.is_empty());
    }

    #[test]
    fn test_year_range_is_warning_not_error() {
        let mut r = valid_bike();
        r.set_year(Some(1899));
        let report = validate(&r, today());
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);

        // current_year + 1 在范围内
        r.set_year(Some(2027));
        assert!(validate(&r, today()).warnings.is_empty());
        r.set_year(Some(2028));
        assert_eq!(validate(&r, today()).warnings.len(), 1);
    }

    #[test]
    fn test_cost_above_price_warns() {
        let mut r = valid_bike();
        r.cost = Some(20000.0);
        let report = validate(&r, today());
        assert!(report.warnings.iter().any(|w| w.contains("成本高于售价")));
    }

    #[test]
    fn test_rules_do_not_short_circuit() {
        let mut r = ImportRecord::new(RecordKind::Bike, 1);
        r.cost = Some(-5.0);
        r.set_vin("TOOSHORT");
        let report = validate(&r, today());
        // 必填错误与警告同时产出
        assert!(!report.errors.is_empty());
        assert!(report.warnings.len() >= 2);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut r = valid_bike();
        r.cost = Some(-1.0);
        let first = validate(&r, today());
        r.set_validation(first.clone());
        // 侧表写入不影响再次校验的结果
        let second = validate(&r, today());
        assert_eq!(first, second);
    }

    #[test]
    fn test_eligibility_iff_no_errors() {
        let mut good = valid_bike();
        annotate(&mut good, today());
        assert!(good.is_import_eligible());

        let mut bad = valid_bike();
        bad.price = None;
        annotate(&mut bad, today());
        assert!(!bad.is_import_eligible());

        // 警告不影响可提交性
        let mut warned = valid_bike();
        warned.cost = Some(-1.0);
        annotate(&mut warned, today());
        assert!(warned.is_import_eligible());
        assert!(warned.has_warnings());
    }

    #[test]
    fn test_transaction_rules() {
        let mut r = ImportRecord::new(RecordKind::Transaction, 1);
        r.description = "保养".to_string();
        r.category = "服务".to_string();
        r.amount = Some(100.0);
        r.tax = Some(120.0);
        r.txn_date = Some(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());

        let report = validate(&r, today());
        assert!(report.errors.is_empty());
        // 税额超过金额 + 未来日期 = 两条警告
        assert_eq!(report.warnings.len(), 2);

        r.amount = None;
        assert_eq!(validate(&r, today()).errors, vec!["交易金额不能为空"]);
    }

    #[test]
    fn test_part_rules() {
        let mut r = ImportRecord::new(RecordKind::Part, 1);
        r.set_name("链条");
        r.part_number = "PN-1".to_string();
        r.category = "传动".to_string();
        r.location = "A-01".to_string();
        r.price = Some(100.0);
        r.stock_qty = Some(-3);

        let report = validate(&r, today());
        assert!(report.errors.is_empty());
        assert!(report.warnings.iter().any(|w| w.contains("库存数量")));
    }
}
