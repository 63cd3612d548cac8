// ==========================================
// 车行后台管理系统 - 自由文本归一化
// ==========================================
// 依据: Import_Field_Mapping_v0.2.md - 枚举归一规则
// 职责: 把表格里的自由文本压到固定枚举上
// 规则: 小写化后按固定优先级做关键词包含匹配，
//       第一组命中即返回；全部落空返回各字段文档化默认值
// ==========================================

use crate::domain::types::{BikeStatus, Condition, FuelType, Transmission};

/// 归一化整车状态（默认: ACQUISITION）
pub fn normalize_status(raw: &str) -> BikeStatus {
    let value = raw.to_lowercase();
    let rules: &[(&[&str], BikeStatus)] = &[
        (&["sold", "deliver", "closed", "已售"], BikeStatus::Sold),
        (&["maintenance", "service", "repair", "workshop", "维修", "整备"], BikeStatus::Maintenance),
        (&["hold", "reserve", "pending", "保留", "预定"], BikeStatus::Hold),
        (&["available", "listed", "sale", "ready", "stock", "可售", "在售"], BikeStatus::Available),
        (&["evaluat", "inspect", "assess", "review", "评估"], BikeStatus::Evaluation),
        (&["acquisition", "acquired", "intake", "purchase", "收购"], BikeStatus::Acquisition),
    ];
    first_match(&value, rules).unwrap_or_default()
}

/// 归一化燃料类型（默认: GASOLINE）
pub fn normalize_fuel_type(raw: &str) -> FuelType {
    let value = raw.to_lowercase();
    let rules: &[(&[&str], FuelType)] = &[
        (&["hybrid", "混动"], FuelType::Hybrid),
        (&["electric", "battery", "ev", "电动", "纯电"], FuelType::Electric),
        (&["diesel", "柴油"], FuelType::Diesel),
        (&["gasoline", "petrol", "gas", "汽油"], FuelType::Gasoline),
    ];
    first_match(&value, rules).unwrap_or_default()
}

/// 归一化变速类型（默认: MANUAL）
pub fn normalize_transmission(raw: &str) -> Transmission {
    let value = raw.to_lowercase();
    let rules: &[(&[&str], Transmission)] = &[
        (&["semi", "quickshift", "快排", "半自动"], Transmission::SemiAuto),
        (&["auto", "dct", "cvt", "自动"], Transmission::Automatic),
        (&["manual", "standard", "手动"], Transmission::Manual),
    ];
    first_match(&value, rules).unwrap_or_default()
}

/// 归一化车况（默认: USED）
pub fn normalize_condition(raw: &str) -> Condition {
    let value = raw.to_lowercase();
    let rules: &[(&[&str], Condition)] = &[
        (&["refurbish", "restored", "rebuilt", "翻新"], Condition::Refurbished),
        (&["brand new", "new", "全新", "新车"], Condition::New),
        (&["used", "second", "pre-owned", "二手"], Condition::Used),
    ];
    first_match(&value, rules).unwrap_or_default()
}

/// 按固定顺序找第一个命中的规则组
fn first_match<T: Copy>(value: &str, rules: &[(&[&str], T)]) -> Option<T> {
    for (keywords, target) in rules {
        if keywords.iter().any(|kw| value.contains(kw)) {
            return Some(*target);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_keyword_containment() {
        assert_eq!(normalize_status("Listed for sale"), BikeStatus::Available);
        assert_eq!(normalize_status("SOLD - delivered"), BikeStatus::Sold);
        assert_eq!(normalize_status("in workshop"), BikeStatus::Maintenance);
        assert_eq!(normalize_status("under evaluation"), BikeStatus::Evaluation);
    }

    #[test]
    fn test_status_priority_order() {
        // 同时含 "sold" 与 "available" 时按规则顺序取 SOLD
        assert_eq!(normalize_status("sold (was available)"), BikeStatus::Sold);
    }

    #[test]
    fn test_documented_defaults() {
        assert_eq!(normalize_status(""), BikeStatus::Acquisition);
        assert_eq!(normalize_fuel_type(""), FuelType::Gasoline);
        assert_eq!(normalize_transmission(""), Transmission::Manual);
        assert_eq!(normalize_condition(""), Condition::Used);
    }

    #[test]
    fn test_total_on_arbitrary_input() {
        // 任意输入（乱码/Unicode/超长）都必须落到枚举值，不得 panic
        for junk in ["💥💥💥", "ЖЫДХ", "null", "12345", "\u{0}\u{1}", &"x".repeat(4096)] {
            let _ = normalize_status(junk);
            let _ = normalize_fuel_type(junk);
            let _ = normalize_transmission(junk);
            let _ = normalize_condition(junk);
        }
    }

    #[test]
    fn test_fuel_hybrid_beats_gas_substring() {
        // "hybrid (gas+electric)" 同含多组关键词，优先级取 HYBRID
        assert_eq!(normalize_fuel_type("hybrid (gas+electric)"), FuelType::Hybrid);
        assert_eq!(normalize_fuel_type("petrol"), FuelType::Gasoline);
    }

    #[test]
    fn test_transmission_semi_beats_auto() {
        assert_eq!(normalize_transmission("semi-automatic"), Transmission::SemiAuto);
        assert_eq!(normalize_transmission("6-speed manual"), Transmission::Manual);
        assert_eq!(normalize_transmission("DCT"), Transmission::Automatic);
    }
}
