// ==========================================
// 车行后台管理系统 - 字段提取器
// ==========================================
// 依据: Import_Field_Mapping_v0.2.md - 标准字段别名表
// 职责: 在一行原始单元格中为逻辑字段找到最佳匹配值
// ==========================================

use crate::domain::record::RawRow;

// ==========================================
// FieldAliasTable - 字段别名表
// ==========================================
// 逻辑字段 → 可接受表头子串（按最具体优先排序）
// 静态只读，运行期不可变
pub struct FieldAliasTable {
    entries: &'static [(&'static str, &'static [&'static str])],
}

impl FieldAliasTable {
    pub const fn new(entries: &'static [(&'static str, &'static [&'static str])]) -> Self {
        Self { entries }
    }

    /// 查询逻辑字段的候选表头列表（未登记的字段返回空表）
    pub fn candidates(&self, field: &str) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }
}

// ===== 整车别名表 =====
pub static BIKE_ALIASES: FieldAliasTable = FieldAliasTable::new(&[
    ("name", &["name", "title"]),
    ("brand", &["brand", "make", "manufacturer"]),
    ("model", &["model"]),
    ("year", &["year", "yr"]),
    ("vin", &["vin", "chassis"]),
    ("price", &["price", "asking"]),
    ("cost", &["cost"]),
    ("mileage", &["mileage", "odometer"]),
    ("status", &["status", "stage"]),
    ("fuel_type", &["fuel"]),
    ("transmission", &["transmission", "gearbox"]),
    ("condition", &["condition"]),
    ("category", &["category"]),
    ("description", &["description", "notes"]),
]);

// ===== 配件别名表 =====
pub static PART_ALIASES: FieldAliasTable = FieldAliasTable::new(&[
    ("name", &["name", "title"]),
    ("part_number", &["part number", "part no", "part#", "sku"]),
    ("brand", &["brand", "manufacturer"]),
    ("category", &["category"]),
    ("location", &["location", "shelf", "bin"]),
    ("price", &["price"]),
    ("cost", &["cost"]),
    ("stock", &["stock", "quantity", "qty"]),
    ("weight", &["weight"]),
    ("description", &["description", "notes"]),
]);

// ===== 财务流水别名表 =====
pub static TRANSACTION_ALIASES: FieldAliasTable = FieldAliasTable::new(&[
    ("description", &["description", "memo", "detail"]),
    ("category", &["category"]),
    ("amount", &["amount", "total"]),
    ("tax", &["tax"]),
    ("date", &["date"]),
]);

/// 在一行中为逻辑字段提取最佳匹配值
///
/// 规则（纯函数）:
/// - 候选名按给定顺序尝试；同一候选名内取第一个匹配的表头
/// - 匹配为大小写不敏感的子串包含（表头已在解析时小写化）
/// - 仅返回非空单元格；全部落空返回空串
pub fn extract_field(row: &RawRow, candidates: &[&str]) -> String {
    for candidate in candidates {
        let candidate = candidate.to_lowercase();
        for (idx, header) in row.headers.iter().enumerate() {
            if !header.contains(&candidate) {
                continue;
            }
            if let Some(cell) = row.cells.get(idx) {
                let value = clean_cell(cell);
                if !value.is_empty() {
                    return value;
                }
            }
        }
    }
    String::new()
}

/// 单元格清洗：TRIM + 剥离成对的首尾引号
fn clean_cell(raw: &str) -> String {
    let mut value = raw.trim();
    loop {
        let stripped = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
        match stripped {
            Some(inner) => value = inner.trim(),
            None => break,
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(headers: &[&str], cells: &[&str]) -> RawRow {
        RawRow {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_substring_header_match() {
        // 表头 "bike brand" 含候选名 "brand"，即使不是精确相等也应命中
        let r = row(&["bike brand", "model", "yr"], &["Honda", "CBR600RR", "2023"]);
        assert_eq!(extract_field(&r, &["brand", "manufacturer"]), "Honda");
    }

    #[test]
    fn test_candidate_order_wins() {
        // 候选名按顺序尝试："manufacturer" 先于 "brand" 时取 manufacturer 列
        let r = row(&["brand", "manufacturer"], &["A", "B"]);
        assert_eq!(extract_field(&r, &["manufacturer", "brand"]), "B");
        assert_eq!(extract_field(&r, &["brand", "manufacturer"]), "A");
    }

    #[test]
    fn test_skips_empty_cells() {
        // 命中表头但单元格为空时继续向后找
        let r = row(&["brand", "make"], &["", "Yamaha"]);
        assert_eq!(extract_field(&r, &["brand", "make"]), "Yamaha");
    }

    #[test]
    fn test_no_match_returns_empty() {
        let r = row(&["color"], &["red"]);
        assert_eq!(extract_field(&r, &["brand"]), "");
    }

    #[test]
    fn test_cell_quote_stripping() {
        let r = row(&["brand"], &["  \"Honda\"  "]);
        assert_eq!(extract_field(&r, &["brand"]), "Honda");
    }

    #[test]
    fn test_alias_table_lookup() {
        assert_eq!(BIKE_ALIASES.candidates("brand"), &["brand", "make", "manufacturer"]);
        assert!(BIKE_ALIASES.candidates("no_such_field").is_empty());
    }
}
