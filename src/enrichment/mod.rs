// ==========================================
// 车行后台管理系统 - 补全层
// ==========================================

pub mod vin_enricher;

pub use vin_enricher::{merge_vin_spec, VinEnricher, VinLookup};
