// ==========================================
// 车行后台管理系统 - 配置层
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

pub use config_manager::{ConfigManager, DEFAULT_API_BASE_URL, DEFAULT_VIN_LOOKUP_URL};
pub use import_config_trait::ImportConfigReader;
