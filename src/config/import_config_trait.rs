// ==========================================
// 车行后台管理系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::context::TenantId;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取远端建档服务根地址
    ///
    /// # 解析顺序
    /// 1. 租户 scope 覆写
    /// 2. global scope
    /// 3. 默认值 http://127.0.0.1:8600/api
    async fn get_api_base_url(&self, tenant: &TenantId) -> Result<String, Box<dyn Error>>;

    /// 获取 VIN 补全服务地址
    ///
    /// # 解析顺序
    /// 同 get_api_base_url
    ///
    /// # 默认值
    /// - http://127.0.0.1:8600/api/vin
    async fn get_vin_lookup_url(&self, tenant: &TenantId) -> Result<String, Box<dyn Error>>;
}
