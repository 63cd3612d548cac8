// ==========================================
// 车行后台管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、租户覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::context::TenantId;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 远端建档服务根地址默认值
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8600/api";

/// VIN 补全服务地址默认值
pub const DEFAULT_VIN_LOOKUP_URL: &str = "http://127.0.0.1:8600/api/vin";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 按 scope 读取配置值
    fn get_config_value(&self, scope: &str, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![scope, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取配置：租户覆写 → global → None
    fn get_scoped_value(
        &self,
        tenant: &TenantId,
        key: &str,
    ) -> Result<Option<String>, Box<dyn Error>> {
        let tenant_scope = Self::tenant_scope(tenant);
        if let Some(value) = self.get_config_value(&tenant_scope, key)? {
            return Ok(Some(value));
        }
        self.get_config_value("global", key)
    }

    /// 写入配置值（管理入口与测试用）
    pub fn set_config_value(
        &self,
        scope: &str,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)",
            params![scope, key, value],
        )?;
        Ok(())
    }

    /// 租户 scope 标识（集中定义，避免散落拼接）
    pub fn tenant_scope(tenant: &TenantId) -> String {
        format!("tenant:{}", tenant.as_str())
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_api_base_url(&self, tenant: &TenantId) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_scoped_value(tenant, "api_base_url")?
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()))
    }

    async fn get_vin_lookup_url(&self, tenant: &TenantId) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_scoped_value(tenant, "vin_lookup_url")?
            .unwrap_or_else(|| DEFAULT_VIN_LOOKUP_URL.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_manager() -> (tempfile::NamedTempFile, ConfigManager) {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let path = temp_file.path().display().to_string();
        let manager = ConfigManager::new(&path).unwrap();
        (temp_file, manager)
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let (_f, manager) = test_manager();
        let tenant = TenantId::new("shop-a").unwrap();

        assert_eq!(
            manager.get_api_base_url(&tenant).await.unwrap(),
            DEFAULT_API_BASE_URL
        );
        assert_eq!(
            manager.get_vin_lookup_url(&tenant).await.unwrap(),
            DEFAULT_VIN_LOOKUP_URL
        );
    }

    #[tokio::test]
    async fn test_tenant_override_beats_global() {
        let (_f, manager) = test_manager();
        let tenant = TenantId::new("shop-a").unwrap();

        manager
            .set_config_value("global", "api_base_url", "http://global.example/api")
            .unwrap();
        assert_eq!(
            manager.get_api_base_url(&tenant).await.unwrap(),
            "http://global.example/api"
        );

        manager
            .set_config_value(
                &ConfigManager::tenant_scope(&tenant),
                "api_base_url",
                "http://shop-a.example/api",
            )
            .unwrap();
        assert_eq!(
            manager.get_api_base_url(&tenant).await.unwrap(),
            "http://shop-a.example/api"
        );

        // 其他租户仍取 global
        let other = TenantId::new("shop-b").unwrap();
        assert_eq!(
            manager.get_api_base_url(&other).await.unwrap(),
            "http://global.example/api"
        );
    }
}
