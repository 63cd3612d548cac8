// ==========================================
// 车行后台管理系统 - 请求上下文
// ==========================================
// 职责: 显式传递租户与操作人，替代任何隐式全局状态
// 红线: 存储操作一律携带租户标识，禁止在业务代码里拼接集合名
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// TenantId - 租户标识
// ==========================================
// 一个租户对应一家门店/公司，数据按租户隔离
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    /// 创建租户标识（TRIM 后不允许为空）
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// RequestContext - 请求上下文
// ==========================================
// 每次 API 调用都携带一份，贯穿到仓储层
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub tenant: TenantId,  // 当前租户
    pub operator: String,  // 操作人（审计用）
}

impl RequestContext {
    pub fn new(tenant: TenantId, operator: impl Into<String>) -> Self {
        Self {
            tenant,
            operator: operator.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_rejects_blank() {
        assert!(TenantId::new("  ").is_none());
        assert!(TenantId::new("").is_none());
        assert_eq!(TenantId::new(" t-001 ").unwrap().as_str(), "t-001");
    }
}
