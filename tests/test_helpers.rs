// ==========================================
// 集成测试共享工具
// ==========================================

#![allow(dead_code)]

use moto_dealer_import::domain::{RequestContext, TenantId};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// 创建测试用临时数据库（返回句柄保持文件存活）
pub fn create_test_db() -> (NamedTempFile, String) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp db file");
    let path = temp_file.path().display().to_string();
    (temp_file, path)
}

/// 测试固定请求上下文
pub fn test_ctx(tenant: &str) -> RequestContext {
    RequestContext::new(TenantId::new(tenant).expect("tenant id"), "tester")
}

/// fixtures 目录下的文件路径（集成测试工作目录为 crate 根）
pub fn fixture_path(name: &str) -> String {
    PathBuf::from("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}
