// ==========================================
// 车行后台管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中建表语句，避免各仓储自行拼 schema
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置 + 建表
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// 幂等建表（所有表都带显式 tenant_id 列，按租户隔离）
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS import_batch (
            batch_id     TEXT PRIMARY KEY,
            tenant_id    TEXT NOT NULL,
            file_name    TEXT,
            entity_kind  TEXT NOT NULL,
            total_rows   INTEGER NOT NULL,
            success_rows INTEGER NOT NULL,
            error_rows   INTEGER NOT NULL,
            warning_rows INTEGER NOT NULL,
            imported_by  TEXT NOT NULL,
            imported_at  TEXT NOT NULL,
            elapsed_ms   INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_import_batch_tenant
            ON import_batch (tenant_id, imported_at);

        CREATE TABLE IF NOT EXISTS import_failure (
            failure_id  TEXT PRIMARY KEY,
            tenant_id   TEXT NOT NULL,
            batch_id    TEXT NOT NULL,
            row_number  INTEGER NOT NULL,
            record_name TEXT NOT NULL,
            reason      TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_import_failure_batch
            ON import_failure (tenant_id, batch_id);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key      TEXT NOT NULL,
            value    TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )
}

/// 默认数据库路径（用户数据目录下，目录不存在时创建）
pub fn get_default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join("moto-dealer-import");
    let _ = std::fs::create_dir_all(&dir);
    dir.join("dealer.db").display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_bootstrap_is_idempotent() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let path = temp_file.path().display().to_string();

        let conn = open_sqlite_connection(&path).unwrap();
        // 二次执行不报错
        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('import_batch','import_failure','config_kv')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }
}
