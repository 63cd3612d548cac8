// ==========================================
// 车行后台管理系统 - 导入批次 Repository 实现
// ==========================================
// 存储: SQLite（import_batch / import_failure 表）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::context::TenantId;
use crate::domain::record::{ImportBatchLog, SubmissionFailure};
use crate::domain::types::RecordKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_batch_repo::ImportBatchRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ImportBatchRepositoryImpl
// ==========================================
pub struct ImportBatchRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ImportBatchRepositoryImpl {
    /// 创建新的 Repository 实例（打开连接并确保建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（测试复用）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl ImportBatchRepository for ImportBatchRepositoryImpl {
    async fn insert_batch_log(
        &self,
        tenant: &TenantId,
        log: ImportBatchLog,
    ) -> RepositoryResult<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, tenant_id, file_name, entity_kind,
                total_rows, success_rows, error_rows, warning_rows,
                imported_by, imported_at, elapsed_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                log.batch_id,
                tenant.as_str(),
                log.file_name,
                log.entity_kind.to_db_str(),
                log.total_rows,
                log.success_rows,
                log.error_rows,
                log.warning_rows,
                log.imported_by,
                log.imported_at,
                log.elapsed_ms,
            ],
        )?;
        Ok(())
    }

    async fn insert_failures(
        &self,
        tenant: &TenantId,
        failures: &[SubmissionFailure],
    ) -> RepositoryResult<usize> {
        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO import_failure (
                    failure_id, tenant_id, batch_id, row_number,
                    record_name, reason, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;

            for failure in failures {
                stmt.execute(params![
                    failure.failure_id,
                    tenant.as_str(),
                    failure.batch_id,
                    failure.row_number as i64,
                    failure.record_name,
                    failure.reason,
                    failure.created_at,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(failures.len())
    }

    async fn list_recent_batches(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> RepositoryResult<Vec<ImportBatchLog>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, file_name, entity_kind,
                   total_rows, success_rows, error_rows, warning_rows,
                   imported_by, imported_at, elapsed_ms
            FROM import_batch
            WHERE tenant_id = ?1
            ORDER BY imported_at DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![tenant.as_str(), limit as i64], |row| {
            let kind_raw: String = row.get(2)?;
            let imported_at: DateTime<Utc> = row.get(8)?;
            Ok(ImportBatchLog {
                batch_id: row.get(0)?,
                file_name: row.get(1)?,
                // 未知实体串按历史数据容错处理为整车
                entity_kind: RecordKind::from_str(&kind_raw).unwrap_or(RecordKind::Bike),
                total_rows: row.get(3)?,
                success_rows: row.get(4)?,
                error_rows: row.get(5)?,
                warning_rows: row.get(6)?,
                imported_by: row.get(7)?,
                imported_at,
                elapsed_ms: row.get(9)?,
            })
        })?;

        let mut batches = Vec::new();
        for row in rows {
            batches.push(row?);
        }
        Ok(batches)
    }

    async fn list_failures_by_batch(
        &self,
        tenant: &TenantId,
        batch_id: &str,
    ) -> RepositoryResult<Vec<SubmissionFailure>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT failure_id, batch_id, row_number, record_name, reason, created_at
            FROM import_failure
            WHERE tenant_id = ?1 AND batch_id = ?2
            ORDER BY row_number ASC
            "#,
        )?;

        let rows = stmt.query_map(params![tenant.as_str(), batch_id], |row| {
            let row_number: i64 = row.get(2)?;
            let created_at: DateTime<Utc> = row.get(5)?;
            Ok(SubmissionFailure {
                failure_id: row.get(0)?,
                batch_id: row.get(1)?,
                row_number: row_number as usize,
                record_name: row.get(3)?,
                reason: row.get(4)?,
                created_at,
            })
        })?;

        let mut failures = Vec::new();
        for row in rows {
            failures.push(row?);
        }
        Ok(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_repo() -> (tempfile::NamedTempFile, ImportBatchRepositoryImpl) {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let path = temp_file.path().display().to_string();
        let repo = ImportBatchRepositoryImpl::new(&path).unwrap();
        (temp_file, repo)
    }

    fn sample_log(batch_id: &str) -> ImportBatchLog {
        ImportBatchLog {
            batch_id: batch_id.to_string(),
            file_name: Some("bikes.csv".to_string()),
            entity_kind: RecordKind::Bike,
            total_rows: 3,
            success_rows: 2,
            error_rows: 1,
            warning_rows: 1,
            imported_by: "tester".to_string(),
            imported_at: Utc::now(),
            elapsed_ms: 120,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_batches_tenant_scoped() {
        let (_f, repo) = test_repo();
        let tenant_a = TenantId::new("shop-a").unwrap();
        let tenant_b = TenantId::new("shop-b").unwrap();

        repo.insert_batch_log(&tenant_a, sample_log("b1")).await.unwrap();
        repo.insert_batch_log(&tenant_b, sample_log("b2")).await.unwrap();

        let batches = repo.list_recent_batches(&tenant_a, 10).await.unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].batch_id, "b1");
        assert_eq!(batches[0].entity_kind, RecordKind::Bike);
    }

    #[tokio::test]
    async fn test_failures_roundtrip() {
        let (_f, repo) = test_repo();
        let tenant = TenantId::new("shop-a").unwrap();

        let failures = vec![
            SubmissionFailure {
                failure_id: Uuid::new_v4().to_string(),
                batch_id: "b1".to_string(),
                row_number: 2,
                record_name: "2023 Honda CBR600RR".to_string(),
                reason: "远端返回非成功状态: HTTP 500".to_string(),
                created_at: Utc::now(),
            },
            SubmissionFailure {
                failure_id: Uuid::new_v4().to_string(),
                batch_id: "b1".to_string(),
                row_number: 1,
                record_name: "2022 Yamaha MT-07".to_string(),
                reason: "请求发送失败: timeout".to_string(),
                created_at: Utc::now(),
            },
        ];

        assert_eq!(repo.insert_failures(&tenant, &failures).await.unwrap(), 2);

        let listed = repo.list_failures_by_batch(&tenant, "b1").await.unwrap();
        assert_eq!(listed.len(), 2);
        // 按行号升序
        assert_eq!(listed[0].row_number, 1);

        // 其他租户看不到
        let other = TenantId::new("shop-b").unwrap();
        assert!(repo.list_failures_by_batch(&other, "b1").await.unwrap().is_empty());
    }
}
