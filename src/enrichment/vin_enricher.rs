// ==========================================
// 车行后台管理系统 - VIN 补全服务
// ==========================================
// 依据: Dealer_Import_Design_v0.4.md - VIN 补全并发规则
// 职责: VIN 编辑后异步拉取车型档案，只回填用户留空的字段
// 红线: 每条记录携带单调递增补全代数；陈旧响应整体丢弃；
//       同一行重新触发时显式撤销旧的在途查询
// ==========================================

use crate::client::error::ClientError;
use crate::client::vin_client::VinSpec;
use crate::domain::record::{ImportBatch, ImportRecord};
use crate::domain::types::{FuelType, Transmission};
use crate::importer::normalizer::{normalize_fuel_type, normalize_transmission};
use crate::importer::record_validator;
use async_trait::async_trait;
use chrono::Local;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// ==========================================
// VinLookup Trait
// ==========================================
// 用途: 车型档案查询接缝
// 实现者: HttpVinClient；测试中用内存 mock
#[async_trait]
pub trait VinLookup: Send + Sync {
    /// 按 VIN 查询车型档案
    async fn lookup(&self, vin: &str) -> Result<VinSpec, ClientError>;
}

// ==========================================
// VinEnricher - VIN 补全服务
// ==========================================
pub struct VinEnricher {
    lookup: Arc<dyn VinLookup>,

    // 行号 → 在途查询句柄（新查询启动时撤销旧句柄）
    inflight: Mutex<HashMap<usize, JoinHandle<()>>>,
}

impl VinEnricher {
    pub fn new(lookup: Arc<dyn VinLookup>) -> Self {
        Self {
            lookup,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// 触发一行的 VIN 补全
    ///
    /// 仅在 VIN 恰为 17 位时真正发起查询；
    /// 同一行旧的在途查询被显式撤销
    pub async fn trigger(&self, batch: Arc<AsyncMutex<ImportBatch>>, row_number: usize) {
        let (vin, generation) = {
            let guard = batch.lock().await;
            match guard.records.iter().find(|r| r.row_number == row_number) {
                Some(r) if r.vin.len() == 17 => (r.vin.clone(), r.enrich_generation()),
                _ => return,
            }
        };

        if let Some(previous) = self.lock_inflight().remove(&row_number) {
            previous.abort();
        }

        let lookup = Arc::clone(&self.lookup);
        let handle = tokio::spawn(async move {
            match lookup.lookup(&vin).await {
                Ok(spec) => {
                    let mut guard = batch.lock().await;
                    let record = match guard.record_mut(row_number) {
                        Some(r) => r,
                        None => return, // 记录已被删除
                    };

                    // 陈旧响应按代数整体丢弃，绝不覆盖更新的编辑
                    if record.enrich_generation() != generation {
                        debug!(row_number, "补全响应已陈旧，丢弃");
                        return;
                    }

                    merge_vin_spec(record, &spec);
                    record_validator::annotate(record, Local::now().date_naive());
                    debug!(row_number, "VIN 补全已合并");
                }
                Err(e) => {
                    // 补全失败只记日志，记录保持用户最后编辑的样子
                    warn!(row_number, error = %e, "VIN 补全失败");
                }
            }
        });

        self.lock_inflight().insert(row_number, handle);
    }

    /// 等待该行在途查询结束（测试与收尾用；无在途查询时立即返回）
    pub async fn wait_for(&self, row_number: usize) {
        let handle = self.lock_inflight().remove(&row_number);
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn lock_inflight(&self) -> std::sync::MutexGuard<'_, HashMap<usize, JoinHandle<()>>> {
        // 锁内不做 IO，中毒仅发生在持锁代码 panic 时
        self.inflight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// 只合并用户尚未填写的字段；已有值一律保留
///
/// 枚举字段仍处于文档化默认值时视作未填写
pub fn merge_vin_spec(record: &mut ImportRecord, spec: &VinSpec) {
    if record.brand.is_empty() {
        if let Some(brand) = &spec.brand {
            record.set_brand(brand);
        }
    }
    if record.model.is_empty() {
        if let Some(model) = &spec.model {
            record.set_model(model);
        }
    }
    if record.year.is_none() {
        if let Some(year) = spec.year {
            record.set_year(Some(year));
        }
    }
    if record.fuel_type == FuelType::default() {
        if let Some(fuel) = &spec.fuel_type {
            record.fuel_type = normalize_fuel_type(fuel);
        }
    }
    if record.transmission == Transmission::default() {
        if let Some(transmission) = &spec.transmission {
            record.transmission = normalize_transmission(transmission);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RecordKind;
    use tokio::sync::Notify;

    /// 受闸门控制的 mock：测试显式放行后才返回档案
    struct GatedLookup {
        gate: Arc<Notify>,
        spec: VinSpec,
    }

    #[async_trait]
    impl VinLookup for GatedLookup {
        async fn lookup(&self, _vin: &str) -> Result<VinSpec, ClientError> {
            self.gate.notified().await;
            Ok(self.spec.clone())
        }
    }

    fn bike_batch_with_vin() -> (Arc<AsyncMutex<ImportBatch>>, usize) {
        let mut batch = ImportBatch::new(RecordKind::Bike);
        let row = batch.add_manual_record();
        batch
            .record_mut(row)
            .unwrap()
            .set_vin("JH2PC350X1M200012");
        (Arc::new(AsyncMutex::new(batch)), row)
    }

    #[tokio::test]
    async fn test_enrichment_fills_only_empty_fields() {
        let gate = Arc::new(Notify::new());
        let enricher = VinEnricher::new(Arc::new(GatedLookup {
            gate: Arc::clone(&gate),
            spec: VinSpec {
                brand: Some("Honda".to_string()),
                model: Some("CBR600RR".to_string()),
                year: Some(2023),
                ..VinSpec::default()
            },
        }));

        let (batch, row) = bike_batch_with_vin();
        // 用户已填型号，补全不得覆盖
        batch.lock().await.record_mut(row).unwrap().set_model("自定义型号");

        enricher.trigger(Arc::clone(&batch), row).await;
        gate.notify_one();
        enricher.wait_for(row).await;

        let guard = batch.lock().await;
        let record = &guard.records[0];
        assert_eq!(record.brand, "Honda");
        assert_eq!(record.model, "自定义型号");
        assert_eq!(record.year, Some(2023));
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let gate = Arc::new(Notify::new());
        let enricher = VinEnricher::new(Arc::new(GatedLookup {
            gate: Arc::clone(&gate),
            spec: VinSpec {
                brand: Some("Honda".to_string()),
                ..VinSpec::default()
            },
        }));

        let (batch, row) = bike_batch_with_vin();
        enricher.trigger(Arc::clone(&batch), row).await;

        // 响应在途时用户再次编辑 VIN（代数 +1，在途响应陈旧化）
        batch
            .lock()
            .await
            .record_mut(row)
            .unwrap()
            .set_vin("1HGCM82633A004352");

        gate.notify_one();
        enricher.wait_for(row).await;

        let guard = batch.lock().await;
        assert_eq!(guard.records[0].brand, "");
    }

    #[tokio::test]
    async fn test_trigger_requires_exact_vin_length() {
        let gate = Arc::new(Notify::new());
        let enricher = VinEnricher::new(Arc::new(GatedLookup {
            gate: Arc::clone(&gate),
            spec: VinSpec::default(),
        }));

        let mut batch = ImportBatch::new(RecordKind::Bike);
        let row = batch.add_manual_record();
        batch.record_mut(row).unwrap().set_vin("TOOSHORT");
        let batch = Arc::new(AsyncMutex::new(batch));

        enricher.trigger(Arc::clone(&batch), row).await;
        // 长度不足时不应登记在途查询
        enricher.wait_for(row).await;
        assert!(enricher.lock_inflight().is_empty());
    }
}
