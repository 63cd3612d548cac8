// ==========================================
// 车行后台管理系统 - 远端建档客户端
// ==========================================
// 依据: Storage_API_Contract_v0.1.md - POST /tenants/{tenant}/records
// 职责: 每条记录一次 POST；请求/响应在边界上做模式校验
// 注意: 建档调用未配置超时（与线上行为一致，挂起即阻塞顺序提交循环）
// ==========================================

use crate::client::error::{ClientError, ClientResult};
use crate::domain::context::RequestContext;
use crate::domain::record::ImportRecord;
use crate::domain::types::{BikeStatus, Condition, FuelType, RecordKind, Transmission};
use crate::importer::importer_trait::RecordSubmitter;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

// ==========================================
// ListingStatus - 存储层状态词汇
// ==========================================
// 与导入层 BikeStatus 词汇不同源（available → Listed 等），
// 两套词汇各自保留，仅在此处做一次显式映射
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Acquisition,
    Evaluation,
    Listed,
    Sold,
    Hold,
    Servicing,
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingStatus::Acquisition => write!(f, "Acquisition"),
            ListingStatus::Evaluation => write!(f, "Evaluation"),
            ListingStatus::Listed => write!(f, "Listed"),
            ListingStatus::Sold => write!(f, "Sold"),
            ListingStatus::Hold => write!(f, "Hold"),
            ListingStatus::Servicing => write!(f, "Servicing"),
        }
    }
}

/// 导入层状态 → 存储层状态
pub fn map_bike_status(status: BikeStatus) -> ListingStatus {
    match status {
        BikeStatus::Acquisition => ListingStatus::Acquisition,
        BikeStatus::Evaluation => ListingStatus::Evaluation,
        BikeStatus::Available => ListingStatus::Listed,
        BikeStatus::Sold => ListingStatus::Sold,
        BikeStatus::Hold => ListingStatus::Hold,
        BikeStatus::Maintenance => ListingStatus::Servicing,
    }
}

// ==========================================
// 建档请求负载（按实体类型打标签的和类型）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum CreateRecordRequest {
    Bike(BikePayload),
    Part(PartPayload),
    Transaction(TransactionPayload),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BikePayload {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub status: ListingStatus,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub condition: Condition,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartPayload {
    pub name: String,
    pub part_number: String,
    pub category: String,
    pub location: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_qty: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionPayload {
    pub description: String,
    pub category: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn_date: Option<NaiveDate>,
}

impl CreateRecordRequest {
    /// 由导入记录构造请求负载（边界契约检查）
    ///
    /// 不合契约的记录在发出前即被拒绝，不进入网络层
    pub fn from_record(record: &ImportRecord) -> ClientResult<Self> {
        match record.kind {
            RecordKind::Bike => {
                let price = require_amount(record.price, "price")?;
                Ok(CreateRecordRequest::Bike(BikePayload {
                    name: require_text(&record.name, "name")?,
                    brand: require_text(&record.brand, "brand")?,
                    model: require_text(&record.model, "model")?,
                    status: map_bike_status(record.status),
                    fuel_type: record.fuel_type,
                    transmission: record.transmission,
                    condition: record.condition,
                    price,
                    year: record.year,
                    vin: optional_text(&record.vin),
                    mileage_km: record.mileage_km,
                    cost: record.cost,
                    category: optional_text(&record.category),
                    description: optional_text(&record.description),
                }))
            }
            RecordKind::Part => {
                let price = require_amount(record.price, "price")?;
                Ok(CreateRecordRequest::Part(PartPayload {
                    name: require_text(&record.name, "name")?,
                    part_number: require_text(&record.part_number, "part_number")?,
                    category: require_text(&record.category, "category")?,
                    location: require_text(&record.location, "location")?,
                    price,
                    brand: optional_text(&record.brand),
                    cost: record.cost,
                    stock_qty: record.stock_qty,
                    weight_kg: record.weight_kg,
                    description: optional_text(&record.description),
                }))
            }
            RecordKind::Transaction => {
                let amount = require_amount(record.amount, "amount")?;
                Ok(CreateRecordRequest::Transaction(TransactionPayload {
                    description: require_text(&record.description, "description")?,
                    category: require_text(&record.category, "category")?,
                    amount,
                    tax: record.tax,
                    txn_date: record.txn_date,
                }))
            }
        }
    }
}

fn require_text(value: &str, field: &str) -> ClientResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ClientError::InvalidPayload(format!("字段 {} 为空", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

fn require_amount(value: Option<f64>, field: &str) -> ClientResult<f64> {
    match value {
        Some(v) if v > 0.0 => Ok(v),
        _ => Err(ClientError::InvalidPayload(format!(
            "字段 {} 缺失或非正数",
            field
        ))),
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ==========================================
// 建档响应（封闭结构，未知字段即契约违约）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRecordResponse {
    pub success: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ==========================================
// HttpRecordClient - HTTP 建档客户端
// ==========================================
pub struct HttpRecordClient {
    client: Client,
    base_url: String,
}

impl HttpRecordClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 租户显式出现在路径上，不在业务代码里拼集合名
    fn records_url(&self, ctx: &RequestContext) -> String {
        format!("{}/tenants/{}/records", self.base_url, ctx.tenant)
    }
}

#[async_trait]
impl RecordSubmitter for HttpRecordClient {
    async fn submit(
        &self,
        ctx: &RequestContext,
        record: &ImportRecord,
    ) -> Result<(), ClientError> {
        let payload = CreateRecordRequest::from_record(record)?;
        let url = self.records_url(ctx);

        debug!(row_number = record.row_number, url = %url, "提交建档请求");
        let response = self.client.post(&url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(row_number = record.row_number, status = %status, "远端返回非成功状态");
            return Err(ClientError::BadStatus(status.as_u16()));
        }

        let body: CreateRecordResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if !body.success {
            return Err(ClientError::Rejected(
                body.message.unwrap_or_else(|| "未给出原因".to_string()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_vocabulary_mapping() {
        assert_eq!(map_bike_status(BikeStatus::Available), ListingStatus::Listed);
        assert_eq!(
            map_bike_status(BikeStatus::Maintenance),
            ListingStatus::Servicing
        );
        assert_eq!(map_bike_status(BikeStatus::Sold), ListingStatus::Sold);
    }

    #[test]
    fn test_from_record_rejects_malformed() {
        // 售价缺失的记录在边界即被拒绝
        let record = ImportRecord::new(RecordKind::Bike, 1);
        let result = CreateRecordRequest::from_record(&record);
        assert!(matches!(result, Err(ClientError::InvalidPayload(_))));
    }

    #[test]
    fn test_bike_payload_wire_shape() {
        let mut record = ImportRecord::new(RecordKind::Bike, 1);
        record.set_brand("Honda");
        record.set_model("CBR600RR");
        record.set_year(Some(2023));
        record.price = Some(12500.0);
        record.status = BikeStatus::Available;

        let payload = CreateRecordRequest::from_record(&record).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["entity"], "bike");
        assert_eq!(json["status"], "Listed");
        assert_eq!(json["name"], "2023 Honda CBR600RR");
        // 空的可选字段不出现在线上负载里
        assert!(json.get("vin").is_none());
    }

    #[test]
    fn test_response_contract_is_closed() {
        let ok: CreateRecordResponse =
            serde_json::from_str(r#"{"success":true,"id":"r-1"}"#).unwrap();
        assert!(ok.success);

        // 未知字段视为契约违约
        let bad = serde_json::from_str::<CreateRecordResponse>(
            r#"{"success":true,"unexpected":1}"#,
        );
        assert!(bad.is_err());
    }
}
