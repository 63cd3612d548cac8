// ==========================================
// 车行后台管理系统 - VIN 补全客户端
// ==========================================
// 依据: Storage_API_Contract_v0.1.md - GET /vin/{vin}
// 职责: 按 VIN 查询车型档案，供补全服务合并空字段
// ==========================================

use crate::client::error::ClientError;
use crate::enrichment::VinLookup;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ==========================================
// VinSpec - 车型档案（封闭结构）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VinSpec {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub transmission: Option<String>,
}

// ==========================================
// HttpVinClient - HTTP VIN 查询客户端
// ==========================================
pub struct HttpVinClient {
    client: Client,
    lookup_url: String,
}

impl HttpVinClient {
    pub fn new(lookup_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            lookup_url: lookup_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl VinLookup for HttpVinClient {
    async fn lookup(&self, vin: &str) -> Result<VinSpec, ClientError> {
        let url = format!("{}/{}", self.lookup_url, vin);
        debug!(vin = %vin, "VIN 补全查询");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::BadStatus(status.as_u16()));
        }

        response
            .json::<VinSpec>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vin_spec_contract_is_closed() {
        let spec: VinSpec =
            serde_json::from_str(r#"{"brand":"Honda","model":"CBR600RR","year":2023}"#).unwrap();
        assert_eq!(spec.brand.as_deref(), Some("Honda"));

        let bad = serde_json::from_str::<VinSpec>(r#"{"brand":"Honda","extra":true}"#);
        assert!(bad.is_err());
    }
}
