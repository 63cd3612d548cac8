// ==========================================
// 车行后台管理系统 - 远端服务客户端层
// ==========================================
// 职责: 建档与 VIN 查询的 HTTP 适配；契约在边界上校验
// ==========================================

pub mod error;
pub mod record_client;
pub mod vin_client;

pub use error::{ClientError, ClientResult};
pub use record_client::{
    map_bike_status, CreateRecordRequest, CreateRecordResponse, HttpRecordClient, ListingStatus,
};
pub use vin_client::{HttpVinClient, VinSpec};
