// ==========================================
// 车行后台管理系统 - 领域类型定义
// ==========================================
// 依据: Dealer_Data_Dictionary_v0.3.md - 枚举词汇表
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 记录类型 (Record Kind)
// ==========================================
// 一条导入记录对应的业务实体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    Bike,        // 整车库存
    Part,        // 配件库存
    Transaction, // 财务流水
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Bike => write!(f, "BIKE"),
            RecordKind::Part => write!(f, "PART"),
            RecordKind::Transaction => write!(f, "TRANSACTION"),
        }
    }
}

impl RecordKind {
    /// 从字符串解析记录类型
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BIKE" => Some(RecordKind::Bike),
            "PART" => Some(RecordKind::Part),
            "TRANSACTION" => Some(RecordKind::Transaction),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecordKind::Bike => "BIKE",
            RecordKind::Part => "PART",
            RecordKind::Transaction => "TRANSACTION",
        }
    }
}

// ==========================================
// 整车状态 (Bike Status)
// ==========================================
// 导入层内部词汇；落库词汇见 client 层 ListingStatus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeStatus {
    #[default]
    Acquisition, // 收购入库（默认）
    Evaluation,  // 评估中
    Available,   // 可售
    Sold,        // 已售
    Hold,        // 保留
    Maintenance, // 整备维修
}

impl fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BikeStatus::Acquisition => write!(f, "ACQUISITION"),
            BikeStatus::Evaluation => write!(f, "EVALUATION"),
            BikeStatus::Available => write!(f, "AVAILABLE"),
            BikeStatus::Sold => write!(f, "SOLD"),
            BikeStatus::Hold => write!(f, "HOLD"),
            BikeStatus::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

// ==========================================
// 燃料类型 (Fuel Type)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    #[default]
    Gasoline, // 汽油（默认）
    Electric, // 纯电
    Diesel,   // 柴油
    Hybrid,   // 混动
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Gasoline => write!(f, "GASOLINE"),
            FuelType::Electric => write!(f, "ELECTRIC"),
            FuelType::Diesel => write!(f, "DIESEL"),
            FuelType::Hybrid => write!(f, "HYBRID"),
        }
    }
}

// ==========================================
// 变速类型 (Transmission)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transmission {
    #[default]
    Manual, // 手动（默认）
    Automatic, // 自动
    SemiAuto,  // 半自动/快排
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transmission::Manual => write!(f, "MANUAL"),
            Transmission::Automatic => write!(f, "AUTOMATIC"),
            Transmission::SemiAuto => write!(f, "SEMI_AUTO"),
        }
    }
}

// ==========================================
// 车况 (Condition)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    New, // 新车
    #[default]
    Used, // 二手（默认）
    Refurbished, // 翻新
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::New => write!(f, "NEW"),
            Condition::Used => write!(f, "USED"),
            Condition::Refurbished => write!(f, "REFURBISHED"),
        }
    }
}
