//! # Lotplan Core
//!
//! 核心資料模型、錯誤類型與排程配置

pub mod calendar;
pub mod center;
pub mod config;
pub mod customer;
pub mod demand;
pub mod material;
pub mod plan;

// Re-export 主要類型
pub use calendar::WeekLabel;
pub use center::{CapacityRecord, CenterProfile, CenterRole, CenterRoster, PerCenter};
pub use config::SchedulerConfig;
pub use customer::{Customer, CustomerRecord, ShippingLane};
pub use demand::{DemandLine, DemandRecord};
pub use material::{Material, MaterialKey, MaterialRecord};
pub use plan::{CapacityNote, PlanningLine, RoutingDecision, RoutingReason, ScheduledLot};

use std::fmt;

/// 輸入紀錄種類（用於錯誤訊息定位）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Demand,
    Material,
    Customer,
    Capacity,
    Config,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Demand => "需求",
            RecordKind::Material => "物料主檔",
            RecordKind::Customer => "客戶主檔",
            RecordKind::Capacity => "產能主檔",
            RecordKind::Config => "排程配置",
        };
        f.write_str(name)
    }
}

/// 資料驗證錯誤（欄位缺漏或數值不合法）
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{record} [{key}] 缺少必要欄位: {field}")]
    MissingField {
        record: RecordKind,
        key: String,
        field: &'static str,
    },

    #[error("{record} [{key}] 欄位 {field} 數值不合法: {reason}")]
    InvalidValue {
        record: RecordKind,
        key: String,
        field: &'static str,
        reason: String,
    },

    #[error("產能主檔必須恰好包含兩個生產中心，實際為 {0} 個")]
    CenterCount(usize),

    #[error("週 {week} 的比例 {pct} 超出 0-100 範圍")]
    PercentageOutOfRange { week: String, pct: u8 },

    #[error("最大批量必須大於 0，實際為 {0}")]
    NonPositiveMaxLot(rust_decimal::Decimal),
}

/// 主檔完整性錯誤（需求引用了不存在的主檔資料）
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntegrityError {
    #[error("需求列 {row} 引用了不存在的物料: {material} ({unit})")]
    UnknownMaterial {
        row: u64,
        material: String,
        unit: String,
    },

    #[error("需求列 {row} 引用了不存在的客戶: {customer}")]
    UnknownCustomer { row: u64, customer: String },

    #[error("客戶 {customer} 指定的專屬中心不存在: {center}")]
    UnknownExclusiveCenter { customer: String, center: String },
}

/// 排程錯誤
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("資料驗證失敗: {0}")]
    Validation(#[from] ValidationError),

    #[error("主檔完整性錯誤: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("配置解析錯誤: {0}")]
    Config(String),
}

impl PlanError {
    /// 是否為資料驗證錯誤
    pub fn is_validation(&self) -> bool {
        matches!(self, PlanError::Validation(_))
    }

    /// 是否為主檔完整性錯誤
    pub fn is_integrity(&self) -> bool {
        matches!(self, PlanError::Integrity(_))
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
