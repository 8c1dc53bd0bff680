//! 物料主檔模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::center::{CenterRole, PerCenter};

/// 物料主檔鍵（物料 + 單位）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialKey {
    pub material: String,
    pub unit: String,
}

impl MaterialKey {
    pub fn new(material: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            unit: unit.into(),
        }
    }
}

/// 物料主檔紀錄（匯入端提供，數值欄位可能缺漏）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material: String,
    pub unit: String,

    /// 主中心單位生產成本
    pub unit_cost_primary: Option<Decimal>,
    /// 次中心單位生產成本
    pub unit_cost_secondary: Option<Decimal>,

    /// 主中心單位工時（小時）
    pub unit_time_primary: Option<Decimal>,
    /// 次中心單位工時（小時）
    pub unit_time_secondary: Option<Decimal>,

    /// 最小批量
    pub min_lot: Option<Decimal>,
    /// 最大批量
    pub max_lot: Option<Decimal>,
}

impl MaterialRecord {
    /// 創建完整的物料主檔紀錄
    pub fn new(material: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            unit: unit.into(),
            ..Default::default()
        }
    }

    /// 建構器模式：設置單位成本
    pub fn with_unit_cost(mut self, primary: Decimal, secondary: Decimal) -> Self {
        self.unit_cost_primary = Some(primary);
        self.unit_cost_secondary = Some(secondary);
        self
    }

    /// 建構器模式：設置單位工時
    pub fn with_unit_time(mut self, primary: Decimal, secondary: Decimal) -> Self {
        self.unit_time_primary = Some(primary);
        self.unit_time_secondary = Some(secondary);
        self
    }

    /// 建構器模式：設置批量上下限
    pub fn with_lot_bounds(mut self, min_lot: Decimal, max_lot: Decimal) -> Self {
        self.min_lot = Some(min_lot);
        self.max_lot = Some(max_lot);
        self
    }

    pub fn key(&self) -> MaterialKey {
        MaterialKey::new(&self.material, &self.unit)
    }
}

/// 已驗證的物料主檔
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub key: MaterialKey,

    /// 各中心單位生產成本
    pub unit_cost: PerCenter<Decimal>,

    /// 各中心單位工時
    pub unit_time: PerCenter<Decimal>,

    /// 最小批量（已夾到 [0, max_lot]）
    pub min_lot: Decimal,

    /// 最大批量（≥ 1）
    pub max_lot: Decimal,
}

impl Material {
    /// 指定中心的單位工時
    pub fn unit_time_at(&self, role: CenterRole) -> Decimal {
        *self.unit_time.get(role)
    }

    /// 指定中心的單位成本
    pub fn unit_cost_at(&self, role: CenterRole) -> Decimal {
        *self.unit_cost.get(role)
    }
}
