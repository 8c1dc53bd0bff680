//! 需求模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::WeekLabel;
use crate::center::PerCenter;
use crate::material::MaterialKey;

/// 需求紀錄（匯入端提供的原始列，尚未驗證）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandRecord {
    /// 穩定列號（平手決策的亂數種子）
    pub row: u64,

    /// 物料ID
    pub material: String,

    /// 單位
    pub unit: String,

    /// 需求數量
    pub quantity: Option<Decimal>,

    /// 需求日期
    pub need_by: Option<NaiveDate>,

    /// 客戶
    pub customer: String,
}

impl DemandRecord {
    /// 創建新的需求紀錄
    pub fn new(
        row: u64,
        material: impl Into<String>,
        unit: impl Into<String>,
        quantity: Decimal,
        need_by: NaiveDate,
        customer: impl Into<String>,
    ) -> Self {
        Self {
            row,
            material: material.into(),
            unit: unit.into(),
            quantity: Some(quantity),
            need_by: Some(need_by),
            customer: customer.into(),
        }
    }

    /// 物料主檔鍵
    pub fn material_key(&self) -> MaterialKey {
        MaterialKey::new(&self.material, &self.unit)
    }

    /// 錯誤訊息用的識別字串
    pub fn display_key(&self) -> String {
        format!("row {} {}/{}", self.row, self.material, self.unit)
    }
}

/// 需求行（已驗證並關聯主檔，交給排程器後不再變動）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandLine {
    /// 穩定列號
    pub row: u64,

    /// 物料ID
    pub material: String,

    /// 單位
    pub unit: String,

    /// 需求數量（非負）
    pub quantity: Decimal,

    /// 需求日期
    pub need_by: NaiveDate,

    /// 客戶
    pub customer: String,

    /// 最小批量
    pub min_lot: Decimal,

    /// 最大批量（≥ 1）
    pub max_lot: Decimal,

    /// 各中心單位工時
    pub unit_time: PerCenter<Decimal>,
}

impl DemandLine {
    /// 需求日期所屬的 ISO 週
    pub fn week(&self) -> WeekLabel {
        WeekLabel::from_date(self.need_by)
    }

    /// 物料主檔鍵
    pub fn material_key(&self) -> MaterialKey {
        MaterialKey::new(&self.material, &self.unit)
    }
}
