//! 排程結果模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::WeekLabel;
use crate::center::{CenterRole, PerCenter};

/// 中心選擇原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingReason {
    /// 客戶指定專屬中心
    Exclusive,
    /// 到廠總成本較低
    LowerCost,
    /// 成本相同，由週比例亂數決定
    TieBreak,
}

/// 成本路由決策（附在需求行上，不獨立保存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// 需求列號
    pub row: u64,

    /// 選定的中心
    pub center: CenterRole,

    /// 選定的中心代碼
    pub center_code: String,

    /// 選擇原因
    pub reason: RoutingReason,

    /// 各中心到廠成本（專屬中心時不計算）
    pub landed_cost: Option<PerCenter<Decimal>>,
}

/// 排程輸入行（聚合後、切批前）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningLine {
    pub material: String,
    pub unit: String,

    /// 指派的中心
    pub center: CenterRole,

    /// 原始需求日期（排程從此日開始）
    pub need_by: NaiveDate,

    /// 分組用的週標籤
    pub week: WeekLabel,

    /// 數量
    pub quantity: Decimal,

    /// 最小批量
    pub min_lot: Decimal,

    /// 最大批量
    pub max_lot: Decimal,

    /// 各中心單位工時
    pub unit_time: PerCenter<Decimal>,
}

impl PlanningLine {
    /// 指派中心的單位工時
    pub fn assigned_unit_time(&self) -> Decimal {
        *self.unit_time.get(self.center)
    }
}

/// 產能備註
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityNote {
    /// 中心每日產能為 0，直接排在需求日
    WithoutCapacity,
    /// 超過順延上限，剩餘數量強制排在停滯日
    ExhaustedDayLimit,
}

/// 生產建議（排程的最小輸出單位，建立後不再變動）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledLot {
    /// 建議序號（單次排程內從 1 開始遞增）
    pub seq: u32,

    /// 所屬批次序號（單次排程內從 0 開始）
    pub lot_index: usize,

    pub material: String,

    /// 中心代碼
    pub center: String,

    /// 中心角色
    pub role: CenterRole,

    /// 生產數量
    pub quantity: Decimal,

    pub unit: String,

    /// 生產日期
    pub production_date: NaiveDate,

    /// 生產日期所屬的 ISO 週
    pub week: WeekLabel,

    /// 工時 = 數量 × 該中心單位工時
    pub hours: Decimal,

    /// 原始需求日期
    pub need_by: NaiveDate,

    /// 產能備註（正常排入時為 None）
    pub capacity_note: Option<CapacityNote>,
}

impl ScheduledLot {
    /// 是否為不受產能限制的強制排程
    pub fn is_unconstrained(&self) -> bool {
        self.capacity_note.is_some()
    }
}
