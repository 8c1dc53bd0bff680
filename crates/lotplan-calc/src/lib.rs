//! # Lotplan Calculation Engine
//!
//! 成本路由、切批、產能帳本與逐日順延排程

pub mod calculator;
pub mod grouping;
pub mod ledger;
pub mod lot_sizing;
pub mod rollover;
pub mod routing;
pub mod validation;

// Re-export 主要類型
pub use calculator::LotScheduleCalculator;
pub use ledger::CapacityLedger;
pub use lot_sizing::LotSplitter;
pub use rollover::RolloverScheduler;
pub use routing::CostRouter;
pub use validation::{validate, ValidatedInput, WeeklyPercentages};

use chrono::NaiveDate;
use lotplan_core::{PlanningLine, ScheduledLot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單次排程（第一輪或重新分配後的第二輪）結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassResult {
    /// 排程輸入行
    pub lines: Vec<PlanningLine>,

    /// 批次序號 → 輸入行序號
    pub lot_origin: Vec<usize>,

    /// 生產建議
    pub lots: Vec<ScheduledLot>,

    /// 警告信息
    pub warnings: Vec<ScheduleWarning>,
}

impl PassResult {
    /// 創建空的排程結果
    pub fn empty() -> Self {
        Self::default()
    }

    /// 生產建議對應的輸入行
    pub fn line_of(&self, lot: &ScheduledLot) -> Option<&PlanningLine> {
        self.lot_origin
            .get(lot.lot_index)
            .and_then(|&idx| self.lines.get(idx))
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ScheduleWarning) {
        self.warnings.push(warning);
    }
}

/// 排程警告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleWarning {
    pub kind: WarningKind,
    pub material: String,
    pub center: Option<String>,
    pub date: Option<NaiveDate>,
    pub quantity: Option<Decimal>,
    pub message: String,
    pub severity: WarningSeverity,
}

impl ScheduleWarning {
    pub fn new(
        kind: WarningKind,
        material: String,
        message: String,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            kind,
            material,
            center: None,
            date: None,
            quantity: None,
            message,
            severity,
        }
    }

    pub fn info(kind: WarningKind, material: String, message: String) -> Self {
        Self::new(kind, material, message, WarningSeverity::Info)
    }

    pub fn warning(kind: WarningKind, material: String, message: String) -> Self {
        Self::new(kind, material, message, WarningSeverity::Warning)
    }

    /// 建構器模式：附上中心、日期與數量
    pub fn at(mut self, center: &str, date: NaiveDate, quantity: Decimal) -> Self {
        self.center = Some(center.to_string());
        self.date = Some(date);
        self.quantity = Some(quantity);
        self
    }
}

/// 警告類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// 超過順延上限仍未排完
    CapacityExhausted,
    /// 中心無產能，不受限排入需求日
    WithoutCapacity,
    /// 批量上下限被夾正
    LotBoundsClamped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
