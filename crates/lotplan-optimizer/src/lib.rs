//! # Lotplan Optimizer
//!
//! 週工時重新分配與第二輪排程

pub mod rebalance;

// Re-export 主要類型
pub use rebalance::{rebalance_week, WeeklyRebalancer};

use lotplan_calc::{LotScheduleCalculator, PassResult, WeeklyPercentages};
use lotplan_core::CenterRole;
use serde::{Deserialize, Serialize};

/// 重新分配結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceResult {
    /// 第二輪排程結果
    pub pass: PassResult,

    /// 改變中心的第一輪生產建議筆數
    pub moved_lots: usize,

    /// 第一輪每筆生產建議的新中心
    pub centers: Vec<CenterRole>,
}

impl RebalanceResult {
    /// 是否有任何生產建議改變中心
    pub fn changed(&self) -> bool {
        self.moved_lots > 0
    }
}

/// 對第一輪結果執行重新分配與第二輪排程
pub fn rebalance(
    calculator: &LotScheduleCalculator<'_>,
    first: &PassResult,
    percentages: &WeeklyPercentages,
) -> lotplan_core::Result<RebalanceResult> {
    let rebalancer = WeeklyRebalancer::new(percentages);
    let centers = rebalancer.reassign(first);
    let moved_lots = first
        .lots
        .iter()
        .zip(&centers)
        .filter(|(lot, center)| lot.role != **center)
        .count();

    tracing::debug!("重新分配：{} 筆生產建議改變中心", moved_lots);

    let lines = rebalancer.regroup(first, &centers);
    let pass = calculator.reschedule(lines)?;

    Ok(RebalanceResult {
        pass,
        moved_lots,
        centers,
    })
}
