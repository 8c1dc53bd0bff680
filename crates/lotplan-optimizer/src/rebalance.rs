//! 週工時重新分配
//!
//! 依每週主中心工時比例，把第一輪的生產建議重新指派中心，
//! 再以全新的產能帳本排第二輪。

use std::collections::BTreeMap;

use lotplan_calc::grouping::{GroupKey, LineGrouper};
use lotplan_calc::{PassResult, WeeklyPercentages};
use lotplan_core::{CenterRole, PlanningLine, WeekLabel};
use rust_decimal::Decimal;

/// 週工時重新分配器
pub struct WeeklyRebalancer<'a> {
    percentages: &'a WeeklyPercentages,
}

impl<'a> WeeklyRebalancer<'a> {
    pub fn new(percentages: &'a WeeklyPercentages) -> Self {
        Self { percentages }
    }

    /// 為第一輪每筆生產建議決定新中心（順序與 `pass.lots` 相同）
    ///
    /// 未設定比例的週保留第一輪的中心。
    pub fn reassign(&self, pass: &PassResult) -> Vec<CenterRole> {
        let mut centers: Vec<CenterRole> = pass.lots.iter().map(|lot| lot.role).collect();

        let mut by_week: BTreeMap<WeekLabel, Vec<usize>> = BTreeMap::new();
        for (idx, lot) in pass.lots.iter().enumerate() {
            by_week.entry(lot.week).or_default().push(idx);
        }

        for (week, indices) in by_week {
            let Some(&pct) = self.percentages.get(&week) else {
                tracing::debug!("週 {} 未設定比例，保留第一輪中心", week);
                continue;
            };

            let hours: Vec<Decimal> = indices.iter().map(|&i| pass.lots[i].hours).collect();
            let assigned = rebalance_week(&hours, pct);

            tracing::debug!(
                "週 {} 比例 {}%：{} 筆中 {} 筆指派主中心",
                week,
                pct,
                indices.len(),
                assigned.iter().filter(|&&c| c == CenterRole::Primary).count()
            );

            for (idx, center) in indices.into_iter().zip(assigned) {
                centers[idx] = center;
            }
        }

        centers
    }

    /// 依新中心重新聚合第二輪輸入行
    ///
    /// 鍵為 (物料, 單位, 新中心, 需求日, 第一輪生產週)。數量已是切批後的結果，
    /// 因此第二輪不再套用最小批量。
    pub fn regroup(&self, pass: &PassResult, centers: &[CenterRole]) -> Vec<PlanningLine> {
        let mut grouper = LineGrouper::new();

        for (lot, &center) in pass.lots.iter().zip(centers) {
            let Some(line) = pass.line_of(lot) else {
                tracing::debug!("生產建議 {} 找不到輸入行，略過", lot.seq);
                continue;
            };

            grouper.add(
                GroupKey {
                    material: lot.material.clone(),
                    unit: lot.unit.clone(),
                    center,
                    need_by: lot.need_by,
                    week: lot.week,
                },
                lot.quantity,
                Decimal::ZERO,
                line.max_lot,
                line.unit_time,
            );
        }

        grouper.into_lines()
    }
}

/// 單週重新分配
///
/// 依工時由大到小排序，主中心累計工時未達 `總工時 × pct / 100` 前持續指派主中心，
/// 其餘指派次中心。0% 全數給次中心，100% 全數給主中心。
/// 回傳值與輸入順序一一對應。
pub fn rebalance_week(hours: &[Decimal], pct: u8) -> Vec<CenterRole> {
    if pct == 0 {
        return vec![CenterRole::Secondary; hours.len()];
    }
    if pct >= 100 {
        return vec![CenterRole::Primary; hours.len()];
    }

    let total: Decimal = hours.iter().sum();
    let target = total * Decimal::from(pct) / Decimal::ONE_HUNDRED;

    let mut order: Vec<usize> = (0..hours.len()).collect();
    // 穩定排序，同工時保持原順序
    order.sort_by(|&a, &b| hours[b].cmp(&hours[a]));

    let mut centers = vec![CenterRole::Secondary; hours.len()];
    let mut accumulated = Decimal::ZERO;
    for idx in order {
        if accumulated >= target {
            break;
        }
        centers[idx] = CenterRole::Primary;
        accumulated += hours[idx];
    }

    centers
}
