//! 需求聚合
//!
//! 依 (物料, 單位, 中心, 需求日, 週) 合併數量，批量上下限與單位工時取第一筆。
//! 輸出順序即為鍵的排序，排程時依此順序消耗產能。

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lotplan_core::{CenterRole, DemandLine, PerCenter, PlanningLine, RoutingDecision, WeekLabel};
use rust_decimal::Decimal;

/// 聚合鍵
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub material: String,
    pub unit: String,
    pub center: CenterRole,
    pub need_by: NaiveDate,
    pub week: WeekLabel,
}

/// 聚合器
#[derive(Debug, Default)]
pub struct LineGrouper {
    groups: BTreeMap<GroupKey, PlanningLine>,
}

impl LineGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入一筆數量
    pub fn add(
        &mut self,
        key: GroupKey,
        quantity: Decimal,
        min_lot: Decimal,
        max_lot: Decimal,
        unit_time: PerCenter<Decimal>,
    ) {
        self.groups
            .entry(key)
            .and_modify(|line| line.quantity += quantity)
            .or_insert_with_key(|key| PlanningLine {
                material: key.material.clone(),
                unit: key.unit.clone(),
                center: key.center,
                need_by: key.need_by,
                week: key.week,
                quantity,
                min_lot,
                max_lot,
                unit_time,
            });
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 依鍵排序輸出
    pub fn into_lines(self) -> Vec<PlanningLine> {
        self.groups.into_values().collect()
    }
}

/// 依路由結果聚合需求行
///
/// `decisions` 與 `lines` 一一對應（依列號配對）。
pub fn group_routed(lines: &[DemandLine], decisions: &[RoutingDecision]) -> Vec<PlanningLine> {
    let mut grouper = LineGrouper::new();

    for (line, decision) in lines.iter().zip(decisions) {
        debug_assert_eq!(line.row, decision.row);
        grouper.add(
            GroupKey {
                material: line.material.clone(),
                unit: line.unit.clone(),
                center: decision.center,
                need_by: line.need_by,
                week: line.week(),
            },
            line.quantity,
            line.min_lot,
            line.max_lot,
            line.unit_time,
        );
    }

    tracing::debug!("需求 {} 筆聚合為 {} 行", lines.len(), grouper.len());
    grouper.into_lines()
}
