//! 成本路由：為每筆需求選擇到廠總成本較低的中心

use lotplan_core::{
    CenterRole, CenterRoster, Customer, DemandLine, Material, PerCenter, RoutingDecision,
    RoutingReason, ShippingLane,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// 成本路由器
pub struct CostRouter<'a> {
    roster: &'a CenterRoster,
}

impl<'a> CostRouter<'a> {
    pub fn new(roster: &'a CenterRoster) -> Self {
        Self { roster }
    }

    /// 為需求行選擇中心
    ///
    /// `tie_break_pct` 為該需求週的主中心比例，只在兩中心成本完全相同時使用。
    pub fn route(
        &self,
        line: &DemandLine,
        material: &Material,
        customer: &Customer,
        tie_break_pct: u8,
    ) -> RoutingDecision {
        if let Some(center) = customer.exclusive {
            return self.decision(line.row, center, RoutingReason::Exclusive, None);
        }

        let cost = PerCenter::new(
            landed_cost(
                &customer.lanes.primary,
                line.quantity,
                material.unit_cost_at(CenterRole::Primary),
            ),
            landed_cost(
                &customer.lanes.secondary,
                line.quantity,
                material.unit_cost_at(CenterRole::Secondary),
            ),
        );

        let (center, reason) = if cost.primary < cost.secondary {
            (CenterRole::Primary, RoutingReason::LowerCost)
        } else if cost.secondary < cost.primary {
            (CenterRole::Secondary, RoutingReason::LowerCost)
        } else {
            (tie_break(line.row, tie_break_pct), RoutingReason::TieBreak)
        };

        tracing::trace!(
            "需求列 {} 成本 主={} 次={} → {:?} ({:?})",
            line.row,
            cost.primary,
            cost.secondary,
            center,
            reason
        );

        self.decision(line.row, center, reason, Some(cost))
    }

    fn decision(
        &self,
        row: u64,
        center: CenterRole,
        reason: RoutingReason,
        landed_cost: Option<PerCenter<Decimal>>,
    ) -> RoutingDecision {
        RoutingDecision {
            row,
            center,
            center_code: self.roster.code(center).to_string(),
            reason,
            landed_cost,
        }
    }
}

/// 到廠總成本 = 距離 × 單位距離運費 + 數量 × 單位生產成本
pub fn landed_cost(lane: &ShippingLane, quantity: Decimal, unit_cost: Decimal) -> Decimal {
    lane.shipping_cost() + quantity * unit_cost
}

/// 以列號為種子的可重現亂數，範圍 [0, 100)
pub fn tie_break_draw(row: u64) -> f64 {
    StdRng::seed_from_u64(row).gen_range(0.0..100.0)
}

/// 成本平手時的中心選擇：亂數小於比例選主中心，否則選次中心
pub fn tie_break(row: u64, pct: u8) -> CenterRole {
    if tie_break_draw(row) < f64::from(pct) {
        CenterRole::Primary
    } else {
        CenterRole::Secondary
    }
}
