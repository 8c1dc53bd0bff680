//! # Lotplan
//!
//! 雙中心產能受限的批量排程：成本路由、切批、逐日順延排程與週工時重新分配。
//!
//! ```no_run
//! use lotplan::{Planner, SchedulerConfig, WeeklyPercentages};
//!
//! let planner = Planner::new(SchedulerConfig::default());
//! let plan = planner
//!     .schedule(&[], &[], &[], &[], &WeeklyPercentages::new())
//!     .unwrap_or_default();
//! println!("生產建議 {} 筆", plan.lots.len());
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use lotplan_calc::{
    validate, LotScheduleCalculator, PassResult, ScheduleWarning, ValidatedInput, WarningKind,
    WarningSeverity, WeeklyPercentages,
};
pub use lotplan_core::{
    CapacityNote, CapacityRecord, CenterRole, CustomerRecord, DemandRecord, IntegrityError,
    MaterialRecord, PlanError, Result, RoutingDecision, RoutingReason, ScheduledLot,
    SchedulerConfig, ValidationError, WeekLabel,
};
pub use lotplan_optimizer::RebalanceResult;

/// 排程結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulePlan {
    /// 最終生產建議（重新分配後的第二輪）
    pub lots: Vec<ScheduledLot>,

    /// 第一輪生產建議
    pub first_pass: Vec<ScheduledLot>,

    /// 每筆需求的路由結果
    pub routing: Vec<RoutingDecision>,

    /// 警告信息（驗證調整與最終排程）
    pub warnings: Vec<ScheduleWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl SchedulePlan {
    /// 各 (中心, 日期) 的排入工時
    pub fn hours_by_center_date(&self) -> BTreeMap<(String, NaiveDate), Decimal> {
        let mut hours = BTreeMap::new();
        for lot in &self.lots {
            *hours
                .entry((lot.center.clone(), lot.production_date))
                .or_insert(Decimal::ZERO) += lot.hours;
        }
        hours
    }

    /// 各 (週, 中心) 的排入工時
    pub fn hours_by_week_center(&self) -> BTreeMap<(WeekLabel, String), Decimal> {
        let mut hours = BTreeMap::new();
        for lot in &self.lots {
            *hours
                .entry((lot.week, lot.center.clone()))
                .or_insert(Decimal::ZERO) += lot.hours;
        }
        hours
    }

    /// 最終生產建議總數量
    pub fn total_quantity(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.quantity).sum()
    }

    /// 不受產能限制排入的生產建議
    pub fn unconstrained_lots(&self) -> impl Iterator<Item = &ScheduledLot> {
        self.lots.iter().filter(|lot| lot.is_unconstrained())
    }

    /// 是否有產能耗盡警告
    pub fn has_capacity_warnings(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.kind == WarningKind::CapacityExhausted)
    }
}

/// 排程器
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: SchedulerConfig,
}

impl Planner {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// 排程主入口
    ///
    /// 先完整驗證輸入，任何驗證或主檔錯誤都在排程開始前回傳。
    /// 驗證通過後兩輪排程不會失敗，產能耗盡只產生警告。
    pub fn schedule(
        &self,
        demands: &[DemandRecord],
        materials: &[MaterialRecord],
        customers: &[CustomerRecord],
        capacities: &[CapacityRecord],
        weekly_pct: &WeeklyPercentages,
    ) -> Result<SchedulePlan> {
        tracing::info!(
            "開始排程：需求 {} 筆，物料 {} 筆，客戶 {} 筆，中心 {} 筆，週比例 {} 筆",
            demands.len(),
            materials.len(),
            customers.len(),
            capacities.len(),
            weekly_pct.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 驗證
        let input = validate(
            demands,
            materials,
            customers,
            capacities,
            weekly_pct,
            &self.config,
        )?;
        let calculator = LotScheduleCalculator::new(&input, &self.config);

        // Step 2: 第一輪
        tracing::debug!("第一輪排程");
        let (routing, first) = calculator.first_pass()?;
        tracing::debug!("第一輪生產建議 {} 筆", first.lots.len());

        // Step 3: 重新分配與第二輪
        tracing::debug!("重新分配與第二輪排程");
        let rebalanced = lotplan_optimizer::rebalance(&calculator, &first, weekly_pct)?;

        let mut warnings = input.warnings.clone();
        warnings.extend(rebalanced.pass.warnings);

        let plan = SchedulePlan {
            lots: rebalanced.pass.lots,
            first_pass: first.lots,
            routing,
            warnings,
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        };

        tracing::info!("排程完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "生產建議 {} 筆，改變中心 {} 筆，警告 {} 筆",
            plan.lots.len(),
            rebalanced.moved_lots,
            plan.warnings.len()
        );

        Ok(plan)
    }
}

/// 以預設配置排程
pub fn schedule(
    demands: &[DemandRecord],
    materials: &[MaterialRecord],
    customers: &[CustomerRecord],
    capacities: &[CapacityRecord],
    weekly_pct: &WeeklyPercentages,
) -> Result<SchedulePlan> {
    Planner::default().schedule(demands, materials, customers, capacities, weekly_pct)
}
