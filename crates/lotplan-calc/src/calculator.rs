//! 排程主計算器

use lotplan_core::{PlanningLine, RoutingDecision, SchedulerConfig};

use crate::grouping::group_routed;
use crate::lot_sizing::LotSplitter;
use crate::rollover::RolloverScheduler;
use crate::routing::CostRouter;
use crate::validation::ValidatedInput;
use crate::PassResult;

/// 排程計算器
pub struct LotScheduleCalculator<'a> {
    input: &'a ValidatedInput,
    config: &'a SchedulerConfig,
}

impl<'a> LotScheduleCalculator<'a> {
    /// 創建新的計算器（輸入必須已通過驗證）
    pub fn new(input: &'a ValidatedInput, config: &'a SchedulerConfig) -> Self {
        Self { input, config }
    }

    /// 第一輪：成本路由 → 聚合 → 切批 → 逐日順延排程
    pub fn first_pass(&self) -> lotplan_core::Result<(Vec<RoutingDecision>, PassResult)> {
        tracing::debug!("Step 1: 成本路由");
        let decisions = self.route_all();

        tracing::debug!("Step 2: 需求聚合");
        let lines = group_routed(&self.input.lines, &decisions);

        tracing::debug!("Step 3: 切批與逐日順延排程");
        let pass = self.run_pass(lines)?;

        Ok((decisions, pass))
    }

    /// 為所有需求行選擇中心
    ///
    /// 驗證保證主檔存在；找不到主檔的行不會出現在驗證後的輸入中。
    pub fn route_all(&self) -> Vec<RoutingDecision> {
        let router = CostRouter::new(&self.input.roster);

        self.input
            .lines
            .iter()
            .filter_map(|line| {
                let material = self.input.materials.get(&line.material_key())?;
                let customer = self.input.customers.get(&line.customer)?;
                let pct = self.input.tie_break_pct(&line.week(), self.config);
                Some(router.route(line, material, customer, pct))
            })
            .collect()
    }

    /// 以全新的產能帳本排程一組輸入行
    ///
    /// 每行依最小/最大批量切批，批次依序排入，彼此只透過帳本互相影響。
    pub fn run_pass(&self, lines: Vec<PlanningLine>) -> lotplan_core::Result<PassResult> {
        self.schedule_lines(lines, false)
    }

    /// 以全新的產能帳本重新排程已排過的數量
    ///
    /// 與 `run_pass` 相同，但切批時保留輸入數量原有的小數位數，
    /// 第一輪以較細刻度排出的數量不會被四捨五入。
    pub fn reschedule(&self, lines: Vec<PlanningLine>) -> lotplan_core::Result<PassResult> {
        self.schedule_lines(lines, true)
    }

    fn schedule_lines(
        &self,
        lines: Vec<PlanningLine>,
        keep_scale: bool,
    ) -> lotplan_core::Result<PassResult> {
        let mut scheduler = RolloverScheduler::new(&self.input.roster, self.config);

        for line in lines {
            let scale = if keep_scale {
                self.config.quantity_scale.max(line.quantity.scale())
            } else {
                self.config.quantity_scale
            };
            let lots = LotSplitter::split(line.quantity, line.min_lot, line.max_lot, scale)?;

            tracing::trace!(
                "物料 {} {:?} {} 切為 {} 批",
                line.material,
                line.center,
                line.need_by,
                lots.len()
            );

            scheduler.schedule_line(line, &lots);
        }

        let (pass, ledger) = scheduler.finish();
        tracing::debug!(
            "排程完成：輸入 {} 行，生產建議 {} 筆，帳本 {} 格",
            pass.lines.len(),
            pass.lots.len(),
            ledger.len()
        );

        Ok(pass)
    }

    /// 驗證後的輸入
    pub fn input(&self) -> &ValidatedInput {
        self.input
    }

    pub fn config(&self) -> &SchedulerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, WeeklyPercentages};
    use chrono::NaiveDate;
    use lotplan_core::{
        CapacityRecord, CenterRole, CustomerRecord, DemandRecord, MaterialRecord, RoutingReason,
    };
    use rust_decimal::Decimal;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn input(demands: Vec<DemandRecord>) -> ValidatedInput {
        let materials = vec![
            MaterialRecord::new("MAT-A", "UN")
                .with_unit_cost(Decimal::ONE, Decimal::ONE)
                .with_unit_time(Decimal::ONE, Decimal::TWO)
                .with_lot_bounds(Decimal::ZERO, Decimal::from(10)),
            MaterialRecord::new("MAT-B", "UN")
                .with_unit_cost(Decimal::ONE, Decimal::ONE)
                .with_unit_time(Decimal::ONE, Decimal::ONE)
                .with_lot_bounds(Decimal::from(5), Decimal::from(100)),
        ];
        let customers = vec![
            // 靠近主中心
            CustomerRecord::new("NEAR-P")
                .with_primary_lane(Decimal::from(10), Decimal::ONE)
                .with_secondary_lane(Decimal::from(90), Decimal::ONE),
            // 靠近次中心
            CustomerRecord::new("NEAR-S")
                .with_primary_lane(Decimal::from(90), Decimal::ONE)
                .with_secondary_lane(Decimal::from(10), Decimal::ONE),
        ];
        let capacities = vec![
            CapacityRecord::new("PL833", Decimal::from(8)),
            CapacityRecord::new("PL184", Decimal::from(8)),
        ];

        validate(
            &demands,
            &materials,
            &customers,
            &capacities,
            &WeeklyPercentages::new(),
            &SchedulerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_first_pass_routes_and_splits() {
        let input = input(vec![
            DemandRecord::new(1, "MAT-A", "UN", Decimal::from(25), date(17), "NEAR-P"),
            DemandRecord::new(2, "MAT-B", "UN", Decimal::from(2), date(17), "NEAR-S"),
        ]);
        let config = SchedulerConfig::default();
        let calculator = LotScheduleCalculator::new(&input, &config);

        let (decisions, pass) = calculator.first_pass().unwrap();

        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].center, CenterRole::Primary);
        assert_eq!(decisions[0].reason, RoutingReason::LowerCost);
        assert_eq!(decisions[1].center, CenterRole::Secondary);

        // MAT-A: 25 → 批次 [10, 10, 5]，主中心每日 8 小時、單位工時 1
        let mat_a: Vec<_> = pass
            .lots
            .iter()
            .filter(|l| l.material == "MAT-A")
            .map(|l| (l.lot_index, l.quantity, l.production_date))
            .collect();
        assert_eq!(
            mat_a,
            vec![
                (0, Decimal::from(8), date(17)),
                (0, Decimal::from(2), date(18)),
                (1, Decimal::from(6), date(18)),
                (1, Decimal::from(4), date(19)),
                (2, Decimal::from(4), date(19)),
                (2, Decimal::from(1), date(20)),
            ]
        );

        // MAT-B: 2 低於最小批量 5 → 排 5
        let mat_b: Decimal = pass
            .lots
            .iter()
            .filter(|l| l.material == "MAT-B")
            .map(|l| l.quantity)
            .sum();
        assert_eq!(mat_b, Decimal::from(5));

        let seqs: Vec<u32> = pass.lots.iter().map(|l| l.seq).collect();
        assert_eq!(seqs, (1..=pass.lots.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_run_pass_uses_fresh_ledger() {
        let input = input(vec![DemandRecord::new(
            1,
            "MAT-A",
            "UN",
            Decimal::from(8),
            date(17),
            "NEAR-P",
        )]);
        let config = SchedulerConfig::default();
        let calculator = LotScheduleCalculator::new(&input, &config);

        let (_, first) = calculator.first_pass().unwrap();
        let (_, second) = calculator.first_pass().unwrap();

        assert_eq!(first.lots, second.lots);
        assert_eq!(first.lots.len(), 1);
        assert_eq!(first.lots[0].production_date, date(17));
    }

    #[test]
    fn test_reschedule_keeps_fine_quantities() {
        let input = input(Vec::new());
        let config = SchedulerConfig::default();
        let calculator = LotScheduleCalculator::new(&input, &config);

        let need_by = date(17);
        let line = PlanningLine {
            material: "MAT-A".to_string(),
            unit: "UN".to_string(),
            center: CenterRole::Primary,
            need_by,
            week: lotplan_core::WeekLabel::from_date(need_by),
            quantity: Decimal::new(56_000, 6),
            min_lot: Decimal::ZERO,
            max_lot: Decimal::from(10),
            unit_time: lotplan_core::PerCenter::new(Decimal::ONE, Decimal::ONE),
        };

        let kept = calculator.reschedule(vec![line.clone()]).unwrap();
        let kept_total: Decimal = kept.lots.iter().map(|l| l.quantity).sum();
        assert_eq!(kept_total, Decimal::new(56, 3));

        // 第一輪規則會四捨五入到兩位小數
        let rounded = calculator.run_pass(vec![line]).unwrap();
        let rounded_total: Decimal = rounded.lots.iter().map(|l| l.quantity).sum();
        assert_eq!(rounded_total, Decimal::new(6, 2));
    }

    #[test]
    fn test_line_of_maps_lot_to_line() {
        let input = input(vec![DemandRecord::new(
            1,
            "MAT-A",
            "UN",
            Decimal::from(15),
            date(17),
            "NEAR-P",
        )]);
        let config = SchedulerConfig::default();
        let calculator = LotScheduleCalculator::new(&input, &config);

        let (_, pass) = calculator.first_pass().unwrap();
        for lot in &pass.lots {
            let line = pass.line_of(lot).unwrap();
            assert_eq!(line.material, lot.material);
            assert_eq!(line.need_by, lot.need_by);
        }
    }
}
