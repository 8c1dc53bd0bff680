//! 逐日順延排程（Mode C）
//!
//! 每個批次固定在指派中心上生產：當天產能足夠就整批排入，
//! 否則先排入當天可生產的部分，剩餘數量順延到下一個日曆日，
//! 直到排完或達到順延上限。

use chrono::NaiveDate;
use lotplan_core::calendar::next_day;
use lotplan_core::{
    CapacityNote, CenterRoster, PlanningLine, ScheduledLot, SchedulerConfig, WeekLabel,
};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::ledger::CapacityLedger;
use crate::{PassResult, ScheduleWarning, WarningKind};

/// 可用工時不足一個數量刻度時改用的小數位數
const FINE_QUANTITY_SCALE: u32 = 6;

/// 批次排程狀態
#[derive(Debug, Clone, Copy, PartialEq)]
enum LotState {
    /// 尚有未排數量（包含已部分生產、剩餘順延的批次），從 `date` 起排
    Pending { remaining: Decimal, date: NaiveDate },
    Done,
}

/// 逐日順延排程器
///
/// 擁有單次排程專屬的產能帳本，排程結束時連同帳本一起交出結果。
pub struct RolloverScheduler<'a> {
    roster: &'a CenterRoster,
    config: &'a SchedulerConfig,
    ledger: CapacityLedger,
    next_seq: u32,
    result: PassResult,
}

impl<'a> RolloverScheduler<'a> {
    /// 以全新的產能帳本創建排程器
    pub fn new(roster: &'a CenterRoster, config: &'a SchedulerConfig) -> Self {
        Self {
            roster,
            config,
            ledger: CapacityLedger::from_roster(roster),
            next_seq: 1,
            result: PassResult::empty(),
        }
    }

    /// 登記一個排程輸入行並依序排入其批次，回傳輸入行序號
    ///
    /// 每個批次從輸入行的需求日開始，在指派中心上逐日消耗產能。
    pub fn schedule_line(&mut self, line: PlanningLine, lots: &[Decimal]) -> usize {
        self.result.lines.push(line.clone());
        let line_idx = self.result.lines.len() - 1;

        for &quantity in lots {
            self.schedule_lot(&line, line_idx, quantity);
        }

        line_idx
    }

    fn schedule_lot(&mut self, line: &PlanningLine, line_idx: usize, quantity: Decimal) {
        let lot_index = self.result.lot_origin.len();
        self.result.lot_origin.push(line_idx);

        if quantity <= Decimal::ZERO {
            return;
        }

        let roster = self.roster;
        let profile = roster.profile(line.center);
        if profile.has_no_capacity() {
            tracing::debug!(
                "中心 {} 無產能，物料 {} 數量 {} 直接排入 {}",
                profile.code,
                line.material,
                quantity,
                line.need_by
            );
            let warning = ScheduleWarning::info(
                WarningKind::WithoutCapacity,
                line.material.clone(),
                "中心每日產能為 0，不受產能限制排入需求日".to_string(),
            )
            .at(&profile.code, line.need_by, quantity);
            self.result.add_warning(warning);
            self.emit(
                line,
                lot_index,
                quantity,
                line.need_by,
                Some(CapacityNote::WithoutCapacity),
            );
            return;
        }

        let mut state = LotState::Pending {
            remaining: quantity,
            date: line.need_by,
        };
        let mut advances = 0u32;

        while let LotState::Pending { remaining, date } = state {
            state = self.step(line, lot_index, remaining, date, &mut advances);
        }
    }

    /// 在 `date` 上嘗試生產 `pending`，回傳下一個狀態
    fn step(
        &mut self,
        line: &PlanningLine,
        lot_index: usize,
        pending: Decimal,
        date: NaiveDate,
        advances: &mut u32,
    ) -> LotState {
        let center = line.center;
        let unit_time = line.assigned_unit_time();
        let available = self.ledger.available(center, date);
        let needed = pending * unit_time;

        // 1. 當天產能足夠，整批排入
        if available >= needed {
            self.ledger.debit(center, date, needed);
            self.emit(line, lot_index, pending, date, None);
            return LotState::Done;
        }

        // 2. 排入當天可生產的部分
        let mut remaining = pending;
        let producible = self.producible_quantity(available, unit_time);
        if producible > Decimal::ZERO {
            self.ledger.debit(center, date, producible * unit_time);
            self.emit(line, lot_index, producible, date, None);
            remaining -= producible;
        }

        // 3. 達到順延上限，剩餘數量強制排在當天
        if *advances >= self.config.max_day_advances {
            self.force_emit(line, lot_index, remaining, date);
            return LotState::Done;
        }

        // 4. 順延到下一個日曆日
        match next_day(date) {
            Some(next) => {
                *advances += 1;
                LotState::Pending {
                    remaining,
                    date: next,
                }
            }
            None => {
                self.force_emit(line, lot_index, remaining, date);
                LotState::Done
            }
        }
    }

    /// 以可用工時計算可生產數量
    ///
    /// 先以數量刻度向下取；不足一個刻度時改用 `FINE_QUANTITY_SCALE`，
    /// 讓每日產能低於一個刻度的中心仍能逐日生產。
    fn producible_quantity(&self, available: Decimal, unit_time: Decimal) -> Decimal {
        if unit_time <= Decimal::ZERO || available <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let exact = available / unit_time;
        let scale = self.config.quantity_scale;

        [scale, scale.max(FINE_QUANTITY_SCALE)]
            .into_iter()
            .map(|scale| floor_within(exact, available, unit_time, scale))
            .find(|quantity| *quantity > Decimal::ZERO)
            .unwrap_or(Decimal::ZERO)
    }

    fn force_emit(
        &mut self,
        line: &PlanningLine,
        lot_index: usize,
        quantity: Decimal,
        date: NaiveDate,
    ) {
        let code = self.roster.code(line.center).to_string();
        tracing::warn!(
            "物料 {} 在中心 {} 順延 {} 天仍未排完，剩餘 {} 強制排入 {}",
            line.material,
            code,
            self.config.max_day_advances,
            quantity,
            date
        );
        let warning = ScheduleWarning::warning(
            WarningKind::CapacityExhausted,
            line.material.clone(),
            format!(
                "超過順延上限 {} 天，剩餘數量強制排入",
                self.config.max_day_advances
            ),
        )
        .at(&code, date, quantity);
        self.result.add_warning(warning);
        self.emit(
            line,
            lot_index,
            quantity,
            date,
            Some(CapacityNote::ExhaustedDayLimit),
        );
    }

    fn emit(
        &mut self,
        line: &PlanningLine,
        lot_index: usize,
        quantity: Decimal,
        date: NaiveDate,
        capacity_note: Option<CapacityNote>,
    ) {
        let unit_time = line.assigned_unit_time();
        let lot = ScheduledLot {
            seq: self.next_seq,
            lot_index,
            material: line.material.clone(),
            center: self.roster.code(line.center).to_string(),
            role: line.center,
            quantity,
            unit: line.unit.clone(),
            production_date: date,
            week: WeekLabel::from_date(date),
            hours: quantity * unit_time,
            need_by: line.need_by,
            capacity_note,
        };
        self.next_seq += 1;
        self.result.lots.push(lot);
    }

    /// 目前的產能帳本
    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    /// 結束排程，回傳結果與帳本
    pub fn finish(self) -> (PassResult, CapacityLedger) {
        (self.result, self.ledger)
    }
}

/// 向下取到 `scale` 位小數，且工時不超過可用工時
fn floor_within(exact: Decimal, available: Decimal, unit_time: Decimal, scale: u32) -> Decimal {
    let step = Decimal::new(1, scale);
    let mut quantity = exact.round_dp_with_strategy(scale, RoundingStrategy::ToZero);

    // 除法在 28 位精度時可能進位
    while quantity > Decimal::ZERO && quantity * unit_time > available {
        quantity -= step;
    }

    quantity.max(Decimal::ZERO)
}
