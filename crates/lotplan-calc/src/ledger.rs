//! 產能帳本
//!
//! 以 (中心, 日期) 為鍵記錄剩餘工時。第一次查詢某格時以該中心的每日產能初始化。
//! 帳本只屬於單次排程，兩輪排程各自使用新的帳本。

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lotplan_core::{CenterRole, CenterRoster, PerCenter};
use rust_decimal::Decimal;

/// 產能帳本
#[derive(Debug, Clone)]
pub struct CapacityLedger {
    /// 各中心每日基礎產能
    base: PerCenter<Decimal>,

    /// 剩餘工時
    remaining: BTreeMap<(CenterRole, NaiveDate), Decimal>,
}

impl CapacityLedger {
    /// 創建空帳本
    pub fn new(base: PerCenter<Decimal>) -> Self {
        Self {
            base,
            remaining: BTreeMap::new(),
        }
    }

    /// 由中心名冊創建空帳本
    pub fn from_roster(roster: &CenterRoster) -> Self {
        Self::new(PerCenter::new(
            roster.daily_capacity(CenterRole::Primary),
            roster.daily_capacity(CenterRole::Secondary),
        ))
    }

    /// 查詢剩餘工時（首次查詢時初始化為基礎產能）
    pub fn remaining(&mut self, center: CenterRole, date: NaiveDate) -> Decimal {
        let base = *self.base.get(center);
        *self.remaining.entry((center, date)).or_insert(base)
    }

    /// 可用工時（剩餘工時夾到不小於 0）
    pub fn available(&mut self, center: CenterRole, date: NaiveDate) -> Decimal {
        self.remaining(center, date).max(Decimal::ZERO)
    }

    /// 扣除工時
    pub fn debit(&mut self, center: CenterRole, date: NaiveDate, hours: Decimal) {
        let base = *self.base.get(center);
        *self.remaining.entry((center, date)).or_insert(base) -= hours;
    }

    /// 已使用工時（未初始化的格視為 0）
    pub fn used(&self, center: CenterRole, date: NaiveDate) -> Decimal {
        self.remaining
            .get(&(center, date))
            .map(|rest| *self.base.get(center) - rest)
            .unwrap_or(Decimal::ZERO)
    }

    /// 基礎產能
    pub fn base_capacity(&self, center: CenterRole) -> Decimal {
        *self.base.get(center)
    }

    /// 已初始化的帳本格數
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// 依 (中心, 日期) 順序列出剩餘工時
    pub fn entries(&self) -> impl Iterator<Item = (CenterRole, NaiveDate, Decimal)> + '_ {
        self.remaining
            .iter()
            .map(|(&(center, date), &hours)| (center, date, hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> CapacityLedger {
        CapacityLedger::new(PerCenter::new(Decimal::from(8), Decimal::from(6)))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[test]
    fn test_lazy_initialization() {
        let mut ledger = ledger();
        assert!(ledger.is_empty());

        assert_eq!(ledger.remaining(CenterRole::Primary, day(3)), Decimal::from(8));
        assert_eq!(ledger.remaining(CenterRole::Secondary, day(3)), Decimal::from(6));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_debit_is_per_center_and_day() {
        let mut ledger = ledger();
        ledger.debit(CenterRole::Primary, day(3), Decimal::from(5));

        assert_eq!(ledger.remaining(CenterRole::Primary, day(3)), Decimal::from(3));
        assert_eq!(ledger.remaining(CenterRole::Primary, day(4)), Decimal::from(8));
        assert_eq!(ledger.remaining(CenterRole::Secondary, day(3)), Decimal::from(6));
        assert_eq!(ledger.used(CenterRole::Primary, day(3)), Decimal::from(5));
        assert_eq!(ledger.used(CenterRole::Secondary, day(9)), Decimal::ZERO);
    }

    #[test]
    fn test_available_is_clamped() {
        let mut ledger = ledger();
        ledger.debit(CenterRole::Secondary, day(3), Decimal::new(60001, 4));

        assert!(ledger.remaining(CenterRole::Secondary, day(3)) < Decimal::ZERO);
        assert_eq!(ledger.available(CenterRole::Secondary, day(3)), Decimal::ZERO);
    }

    #[test]
    fn test_entries_are_ordered() {
        let mut ledger = ledger();
        ledger.debit(CenterRole::Secondary, day(2), Decimal::ONE);
        ledger.debit(CenterRole::Primary, day(5), Decimal::ONE);
        ledger.debit(CenterRole::Primary, day(1), Decimal::ONE);

        let keys: Vec<_> = ledger.entries().map(|(c, d, _)| (c, d)).collect();
        assert_eq!(
            keys,
            vec![
                (CenterRole::Primary, day(1)),
                (CenterRole::Primary, day(5)),
                (CenterRole::Secondary, day(2)),
            ]
        );
    }
}
