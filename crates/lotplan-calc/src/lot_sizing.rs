//! 切批規則實現

use lotplan_core::ValidationError;
use rust_decimal::{Decimal, RoundingStrategy};

/// 切批計算器
pub struct LotSplitter;

impl LotSplitter {
    /// 將需求數量切成不超過最大批量的批次
    ///
    /// 先套用最小批量下限，並把總量四捨五入到 `scale` 位小數，
    /// 之後每批取 `min(剩餘, 最大批量)`，最後一批吸收餘數。
    /// 因此所有批次都剛好落在 `scale` 位小數上，加總等於四捨五入後的
    /// `max(數量, 最小批量)`，與未四捨五入的值最多相差半個刻度。
    ///
    /// 最大批量 ≤ 0 視為非法輸入（不會被當成無限大批量）。
    pub fn split(
        quantity: Decimal,
        min_lot: Decimal,
        max_lot: Decimal,
        scale: u32,
    ) -> Result<Vec<Decimal>, ValidationError> {
        if max_lot <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveMaxLot(max_lot));
        }

        // 最大批量向下取到刻度，避免批次出現多餘小數
        let max_lot_scaled = max_lot.round_dp_with_strategy(scale, RoundingStrategy::ToZero);
        if max_lot_scaled <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveMaxLot(max_lot));
        }

        let total = Self::normalize(quantity, min_lot, scale);

        let mut lots = Vec::new();
        let mut rest = total;
        while rest > Decimal::ZERO {
            let lot = rest.min(max_lot_scaled);
            lots.push(lot);
            rest -= lot;
        }

        Ok(lots)
    }

    /// 套用最小批量並四捨五入到刻度
    pub fn normalize(quantity: Decimal, min_lot: Decimal, scale: u32) -> Decimal {
        quantity
            .max(min_lot)
            .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
    }
}
