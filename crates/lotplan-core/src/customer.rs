//! 客戶主檔模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::center::{CenterRole, PerCenter};

/// 客戶主檔紀錄（匯入端提供）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer: String,

    /// 到主中心的距離
    pub distance_primary: Option<Decimal>,
    /// 到次中心的距離
    pub distance_secondary: Option<Decimal>,

    /// 主中心每單位距離運費
    pub rate_primary: Option<Decimal>,
    /// 次中心每單位距離運費
    pub rate_secondary: Option<Decimal>,

    /// 專屬中心代碼（指定後無視成本）
    pub exclusive_center: Option<String>,
}

impl CustomerRecord {
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            ..Default::default()
        }
    }

    /// 建構器模式：設置主中心運輸路線
    pub fn with_primary_lane(mut self, distance: Decimal, rate: Decimal) -> Self {
        self.distance_primary = Some(distance);
        self.rate_primary = Some(rate);
        self
    }

    /// 建構器模式：設置次中心運輸路線
    pub fn with_secondary_lane(mut self, distance: Decimal, rate: Decimal) -> Self {
        self.distance_secondary = Some(distance);
        self.rate_secondary = Some(rate);
        self
    }

    /// 建構器模式：設置專屬中心
    pub fn with_exclusive_center(mut self, center: impl Into<String>) -> Self {
        self.exclusive_center = Some(center.into());
        self
    }
}

/// 運輸路線
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingLane {
    pub distance: Decimal,
    pub cost_per_distance: Decimal,
}

impl ShippingLane {
    pub fn new(distance: Decimal, cost_per_distance: Decimal) -> Self {
        Self {
            distance,
            cost_per_distance,
        }
    }

    /// 運費 = 距離 × 單位距離運費
    pub fn shipping_cost(&self) -> Decimal {
        self.distance * self.cost_per_distance
    }
}

/// 已驗證的客戶主檔
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub lanes: PerCenter<ShippingLane>,
    pub exclusive: Option<CenterRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_cost() {
        let lane = ShippingLane::new(Decimal::from(120), Decimal::new(25, 2));
        assert_eq!(lane.shipping_cost(), Decimal::from(30));
    }

    #[test]
    fn test_customer_record_builder() {
        let record = CustomerRecord::new("CUST-01")
            .with_primary_lane(Decimal::from(10), Decimal::ONE)
            .with_secondary_lane(Decimal::from(40), Decimal::ONE)
            .with_exclusive_center("PL184");

        assert_eq!(record.distance_primary, Some(Decimal::from(10)));
        assert_eq!(record.rate_secondary, Some(Decimal::ONE));
        assert_eq!(record.exclusive_center.as_deref(), Some("PL184"));
    }
}
