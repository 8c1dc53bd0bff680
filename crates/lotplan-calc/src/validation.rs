//! 排程前的資料驗證
//!
//! 所有欄位缺漏、數值不合法與主檔引用錯誤都在這一步一次檢出，
//! 驗證通過後排程流程不會再失敗（只會產生產能警告）。

use std::collections::{BTreeMap, HashMap};

use lotplan_core::{
    CapacityRecord, CenterRole, CenterRoster, Customer, CustomerRecord, DemandLine, DemandRecord,
    IntegrityError, Material, MaterialKey, MaterialRecord, PerCenter, RecordKind,
    SchedulerConfig, ShippingLane, ValidationError, WeekLabel,
};
use rust_decimal::Decimal;

use crate::{ScheduleWarning, WarningKind};

/// 週標籤 → 主中心工時比例（0-100）
pub type WeeklyPercentages = BTreeMap<WeekLabel, u8>;

/// 驗證後的排程輸入
#[derive(Debug, Clone)]
pub struct ValidatedInput {
    pub roster: CenterRoster,
    pub materials: BTreeMap<MaterialKey, Material>,
    pub customers: HashMap<String, Customer>,
    pub lines: Vec<DemandLine>,
    pub weekly_pct: WeeklyPercentages,

    /// 驗證過程中的非致命調整（批量夾正）
    pub warnings: Vec<ScheduleWarning>,
}

impl ValidatedInput {
    /// 某週的平手比例（未設定時使用預設值）
    pub fn tie_break_pct(&self, week: &WeekLabel, config: &SchedulerConfig) -> u8 {
        self.weekly_pct
            .get(week)
            .copied()
            .unwrap_or(config.default_tie_break_pct)
    }
}

/// 驗證全部輸入
pub fn validate(
    demands: &[DemandRecord],
    materials: &[MaterialRecord],
    customers: &[CustomerRecord],
    capacities: &[CapacityRecord],
    weekly_pct: &WeeklyPercentages,
    config: &SchedulerConfig,
) -> lotplan_core::Result<ValidatedInput> {
    tracing::debug!(
        "驗證輸入：需求 {} 筆，物料 {} 筆，客戶 {} 筆，產能 {} 筆",
        demands.len(),
        materials.len(),
        customers.len(),
        capacities.len()
    );

    config.validate()?;

    let roster = CenterRoster::from_records(capacities, config)?;

    for (week, &pct) in weekly_pct {
        if pct > 100 {
            return Err(ValidationError::PercentageOutOfRange {
                week: week.to_string(),
                pct,
            }
            .into());
        }
    }

    let mut warnings = Vec::new();

    let mut material_map = BTreeMap::new();
    for record in materials {
        let material = validate_material(record, &mut warnings)?;
        if material_map.insert(material.key.clone(), material).is_some() {
            let key = material_key_display(record);
            return Err(duplicate(RecordKind::Material, key, "material").into());
        }
    }

    let mut customer_map = HashMap::new();
    for record in customers {
        let customer = validate_customer(record, &roster)?;
        if customer_map.insert(customer.id.clone(), customer).is_some() {
            let key = record.customer.clone();
            return Err(duplicate(RecordKind::Customer, key, "customer").into());
        }
    }

    let mut lines = Vec::with_capacity(demands.len());
    for record in demands {
        lines.push(validate_demand(record, &material_map, &customer_map)?);
    }

    check_magnitudes(&lines, &material_map, &customer_map)?;

    Ok(ValidatedInput {
        roster,
        materials: material_map,
        customers: customer_map,
        lines,
        weekly_pct: weekly_pct.clone(),
        warnings,
    })
}

fn validate_material(
    record: &MaterialRecord,
    warnings: &mut Vec<ScheduleWarning>,
) -> Result<Material, ValidationError> {
    let key = material_key_display(record);
    let field = |value: Option<Decimal>, name: &'static str| {
        non_negative(RecordKind::Material, &key, value, name)
    };

    let unit_cost = PerCenter::new(
        field(record.unit_cost_primary, "unit_cost_primary")?,
        field(record.unit_cost_secondary, "unit_cost_secondary")?,
    );
    let unit_time = PerCenter::new(
        field(record.unit_time_primary, "unit_time_primary")?,
        field(record.unit_time_secondary, "unit_time_secondary")?,
    );

    let raw_max = required(RecordKind::Material, &key, record.max_lot, "max_lot")?;
    let raw_min = required(RecordKind::Material, &key, record.min_lot, "min_lot")?;

    if raw_max <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveMaxLot(raw_max));
    }

    let (min_lot, max_lot) = clamp_lot_bounds(raw_min, raw_max);
    if (min_lot, max_lot) != (raw_min, raw_max) {
        tracing::warn!(
            "物料 {} 批量上下限由 [{}, {}] 調整為 [{}, {}]",
            key,
            raw_min,
            raw_max,
            min_lot,
            max_lot
        );
        warnings.push(ScheduleWarning::info(
            WarningKind::LotBoundsClamped,
            record.material.clone(),
            format!(
                "批量上下限由 [{}, {}] 調整為 [{}, {}]",
                raw_min, raw_max, min_lot, max_lot
            ),
        ));
    }

    Ok(Material {
        key: record.key(),
        unit_cost,
        unit_time,
        min_lot,
        max_lot,
    })
}

/// 夾正批量上下限：最大批量至少為 1，最小批量介於 [0, 最大批量]
pub fn clamp_lot_bounds(min_lot: Decimal, max_lot: Decimal) -> (Decimal, Decimal) {
    let max_lot = max_lot.max(Decimal::ONE);
    let min_lot = min_lot.max(Decimal::ZERO).min(max_lot);
    (min_lot, max_lot)
}

fn validate_customer(
    record: &CustomerRecord,
    roster: &CenterRoster,
) -> lotplan_core::Result<Customer> {
    let key = record.customer.trim();
    if key.is_empty() {
        return Err(ValidationError::MissingField {
            record: RecordKind::Customer,
            key: record.customer.clone(),
            field: "customer",
        }
        .into());
    }

    let field = |value: Option<Decimal>, name: &'static str| {
        non_negative(RecordKind::Customer, key, value, name)
    };

    let lanes = PerCenter::new(
        ShippingLane::new(
            field(record.distance_primary, "distance_primary")?,
            field(record.rate_primary, "rate_primary")?,
        ),
        ShippingLane::new(
            field(record.distance_secondary, "distance_secondary")?,
            field(record.rate_secondary, "rate_secondary")?,
        ),
    );

    for (lane, field) in [
        (&lanes.primary, "distance_primary"),
        (&lanes.secondary, "distance_secondary"),
    ] {
        if lane.distance.checked_mul(lane.cost_per_distance).is_none() {
            return Err(overflow(RecordKind::Customer, key, field).into());
        }
    }

    let exclusive = match record.exclusive_center.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(code) => Some(roster.role_of(code).ok_or_else(|| {
            IntegrityError::UnknownExclusiveCenter {
                customer: key.to_string(),
                center: code.to_string(),
            }
        })?),
    };

    Ok(Customer {
        id: key.to_string(),
        lanes,
        exclusive,
    })
}

fn validate_demand(
    record: &DemandRecord,
    materials: &BTreeMap<MaterialKey, Material>,
    customers: &HashMap<String, Customer>,
) -> lotplan_core::Result<DemandLine> {
    let key = record.display_key();
    let quantity = non_negative(RecordKind::Demand, &key, record.quantity, "quantity")?;
    let need_by = record.need_by.ok_or_else(|| ValidationError::MissingField {
        record: RecordKind::Demand,
        key: key.clone(),
        field: "need_by",
    })?;

    let material = materials
        .get(&record.material_key())
        .ok_or_else(|| IntegrityError::UnknownMaterial {
            row: record.row,
            material: record.material.clone(),
            unit: record.unit.clone(),
        })?;

    let customer_id = record.customer.trim();
    if !customers.contains_key(customer_id) {
        return Err(IntegrityError::UnknownCustomer {
            row: record.row,
            customer: record.customer.clone(),
        }
        .into());
    }

    Ok(DemandLine {
        row: record.row,
        material: record.material.clone(),
        unit: record.unit.clone(),
        quantity,
        need_by,
        customer: customer_id.to_string(),
        min_lot: material.min_lot,
        max_lot: material.max_lot,
        unit_time: material.unit_time,
    })
}

/// 確認排程過程中的乘法與累加不會溢位
///
/// 以套用最小批量後的數量為上界檢查到廠成本、工時，以及全部需求的數量與工時合計。
/// 週重新分配時工時合計會再乘以 100。
fn check_magnitudes(
    lines: &[DemandLine],
    materials: &BTreeMap<MaterialKey, Material>,
    customers: &HashMap<String, Customer>,
) -> Result<(), ValidationError> {
    let mut total_quantity = Decimal::ZERO;
    let mut total_hours = Decimal::ZERO;

    for line in lines {
        let key = format!("row {} {}/{}", line.row, line.material, line.unit);
        let too_large = |field: &'static str| overflow(RecordKind::Demand, &key, field);

        // 切批時四捨五入最多多出半個刻度
        let quantity = line
            .quantity
            .max(line.min_lot)
            .checked_add(Decimal::ONE)
            .ok_or_else(|| too_large("quantity"))?;

        let (Some(material), Some(customer)) = (
            materials.get(&line.material_key()),
            customers.get(&line.customer),
        ) else {
            continue;
        };

        for role in [CenterRole::Primary, CenterRole::Secondary] {
            let lane = customer.lanes.get(role);
            lane.distance
                .checked_mul(lane.cost_per_distance)
                .zip(quantity.checked_mul(material.unit_cost_at(role)))
                .and_then(|(shipping, production)| shipping.checked_add(production))
                .ok_or_else(|| too_large("quantity"))?;
        }

        let unit_time = material
            .unit_time_at(CenterRole::Primary)
            .max(material.unit_time_at(CenterRole::Secondary));
        let hours = quantity
            .checked_mul(unit_time)
            .ok_or_else(|| too_large("quantity"))?;

        total_quantity = total_quantity
            .checked_add(quantity)
            .ok_or_else(|| too_large("quantity"))?;
        total_hours = total_hours
            .checked_add(hours)
            .and_then(|total| total.checked_mul(Decimal::ONE_HUNDRED).map(|_| total))
            .ok_or_else(|| too_large("quantity"))?;
    }

    Ok(())
}

fn overflow(record: RecordKind, key: &str, field: &'static str) -> ValidationError {
    ValidationError::InvalidValue {
        record,
        key: key.to_string(),
        field,
        reason: "數值過大，排程計算會溢位".to_string(),
    }
}

fn required(
    record: RecordKind,
    key: &str,
    value: Option<Decimal>,
    field: &'static str,
) -> Result<Decimal, ValidationError> {
    value.ok_or_else(|| ValidationError::MissingField {
        record,
        key: key.to_string(),
        field,
    })
}

fn non_negative(
    record: RecordKind,
    key: &str,
    value: Option<Decimal>,
    field: &'static str,
) -> Result<Decimal, ValidationError> {
    let value = required(record, key, value, field)?;
    if value < Decimal::ZERO {
        return Err(ValidationError::InvalidValue {
            record,
            key: key.to_string(),
            field,
            reason: format!("不可為負值 ({})", value),
        });
    }
    Ok(value)
}

fn duplicate(record: RecordKind, key: String, field: &'static str) -> ValidationError {
    ValidationError::InvalidValue {
        record,
        key,
        field,
        reason: "主檔鍵重複".to_string(),
    }
}

fn material_key_display(record: &MaterialRecord) -> String {
    format!("{}/{}", record.material, record.unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lotplan_core::{CenterRole, PlanError};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 19).unwrap()
    }

    fn capacities() -> Vec<CapacityRecord> {
        vec![
            CapacityRecord::new("PL833", Decimal::from(8)),
            CapacityRecord::new("PL184", Decimal::from(8)),
        ]
    }

    fn material() -> MaterialRecord {
        MaterialRecord::new("MAT-001", "UN")
            .with_unit_cost(Decimal::ONE, Decimal::ONE)
            .with_unit_time(Decimal::ONE, Decimal::TWO)
            .with_lot_bounds(Decimal::ZERO, Decimal::from(100))
    }

    fn customer() -> CustomerRecord {
        CustomerRecord::new("CUST-01")
            .with_primary_lane(Decimal::from(10), Decimal::ONE)
            .with_secondary_lane(Decimal::from(20), Decimal::ONE)
    }

    fn demand() -> DemandRecord {
        DemandRecord::new(1, "MAT-001", "UN", Decimal::from(40), date(), "CUST-01")
    }

    fn run(
        demands: &[DemandRecord],
        materials: &[MaterialRecord],
        customers: &[CustomerRecord],
    ) -> lotplan_core::Result<ValidatedInput> {
        validate(
            demands,
            materials,
            customers,
            &capacities(),
            &WeeklyPercentages::new(),
            &SchedulerConfig::default(),
        )
    }

    #[test]
    fn test_valid_input() {
        let input = run(&[demand()], &[material()], &[customer()]).unwrap();

        assert_eq!(input.lines.len(), 1);
        let line = &input.lines[0];
        assert_eq!(line.quantity, Decimal::from(40));
        assert_eq!(line.max_lot, Decimal::from(100));
        assert_eq!(line.unit_time.secondary, Decimal::TWO);
        assert!(input.warnings.is_empty());
    }

    #[test]
    fn test_missing_unit_time_fails() {
        let mut record = material();
        record.unit_time_secondary = None;

        let err = run(&[demand()], &[record], &[customer()]).unwrap_err();
        assert_eq!(
            err,
            PlanError::Validation(ValidationError::MissingField {
                record: RecordKind::Material,
                key: "MAT-001/UN".to_string(),
                field: "unit_time_secondary",
            })
        );
    }

    #[test]
    fn test_missing_shipping_rate_fails() {
        let mut record = customer();
        record.rate_primary = None;

        let err = run(&[demand()], &[material()], &[record]).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("rate_primary"));
    }

    #[test]
    fn test_missing_quantity_fails() {
        let mut record = demand();
        record.quantity = None;

        let err = run(&[record], &[material()], &[customer()]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_negative_quantity_fails() {
        let mut record = demand();
        record.quantity = Some(Decimal::from(-5));

        let err = run(&[record], &[material()], &[customer()]).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Validation(ValidationError::InvalidValue {
                field: "quantity",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_material_is_integrity_error() {
        let mut record = demand();
        record.material = "MAT-404".to_string();

        let err = run(&[record], &[material()], &[customer()]).unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_unknown_customer_is_integrity_error() {
        let mut record = demand();
        record.customer = "NOBODY".to_string();

        let err = run(&[record], &[material()], &[customer()]).unwrap_err();
        assert_eq!(
            err,
            PlanError::Integrity(IntegrityError::UnknownCustomer {
                row: 1,
                customer: "NOBODY".to_string(),
            })
        );
    }

    #[test]
    fn test_landed_cost_overflow_rejected() {
        let record = material().with_unit_cost(Decimal::from(10_000_000_000i64), Decimal::ONE);
        let demand = DemandRecord::new(
            1,
            "MAT-001",
            "UN",
            Decimal::from(10_000_000_000_000_000_000u64),
            date(),
            "CUST-01",
        );

        let err = run(&[demand], &[record], &[customer()]).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Validation(ValidationError::InvalidValue {
                record: RecordKind::Demand,
                field: "quantity",
                ..
            })
        ));
    }

    #[test]
    fn test_total_hours_overflow_rejected() {
        // 單筆不溢位，但全部需求的工時合計乘以 100 會溢位
        let record = material().with_unit_time(Decimal::ONE, Decimal::ONE);
        let huge = Decimal::MAX / Decimal::from(150);
        let demands: Vec<_> = (1..=2)
            .map(|row| DemandRecord::new(row, "MAT-001", "UN", huge, date(), "CUST-01"))
            .collect();

        let customer = CustomerRecord::new("CUST-01")
            .with_primary_lane(Decimal::ZERO, Decimal::ZERO)
            .with_secondary_lane(Decimal::ZERO, Decimal::ZERO);
        let record = record.with_unit_cost(Decimal::ZERO, Decimal::ZERO);

        let err = run(&demands, &[record], &[customer]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_shipping_cost_overflow_rejected() {
        let customer = CustomerRecord::new("CUST-01")
            .with_primary_lane(Decimal::MAX, Decimal::TWO)
            .with_secondary_lane(Decimal::from(20), Decimal::ONE);

        let err = run(&[demand()], &[material()], &[customer]).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Validation(ValidationError::InvalidValue {
                record: RecordKind::Customer,
                field: "distance_primary",
                ..
            })
        ));
    }

    #[test]
    fn test_non_positive_max_lot_rejected() {
        let record = material().with_lot_bounds(Decimal::ZERO, Decimal::ZERO);

        let err = run(&[demand()], &[record], &[customer()]).unwrap_err();
        assert_eq!(
            err,
            PlanError::Validation(ValidationError::NonPositiveMaxLot(Decimal::ZERO))
        );
    }

    #[test]
    fn test_lot_bounds_are_clamped() {
        let record = material().with_lot_bounds(Decimal::from(150), Decimal::from(100));

        let input = run(&[demand()], &[record], &[customer()]).unwrap();
        let line = &input.lines[0];
        assert_eq!(line.min_lot, Decimal::from(100));
        assert_eq!(input.warnings.len(), 1);
        assert_eq!(input.warnings[0].kind, WarningKind::LotBoundsClamped);
    }

    #[test]
    fn test_clamp_lot_bounds() {
        assert_eq!(
            clamp_lot_bounds(Decimal::from(-3), Decimal::new(5, 1)),
            (Decimal::ZERO, Decimal::ONE)
        );
        assert_eq!(
            clamp_lot_bounds(Decimal::from(10), Decimal::from(50)),
            (Decimal::from(10), Decimal::from(50))
        );
    }

    #[test]
    fn test_exclusive_center_resolved() {
        let record = customer().with_exclusive_center("PL184");
        let input = run(&[demand()], &[material()], &[record]).unwrap();
        assert_eq!(
            input.customers["CUST-01"].exclusive,
            Some(CenterRole::Secondary)
        );
    }

    #[test]
    fn test_unknown_exclusive_center_fails() {
        let record = customer().with_exclusive_center("PL999");
        let err = run(&[demand()], &[material()], &[record]).unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_duplicate_material_fails() {
        let err = run(&[demand()], &[material(), material()], &[customer()]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_percentage_out_of_range() {
        let mut pct = WeeklyPercentages::new();
        pct.insert(WeekLabel::from_date(date()), 101);

        let err = validate(
            &[demand()],
            &[material()],
            &[customer()],
            &capacities(),
            &pct,
            &SchedulerConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_tie_break_pct_default() {
        let mut pct = WeeklyPercentages::new();
        let week = WeekLabel::from_date(date());
        pct.insert(week, 80);

        let input = validate(
            &[demand()],
            &[material()],
            &[customer()],
            &capacities(),
            &pct,
            &SchedulerConfig::default(),
        )
        .unwrap();

        let config = SchedulerConfig::default();
        assert_eq!(input.tie_break_pct(&week, &config), 80);
        let other = WeekLabel::new(2030, 1).unwrap();
        assert_eq!(input.tie_break_pct(&other, &config), 50);
    }
}
