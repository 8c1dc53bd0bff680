//! 雙中心排程示例
//!
//! ```text
//! RUST_LOG=debug cargo run --example two_center_plan
//! ```

use anyhow::Context;
use chrono::NaiveDate;
use lotplan::{
    CapacityRecord, CustomerRecord, DemandRecord, MaterialRecord, Planner, SchedulerConfig,
    WeekLabel, WeeklyPercentages,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    println!("=== 雙中心排程示例 ===\n");

    let date = |day: u32| {
        NaiveDate::from_ymd_opt(2025, 11, day).with_context(|| format!("無效日期 2025-11-{}", day))
    };

    // 中心產能：主中心每日 16 小時，次中心每日 8 小時
    let capacities = vec![
        CapacityRecord::new("PL833", Decimal::from(16)),
        CapacityRecord::new("PL184", Decimal::from(8)),
    ];

    let materials = vec![
        MaterialRecord::new("MAT-100", "UN")
            .with_unit_cost(Decimal::new(25, 1), Decimal::new(22, 1))
            .with_unit_time(Decimal::new(1, 1), Decimal::new(15, 2))
            .with_lot_bounds(Decimal::from(50), Decimal::from(200)),
        MaterialRecord::new("MAT-200", "KG")
            .with_unit_cost(Decimal::from(4), Decimal::from(4))
            .with_unit_time(Decimal::new(5, 2), Decimal::new(5, 2))
            .with_lot_bounds(Decimal::ZERO, Decimal::from(500)),
    ];

    let customers = vec![
        CustomerRecord::new("NORTE")
            .with_primary_lane(Decimal::from(120), Decimal::new(15, 1))
            .with_secondary_lane(Decimal::from(300), Decimal::new(15, 1)),
        CustomerRecord::new("SUR")
            .with_primary_lane(Decimal::from(280), Decimal::new(15, 1))
            .with_secondary_lane(Decimal::from(90), Decimal::new(15, 1)),
        CustomerRecord::new("CENTRO")
            .with_primary_lane(Decimal::from(150), Decimal::ONE)
            .with_secondary_lane(Decimal::from(150), Decimal::ONE)
            .with_exclusive_center("PL833"),
    ];

    let demands = vec![
        DemandRecord::new(1, "MAT-100", "UN", Decimal::from(420), date(17)?, "NORTE"),
        DemandRecord::new(2, "MAT-100", "UN", Decimal::from(30), date(17)?, "SUR"),
        DemandRecord::new(3, "MAT-200", "KG", Decimal::from(900), date(18)?, "CENTRO"),
        DemandRecord::new(4, "MAT-200", "KG", Decimal::from(260), date(20)?, "SUR"),
        DemandRecord::new(5, "MAT-100", "UN", Decimal::from(75), date(24)?, "NORTE"),
    ];

    // 第 47 週主中心 60%，第 48 週未設定（保留第一輪中心）
    let mut weekly_pct = WeeklyPercentages::new();
    weekly_pct.insert(WeekLabel::from_date(date(17)?), 60);

    let planner = Planner::new(SchedulerConfig::default());
    let plan = planner.schedule(&demands, &materials, &customers, &capacities, &weekly_pct)?;

    println!("路由結果:");
    for decision in &plan.routing {
        println!(
            "  - 需求列 {}: {} ({:?})",
            decision.row, decision.center_code, decision.reason
        );
    }

    println!("\n生產建議:");
    for lot in &plan.lots {
        println!(
            "  #{:<3} {} {:>8} {} @ {} {} ({}) 工時 {}",
            lot.seq,
            lot.material,
            lot.quantity,
            lot.unit,
            lot.center,
            lot.production_date,
            lot.week,
            lot.hours
        );
    }

    println!("\n每週工時:");
    for ((week, center), hours) in plan.hours_by_week_center() {
        println!("  - {} {}: {}", week, center, hours);
    }

    println!("\nJSON:");
    println!("{}", serde_json::to_string_pretty(&plan.lots)?);

    Ok(())
}
