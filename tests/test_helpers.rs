// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供集成测试共用的快照构造、日期换算等功能
// ==========================================

#![allow(dead_code)]

use capacity_planner::domain::{Order, PlanningSnapshot, Stage};
use capacity_planner::Priority;
use chrono::{Duration, NaiveDate};

/// 固定的快照日期（测试不读系统时钟）
pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// 第 n 天对应日期
pub fn day(n: i64) -> NaiveDate {
    as_of() + Duration::days(n)
}

/// 标准两工序场景
///
/// A（产能 2）→ B（产能 1）
/// - O1: urgent,截止第 5 天,A:2 B:1
/// - O2: normal,A:1 B:1
/// - O3: normal,A:1 B:1
pub fn canonical_snapshot() -> PlanningSnapshot {
    PlanningSnapshot::new(
        as_of(),
        vec![Stage::new("A", 1, 2), Stage::new("B", 2, 1)],
        vec![
            Order::new("O1", Priority::Urgent)
                .with_deadline(day(5))
                .with_stage("A", 2)
                .with_stage("B", 1),
            Order::new("O2", Priority::Normal)
                .with_stage("A", 1)
                .with_stage("B", 1),
            Order::new("O3", Priority::Normal)
                .with_stage("A", 1)
                .with_stage("B", 1),
        ],
    )
}

/// 家具厂五道工序
pub fn furniture_stages() -> Vec<Stage> {
    vec![
        Stage::new("Cutting", 10, 3),
        Stage::new("Edge Banding", 20, 2),
        Stage::new("Assembly", 30, 2),
        Stage::new("Finishing", 40, 1),
        Stage::new("Packing", 50, 2),
    ]
}

/// 生成确定性的批量订单（线性同余,不依赖随机数）
pub fn generated_orders(count: usize, seed: u64) -> Vec<Order> {
    let stages = furniture_stages();
    let priorities = [Priority::Urgent, Priority::High, Priority::Normal, Priority::Low];
    let mut state = seed;
    let mut next = move |bound: u64| {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) % bound
    };

    (0..count)
        .map(|i| {
            let mut order = Order::new(format!("SO-{:04}", i), priorities[next(4) as usize]);
            if next(2) == 0 {
                order = order.with_deadline(day(next(60) as i64));
            }
            for stage in &stages {
                // Edge Banding 与 Finishing 可跳过
                if (stage.order == 20 || stage.order == 40) && next(3) == 0 {
                    continue;
                }
                order = order.with_stage(stage.name.clone(), 1 + next(4) as u32);
            }
            if next(5) == 0 {
                order = order.started();
            }
            order
        })
        .collect()
}
