// ==========================================
// 流水线仿真集成测试
// ==========================================
// 覆盖: 产能约束、工序先后、第 0 天在制订单、优先级入位、
//       流转天数、持续超载、瓶颈平局
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use capacity_planner::domain::{Order, OrderQueueSnapshot, Stage, StageModel};
use capacity_planner::engine::{ForecastAnalyzer, PipelineSimulator, SimulationOutcome};
use capacity_planner::{logging, Priority, ScheduleStatus, Utilization};
use chrono::Duration;
use test_helpers::*;

fn simulate(stages: Vec<Stage>, orders: Vec<Order>, horizon_days: u32) -> (StageModel, SimulationOutcome) {
    simulate_with_delay(stages, orders, horizon_days, 1)
}

fn simulate_with_delay(
    stages: Vec<Stage>,
    orders: Vec<Order>,
    horizon_days: u32,
    transfer_delay_days: u32,
) -> (StageModel, SimulationOutcome) {
    let model = StageModel::new(stages).unwrap();
    let snapshot = OrderQueueSnapshot::new(as_of(), orders);
    let (outcome, skipped) = PipelineSimulator::new()
        .with_transfer_delay(transfer_delay_days)
        .simulate_snapshot(&model, &snapshot, horizon_days);
    assert!(skipped.is_empty(), "unexpected skipped orders: {:?}", skipped);
    (model, outcome)
}

// ==========================================
// 产能约束
// ==========================================

#[test]
fn test_occupied_slots_never_exceed_capacity() {
    logging::init_test();
    let (model, outcome) = simulate(furniture_stages(), generated_orders(40, 7), 90);

    for (idx, stage) in model.stages().iter().enumerate() {
        let series = outcome.stage_series(idx);
        assert_eq!(series.len(), 90);
        for occupancy in series {
            assert!(
                occupancy.in_progress <= stage.max_capacity,
                "{} day {}: {} > {}",
                stage.name,
                occupancy.day,
                occupancy.in_progress,
                stage.max_capacity
            );
            assert_eq!(occupancy.demand, occupancy.in_progress + occupancy.queued);
            assert_eq!(occupancy.date, day(occupancy.day as i64));
        }
    }
}

#[test]
fn test_stage_sequence_respected() {
    let (_, outcome) = simulate(furniture_stages(), generated_orders(40, 11), 90);

    for order in &outcome.orders {
        for pair in order.assignments.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if let Some(next_start) = next.estimated_start {
                let prev_end = prev.estimated_end.expect("下道工序开工时上道工序必已完工");
                assert!(
                    next_start > prev_end,
                    "{}: {} starts {} before {} ends {}",
                    order.order_id,
                    next.stage,
                    next_start,
                    prev.stage,
                    prev_end
                );
            }
        }
        for assignment in &order.assignments {
            if let (Some(start), Some(end)) = (assignment.estimated_start, assignment.estimated_end) {
                assert_eq!(end - start, Duration::days(assignment.duration_days as i64));
            }
        }
    }
}

#[test]
fn test_generated_workload_is_deterministic() {
    let first = simulate(furniture_stages(), generated_orders(40, 3), 30).1;
    let second = simulate(furniture_stages(), generated_orders(40, 3), 30).1;
    assert_eq!(first, second);
}

// ==========================================
// 第 0 天与入位顺序
// ==========================================

#[test]
fn test_in_progress_orders_seated_first_on_day_zero() {
    let (_, outcome) = simulate(
        vec![Stage::new("Assembly", 1, 1)],
        vec![
            Order::new("RUSH", Priority::Urgent).with_stage("Assembly", 1),
            Order::new("WIP", Priority::Low).with_stage("Assembly", 1).started(),
        ],
        5,
    );

    let by_id = |id: &str| outcome.orders.iter().find(|o| o.order_id == id).unwrap();
    assert_eq!(by_id("WIP").start_date(), Some(day(0)));
    assert_eq!(by_id("RUSH").start_date(), Some(day(1)));

    let day0 = &outcome.stage_series(0)[0];
    assert_eq!(day0.in_progress, 1);
    assert_eq!(day0.queued, 1);
}

#[test]
fn test_surplus_in_progress_orders_wait_at_queue_head() {
    let (_, outcome) = simulate(
        vec![Stage::new("Finishing", 1, 1)],
        vec![
            Order::new("NEW", Priority::Urgent).with_stage("Finishing", 1),
            Order::new("WIP-1", Priority::Normal).with_stage("Finishing", 1).started(),
            Order::new("WIP-2", Priority::Low).with_stage("Finishing", 1).started(),
        ],
        5,
    );

    let starts: Vec<(&str, Option<chrono::NaiveDate>)> = outcome
        .orders
        .iter()
        .map(|o| (o.order_id.as_str(), o.start_date()))
        .collect();
    assert!(starts.contains(&("WIP-1", Some(day(0)))));
    assert!(starts.contains(&("WIP-2", Some(day(1)))));
    assert!(starts.contains(&("NEW", Some(day(2)))));
}

#[test]
fn test_priority_then_deadline_decides_admission() {
    let (_, outcome) = simulate(
        vec![Stage::new("Cutting", 1, 1)],
        vec![
            Order::new("LOW", Priority::Low).with_stage("Cutting", 1),
            Order::new("LATE", Priority::High).with_deadline(day(20)).with_stage("Cutting", 1),
            Order::new("SOON", Priority::High).with_deadline(day(3)).with_stage("Cutting", 1),
            Order::new("NONE", Priority::High).with_stage("Cutting", 1),
        ],
        6,
    );

    let ids: Vec<&str> = outcome.orders.iter().map(|o| o.order_id.as_str()).collect();
    assert_eq!(ids, vec!["SOON", "LATE", "NONE", "LOW"]);
    for (rank, order) in outcome.orders.iter().enumerate() {
        assert_eq!(order.start_date(), Some(day(rank as i64)));
    }
}

#[test]
fn test_capacity_frees_same_day_for_queued_order() {
    let (_, outcome) = simulate(
        vec![Stage::new("Sanding", 1, 1)],
        vec![
            Order::new("O1", Priority::Normal).with_stage("Sanding", 2),
            Order::new("O2", Priority::Normal).with_stage("Sanding", 1),
        ],
        5,
    );
    // O1 第 2 天完工,同一天 O2 入位
    assert_eq!(outcome.orders[0].end_date(), Some(day(2)));
    assert_eq!(outcome.orders[1].start_date(), Some(day(2)));
}

// ==========================================
// 流转天数
// ==========================================

#[test]
fn test_transfer_delay_postpones_next_stage() {
    let orders = vec![Order::new("O1", Priority::Normal)
        .with_stage("Cutting", 1)
        .with_stage("Assembly", 1)];
    let stages = vec![Stage::new("Cutting", 1, 1), Stage::new("Assembly", 2, 1)];

    let (_, default_delay) = simulate(stages.clone(), orders.clone(), 6);
    assert_eq!(default_delay.orders[0].assignments[1].estimated_start, Some(day(2)));

    let (_, slow) = simulate_with_delay(stages, orders, 6, 3);
    assert_eq!(slow.orders[0].assignments[1].estimated_start, Some(day(4)));
    // 等待流转期间计入下道工序排队需求
    assert_eq!(slow.stage_series(1)[1].queued, 1);
}

#[test]
fn test_not_ready_entry_does_not_block_followers() {
    // O1 第 1 天完工 A 后排到 B 队首,但第 4 天才可入位;
    // 排在其后的 X 在 Y 第 2 天完工时照常入位
    let (_, outcome) = simulate_with_delay(
        vec![Stage::new("A", 1, 1), Stage::new("B", 2, 1)],
        vec![
            Order::new("O1", Priority::Urgent).with_stage("A", 1).with_stage("B", 1),
            Order::new("Y", Priority::High).with_stage("B", 2).started(),
            Order::new("X", Priority::Low).with_stage("B", 1),
        ],
        8,
        3,
    );
    let by_id = |id: &str| outcome.orders.iter().find(|o| o.order_id == id).unwrap();

    assert_eq!(by_id("Y").start_date(), Some(day(0)));
    assert_eq!(by_id("X").start_date(), Some(day(2)));
    assert_eq!(by_id("O1").assignments[1].estimated_start, Some(day(4)));
    assert_eq!(by_id("O1").status, ScheduleStatus::Completed);
}

// ==========================================
// 预测口径
// ==========================================

#[test]
fn test_sustained_overflow_detected() {
    let orders: Vec<Order> = (1..=4)
        .map(|i| Order::new(format!("O{}", i), Priority::Normal).with_stage("Finishing", 2))
        .collect();
    let (model, outcome) = simulate(vec![Stage::new("Finishing", 1, 1)], orders, 10);

    let demand: Vec<u32> = outcome.stage_series(0).iter().map(|o| o.demand).collect();
    assert_eq!(demand, vec![4, 4, 3, 3, 2, 2, 1, 1, 0, 0]);

    let analysis = ForecastAnalyzer::default().analyze(&model, &outcome);
    let summary = &analysis.stage_summaries[0];
    assert_eq!(summary.projected_overflow_date, Some(day(0)));
    assert_eq!(summary.utilization_percent, Utilization::Percent(400.0));
}

#[test]
fn test_single_day_spike_is_not_sustained() {
    let (model, outcome) = simulate(
        vec![Stage::new("Packing", 1, 1)],
        vec![
            Order::new("O1", Priority::Normal).with_stage("Packing", 1),
            Order::new("O2", Priority::Normal).with_stage("Packing", 1),
        ],
        5,
    );
    let analysis = ForecastAnalyzer::default().analyze(&model, &outcome);
    assert_eq!(analysis.stage_summaries[0].projected_overflow_date, None);
    assert_eq!(analysis.stage_summaries[0].utilization_percent, Utilization::Percent(200.0));
}

#[test]
fn test_bottleneck_tie_goes_to_upstream_stage() {
    let (model, outcome) = simulate(
        vec![Stage::new("Cutting", 1, 1), Stage::new("Assembly", 2, 1)],
        vec![
            Order::new("C", Priority::Normal).with_stage("Cutting", 3),
            Order::new("A", Priority::Normal).with_stage("Assembly", 3),
        ],
        4,
    );
    let analysis = ForecastAnalyzer::default().analyze(&model, &outcome);
    let bottlenecks: Vec<Option<&str>> = analysis
        .forecast
        .iter()
        .map(|p| p.bottleneck_stage.as_deref())
        .collect();
    assert_eq!(bottlenecks, vec![Some("Cutting"), Some("Cutting"), Some("Cutting"), None]);
}
