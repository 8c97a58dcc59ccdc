// ==========================================
// 家具产能规划 - 流水线仿真引擎
// ==========================================
// 职责: 按天推进订单经过各工序,受工序并发产能约束
// 输入: 工序模型 + 已校验订单 + 预测天数 + 起始日期
// 输出: 订单-工序排程 + 工序-日占用
// ==========================================
// 红线:
// - 任意一天工序已占用槽位数 ≤ max_capacity,超出部分只排队不占用
// - 同输入必同输出（无随机、无时钟、无 HashMap 迭代序）
// - 只向前构建占用记录,不回改已记录的日子
// ==========================================

use crate::domain::analysis::{DailyOccupancy, SkippedOrder, StageAssignment};
use crate::domain::order::OrderQueueSnapshot;
use crate::domain::stage::StageModel;
use crate::domain::types::{ScheduleStatus, Utilization};
use crate::engine::priority::PrioritySorter;
use crate::engine::validation::{validate_snapshot, RoutedOrder};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// 默认工序间流转天数
pub const DEFAULT_TRANSFER_DELAY_DAYS: u32 = 1;

/// 占用序列预分配天数上限
const PREALLOCATED_DAYS: usize = 366;

// ==========================================
// 仿真输出
// ==========================================

/// 单个订单的仿真排程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSchedule {
    pub order_id: String,
    /// 固定排队名次（0 最优先）
    pub rank: usize,
    pub status: ScheduleStatus,
    pub assignments: Vec<StageAssignment>,
}

impl OrderSchedule {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.assignments.first().and_then(|a| a.estimated_start)
    }

    /// 全部工序完工日（未全部完工时为 None）
    pub fn end_date(&self) -> Option<NaiveDate> {
        if self.status == ScheduleStatus::Completed {
            self.assignments.last().and_then(|a| a.estimated_end)
        } else {
            None
        }
    }
}

/// 仿真结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub start_date: NaiveDate,
    pub horizon_days: u32,
    /// 按排队名次排列
    pub orders: Vec<OrderSchedule>,
    /// occupancy[stage_index][day]
    pub occupancy: Vec<Vec<DailyOccupancy>>,
    /// 预测期最后一天各工序排队订单数
    pub final_backlog: Vec<u32>,
}

impl SimulationOutcome {
    pub fn stage_series(&self, stage_index: usize) -> &[DailyOccupancy] {
        self.occupancy
            .get(stage_index)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn unscheduled_count(&self) -> usize {
        self.orders
            .iter()
            .filter(|o| o.status != ScheduleStatus::Completed)
            .count()
    }
}

// ==========================================
// 仿真内部状态
// ==========================================

/// 占用槽位的订单
#[derive(Debug, Clone, Copy)]
struct Slot {
    order: usize, // 排队名次
    step: usize,  // 工艺路线中的第几步
    remaining_days: u32,
}

/// 排队中的订单
///
/// 队列按 (class, order) 升序保持有序:
/// class 0 = 第 0 天已在制的订单,class 1 = 普通排队
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    class: u8,
    order: usize,
    step: usize,
    ready_day: u32,
}

impl QueueEntry {
    fn key(&self) -> (u8, usize) {
        (self.class, self.order)
    }
}

#[derive(Debug, Default)]
struct StageState {
    in_progress: Vec<Slot>,
    queue: Vec<QueueEntry>,
}

impl StageState {
    fn enqueue(&mut self, entry: QueueEntry) {
        let pos = self.queue.partition_point(|e| e.key() <= entry.key());
        self.queue.insert(pos, entry);
    }
}

// ==========================================
// PipelineSimulator - 流水线仿真引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct PipelineSimulator {
    transfer_delay_days: u32,
    sorter: PrioritySorter,
}

impl Default for PipelineSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineSimulator {
    pub fn new() -> Self {
        Self {
            transfer_delay_days: DEFAULT_TRANSFER_DELAY_DAYS,
            sorter: PrioritySorter::new(),
        }
    }

    /// 设置工序间流转天数（最小 1 天）
    pub fn with_transfer_delay(mut self, days: u32) -> Self {
        self.transfer_delay_days = days.max(1);
        self
    }

    pub fn transfer_delay_days(&self) -> u32 {
        self.transfer_delay_days
    }

    /// 校验订单快照后仿真（起始日期取快照 as_of）
    pub fn simulate_snapshot(
        &self,
        model: &StageModel,
        snapshot: &OrderQueueSnapshot,
        horizon_days: u32,
    ) -> (SimulationOutcome, Vec<SkippedOrder>) {
        let validation = validate_snapshot(model, snapshot);
        let outcome = self.simulate(model, &validation.accepted, horizon_days, snapshot.as_of);
        (outcome, validation.skipped)
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按天仿真
    ///
    /// 每天 d 的步骤:
    /// a) 按流水线顺序,在制订单剩余工期减 1;归零者完工（estimated_end = d）,
    ///    若有下道工序则进入其队列,最早 d + transfer_delay 天可入位
    /// b) 各工序在有空槽时按队列顺序入位（estimated_start = d）,
    ///    未到可入位日的订单留在队列中,不阻挡其后可入位的订单
    /// c) 记录各工序当日占用: demand = 在制 + 排队
    #[instrument(skip(self, model, orders), fields(
        stages = model.len(),
        orders = orders.len(),
        horizon_days,
        start_date = %start_date
    ))]
    pub fn simulate(
        &self,
        model: &StageModel,
        orders: &[RoutedOrder<'_>],
        horizon_days: u32,
        start_date: NaiveDate,
    ) -> SimulationOutcome {
        // 1. 固定排队顺序
        let mut ranked: Vec<&RoutedOrder<'_>> = orders.iter().collect();
        ranked.sort_by(|a, b| self.sorter.compare(a.order, b.order));

        let mut assignments: Vec<Vec<StageAssignment>> = ranked
            .iter()
            .map(|routed| {
                routed
                    .route
                    .iter()
                    .map(|step| StageAssignment {
                        stage: model
                            .get(step.stage_index)
                            .map(|s| s.name.clone())
                            .unwrap_or_default(),
                        estimated_start: None,
                        estimated_end: None,
                        duration_days: step.duration_days,
                    })
                    .collect()
            })
            .collect();

        // 2. 第 0 天全部订单进入首道工序队列
        let mut states: Vec<StageState> = (0..model.len()).map(|_| StageState::default()).collect();
        for (rank, routed) in ranked.iter().enumerate() {
            if let Some(first) = routed.route.first() {
                states[first.stage_index].enqueue(QueueEntry {
                    class: if routed.order.in_progress { 0 } else { 1 },
                    order: rank,
                    step: 0,
                    ready_day: 0,
                });
            }
        }

        let mut occupancy: Vec<Vec<DailyOccupancy>> = (0..model.len())
            .map(|_| Vec::with_capacity((horizon_days as usize).min(PREALLOCATED_DAYS)))
            .collect();

        // 3. 按天推进
        for day in 0..horizon_days {
            let date = start_date + Duration::days(day as i64);

            // a) 完工与流转
            for stage_index in 0..states.len() {
                let mut finished: Vec<Slot> = Vec::new();
                states[stage_index].in_progress.retain_mut(|slot| {
                    slot.remaining_days = slot.remaining_days.saturating_sub(1);
                    if slot.remaining_days == 0 {
                        finished.push(*slot);
                        false
                    } else {
                        true
                    }
                });

                for slot in finished {
                    assignments[slot.order][slot.step].estimated_end = Some(date);
                    let next_step = slot.step + 1;
                    if let Some(next) = ranked[slot.order].route.get(next_step) {
                        states[next.stage_index].enqueue(QueueEntry {
                            class: 1,
                            order: slot.order,
                            step: next_step,
                            ready_day: day.saturating_add(self.transfer_delay_days),
                        });
                    } else {
                        debug!(order_id = %ranked[slot.order].order.id, day, "订单全部工序完工");
                    }
                }
            }

            // b) 入位
            for (stage_index, state) in states.iter_mut().enumerate() {
                let capacity = model
                    .get(stage_index)
                    .map(|s| s.max_capacity as usize)
                    .unwrap_or(0);

                let mut i = 0;
                while state.in_progress.len() < capacity && i < state.queue.len() {
                    if state.queue[i].ready_day > day {
                        i += 1;
                        continue;
                    }
                    let entry = state.queue.remove(i);
                    let duration = ranked[entry.order].route[entry.step].duration_days;
                    assignments[entry.order][entry.step].estimated_start = Some(date);
                    state.in_progress.push(Slot {
                        order: entry.order,
                        step: entry.step,
                        remaining_days: duration,
                    });
                }
            }

            // c) 记录占用
            for (stage_index, state) in states.iter().enumerate() {
                let (name, capacity) = model
                    .get(stage_index)
                    .map(|s| (s.name.clone(), s.max_capacity))
                    .unwrap_or_default();
                let in_progress = state.in_progress.len() as u32;
                let queued = state.queue.len() as u32;
                let demand = in_progress + queued;
                occupancy[stage_index].push(DailyOccupancy {
                    stage: name,
                    day,
                    date,
                    in_progress,
                    queued,
                    demand,
                    capacity,
                    utilization_percent: Utilization::from_counts(demand, capacity),
                });
            }
        }

        // 4. 汇总订单状态
        let order_schedules: Vec<OrderSchedule> = ranked
            .iter()
            .zip(assignments)
            .enumerate()
            .map(|(rank, (routed, assignments))| {
                let status = if assignments.iter().all(|a| a.is_complete()) {
                    ScheduleStatus::Completed
                } else if assignments.iter().any(|a| a.estimated_start.is_some()) {
                    ScheduleStatus::InProgress
                } else {
                    ScheduleStatus::Unscheduled
                };
                OrderSchedule {
                    order_id: routed.order.id.clone(),
                    rank,
                    status,
                    assignments,
                }
            })
            .collect();

        let final_backlog: Vec<u32> = states.iter().map(|s| s.queue.len() as u32).collect();

        let outcome = SimulationOutcome {
            start_date,
            horizon_days,
            orders: order_schedules,
            occupancy,
            final_backlog,
        };

        info!(
            completed = outcome.orders.len() - outcome.unscheduled_count(),
            unfinished = outcome.unscheduled_count(),
            "流水线仿真完成"
        );

        outcome
    }
}
