// ==========================================
// 家具产能规划 - 订单数据完整性校验
// ==========================================
// 职责: 把订单工艺路线解析为流水线位置,拒绝不完整的订单
// 策略: 单个订单校验失败只跳过该订单,其余订单继续分析
// ==========================================

use crate::domain::analysis::SkippedOrder;
use crate::domain::order::{Order, OrderQueueSnapshot};
use crate::domain::stage::StageModel;
use crate::error::{PlanningError, PlanningResult};
use std::collections::HashSet;
use tracing::warn;

/// 工艺路线中的一步（已解析为流水线位置）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteStep {
    pub stage_index: usize,
    pub duration_days: u32,
}

/// 通过校验的订单
#[derive(Debug, Clone)]
pub struct RoutedOrder<'a> {
    pub order: &'a Order,
    pub route: Vec<RouteStep>,
}

/// 校验结果
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome<'a> {
    pub accepted: Vec<RoutedOrder<'a>>,
    pub skipped: Vec<SkippedOrder>,
}

/// 校验单个订单的工艺路线
///
/// 规则:
/// 1) required_stages 非空
/// 2) 每个工序工期 ≥ 1 天
/// 3) 引用的工序必须存在于工序模型
/// 4) 工序顺序不得逆流水线（允许相同工序连续出现）
pub fn resolve_route(model: &StageModel, order: &Order) -> PlanningResult<Vec<RouteStep>> {
    if order.id.trim().is_empty() {
        return Err(PlanningError::data_integrity(&order.id, "订单 id 为空"));
    }
    if order.required_stages.is_empty() {
        return Err(PlanningError::data_integrity(&order.id, "required_stages 为空"));
    }

    let mut route = Vec::with_capacity(order.required_stages.len());
    let mut last_index: Option<usize> = None;

    for requirement in &order.required_stages {
        let stage_index = model.index_of(&requirement.stage).ok_or_else(|| {
            PlanningError::data_integrity(
                &order.id,
                format!("引用了未定义的工序: {}", requirement.stage),
            )
        })?;

        if requirement.duration_days == 0 {
            return Err(PlanningError::data_integrity(
                &order.id,
                format!("工序 {} 的工期必须 ≥ 1 天", requirement.stage),
            ));
        }

        if let Some(prev) = last_index {
            if stage_index < prev {
                let prev_name = model.get(prev).map(|s| s.name.as_str()).unwrap_or("?");
                return Err(PlanningError::data_integrity(
                    &order.id,
                    format!(
                        "工序顺序逆流水线: {} 排在 {} 之后",
                        requirement.stage, prev_name
                    ),
                ));
            }
        }
        last_index = Some(stage_index);

        route.push(RouteStep {
            stage_index,
            duration_days: requirement.duration_days,
        });
    }

    Ok(route)
}

/// 校验整个订单快照
///
/// 重复的订单 id 只保留第一次出现,后续重复项作为数据完整性错误跳过
pub fn validate_snapshot<'a>(
    model: &StageModel,
    snapshot: &'a OrderQueueSnapshot,
) -> ValidationOutcome<'a> {
    let mut outcome = ValidationOutcome::default();
    let mut seen_ids: HashSet<&str> = HashSet::with_capacity(snapshot.orders.len());

    for order in &snapshot.orders {
        let result = if seen_ids.contains(order.id.as_str()) {
            Err(PlanningError::data_integrity(&order.id, "订单 id 重复"))
        } else {
            resolve_route(model, order)
        };

        match result {
            Ok(route) => {
                seen_ids.insert(order.id.as_str());
                outcome.accepted.push(RoutedOrder { order, route });
            }
            Err(err) => {
                warn!(order_id = %order.id, error = %err, "订单校验失败,已跳过");
                let reason = match err {
                    PlanningError::DataIntegrity { reason, .. } => reason,
                    other => other.to_string(),
                };
                outcome.skipped.push(SkippedOrder {
                    order_id: order.id.clone(),
                    reason,
                });
            }
        }
    }

    outcome
}
