// ==========================================
// 家具产能规划 - 产能分析服务
// ==========================================
// 职责: 编排 校验 → 仿真 → 预测 → 建议 → 资源效率,组装结果契约
// 输入: 规划快照 + 规划周期（week/month/quarter → 7/30/90 天）
// 红线: 纯编排,除接收快照外无 I/O;致命配置错误返回空分析 + error
// ==========================================

use crate::api::cache::{AnalysisCache, CacheKey};
use crate::config::PlanningConfig;
use crate::domain::analysis::{CapacityAnalysisResult, ScheduledOrder};
use crate::domain::order::Order;
use crate::domain::snapshot::PlanningSnapshot;
use crate::domain::stage::StageModel;
use crate::domain::types::PlanningPeriod;
use crate::engine::{
    compute_allocation, validate_snapshot, ForecastAnalyzer, PipelineSimulator,
    RecommendationEngine, SimulationOutcome,
};
use crate::error::{PlanningError, PlanningResult};
use crate::i18n::t_with_args;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// 预测天数截断结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizonAdjustment {
    Unchanged,
    /// 超出上限,截断到上限
    Clamped { requested: u32, max: u32 },
    /// 为 0,延长到 1 天
    Extended { requested: u32 },
}

/// 解析实际预测天数
pub fn resolve_horizon(requested: u32, max_horizon_days: u32) -> (u32, HorizonAdjustment) {
    if requested == 0 {
        return (1, HorizonAdjustment::Extended { requested });
    }
    if requested > max_horizon_days {
        let err = PlanningError::ForecastHorizonExceeded {
            requested,
            max: max_horizon_days,
        };
        warn!(error = %err, "预测天数超出上限,已截断");
        return (
            max_horizon_days,
            HorizonAdjustment::Clamped {
                requested,
                max: max_horizon_days,
            },
        );
    }
    (requested, HorizonAdjustment::Unchanged)
}

// ==========================================
// CapacityAnalysisService - 产能分析服务
// ==========================================
#[derive(Debug, Clone)]
pub struct CapacityAnalysisService {
    config: Arc<PlanningConfig>,
    cache: Option<Arc<AnalysisCache>>,
}

impl Default for CapacityAnalysisService {
    fn default() -> Self {
        Self::new(PlanningConfig::default())
    }
}

impl CapacityAnalysisService {
    /// 创建服务（配置应已校验）
    pub fn new(config: PlanningConfig) -> Self {
        let cache = if config.cache_enabled {
            Some(Arc::new(AnalysisCache::default()))
        } else {
            None
        };
        Self {
            config: Arc::new(config),
            cache,
        }
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    // ==========================================
    // 对外接口
    // ==========================================

    /// 按规划周期分析
    pub fn get_analysis(
        &self,
        snapshot: &PlanningSnapshot,
        period: PlanningPeriod,
    ) -> CapacityAnalysisResult {
        self.cached_analysis(snapshot, Some(period), period.horizon_days())
    }

    /// 按自定义预测天数分析（超出上限时截断并标记）
    pub fn get_analysis_for_horizon(
        &self,
        snapshot: &PlanningSnapshot,
        horizon_days: u32,
    ) -> CapacityAnalysisResult {
        self.cached_analysis(snapshot, None, horizon_days)
    }

    /// 多周期并行分析
    ///
    /// 每个周期在独立的阻塞任务中计算,整体受 analysis_timeout_ms 约束;
    /// 返回顺序与 periods 一致
    pub async fn get_analyses(
        &self,
        snapshot: Arc<PlanningSnapshot>,
        periods: &[PlanningPeriod],
    ) -> PlanningResult<Vec<CapacityAnalysisResult>> {
        let timeout_ms = self.config.analysis_timeout_ms;

        let handles = periods.iter().map(|&period| {
            let service = self.clone();
            let snapshot = Arc::clone(&snapshot);
            tokio::task::spawn_blocking(move || service.get_analysis(&snapshot, period))
        });

        let joined = tokio::time::timeout(Duration::from_millis(timeout_ms), join_all(handles))
            .await
            .map_err(|_| PlanningError::Timeout { timeout_ms })?;

        joined
            .into_iter()
            .map(|r| r.map_err(|e| PlanningError::Internal(format!("分析任务失败: {}", e))))
            .collect()
    }

    // ==========================================
    // 内部编排
    // ==========================================

    fn cached_analysis(
        &self,
        snapshot: &PlanningSnapshot,
        period: Option<PlanningPeriod>,
        requested_horizon: u32,
    ) -> CapacityAnalysisResult {
        let Some(cache) = &self.cache else {
            return self.run_analysis(snapshot, period, requested_horizon);
        };

        let key = CacheKey {
            fingerprint: snapshot.fingerprint(),
            horizon_days: requested_horizon,
        };
        if let Some(hit) = cache.get(&key) {
            let mut result = (*hit).clone();
            result.period = period;
            return result;
        }

        let result = self.run_analysis(snapshot, period, requested_horizon);
        cache.insert(key, Arc::new(result.clone()));
        result
    }

    #[instrument(skip(self, snapshot), fields(
        as_of = %snapshot.as_of,
        stages = snapshot.stages.len(),
        orders = snapshot.orders.len()
    ))]
    fn run_analysis(
        &self,
        snapshot: &PlanningSnapshot,
        period: Option<PlanningPeriod>,
        requested_horizon: u32,
    ) -> CapacityAnalysisResult {
        let locale = self.config.locale.as_str();
        let (horizon_days, adjustment) =
            resolve_horizon(requested_horizon, self.config.max_horizon_days);

        // 1. 工序模型（致命）
        let model = match StageModel::new(snapshot.stages.clone()) {
            Ok(model) => model,
            Err(err) => {
                warn!(error = %err, "工序配置错误,返回空分析");
                return CapacityAnalysisResult::empty(
                    period,
                    horizon_days,
                    snapshot.as_of,
                    Some(err.to_string()),
                );
            }
        };

        info!(horizon_days, "开始产能分析");

        // 2. 订单校验（单订单级别）
        let queue = snapshot.order_queue();
        let validation = validate_snapshot(&model, &queue);

        // 3. 仿真
        let simulator = PipelineSimulator::new().with_transfer_delay(self.config.transfer_delay_days);
        let outcome = simulator.simulate(&model, &validation.accepted, horizon_days, snapshot.as_of);

        // 4. 预测
        let analyzer =
            ForecastAnalyzer::new(self.config.trailing_window_days, self.config.headroom_percent);
        let analysis = analyzer.analyze(&model, &outcome);

        // 5. 建议
        let recommendation_details = RecommendationEngine::new(locale)
            .classify(&analysis.stage_summaries, &analysis.forecast);
        let recommendations = recommendation_details
            .iter()
            .map(|r| r.message.clone())
            .collect();

        // 6. 排程视图
        let schedule = build_schedule(&outcome, &queue.orders);
        let unscheduled_order_count = outcome.unscheduled_count();

        // 7. 提示信息
        let mut warnings = Vec::new();
        match adjustment {
            HorizonAdjustment::Unchanged => {}
            HorizonAdjustment::Clamped { requested, max } => warnings.push(t_with_args(
                locale,
                "analysis.horizon_clamped",
                &[("requested", requested.to_string().as_str()), ("max", max.to_string().as_str())],
            )),
            HorizonAdjustment::Extended { requested } => warnings.push(t_with_args(
                locale,
                "analysis.horizon_too_short",
                &[("requested", requested.to_string().as_str()), ("max", horizon_days.to_string().as_str())],
            )),
        }
        if !validation.skipped.is_empty() {
            warnings.push(t_with_args(
                locale,
                "analysis.orders_skipped",
                &[("count", validation.skipped.len().to_string().as_str())],
            ));
        }
        if unscheduled_order_count > 0 {
            warnings.push(t_with_args(
                locale,
                "analysis.orders_unfinished",
                &[("count", unscheduled_order_count.to_string().as_str())],
            ));
        }

        info!(
            horizon_days,
            skipped = validation.skipped.len(),
            unfinished = unscheduled_order_count,
            recommendations = recommendation_details.len(),
            "产能分析完成"
        );

        CapacityAnalysisResult {
            period,
            horizon_days,
            start_date: snapshot.as_of,
            horizon_clamped: adjustment != HorizonAdjustment::Unchanged,
            error: None,
            skipped_order_count: validation.skipped.len(),
            skipped_orders: validation.skipped,
            unscheduled_order_count,
            stages: analysis.stage_summaries,
            schedule,
            capacity_forecast: analysis.forecast,
            recommendations,
            recommendation_details,
            resource_allocation: compute_allocation(&snapshot.resources),
            warnings,
        }
    }
}

/// 排程结果关联订单元数据（按排队名次排列）
fn build_schedule(outcome: &SimulationOutcome, orders: &[Order]) -> Vec<ScheduledOrder> {
    let mut by_id: HashMap<&str, &Order> = HashMap::with_capacity(orders.len());
    for order in orders {
        by_id.entry(order.id.as_str()).or_insert(order);
    }

    outcome
        .orders
        .iter()
        .filter_map(|scheduled| {
            let order = by_id.get(scheduled.order_id.as_str())?;
            Some(ScheduledOrder {
                order_id: order.id.clone(),
                order_number: order.order_number.clone(),
                customer_name: order.customer_name.clone(),
                priority: order.priority,
                status: scheduled.status,
                start_date: scheduled.start_date(),
                end_date: scheduled.end_date(),
                current_stage: scheduled.assignments.first().map(|a| a.stage.clone()),
                stages: scheduled.assignments.clone(),
            })
        })
        .collect()
}
