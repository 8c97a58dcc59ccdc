// ==========================================
// 家具产能规划 - 产能预测分析
// ==========================================
// 职责: 由仿真占用序列得出利用率、瓶颈、持续超载与建议产能
// 口径:
// - 当前利用率只取第 0 天
// - 持续超载: 连续 SUSTAINED_OVERFLOW_DAYS 天 demand > capacity
// - 瓶颈: 利用率最高的工序,平局取流水线靠前者
// - 建议产能: ceil(尾部平均需求 × 余量),不低于当前产能
// ==========================================

use crate::domain::analysis::{DailyOccupancy, ForecastPoint, StageSummary};
use crate::domain::stage::StageModel;
use crate::domain::types::Utilization;
use crate::engine::simulator::SimulationOutcome;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// 持续超载判定天数（固定口径,不按调用配置）
pub const SUSTAINED_OVERFLOW_DAYS: usize = 3;

/// 默认尾部平均窗口（天）
pub const DEFAULT_TRAILING_WINDOW_DAYS: u32 = 7;

/// 默认建议产能余量（百分比）
pub const DEFAULT_HEADROOM_PERCENT: u32 = 110;

/// 预测分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastAnalysis {
    /// 按流水线顺序
    pub stage_summaries: Vec<StageSummary>,
    pub forecast: Vec<ForecastPoint>,
}

impl ForecastAnalysis {
    /// 各工序建议产能 (工序名, 建议产能)
    pub fn recommended_capacity(&self) -> Vec<(String, u32)> {
        self.stage_summaries
            .iter()
            .map(|s| (s.name.clone(), s.recommended_capacity))
            .collect()
    }
}

// ==========================================
// ForecastAnalyzer - 产能预测分析器
// ==========================================
#[derive(Debug, Clone)]
pub struct ForecastAnalyzer {
    trailing_window_days: u32,
    headroom_percent: u32,
}

impl Default for ForecastAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TRAILING_WINDOW_DAYS, DEFAULT_HEADROOM_PERCENT)
    }
}

impl ForecastAnalyzer {
    pub fn new(trailing_window_days: u32, headroom_percent: u32) -> Self {
        Self {
            trailing_window_days: trailing_window_days.max(1),
            headroom_percent: headroom_percent.max(100),
        }
    }

    /// 分析仿真结果
    #[instrument(skip(self, model, outcome), fields(
        stages = model.len(),
        horizon_days = outcome.horizon_days
    ))]
    pub fn analyze(&self, model: &StageModel, outcome: &SimulationOutcome) -> ForecastAnalysis {
        let stage_summaries: Vec<StageSummary> = model
            .stages()
            .iter()
            .enumerate()
            .map(|(idx, stage)| {
                let series = outcome.stage_series(idx);
                let current_load = series.first().map(|o| o.demand).unwrap_or(0);
                let utilization_percent = series
                    .first()
                    .map(|o| o.utilization_percent)
                    .unwrap_or_else(|| Utilization::from_counts(0, stage.max_capacity));
                let peak_utilization_percent = series
                    .iter()
                    .map(|o| o.utilization_percent)
                    .fold(utilization_percent, |peak, u| if u > peak { u } else { peak });

                StageSummary {
                    name: stage.name.clone(),
                    stage_order: stage.order,
                    current_load,
                    max_capacity: stage.max_capacity,
                    utilization_percent,
                    projected_overflow_date: projected_overflow_date(series),
                    recommended_capacity: recommended_capacity(
                        series,
                        stage.max_capacity,
                        self.trailing_window_days,
                        self.headroom_percent,
                    ),
                    backlog: outcome.final_backlog.get(idx).copied().unwrap_or(0),
                    peak_utilization_percent,
                }
            })
            .collect();

        let forecast: Vec<ForecastPoint> = (0..outcome.horizon_days as usize)
            .filter_map(|day| forecast_point(model, outcome, day))
            .collect();

        debug!(
            forecast_days = forecast.len(),
            overflowing_stages = stage_summaries
                .iter()
                .filter(|s| s.projected_overflow_date.is_some())
                .count(),
            "产能预测分析完成"
        );

        ForecastAnalysis {
            stage_summaries,
            forecast,
        }
    }
}

// ==========================================
// 口径函数
// ==========================================

/// 持续超载起始日
///
/// 第一个满足 d, d+1, d+2 均 demand > capacity 的日子;单日尖峰不算
pub fn projected_overflow_date(series: &[DailyOccupancy]) -> Option<NaiveDate> {
    let mut run_start: Option<usize> = None;
    for (idx, occupancy) in series.iter().enumerate() {
        if occupancy.is_overflowing() {
            let start = *run_start.get_or_insert(idx);
            if idx + 1 - start >= SUSTAINED_OVERFLOW_DAYS {
                return Some(series[start].date);
            }
        } else {
            run_start = None;
        }
    }
    None
}

/// 建议产能
///
/// ceil(尾部 window 天平均需求 × headroom_percent / 100),不低于 max_capacity。
/// 整数运算,避免 10 × 1.1 之类被浮点误差向上取整
pub fn recommended_capacity(
    series: &[DailyOccupancy],
    max_capacity: u32,
    trailing_window_days: u32,
    headroom_percent: u32,
) -> u32 {
    let window = (trailing_window_days as usize).min(series.len());
    if window == 0 {
        return max_capacity;
    }

    let demand_sum: u64 = series[series.len() - window..]
        .iter()
        .map(|o| o.demand as u64)
        .sum();
    let denominator = window as u64 * 100;
    let numerator = demand_sum * headroom_percent as u64;
    let recommended = (numerator + denominator - 1) / denominator;

    u32::try_from(recommended)
        .unwrap_or(u32::MAX)
        .max(max_capacity)
}

/// 当日瓶颈工序
///
/// 按流水线顺序扫描,只有严格更高的利用率才替换,平局保留靠前工序。
/// 当日无任何需求时无瓶颈
pub fn bottleneck_stage(model: &StageModel, outcome: &SimulationOutcome, day: usize) -> Option<String> {
    let mut best: Option<(usize, Utilization)> = None;
    let mut total_demand: u64 = 0;

    for idx in 0..model.len() {
        let occupancy = outcome.stage_series(idx).get(day)?;
        total_demand += occupancy.demand as u64;
        let u = occupancy.utilization_percent;
        match best {
            Some((_, best_u)) if u <= best_u => {}
            _ => best = Some((idx, u)),
        }
    }

    if total_demand == 0 {
        return None;
    }
    best.and_then(|(idx, _)| model.get(idx)).map(|s| s.name.clone())
}

fn forecast_point(model: &StageModel, outcome: &SimulationOutcome, day: usize) -> Option<ForecastPoint> {
    let mut total_demand: u32 = 0;
    let mut total_capacity: u32 = 0;
    let mut date: Option<NaiveDate> = None;

    for idx in 0..model.len() {
        let occupancy = outcome.stage_series(idx).get(day)?;
        total_demand = total_demand.saturating_add(occupancy.demand);
        total_capacity = total_capacity.saturating_add(occupancy.capacity);
        date = Some(occupancy.date);
    }

    Some(ForecastPoint {
        date: date?,
        total_demand,
        total_capacity,
        utilization_percent: Utilization::from_counts(total_demand, total_capacity),
        bottleneck_stage: bottleneck_stage(model, outcome, day),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::Stage;
    use chrono::Duration;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn series(stage: &str, capacity: u32, demands: &[u32]) -> Vec<DailyOccupancy> {
        demands
            .iter()
            .enumerate()
            .map(|(day, &demand)| DailyOccupancy {
                stage: stage.to_string(),
                day: day as u32,
                date: start() + Duration::days(day as i64),
                in_progress: demand.min(capacity),
                queued: demand.saturating_sub(capacity),
                demand,
                capacity,
                utilization_percent: Utilization::from_counts(demand, capacity),
            })
            .collect()
    }

    fn outcome(occupancy: Vec<Vec<DailyOccupancy>>) -> SimulationOutcome {
        let horizon_days = occupancy.first().map(|s| s.len() as u32).unwrap_or(0);
        let final_backlog = occupancy
            .iter()
            .map(|s| s.last().map(|o| o.queued).unwrap_or(0))
            .collect();
        SimulationOutcome {
            start_date: start(),
            horizon_days,
            orders: Vec::new(),
            occupancy,
            final_backlog,
        }
    }

    // ==========================================
    // 持续超载（连续 3 天）
    // ==========================================

    #[test]
    fn test_single_day_spike_is_not_sustained_overflow() {
        let s = series("Cutting", 2, &[3, 2, 1, 3, 1]);
        assert_eq!(projected_overflow_date(&s), None);
    }

    #[test]
    fn test_two_day_run_is_not_sustained_overflow() {
        let s = series("Cutting", 2, &[3, 3, 2, 3, 3]);
        assert_eq!(projected_overflow_date(&s), None);
    }

    #[test]
    fn test_three_day_run_sets_first_day() {
        let s = series("Cutting", 2, &[1, 3, 2, 3, 4, 5, 6]);
        assert_eq!(projected_overflow_date(&s), Some(start() + Duration::days(3)));
    }

    #[test]
    fn test_demand_equal_to_capacity_is_not_overflow() {
        let s = series("Cutting", 2, &[2, 2, 2, 2]);
        assert_eq!(projected_overflow_date(&s), None);
    }

    #[test]
    fn test_zero_capacity_backlog_is_overflow() {
        let s = series("Finishing", 0, &[1, 1, 1]);
        assert_eq!(projected_overflow_date(&s), Some(start()));
    }

    // ==========================================
    // 建议产能
    // ==========================================

    #[test]
    fn test_recommended_capacity_exact_multiple() {
        // 平均 10 × 1.1 = 11,不能被浮点误差抬到 12
        let s = series("Assembly", 5, &[10; 7]);
        assert_eq!(recommended_capacity(&s, 5, 7, 110), 11);
    }

    #[test]
    fn test_recommended_capacity_uses_trailing_window() {
        let mut demands = vec![100; 10];
        demands.extend_from_slice(&[3; 7]);
        let s = series("Assembly", 2, &demands);
        // ceil(3 × 1.1) = 4
        assert_eq!(recommended_capacity(&s, 2, 7, 110), 4);
    }

    #[test]
    fn test_recommended_capacity_never_decreases() {
        let s = series("Assembly", 8, &[1, 0, 2, 1, 0, 0, 1]);
        assert_eq!(recommended_capacity(&s, 8, 7, 110), 8);
        assert_eq!(recommended_capacity(&[], 8, 7, 110), 8);
    }

    #[test]
    fn test_recommended_capacity_short_series() {
        let s = series("Assembly", 1, &[4, 6]);
        // 平均 5 × 1.1 = 5.5 → 6
        assert_eq!(recommended_capacity(&s, 1, 7, 110), 6);
    }

    // ==========================================
    // 瓶颈判定
    // ==========================================

    #[test]
    fn test_bottleneck_tie_goes_to_upstream_stage() {
        let model = StageModel::new(vec![Stage::new("B", 20, 2), Stage::new("A", 10, 4)]).unwrap();
        // A 与 B 同为 50%
        let out = outcome(vec![series("A", 4, &[2]), series("B", 2, &[1])]);
        assert_eq!(bottleneck_stage(&model, &out, 0), Some("A".to_string()));
    }

    #[test]
    fn test_bottleneck_highest_utilization_wins() {
        let model = StageModel::new(vec![Stage::new("A", 10, 4), Stage::new("B", 20, 2)]).unwrap();
        let out = outcome(vec![series("A", 4, &[2]), series("B", 2, &[2])]);
        assert_eq!(bottleneck_stage(&model, &out, 0), Some("B".to_string()));
    }

    #[test]
    fn test_no_bottleneck_without_demand() {
        let model = StageModel::new(vec![Stage::new("A", 10, 4)]).unwrap();
        let out = outcome(vec![series("A", 4, &[0])]);
        assert_eq!(bottleneck_stage(&model, &out, 0), None);
        assert_eq!(bottleneck_stage(&model, &out, 5), None);
    }

    // ==========================================
    // 综合分析
    // ==========================================

    #[test]
    fn test_analyze_summary_uses_day_zero() {
        let model = StageModel::new(vec![Stage::new("A", 10, 2), Stage::new("B", 20, 1)]).unwrap();
        let out = outcome(vec![series("A", 2, &[1, 4, 4, 4]), series("B", 1, &[0, 1, 1, 0])]);

        let analysis = ForecastAnalyzer::default().analyze(&model, &out);
        let a = &analysis.stage_summaries[0];
        assert_eq!(a.current_load, 1);
        assert_eq!(a.utilization_percent, out.occupancy[0][0].utilization_percent);
        assert_eq!(a.peak_utilization_percent, Utilization::Percent(200.0));
        assert_eq!(a.projected_overflow_date, Some(start() + Duration::days(1)));
        assert_eq!(a.backlog, 2);

        assert_eq!(analysis.forecast.len(), 4);
        let day1 = &analysis.forecast[1];
        assert_eq!(day1.total_demand, 5);
        assert_eq!(day1.total_capacity, 3);
        assert_eq!(day1.bottleneck_stage.as_deref(), Some("A"));
        assert_eq!(analysis.recommended_capacity()[1], ("B".to_string(), 1));
    }

    #[test]
    fn test_analyze_zero_capacity_forecast_point() {
        let model = StageModel::new(vec![Stage::new("A", 10, 0)]).unwrap();
        let out = outcome(vec![series("A", 0, &[2])]);
        let analysis = ForecastAnalyzer::default().analyze(&model, &out);
        assert!(analysis.forecast[0].utilization_percent.is_overflow());
        assert!(analysis.stage_summaries[0].utilization_percent.is_overflow());
    }

    #[test]
    fn test_zero_capacity_without_demand_has_no_bottleneck() {
        let model = StageModel::new(vec![Stage::new("Cutting", 10, 2), Stage::new("Finishing", 20, 0)]).unwrap();
        let out = outcome(vec![series("Cutting", 2, &[0, 0]), series("Finishing", 0, &[0, 0])]);

        let analysis = ForecastAnalyzer::default().analyze(&model, &out);
        let finishing = &analysis.stage_summaries[1];
        assert!(finishing.utilization_percent.is_overflow());
        assert_eq!(finishing.projected_overflow_date, None);
        assert_eq!(
            crate::engine::recommendation::classify_severity(finishing),
            Some(crate::domain::types::Severity::Critical)
        );

        for point in &analysis.forecast {
            assert_eq!(point.total_demand, 0);
            assert_eq!(point.total_capacity, 2);
            assert_eq!(point.utilization_percent, Utilization::Percent(0.0));
            assert_eq!(point.bottleneck_stage, None);
        }
    }
}
