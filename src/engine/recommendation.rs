// ==========================================
// 家具产能规划 - 建议分级引擎
// ==========================================
// 职责: 按固定数值阈值判定建议等级,再渲染文本
// 红线: 等级由数值判定,不从文本关键字反推
// 输出顺序: critical → warning → info,同级按流水线顺序
// ==========================================

use crate::domain::analysis::{ForecastPoint, Recommendation, StageSummary};
use crate::domain::types::{Severity, Utilization};
use crate::i18n::t_with_args;
use chrono::NaiveDate;
use tracing::debug;

/// 严重阈值: 利用率 ≥ 100%
pub const CRITICAL_UTILIZATION_PERCENT: f64 = 100.0;

/// 预警阈值: 90% ≤ 利用率 < 100%
pub const WARNING_UTILIZATION_PERCENT: f64 = 90.0;

/// 判定单个工序的建议等级
///
/// - 利用率 ≥ 100% 或存在持续超载日 → Critical
/// - 90% ≤ 利用率 < 100% → Warning
/// - 其余情况仅当建议产能 > 当前产能 → Info
/// - 否则无建议
pub fn classify_severity(summary: &StageSummary) -> Option<Severity> {
    if summary.utilization_percent.at_least(CRITICAL_UTILIZATION_PERCENT)
        || summary.projected_overflow_date.is_some()
    {
        Some(Severity::Critical)
    } else if summary.utilization_percent.at_least(WARNING_UTILIZATION_PERCENT) {
        Some(Severity::Warning)
    } else if summary.recommended_capacity > summary.max_capacity {
        Some(Severity::Info)
    } else {
        None
    }
}

/// 百分比显示: 整数不带小数,否则保留 1 位
fn format_percent(u: &Utilization) -> String {
    match u {
        Utilization::Percent(p) if (p - p.round()).abs() < 1e-9 => format!("{:.0}", p),
        Utilization::Percent(p) => format!("{:.1}", p),
        Utilization::Overflow => Utilization::OVERFLOW_LABEL.to_string(),
    }
}

// ==========================================
// RecommendationEngine - 建议分级引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    locale: String,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new("en")
    }
}

impl RecommendationEngine {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    /// 生成有序建议列表
    pub fn classify(
        &self,
        summaries: &[StageSummary],
        forecast: &[ForecastPoint],
    ) -> Vec<Recommendation> {
        let mut keyed: Vec<(Severity, i32, Recommendation)> = summaries
            .iter()
            .filter_map(|summary| {
                let severity = classify_severity(summary)?;
                let message = self.render(severity, summary, forecast);
                Some((
                    severity,
                    summary.stage_order,
                    Recommendation {
                        severity,
                        stage: summary.name.clone(),
                        message,
                    },
                ))
            })
            .collect();

        keyed.sort_by_key(|(severity, stage_order, _)| (*severity, *stage_order));

        debug!(
            critical = keyed.iter().filter(|(s, _, _)| *s == Severity::Critical).count(),
            warning = keyed.iter().filter(|(s, _, _)| *s == Severity::Warning).count(),
            info = keyed.iter().filter(|(s, _, _)| *s == Severity::Info).count(),
            "建议分级完成"
        );

        keyed.into_iter().map(|(_, _, rec)| rec).collect()
    }

    fn render(&self, severity: Severity, summary: &StageSummary, forecast: &[ForecastPoint]) -> String {
        let stage = summary.name.as_str();
        match severity {
            Severity::Critical => {
                if summary.max_capacity == 0 {
                    let backlog = summary.backlog.max(summary.current_load).to_string();
                    t_with_args(
                        &self.locale,
                        "recommendation.critical_no_capacity",
                        &[("stage", stage), ("backlog", backlog.as_str())],
                    )
                } else if let Some(date) = summary.projected_overflow_date {
                    let date = date.to_string();
                    t_with_args(
                        &self.locale,
                        "recommendation.critical_overflow",
                        &[("stage", stage), ("date", date.as_str())],
                    )
                } else {
                    let percent = format_percent(&summary.utilization_percent);
                    t_with_args(
                        &self.locale,
                        "recommendation.critical_at_capacity",
                        &[("stage", stage), ("percent", percent.as_str())],
                    )
                }
            }
            Severity::Warning => {
                let percent = format_percent(&summary.utilization_percent);
                t_with_args(
                    &self.locale,
                    "recommendation.warning_approaching",
                    &[("stage", stage), ("percent", percent.as_str())],
                )
            }
            Severity::Info => {
                let capacity = summary.recommended_capacity.to_string();
                let date = plan_by_date(stage, forecast)
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                t_with_args(
                    &self.locale,
                    "recommendation.info_plan_increase",
                    &[("stage", stage), ("capacity", capacity.as_str()), ("date", date.as_str())],
                )
            }
        }
    }
}

/// 扩产目标日期: 该工序首次成为瓶颈的日子,否则为预测期最后一天
fn plan_by_date(stage: &str, forecast: &[ForecastPoint]) -> Option<NaiveDate> {
    forecast
        .iter()
        .find(|p| p.bottleneck_stage.as_deref() == Some(stage))
        .or_else(|| forecast.last())
        .map(|p| p.date)
}
