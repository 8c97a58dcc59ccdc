// ==========================================
// 家具产能规划 - 分析派生对象与结果契约
// ==========================================
// 职责: 仿真/预测/建议的派生实体,以及交给 UI 层的 CapacityAnalysisResult
// 红线: 派生对象只在一次分析调用内存在,不回写
// ==========================================

use super::types::{PlanningPeriod, Priority, ScheduleStatus, Severity, Utilization};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// 仿真派生对象
// ==========================================

/// 工序-日占用记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOccupancy {
    pub stage: String,
    pub day: u32,
    pub date: NaiveDate,
    pub in_progress: u32, // 已占用槽位
    pub queued: u32,      // 排队等待
    pub demand: u32,      // in_progress + queued
    pub capacity: u32,
    pub utilization_percent: Utilization,
}

impl DailyOccupancy {
    /// 需求超过产能（排队订单存在且产能已满）
    pub fn is_overflowing(&self) -> bool {
        self.demand > self.capacity
    }
}

/// 订单-工序排程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageAssignment {
    pub stage: String,
    pub estimated_start: Option<NaiveDate>,
    pub estimated_end: Option<NaiveDate>,
    pub duration_days: u32,
}

impl StageAssignment {
    pub fn is_complete(&self) -> bool {
        self.estimated_end.is_some()
    }
}

// ==========================================
// 预测派生对象
// ==========================================

/// 预测期内单日汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub total_demand: u32,
    pub total_capacity: u32,
    pub utilization_percent: Utilization,
    pub bottleneck_stage: Option<String>,
}

/// 工序汇总（day 0 为"当前"）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub name: String,
    pub stage_order: i32,
    pub current_load: u32,
    pub max_capacity: u32,
    pub utilization_percent: Utilization,
    pub projected_overflow_date: Option<NaiveDate>,
    pub recommended_capacity: u32,
    /// 预测期最后一天仍在排队的订单数
    pub backlog: u32,
    pub peak_utilization_percent: Utilization,
}

/// 分级建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub stage: String,
    pub message: String,
}

// ==========================================
// 结果契约
// ==========================================

/// 订单排程视图（排程结果 + 订单元数据）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOrder {
    pub order_id: String,
    pub order_number: String,
    pub customer_name: Option<String>,
    pub priority: Priority,
    pub status: ScheduleStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub current_stage: Option<String>,
    pub stages: Vec<StageAssignment>,
}

/// 资源分配效率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    pub resource_type: String,
    pub allocated: u32,
    pub available: u32,
    pub efficiency: Utilization,
}

/// 被拒绝的订单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedOrder {
    pub order_id: String,
    pub reason: String,
}

/// 产能分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityAnalysisResult {
    // ===== 请求上下文 =====
    pub period: Option<PlanningPeriod>,
    pub horizon_days: u32,
    pub start_date: NaiveDate,
    pub horizon_clamped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    // ===== 数据质量 =====
    pub skipped_orders: Vec<SkippedOrder>,
    pub skipped_order_count: usize,
    pub unscheduled_order_count: usize,

    // ===== 分析内容 =====
    pub stages: Vec<StageSummary>,
    pub schedule: Vec<ScheduledOrder>,
    pub capacity_forecast: Vec<ForecastPoint>,
    pub recommendations: Vec<String>,
    pub recommendation_details: Vec<Recommendation>,
    pub resource_allocation: Vec<ResourceAllocation>,
    pub warnings: Vec<String>,
}

impl CapacityAnalysisResult {
    /// 空分析（致命配置错误时返回,不含任何部分结果）
    pub fn empty(
        period: Option<PlanningPeriod>,
        horizon_days: u32,
        start_date: NaiveDate,
        error: Option<String>,
    ) -> Self {
        Self {
            period,
            horizon_days,
            start_date,
            horizon_clamped: false,
            error,
            skipped_orders: Vec::new(),
            skipped_order_count: 0,
            unscheduled_order_count: 0,
            stages: Vec::new(),
            schedule: Vec::new(),
            capacity_forecast: Vec::new(),
            recommendations: Vec::new(),
            recommendation_details: Vec::new(),
            resource_allocation: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn stage(&self, name: &str) -> Option<&StageSummary> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn scheduled_order(&self, order_id: &str) -> Option<&ScheduledOrder> {
        self.schedule.iter().find(|o| o.order_id == order_id)
    }
}
