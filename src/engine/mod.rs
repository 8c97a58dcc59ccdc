// ==========================================
// 家具产能规划 - 引擎层
// ==========================================
// 职责: 校验、排序、仿真、预测、建议分级
// 红线: 引擎均为纯函数式计算,不做 I/O,不读系统时钟
// ==========================================

pub mod forecast;
pub mod priority;
pub mod recommendation;
pub mod resource_allocation;
pub mod simulator;
pub mod validation;

// 重导出核心引擎
pub use forecast::{ForecastAnalysis, ForecastAnalyzer, SUSTAINED_OVERFLOW_DAYS};
pub use priority::PrioritySorter;
pub use recommendation::{
    classify_severity, RecommendationEngine, CRITICAL_UTILIZATION_PERCENT,
    WARNING_UTILIZATION_PERCENT,
};
pub use resource_allocation::compute_allocation;
pub use simulator::{OrderSchedule, PipelineSimulator, SimulationOutcome};
pub use validation::{resolve_route, validate_snapshot, RouteStep, RoutedOrder, ValidationOutcome};
