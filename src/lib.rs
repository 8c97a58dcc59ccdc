// ==========================================
// 家具产能规划 - 核心库
// ==========================================
// 系统定位: 多工序产能仿真与扩产建议（决策支持,不直接排产）
// 流程: 快照 → 校验 → 逐日仿真 → 预测汇总 → 建议分级
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 工序、订单、分析结果
pub mod domain;

// 引擎层 - 仿真与预测
pub mod engine;

// 配置层 - 规划参数
pub mod config;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 产能分析服务
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{PlanningPeriod, Priority, ScheduleStatus, Severity, Utilization};

// 领域实体
pub use domain::{
    CapacityAnalysisResult, Order, OrderQueueSnapshot, PlanningSnapshot, ResourcePool, Stage,
    StageModel, StageRequirement,
};

// 引擎
pub use engine::{ForecastAnalyzer, PipelineSimulator, PrioritySorter, RecommendationEngine};

// API
pub use api::CapacityAnalysisService;

// 配置与错误
pub use config::PlanningConfig;
pub use error::{PlanningError, PlanningResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "家具产能规划系统";
