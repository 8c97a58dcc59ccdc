// ==========================================
// 家具产能规划 - 领域模型层
// ==========================================
// 职责: 定义工序、订单、资源等输入实体,以及分析派生对象
// 红线: 不含仿真逻辑,不含 I/O（快照文件加载除外）
// ==========================================

pub mod analysis;
pub mod order;
pub mod resource;
pub mod snapshot;
pub mod stage;
pub mod types;

// 重导出核心类型
pub use analysis::{
    CapacityAnalysisResult, DailyOccupancy, ForecastPoint, Recommendation, ResourceAllocation,
    ScheduledOrder, SkippedOrder, StageAssignment, StageSummary,
};
pub use order::{Order, OrderQueueSnapshot, StageRequirement};
pub use resource::ResourcePool;
pub use snapshot::PlanningSnapshot;
pub use stage::{Stage, StageModel};
pub use types::{PlanningPeriod, Priority, ScheduleStatus, Severity, Utilization};
