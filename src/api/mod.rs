// ==========================================
// 家具产能规划 - API 层
// ==========================================
// 职责: 对外暴露产能分析服务（HTTP 适配在本库之外）
// ==========================================

pub mod cache;
pub mod capacity_api;

// 重导出核心类型
pub use cache::{AnalysisCache, CacheKey};
pub use capacity_api::{resolve_horizon, CapacityAnalysisService, HorizonAdjustment};
