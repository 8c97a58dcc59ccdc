// ==========================================
// 家具产能规划 - 配置层
// ==========================================
// 职责: 规划参数（默认值 / JSON 文件 / 环境变量覆写）
// ==========================================

pub mod planning_config;

// 重导出核心配置
pub use planning_config::{config_keys, PlanningConfig, MAX_HORIZON_DAYS_LIMIT, SUPPORTED_LOCALES};
