// ==========================================
// 家具产能规划 - 资源池
// ==========================================
// 职责: 人力/设备等资源的已分配与可用数量（直接比例,不参与仿真）
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePool {
    pub resource_type: String, // 资源类型（如 "carpenters"、"cnc_router"）
    pub allocated: u32,        // 已分配数量
    pub available: u32,        // 可用数量
}

impl ResourcePool {
    pub fn new(resource_type: impl Into<String>, allocated: u32, available: u32) -> Self {
        Self {
            resource_type: resource_type.into(),
            allocated,
            available,
        }
    }
}
