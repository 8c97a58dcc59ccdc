// ==========================================
// 家具产能规划 - 资源分配效率
// ==========================================
// 职责: 已分配 / 可用 的直接比例,不参与仿真
// 口径: available = 0 且 allocated > 0 → overflow;两者均为 0 → 0%
// ==========================================

use crate::domain::analysis::ResourceAllocation;
use crate::domain::resource::ResourcePool;
use crate::domain::types::Utilization;

/// 计算各资源类型的分配效率（保持输入顺序）
pub fn compute_allocation(resources: &[ResourcePool]) -> Vec<ResourceAllocation> {
    resources
        .iter()
        .map(|pool| {
            let efficiency = if pool.available == 0 && pool.allocated == 0 {
                Utilization::Percent(0.0)
            } else {
                Utilization::from_counts(pool.allocated, pool.available)
            };
            ResourceAllocation {
                resource_type: pool.resource_type.clone(),
                allocated: pool.allocated,
                available: pool.available,
                efficiency,
            }
        })
        .collect()
}
