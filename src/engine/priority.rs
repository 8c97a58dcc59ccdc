// ==========================================
// 家具产能规划 - 订单优先级排序
// ==========================================
// 职责: 确定仿真全程固定的订单排队顺序
// 红线: 顺序在一次仿真内不重排（公平性 + 确定性）
// ==========================================

use crate::domain::order::Order;
use std::cmp::Ordering;

// ==========================================
// PrioritySorter - 订单排序器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct PrioritySorter {
    // 无状态排序器
}

impl PrioritySorter {
    pub fn new() -> Self {
        Self {}
    }

    /// 比较两个订单的优先级
    ///
    /// 排序键:
    /// 1. priority 升序（urgent > high > normal > low）
    /// 2. deadline 升序（无交期排在所有有交期订单之后）
    /// 3. id 升序（最终稳定键）
    ///
    /// # 返回
    /// Ordering::Less 表示 a 优先于 b
    pub fn compare(&self, a: &Order, b: &Order) -> Ordering {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| Self::compare_deadline(a, b))
            .then_with(|| a.id.cmp(&b.id))
    }

    fn compare_deadline(a: &Order, b: &Order) -> Ordering {
        match (a.deadline, b.deadline) {
            (Some(da), Some(db)) => da.cmp(&db),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
