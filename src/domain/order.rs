// ==========================================
// 家具产能规划 - 订单队列快照
// ==========================================
// 职责: 在制订单的不可变输入
// 红线: 每个概念只有一个规范字段,别名归一化由外部适配层完成
// ==========================================

use super::types::Priority;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// StageRequirement - 订单对单个工序的需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageRequirement {
    pub stage: String,      // 工序名称
    pub duration_days: u32, // 预计工期（天,≥1）
}

impl StageRequirement {
    pub fn new(stage: impl Into<String>, duration_days: u32) -> Self {
        Self {
            stage: stage.into(),
            duration_days,
        }
    }
}

// ==========================================
// Order - 在制订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    // ===== 标识 =====
    pub id: String,
    pub order_number: String,
    #[serde(default)]
    pub customer_name: Option<String>,

    // ===== 排序依据 =====
    pub priority: Priority,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    // ===== 工艺路线 =====
    pub required_stages: Vec<StageRequirement>,

    /// 第 0 天已在首道工序占用槽位
    #[serde(default)]
    pub in_progress: bool,
}

impl Order {
    /// 构造订单（order_number 默认与 id 相同）
    pub fn new(id: impl Into<String>, priority: Priority) -> Self {
        let id = id.into();
        Self {
            order_number: id.clone(),
            id,
            customer_name: None,
            priority,
            deadline: None,
            required_stages: Vec::new(),
            in_progress: false,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>, duration_days: u32) -> Self {
        self.required_stages
            .push(StageRequirement::new(stage, duration_days));
        self
    }

    pub fn with_customer(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = Some(customer_name.into());
        self
    }

    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = order_number.into();
        self
    }

    pub fn started(mut self) -> Self {
        self.in_progress = true;
        self
    }
}

// ==========================================
// OrderQueueSnapshot - 订单队列快照
// ==========================================
// as_of 即仿真起始日期,不依赖系统时钟
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderQueueSnapshot {
    pub as_of: NaiveDate,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl OrderQueueSnapshot {
    pub fn new(as_of: NaiveDate, orders: Vec<Order>) -> Self {
        Self { as_of, orders }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
