// ==========================================
// 家具产能规划 - 规划输入快照
// ==========================================
// 职责: 外部订单/生产数据源给出的单一输入文档
// ==========================================

use super::order::{Order, OrderQueueSnapshot};
use super::resource::ResourcePool;
use super::stage::Stage;
use crate::error::PlanningResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    pub as_of: NaiveDate,
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub resources: Vec<ResourcePool>,
}

impl PlanningSnapshot {
    pub fn new(as_of: NaiveDate, stages: Vec<Stage>, orders: Vec<Order>) -> Self {
        Self {
            as_of,
            stages,
            orders,
            resources: Vec::new(),
        }
    }

    pub fn with_resources(mut self, resources: Vec<ResourcePool>) -> Self {
        self.resources = resources;
        self
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> PlanningResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// 订单队列视图
    pub fn order_queue(&self) -> OrderQueueSnapshot {
        OrderQueueSnapshot::new(self.as_of, self.orders.clone())
    }

    /// 快照内容指纹（缓存键,只取决于内容）
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
