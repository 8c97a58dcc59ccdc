// ==========================================
// 家具产能规划 - 工序模型
// ==========================================
// 职责: 描述有序生产流水线及各工序并发产能
// 红线: 工序在一次分析内不可变,不由仿真创建
// ==========================================

use crate::error::{PlanningError, PlanningResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Stage - 工序
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,      // 工序名称（唯一）
    pub order: i32,        // 流水线顺序（唯一,允许间隔）
    pub max_capacity: u32, // 并发订单槽位数
}

impl Stage {
    pub fn new(name: impl Into<String>, order: i32, max_capacity: u32) -> Self {
        Self {
            name: name.into(),
            order,
            max_capacity,
        }
    }
}

// ==========================================
// StageModel - 已校验的工序流水线
// ==========================================
// 内部按 order 升序保存,索引即流水线位置
#[derive(Debug, Clone)]
pub struct StageModel {
    stages: Vec<Stage>,
    index_by_name: HashMap<String, usize>,
}

impl StageModel {
    /// 构建工序模型
    ///
    /// # 错误
    /// - 工序为空
    /// - 工序名称重复
    /// - 流水线顺序重复（无法全序）
    pub fn new(mut stages: Vec<Stage>) -> PlanningResult<Self> {
        if stages.is_empty() {
            return Err(PlanningError::Configuration("未定义任何工序".to_string()));
        }

        stages.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

        let mut index_by_name = HashMap::with_capacity(stages.len());
        for (idx, stage) in stages.iter().enumerate() {
            if stage.name.trim().is_empty() {
                return Err(PlanningError::Configuration(format!(
                    "工序名称为空: order={}",
                    stage.order
                )));
            }
            if index_by_name.insert(stage.name.clone(), idx).is_some() {
                return Err(PlanningError::Configuration(format!(
                    "工序名称重复: {}",
                    stage.name
                )));
            }
            if idx > 0 && stages[idx - 1].order == stage.order {
                return Err(PlanningError::Configuration(format!(
                    "工序顺序重复: order={} ({} / {})",
                    stage.order,
                    stages[idx - 1].name,
                    stage.name
                )));
            }
        }

        Ok(Self {
            stages,
            index_by_name,
        })
    }

    /// 按流水线顺序的工序列表
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// 工序在流水线中的位置
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }
}
