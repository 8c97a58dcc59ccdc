// ==========================================
// 家具产能规划 - 分析结果缓存
// ==========================================
// 职责: 按 (快照内容指纹, 预测天数) 缓存分析结果
// 红线: 缓存键只取决于输入内容,不含时钟;缓存不影响结果
// ==========================================

use crate::domain::analysis::CapacityAnalysisResult;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// 默认最大缓存条目数
pub const DEFAULT_CACHE_ENTRIES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub fingerprint: u64,
    pub horizon_days: u32,
}

#[derive(Debug)]
pub struct AnalysisCache {
    entries: RwLock<HashMap<CacheKey, Arc<CapacityAnalysisResult>>>,
    max_entries: usize,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}

impl AnalysisCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// 读取缓存（锁中毒视为未命中）
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CapacityAnalysisResult>> {
        let guard = self.entries.read().ok()?;
        let hit = guard.get(key).cloned();
        if hit.is_some() {
            debug!(fingerprint = key.fingerprint, horizon_days = key.horizon_days, "分析缓存命中");
        }
        hit
    }

    /// 写入缓存（满时整体清空,写入失败静默忽略）
    pub fn insert(&self, key: CacheKey, result: Arc<CapacityAnalysisResult>) {
        if let Ok(mut guard) = self.entries.write() {
            if guard.len() >= self.max_entries && !guard.contains_key(&key) {
                guard.clear();
            }
            guard.insert(key, result);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
