// ==========================================
// 家具产能规划 - 规划配置
// ==========================================
// 职责: 规划参数加载（JSON 文件 → 环境变量覆写 → 校验）
// 说明: 阈值类常量（90%/100%、连续 3 天超载）不在此处,
//       它们是固定口径,定义在对应引擎模块中
// ==========================================

use crate::error::{PlanningError, PlanningResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// 配置键（环境变量名）
pub mod config_keys {
    pub const MAX_HORIZON_DAYS: &str = "CAPACITY_PLANNER_MAX_HORIZON_DAYS";
    pub const TRANSFER_DELAY_DAYS: &str = "CAPACITY_PLANNER_TRANSFER_DELAY_DAYS";
    pub const TRAILING_WINDOW_DAYS: &str = "CAPACITY_PLANNER_TRAILING_WINDOW_DAYS";
    pub const HEADROOM_PERCENT: &str = "CAPACITY_PLANNER_HEADROOM_PERCENT";
    pub const ANALYSIS_TIMEOUT_MS: &str = "CAPACITY_PLANNER_ANALYSIS_TIMEOUT_MS";
    pub const CACHE_ENABLED: &str = "CAPACITY_PLANNER_CACHE_ENABLED";
    pub const LOCALE: &str = "CAPACITY_PLANNER_LOCALE";
}

/// 预测天数上限的允许最大值（10 年）
pub const MAX_HORIZON_DAYS_LIMIT: u32 = 3650;

/// 支持的语言
pub const SUPPORTED_LOCALES: &[&str] = &["en", "zh-CN"];

// ==========================================
// PlanningConfig - 规划配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// 预测天数上限（超出则截断并标记）
    pub max_horizon_days: u32,

    /// 工序间最小流转天数（完工后最早 d + N 天进入下道工序）
    pub transfer_delay_days: u32,

    /// 建议产能的尾部平均窗口（天）
    pub trailing_window_days: u32,

    /// 建议产能余量（百分比,110 即 ×1.1）
    pub headroom_percent: u32,

    /// 单次多周期分析的总时限（毫秒）
    pub analysis_timeout_ms: u64,

    /// 是否启用结果缓存（按快照内容指纹）
    pub cache_enabled: bool,

    /// 建议文本语言
    pub locale: String,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            max_horizon_days: 365,
            transfer_delay_days: 1,
            trailing_window_days: 7,
            headroom_percent: 110,
            analysis_timeout_ms: 5_000,
            cache_enabled: false,
            locale: "en".to_string(),
        }
    }
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 解析数值型环境变量（格式错误时保留原值并告警）
fn read_env_number<T: std::str::FromStr + Copy>(key: &str, current: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                warn!(key, value = %raw, "环境变量格式错误,沿用原配置");
                current
            }
        },
        Err(_) => current,
    }
}

impl PlanningConfig {
    /// 从 JSON 文件加载（缺省字段取默认值）
    pub fn from_json_file(path: impl AsRef<Path>) -> PlanningResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: PlanningConfig = serde_json::from_str(&raw)?;
        debug!(path = %path.as_ref().display(), "已加载规划配置文件");
        Ok(config)
    }

    /// 环境变量覆写
    pub fn with_env_overrides(mut self) -> Self {
        self.max_horizon_days = read_env_number(config_keys::MAX_HORIZON_DAYS, self.max_horizon_days);
        self.transfer_delay_days =
            read_env_number(config_keys::TRANSFER_DELAY_DAYS, self.transfer_delay_days);
        self.trailing_window_days =
            read_env_number(config_keys::TRAILING_WINDOW_DAYS, self.trailing_window_days);
        self.headroom_percent = read_env_number(config_keys::HEADROOM_PERCENT, self.headroom_percent);
        self.analysis_timeout_ms =
            read_env_number(config_keys::ANALYSIS_TIMEOUT_MS, self.analysis_timeout_ms);
        if let Ok(v) = std::env::var(config_keys::CACHE_ENABLED) {
            self.cache_enabled = is_true(&v);
        }
        if let Ok(v) = std::env::var(config_keys::LOCALE) {
            let v = v.trim();
            if !v.is_empty() {
                self.locale = v.to_string();
            }
        }
        self
    }

    /// 加载配置: 文件（可选）→ 环境变量 → 校验
    pub fn load(path: Option<&Path>) -> PlanningResult<Self> {
        let base = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> PlanningResult<()> {
        if self.max_horizon_days == 0 {
            return Err(PlanningError::Configuration(
                "max_horizon_days 必须大于 0".to_string(),
            ));
        }
        if self.max_horizon_days > MAX_HORIZON_DAYS_LIMIT {
            return Err(PlanningError::Configuration(format!(
                "max_horizon_days 不能超过 {}: {}",
                MAX_HORIZON_DAYS_LIMIT, self.max_horizon_days
            )));
        }
        if self.transfer_delay_days == 0 {
            return Err(PlanningError::Configuration(
                "transfer_delay_days 必须大于 0（完工当天不可进入下道工序）".to_string(),
            ));
        }
        if self.transfer_delay_days > self.max_horizon_days {
            return Err(PlanningError::Configuration(format!(
                "transfer_delay_days 不能超过 max_horizon_days: {} > {}",
                self.transfer_delay_days, self.max_horizon_days
            )));
        }
        if self.trailing_window_days == 0 {
            return Err(PlanningError::Configuration(
                "trailing_window_days 必须大于 0".to_string(),
            ));
        }
        if self.headroom_percent < 100 {
            return Err(PlanningError::Configuration(format!(
                "headroom_percent 不能小于 100: {}",
                self.headroom_percent
            )));
        }
        if self.analysis_timeout_ms == 0 {
            return Err(PlanningError::Configuration(
                "analysis_timeout_ms 必须大于 0".to_string(),
            ));
        }
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(PlanningError::Configuration(format!(
                "不支持的语言: {}",
                self.locale
            )));
        }
        Ok(())
    }
}
