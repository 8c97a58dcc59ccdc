// ==========================================
// 家具产能规划 - 领域类型定义
// ==========================================
// 职责: 优先级、规划周期、建议等级、利用率等基础类型
// ==========================================

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// ==========================================
// 订单优先级 (Priority)
// ==========================================
// 顺序: Urgent < High < Normal < Low（越小越优先）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent, // 加急
    High,   // 高
    Normal, // 普通
    Low,    // 低
}

impl Priority {
    /// 排序用的严重度序号（0 最优先）
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Normal => 2,
            Priority::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Urgent => write!(f, "urgent"),
            Priority::High => write!(f, "high"),
            Priority::Normal => write!(f, "normal"),
            Priority::Low => write!(f, "low"),
        }
    }
}

// ==========================================
// 规划周期 (Planning Period)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanningPeriod {
    Week,
    Month,
    Quarter,
}

impl PlanningPeriod {
    /// 周期对应的预测天数
    pub fn horizon_days(&self) -> u32 {
        match self {
            PlanningPeriod::Week => 7,
            PlanningPeriod::Month => 30,
            PlanningPeriod::Quarter => 90,
        }
    }
}

impl fmt::Display for PlanningPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningPeriod::Week => write!(f, "week"),
            PlanningPeriod::Month => write!(f, "month"),
            PlanningPeriod::Quarter => write!(f, "quarter"),
        }
    }
}

impl FromStr for PlanningPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(PlanningPeriod::Week),
            "month" => Ok(PlanningPeriod::Month),
            "quarter" => Ok(PlanningPeriod::Quarter),
            other => Err(format!("未知的规划周期: {}", other)),
        }
    }
}

// ==========================================
// 建议等级 (Severity)
// ==========================================
// 顺序: Critical < Warning < Info（输出时 Critical 在前）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

// ==========================================
// 订单排程状态 (Schedule Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Completed,   // 全部工序在预测期内完成
    InProgress,  // 已开工,预测期结束时未完成
    Unscheduled, // 预测期内未能进入任何工序
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleStatus::Completed => write!(f, "completed"),
            ScheduleStatus::InProgress => write!(f, "in_progress"),
            ScheduleStatus::Unscheduled => write!(f, "unscheduled"),
        }
    }
}

// ==========================================
// 利用率 (Utilization)
// ==========================================
// 产能为 0 时不做除法,直接记为 Overflow 哨兵值
// 序列化: 数值 或 字符串 "overflow"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Utilization {
    Percent(f64),
    Overflow,
}

impl Utilization {
    pub const OVERFLOW_LABEL: &'static str = "overflow";

    /// 由需求与产能计算利用率百分比
    ///
    /// 先乘 100 再除,整数比例得到精确值（例如 9/10 → 90.0）
    pub fn from_counts(demand: u32, capacity: u32) -> Self {
        if capacity == 0 {
            return Utilization::Overflow;
        }
        Utilization::Percent(demand as f64 * 100.0 / capacity as f64)
    }

    /// 比较用数值（Overflow 视为 +∞）
    pub fn as_f64(&self) -> f64 {
        match self {
            Utilization::Percent(p) => *p,
            Utilization::Overflow => f64::INFINITY,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, Utilization::Overflow)
    }

    /// 是否达到给定阈值（百分比）
    pub fn at_least(&self, threshold_percent: f64) -> bool {
        self.as_f64() >= threshold_percent
    }
}

impl Default for Utilization {
    fn default() -> Self {
        Utilization::Percent(0.0)
    }
}

impl PartialOrd for Utilization {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_f64().partial_cmp(&other.as_f64())
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Utilization::Percent(p) => write!(f, "{:.1}", p),
            Utilization::Overflow => write!(f, "{}", Self::OVERFLOW_LABEL),
        }
    }
}

impl Serialize for Utilization {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Utilization::Percent(p) => serializer.serialize_f64(*p),
            Utilization::Overflow => serializer.serialize_str(Self::OVERFLOW_LABEL),
        }
    }
}

struct UtilizationVisitor;

impl<'de> Visitor<'de> for UtilizationVisitor {
    type Value = Utilization;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a percentage number or the string \"overflow\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Utilization, E> {
        Ok(Utilization::Percent(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Utilization, E> {
        Ok(Utilization::Percent(v as f64))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Utilization, E> {
        Ok(Utilization::Percent(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Utilization, E> {
        if v == Utilization::OVERFLOW_LABEL {
            Ok(Utilization::Overflow)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for Utilization {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UtilizationVisitor)
    }
}
