// ==========================================
// 家具产能规划 - 错误类型
// ==========================================
// 职责: 定义产能分析的错误分类
// 处理策略:
// - DataIntegrity: 跳过单个订单,继续分析,结果中记录
// - ForecastHorizonExceeded: 截断到上限并标记,非致命
// - Configuration: 本次调用致命,返回空分析 + error 字段
// ==========================================

use thiserror::Error;

/// 产能分析错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum PlanningError {
    // ==========================================
    // 数据完整性错误（单订单级别）
    // ==========================================
    #[error("订单数据不完整: order_id={order_id}, 原因={reason}")]
    DataIntegrity { order_id: String, reason: String },

    // ==========================================
    // 预测期错误
    // ==========================================
    #[error("预测天数超出上限: requested={requested}天, max={max}天")]
    ForecastHorizonExceeded { requested: u32, max: u32 },

    // ==========================================
    // 配置错误（调用级别致命）
    // ==========================================
    #[error("配置错误: {0}")]
    Configuration(String),

    // ==========================================
    // 运行时错误
    // ==========================================
    #[error("产能分析超时: timeout={timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("内部错误: {0}")]
    Internal(String),

    // ==========================================
    // 输入输出错误（仅配置/快照文件加载）
    // ==========================================
    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlanningError {
    /// 构造数据完整性错误
    pub fn data_integrity(order_id: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanningError::DataIntegrity {
            order_id: order_id.into(),
            reason: reason.into(),
        }
    }
}

pub type PlanningResult<T> = Result<T, PlanningError>;
