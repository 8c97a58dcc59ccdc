// ==========================================
// 家具产能规划 - 命令行入口
// ==========================================
// 用法:
//   production-capacity-planner <snapshot.json> [week|month|quarter|all] [config.json]
//
// 结果以 JSON 输出到 stdout,日志输出到 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use capacity_planner::{logging, CapacityAnalysisService, PlanningConfig, PlanningPeriod, PlanningSnapshot};
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str =
    "用法: production-capacity-planner <snapshot.json> [week|month|quarter|all] [config.json]";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env();

    let mut args = std::env::args().skip(1);
    let Some(snapshot_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let period_arg = args.next().unwrap_or_else(|| "month".to_string());
    let config_path = args.next().map(PathBuf::from);

    tracing::info!(
        version = capacity_planner::VERSION,
        snapshot = %snapshot_path.display(),
        period = %period_arg,
        "{}",
        capacity_planner::APP_NAME
    );

    let config = PlanningConfig::load(config_path.as_deref()).context("加载规划配置失败")?;
    let snapshot = PlanningSnapshot::from_json_file(&snapshot_path)
        .with_context(|| format!("读取快照失败: {}", snapshot_path.display()))?;

    let service = CapacityAnalysisService::new(config);

    let output = if period_arg.trim().eq_ignore_ascii_case("all") {
        let periods = [PlanningPeriod::Week, PlanningPeriod::Month, PlanningPeriod::Quarter];
        let results = service
            .get_analyses(Arc::new(snapshot), &periods)
            .await
            .context("多周期分析失败")?;
        serde_json::to_string_pretty(&results)?
    } else {
        let period: PlanningPeriod = period_arg
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context(USAGE)?;
        let result = service.get_analysis(&snapshot, period);
        if let Some(err) = &result.error {
            tracing::warn!(error = %err, "分析返回错误");
        }
        serde_json::to_string_pretty(&result)?
    };

    println!("{}", output);
    Ok(())
}
