// ==========================================
// 装配线平衡系统 - 命令行入口
// ==========================================
// 用法:
//   line-balancing <workbook.xlsx|.csv> <request.json> [config.json]
// 结果 JSON 输出到标准输出; 日志输出到标准错误
// ==========================================

use line_balancing::api::{LineBalanceApi, LineBalanceRequest, LineBalanceResponse};
use line_balancing::config::ConfigManager;
use line_balancing::logging;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let mut args = std::env::args().skip(1);
    let (workbook, request_path) = match (args.next(), args.next()) {
        (Some(w), Some(r)) => (PathBuf::from(w), PathBuf::from(r)),
        _ => {
            eprintln!("用法: line-balancing <workbook.xlsx|.csv> <request.json> [config.json]");
            return ExitCode::from(2);
        }
    };
    let config_path = args.next().map(PathBuf::from);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", line_balancing::APP_NAME, line_balancing::VERSION);
    tracing::info!("==================================================");

    let response = match run(workbook, request_path, config_path).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "启动失败");
            LineBalanceResponse::failure(&line_balancing::api::ApiError::Other(e))
        }
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("结果序列化失败: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(
    workbook: PathBuf,
    request_path: PathBuf,
    config_path: Option<PathBuf>,
) -> anyhow::Result<LineBalanceResponse> {
    let config = ConfigManager::load(config_path.as_deref())?;

    let raw = std::fs::read_to_string(&request_path)?;
    let request: LineBalanceRequest = serde_json::from_str(&raw)?;

    let api = LineBalanceApi::with_file_source(Arc::new(config));
    Ok(api.handle(&workbook, &request).await)
}
