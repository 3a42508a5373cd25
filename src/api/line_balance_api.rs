// ==========================================
// 装配线平衡系统 - 平衡API
// ==========================================
// 职责: 请求校验 -> 节拍推导 -> 读取作业表 -> 各车型隔离计算 -> 汇总响应
// 说明: 车型之间无共享可变状态, 每个车型在独立阻塞任务中计算;
//       单车型失败只记入 failures, 不影响其它车型
// ==========================================

use crate::api::dto::{CycleTimes, LineBalanceRequest, LineBalanceResponse, ResponseMetadata};
use crate::api::error::{ApiError, ApiResult};
use crate::config::BalanceConfigReader;
use crate::domain::model::{LineConfig, ModelTable};
use crate::domain::solution::ModelSolution;
use crate::engine::BalanceOrchestrator;
use crate::importer::{FileWorkbookSource, WorkbookSource};
use chrono::Utc;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 平衡API
pub struct LineBalanceApi<C, S>
where
    C: BalanceConfigReader + 'static,
    S: WorkbookSource,
{
    config: Arc<C>,
    source: S,
    orchestrator: BalanceOrchestrator<C>,
}

impl<C> LineBalanceApi<C, FileWorkbookSource>
where
    C: BalanceConfigReader + 'static,
{
    /// 使用本地文件来源创建
    pub fn with_file_source(config: Arc<C>) -> Self {
        let source = FileWorkbookSource::from_config(config.as_ref());
        Self::new(config, source)
    }
}

impl<C, S> LineBalanceApi<C, S>
where
    C: BalanceConfigReader + 'static,
    S: WorkbookSource,
{
    pub fn new(config: Arc<C>, source: S) -> Self {
        Self {
            orchestrator: BalanceOrchestrator::new(config.clone()),
            config,
            source,
        }
    }

    // ==========================================
    // 请求校验与节拍推导
    // ==========================================

    /// 推导节拍
    ///
    /// takt = 班次总时间 / 需求总台数; cycle = takt - 准备损耗
    pub fn derive_cycle_times(&self, request: &LineBalanceRequest) -> ApiResult<CycleTimes> {
        let shift = self.config.shift_settings();
        let total_units = request.total_units();
        if total_units == 0 {
            return Err(ApiError::InvalidInput("需求总台数必须大于 0".to_string()));
        }

        let total_time = shift.total_time_for(&request.shift);
        let takt_time = total_time / total_units as f64;
        let cycle_time = takt_time - shift.setup_loss_min;
        if cycle_time <= 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "节拍非正 ({:.3} 分钟): 需求总台数 {} 过大",
                cycle_time, total_units
            )));
        }

        Ok(CycleTimes {
            total_time,
            total_units,
            takt_time,
            cycle_time,
        })
    }

    /// 组装产线参数
    ///
    /// # 返回
    /// (产线参数, 告警); 非正的吊车位置被忽略并告警
    pub fn line_config(
        request: &LineBalanceRequest,
        cycle_time: f64,
    ) -> ApiResult<(LineConfig, Vec<String>)> {
        if request.no_of_stations == 0 {
            return Err(ApiError::InvalidInput("noOfStations 必须 >= 1".to_string()));
        }

        let mut warnings = Vec::new();
        let mut crane_positions = Vec::with_capacity(request.crane_pos.len());
        for &pos in &request.crane_pos {
            if pos >= 1 {
                crane_positions.push(pos as usize);
            } else {
                warnings.push(format!("吊车位置 {} 非法 (须 >= 1), 已忽略", pos));
            }
        }

        Ok((
            LineConfig::new(cycle_time, request.no_of_stations, crane_positions),
            warnings,
        ))
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 读取工作簿并计算所有车型
    pub async fn balance_workbook(
        &self,
        path: &Path,
        request: &LineBalanceRequest,
    ) -> ApiResult<LineBalanceResponse> {
        // 先校验请求, 避免无效请求读取文件
        self.derive_cycle_times(request)?;
        let tables = self.source.load_models(path).await?;
        self.balance_tables(tables, request).await
    }

    /// 计算给定的车型作业表
    #[instrument(
        skip(self, tables, request),
        fields(models = tables.len(), shift = %request.shift)
    )]
    pub async fn balance_tables(
        &self,
        tables: Vec<ModelTable>,
        request: &LineBalanceRequest,
    ) -> ApiResult<LineBalanceResponse> {
        let started = Instant::now();
        let cycle = self.derive_cycle_times(request)?;
        let (line, mut warnings) = Self::line_config(request, cycle.cycle_time)?;

        if tables.is_empty() {
            return Err(ApiError::InvalidInput("没有可计算的车型作业表".to_string()));
        }

        for demand in &request.models {
            let name = demand.name.replace('.', "_");
            if !tables.iter().any(|t| t.name == name) {
                warn!(model = %demand.name, "请求车型在工作簿中不存在");
                warnings.push(format!("车型 {} 在工作簿中没有作业表", demand.name));
            }
        }

        info!(
            cycle_time = cycle.cycle_time,
            takt_time = cycle.takt_time,
            stations = line.baseline_stations,
            "开始平衡计算"
        );

        let jobs = tables.into_iter().map(|table| {
            let orchestrator = self.orchestrator.clone();
            let line = line.clone();
            let name = table.name.clone();
            let handle =
                tokio::task::spawn_blocking(move || orchestrator.balance_model(&table, &line));
            async move { (name, handle.await) }
        });

        let mut data: BTreeMap<String, ModelSolution> = BTreeMap::new();
        let mut failures: BTreeMap<String, String> = BTreeMap::new();
        for (name, joined) in join_all(jobs).await {
            match joined {
                Ok(Ok(solution)) => {
                    data.insert(name, solution);
                }
                Ok(Err(e)) => {
                    error!(model = %name, error = %e, "车型计算失败");
                    failures.insert(name, ApiError::from(e).to_string());
                }
                Err(e) => {
                    error!(model = %name, error = %e, "车型计算任务异常终止");
                    let err = ApiError::InternalError(format!("计算任务异常终止: {}", e));
                    failures.insert(name, err.to_string());
                }
            }
        }

        info!(
            succeeded = data.len(),
            failed = failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "平衡计算完成"
        );

        let message = (!failures.is_empty()).then(|| {
            format!("{} 个车型计算失败, {} 个成功", failures.len(), data.len())
        });

        Ok(LineBalanceResponse {
            success: !data.is_empty(),
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            data,
            failures,
            warnings,
            metadata: Some(ResponseMetadata {
                cycle_time: cycle.cycle_time,
                takt_time: cycle.takt_time,
                total_time: cycle.total_time,
                total_models: cycle.total_units,
                no_of_stations: request.no_of_stations,
                shift: request.shift.clone(),
                line: request.line.clone(),
                date: request.date,
            }),
            message,
            detail: None,
        })
    }

    /// 处理请求; 整体失败时返回失败响应而非错误
    pub async fn handle(&self, path: &Path, request: &LineBalanceRequest) -> LineBalanceResponse {
        match self.balance_workbook(path, request).await {
            Ok(resp) => resp,
            Err(e) => {
                error!(error = %e, "平衡请求失败");
                LineBalanceResponse::failure(&e)
            }
        }
    }
}
