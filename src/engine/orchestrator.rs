// ==========================================
// 装配线平衡系统 - 单车型编排器
// ==========================================
// 用途: 串联 作业图 -> 收敛循环(工位分配) -> 结果标注
// ==========================================

use crate::config::BalanceConfigReader;
use crate::domain::model::{LineConfig, ModelTable};
use crate::domain::solution::ModelSolution;
use crate::engine::annotator::ResultAnnotator;
use crate::engine::convergence::ConvergenceLoop;
use crate::engine::error::EngineResult;
use crate::engine::task_graph::TaskGraph;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// BalanceOrchestrator - 编排器
// ==========================================
pub struct BalanceOrchestrator<C>
where
    C: BalanceConfigReader,
{
    config: Arc<C>,
}

impl<C> Clone for BalanceOrchestrator<C>
where
    C: BalanceConfigReader,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
        }
    }
}

impl<C> BalanceOrchestrator<C>
where
    C: BalanceConfigReader,
{
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 计算单车型平衡结果
    ///
    /// # 参数
    /// - table: 车型作业表
    /// - line: 产线参数 (节拍/基准工位/吊车位置)
    ///
    /// # 返回
    /// - Ok(ModelSolution): 可能含未放置作业 (见 warnings / unplaced)
    /// - Err: 输入形态错误、严格模式下的引用/层级错误、产线参数错误
    #[instrument(skip(self, table, line), fields(
        model = %table.name,
        tasks = table.records.len(),
        cycle_time = line.cycle_time_min
    ))]
    pub fn balance_model(
        &self,
        table: &ModelTable,
        line: &LineConfig,
    ) -> EngineResult<ModelSolution> {
        let settings = self.config.engine_settings();

        let graph = TaskGraph::build(&table.records, &settings)?;
        let mut warnings = graph.warnings().to_vec();

        let outcome = ConvergenceLoop::from_settings(&settings).run(&graph, line)?;
        if outcome.truncated_orders > 0 {
            warnings.push(format!(
                "{} 次前置展开超过 {} 层保护,剩余前置已丢弃",
                outcome.truncated_orders, settings.level_guard
            ));
        }

        let solution = ResultAnnotator::annotate(
            &table.name,
            &graph,
            &outcome,
            line.baseline_stations,
            warnings,
        );

        if solution.is_complete() {
            info!(
                stations = solution.stations.len(),
                attempts = solution.attempts,
                termination = %solution.termination,
                "车型平衡完成"
            );
        } else {
            warn!(
                stations = solution.stations.len(),
                unplaced = solution.unplaced.len(),
                termination = %solution.termination,
                "车型平衡完成,存在未放置作业"
            );
        }

        Ok(solution)
    }
}
