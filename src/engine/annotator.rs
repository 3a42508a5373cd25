// ==========================================
// 装配线平衡系统 - 结果标注
// ==========================================
// 职责: 工位编号、人力汇总、展示顺序、线外作业列表
// ==========================================

use crate::domain::solution::{AnnotatedStation, ModelSolution, TaskPlacementView};
use crate::domain::station::Station;
use crate::engine::convergence::ConvergenceOutcome;
use crate::engine::task_graph::TaskGraph;

pub struct ResultAnnotator;

impl ResultAnnotator {
    /// 工位编号
    ///
    /// 超出基准的工位 (位于最前) 依次为 -extra .. -1,
    /// 基准工位从 1 连续编号
    pub fn station_number(position: usize, total: usize, baseline: usize) -> i64 {
        let extra = total.saturating_sub(baseline) as i64;
        let position = position as i64;
        if position < extra {
            -(extra - position)
        } else {
            position - extra + 1
        }
    }

    /// 人力合计 (向上取整)
    pub fn total_manpower(graph: &TaskGraph, station: &Station) -> i64 {
        let sum: f64 = station
            .task_order
            .iter()
            .map(|&idx| graph.task(idx).manpower)
            .sum();
        sum.ceil() as i64
    }

    /// 标注单车型结果
    pub fn annotate(
        model: &str,
        graph: &TaskGraph,
        outcome: &ConvergenceOutcome,
        baseline: usize,
        mut warnings: Vec<String>,
    ) -> ModelSolution {
        let activity_before: Vec<String> = graph
            .excluded_indices()
            .into_iter()
            .map(|idx| graph.task(idx).display_label())
            .collect();

        let total = outcome.stations.len();
        let stations = outcome
            .stations
            .iter()
            .enumerate()
            .map(|(position, station)| AnnotatedStation {
                crane_equipped: station.crane_equipped,
                task_order: station
                    .task_order
                    .iter()
                    .map(|&idx| graph.task(idx).task_id.clone())
                    .collect(),
                remaining_min: station.remaining_min,
                station_number: Self::station_number(position, total, baseline),
                total_manpower: Self::total_manpower(graph, station),
                final_order: station
                    .task_order
                    .iter()
                    .map(|&idx| graph.task(idx).display_label())
                    .collect(),
                activity_before: activity_before.clone(),
            })
            .collect();

        let placements = graph
            .tasks()
            .iter()
            .map(|task| {
                let placement = outcome.placements[task.index];
                TaskPlacementView {
                    task_id: task.task_id.clone(),
                    placed: placement.is_done(),
                    station_index: placement.station_index(),
                }
            })
            .collect();

        let unplaced: Vec<String> = outcome
            .unplaced()
            .into_iter()
            .map(|idx| graph.task(idx).task_id.clone())
            .collect();
        if !unplaced.is_empty() {
            warnings.push(format!(
                "{} 个作业未能放置 (终止原因 {}): {}",
                unplaced.len(),
                outcome.termination,
                unplaced.join(", ")
            ));
        }

        ModelSolution {
            model: model.to_string(),
            stations,
            placements,
            unplaced,
            warnings,
            attempts: outcome.attempts,
            station_history: outcome.station_history.clone(),
            termination: outcome.termination,
        }
    }
}
