// ==========================================
// 装配线平衡系统 - 工位分配引擎
// ==========================================
// 职责: 单次迭代内的贪心工位分配
// 输入: 作业图 + 初始工位列表
// 输出: 工位列表 + 每个作业的放置状态
// ==========================================
// 红线: 吊车作业只进配吊车工位
// 红线: 前置作业未放置时不得放置后继作业
// 红线: 工位剩余时间不得为负 (单任务超节拍溢出工位除外)
// ==========================================

use crate::domain::station::Station;
use crate::domain::task::Placement;
use crate::domain::types::CraneRequirement;
use crate::engine::error::GraphError;
use crate::engine::task_graph::{LeveledOrder, TaskGraph};
use tracing::{debug, trace};

// ==========================================
// PlacementState - 放置游标
// ==========================================
// 局部性启发: 扫描从游标处开始,不影响正确性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementState {
    pub cursor: usize,
}

/// 分配轮次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignPass {
    Crane,
    NonCrane,
}

// ==========================================
// AssignmentRun - 单次分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRun {
    pub stations: Vec<Station>,
    pub placements: Vec<Placement>,
    /// 因层级保护被截断的展开次数
    pub truncated_orders: usize,
}

impl AssignmentRun {
    /// 未放置的作业下标
    pub fn unplaced(&self) -> Vec<usize> {
        self.placements
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_done())
            .map(|(i, _)| i)
            .collect()
    }
}

// ==========================================
// StationAssigner - 工位分配引擎
// ==========================================
pub struct StationAssigner<'g> {
    graph: &'g TaskGraph,
    cycle_time_min: f64,
}

impl<'g> StationAssigner<'g> {
    pub fn new(graph: &'g TaskGraph, cycle_time_min: f64) -> Self {
        Self {
            graph,
            cycle_time_min,
        }
    }

    /// 执行一次完整分配
    ///
    /// 步骤:
    /// 0) 线外作业标记完成, 工位 -1
    /// 1) 吊车轮: 需吊车作业按下标升序展开并放置
    /// 2) 非吊车轮: 游标归零, 按源表顺序展开未放置的非吊车作业
    pub fn run(&self, stations: Vec<Station>) -> Result<AssignmentRun, GraphError> {
        let mut run = AssignmentRun {
            stations,
            placements: vec![Placement::Unplaced; self.graph.len()],
            truncated_orders: 0,
        };

        for idx in self.graph.excluded_indices() {
            run.placements[idx] = Placement::Excluded;
        }

        let mut state = PlacementState::default();
        for idx in self.graph.crane_required_indices() {
            if run.placements[idx].is_done() {
                continue;
            }
            self.place_from(idx, AssignPass::Crane, &mut state, &mut run)?;
        }

        let mut state = PlacementState::default();
        for task in self.graph.tasks() {
            if task.crane != CraneRequirement::None || run.placements[task.index].is_done() {
                continue;
            }
            self.place_from(task.index, AssignPass::NonCrane, &mut state, &mut run)?;
        }

        debug!(
            stations = run.stations.len(),
            unplaced = run.unplaced().len(),
            "分配完成"
        );
        Ok(run)
    }

    fn place_from(
        &self,
        start: usize,
        pass: AssignPass,
        state: &mut PlacementState,
        run: &mut AssignmentRun,
    ) -> Result<(), GraphError> {
        let order = self.graph.compute_order(start, &run.placements)?;
        if order.truncated {
            run.truncated_orders += 1;
        }
        trace!(start, ?pass, entries = order.len(), "展开放置顺序");
        self.place_order(&order, state, run);
        Ok(())
    }

    /// 按分层顺序逐项放置
    ///
    /// 扫描起点 = max(层级下限, 游标, 已放置前置的最大工位)
    /// 找不到可容纳工位时在末尾追加溢出工位
    pub fn place_order(
        &self,
        order: &LeveledOrder,
        state: &mut PlacementState,
        run: &mut AssignmentRun,
    ) {
        for entry in order.entries() {
            let idx = entry.task_index;
            if run.placements[idx].is_done() {
                continue;
            }

            // 前置未全部放置 (环或被截断): 留待上层报告
            let floor = match self.graph.placement_floor(idx, &run.placements) {
                Some(f) => f,
                None => {
                    trace!(task = idx, "前置未完成,跳过");
                    continue;
                }
            };

            let task = self.graph.task(idx);
            let needs_crane = task.needs_crane();
            let from = entry.min_station.max(floor).max(0) as usize;
            let from = from.max(state.cursor);

            let slot = (from..run.stations.len())
                .find(|&w| run.stations[w].can_host(task.duration_min, needs_crane));

            let station_idx = match slot {
                Some(w) => {
                    run.stations[w].assign(idx, task.duration_min);
                    state.cursor = state.cursor.max(w);
                    w
                }
                None => {
                    run.stations.push(Station::overflow(
                        self.cycle_time_min,
                        needs_crane,
                        idx,
                        task.duration_min,
                    ));
                    let w = run.stations.len() - 1;
                    state.cursor = w;
                    w
                }
            };

            run.placements[idx] = Placement::Station(station_idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineSettings;
    use crate::domain::task::TaskRecord;

    fn graph(records: &[TaskRecord]) -> TaskGraph {
        TaskGraph::build(records, &EngineSettings::default()).unwrap()
    }

    fn plain(n: usize, cycle: f64) -> Vec<Station> {
        (0..n).map(|_| Station::new(cycle, false)).collect()
    }

    #[test]
    fn test_fills_first_station_then_overflows() {
        let g = graph(&[
            TaskRecord::new("1", "a", 5.0, CraneRequirement::None, "", 1.0),
            TaskRecord::new("2", "b", 5.0, CraneRequirement::None, "", 1.0),
            TaskRecord::new("3", "c", 5.0, CraneRequirement::None, "", 1.0),
        ]);
        let run = StationAssigner::new(&g, 10.0).run(plain(1, 10.0)).unwrap();

        assert_eq!(run.stations.len(), 2);
        assert_eq!(run.stations[0].task_order, vec![0, 1]);
        assert_eq!(run.stations[1].task_order, vec![2]);
        assert_eq!(run.stations[1].remaining_min, 5.0);
    }

    #[test]
    fn test_excluded_task_uses_sentinel() {
        let g = graph(&[
            TaskRecord::new("1", "pre", 50.0, CraneRequirement::Excluded, "", 2.0),
            TaskRecord::new("2", "b", 5.0, CraneRequirement::None, "1", 1.0),
        ]);
        let run = StationAssigner::new(&g, 10.0).run(plain(1, 10.0)).unwrap();

        assert_eq!(run.placements[0], Placement::Excluded);
        assert_eq!(run.placements[1], Placement::Station(0));
        assert_eq!(run.stations[0].remaining_min, 5.0);
    }

    #[test]
    fn test_crane_task_skips_plain_station() {
        let g = graph(&[
            TaskRecord::new("1", "lift", 4.0, CraneRequirement::Required, "", 1.0),
            TaskRecord::new("2", "b", 4.0, CraneRequirement::None, "", 1.0),
        ]);
        let stations = vec![Station::new(10.0, false), Station::new(10.0, true)];
        let run = StationAssigner::new(&g, 10.0).run(stations).unwrap();

        assert_eq!(run.placements[0], Placement::Station(1));
        // 非吊车轮游标归零
        assert_eq!(run.placements[1], Placement::Station(0));
    }

    #[test]
    fn test_crane_overflow_station_is_crane_equipped() {
        let g = graph(&[TaskRecord::new("1", "lift", 4.0, CraneRequirement::Required, "", 1.0)]);
        let run = StationAssigner::new(&g, 10.0).run(plain(2, 10.0)).unwrap();

        assert_eq!(run.stations.len(), 3);
        assert!(run.stations[2].crane_equipped);
        assert_eq!(run.placements[0], Placement::Station(2));
    }

    #[test]
    fn test_crane_pass_places_plain_predecessor_first() {
        let g = graph(&[
            TaskRecord::new("1", "prep", 6.0, CraneRequirement::None, "", 1.0),
            TaskRecord::new("2", "lift", 6.0, CraneRequirement::Required, "1", 1.0),
        ]);
        let stations = vec![Station::new(10.0, false), Station::new(10.0, true)];
        let run = StationAssigner::new(&g, 10.0).run(stations).unwrap();

        assert_eq!(run.placements[0], Placement::Station(0));
        assert_eq!(run.placements[1], Placement::Station(1));
    }

    #[test]
    fn test_oversized_task_gets_dedicated_station() {
        let g = graph(&[
            TaskRecord::new("1", "a", 3.0, CraneRequirement::None, "", 1.0),
            TaskRecord::new("2", "big", 14.0, CraneRequirement::None, "", 1.0),
        ]);
        let run = StationAssigner::new(&g, 10.0).run(plain(1, 10.0)).unwrap();

        assert_eq!(run.stations.len(), 2);
        assert_eq!(run.stations[1].task_order, vec![1]);
        assert_eq!(run.stations[1].remaining_min, -4.0);
    }

    #[test]
    fn test_cycle_leaves_tasks_unplaced() {
        let g = graph(&[
            TaskRecord::new("C", "c", 1.0, CraneRequirement::None, "D", 1.0),
            TaskRecord::new("D", "d", 1.0, CraneRequirement::None, "C", 1.0),
            TaskRecord::new("E", "e", 1.0, CraneRequirement::None, "", 1.0),
        ]);
        let run = StationAssigner::new(&g, 10.0).run(plain(1, 10.0)).unwrap();

        assert_eq!(run.unplaced(), vec![0, 1]);
        assert_eq!(run.placements[2], Placement::Station(0));
        assert!(run.truncated_orders >= 1);
    }

    #[test]
    fn test_place_order_with_explicit_state() {
        let g = graph(&[
            TaskRecord::new("1", "a", 2.0, CraneRequirement::None, "", 1.0),
        ]);
        let assigner = StationAssigner::new(&g, 10.0);
        let mut run = AssignmentRun {
            stations: plain(3, 10.0),
            placements: vec![Placement::Unplaced],
            truncated_orders: 0,
        };
        let order = g.compute_order(0, &run.placements).unwrap();
        let mut state = PlacementState { cursor: 2 };

        assigner.place_order(&order, &mut state, &mut run);
        assert_eq!(run.placements[0], Placement::Station(2));
    }
}
