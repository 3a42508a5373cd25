// ==========================================
// 装配线平衡系统 - 作业图
// ==========================================
// 职责: 作业索引、前置引用解析、前置分层展开
// 输入: 单车型 TaskRecord 列表
// 输出: 不可变作业图 + 按层排列的放置顺序
// ==========================================
// 红线: 构建后不可变; 放置状态由调用方以切片传入
// ==========================================

use crate::config::EngineSettings;
use crate::domain::task::{Placement, PredecessorRef, Task, TaskRecord};
use crate::domain::types::{CraneRequirement, GuardPolicy, ParsedValue};
use crate::engine::error::GraphError;
use std::collections::HashMap;
use tracing::warn;

// ==========================================
// OrderEntry / LeveledOrder - 分层放置顺序
// ==========================================

/// 单个放置项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderEntry {
    pub task_index: usize,
    /// 最小工位下标 (-1 表示无下限)
    pub min_station: i64,
    /// 距起点的跳数
    pub hops: usize,
}

/// 分层放置顺序
///
/// 层按跳数从远到近排列: 前置作业总是先于依赖它的作业出现。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeveledOrder {
    pub levels: Vec<Vec<OrderEntry>>,
    /// 是否因层级保护被截断
    pub truncated: bool,
}

impl LeveledOrder {
    /// 按放置顺序展开
    pub fn entries(&self) -> impl Iterator<Item = &OrderEntry> {
        self.levels.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ==========================================
// TaskGraph - 作业图
// ==========================================
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    index_by_id: HashMap<String, usize>,
    level_guard: usize,
    cycle_guard_policy: GuardPolicy,
    warnings: Vec<String>,
}

impl TaskGraph {
    // ==========================================
    // 构建
    // ==========================================

    /// 由源表记录构建作业图
    ///
    /// 规则:
    /// 1) 时长: 空 -> 0 分钟 (告警); 非数值或负数 -> 输入错误
    /// 2) 吊车需求: 空 -> 不需要; 非 -1/0/1 -> 输入错误
    /// 3) 人力: 空 -> 0; 非数值或负数 -> 输入错误
    /// 4) 作业编号重复 -> 输入错误
    /// 5) 前置编号找不到: 宽松模式视为无约束 (告警), 严格模式报错
    pub fn build(records: &[TaskRecord], settings: &EngineSettings) -> Result<Self, GraphError> {
        let mut warnings = Vec::new();
        let mut tasks = Vec::with_capacity(records.len());
        let mut index_by_id = HashMap::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let task_id = record.task_id.trim().to_string();
            if task_id.is_empty() {
                return Err(GraphError::InputShape {
                    task_id: format!("row {}", record.row_no),
                    field: "task_id".to_string(),
                    message: "作业编号为空".to_string(),
                });
            }
            if index_by_id.insert(task_id.clone(), index).is_some() {
                return Err(GraphError::DuplicateTaskId(task_id));
            }

            let duration_min = match &record.duration_min {
                ParsedValue::Valid(v) if *v >= 0.0 => *v,
                ParsedValue::Valid(v) => {
                    return Err(input_error(&task_id, "duration", format!("时长为负: {}", v)))
                }
                ParsedValue::Missing => {
                    warnings.push(format!("作业 {} 时长为空,按 0 分钟处理", task_id));
                    0.0
                }
                ParsedValue::Invalid(raw) => {
                    return Err(input_error(&task_id, "duration", format!("无法解析: {}", raw)))
                }
            };

            let crane = match &record.crane {
                ParsedValue::Valid(c) => *c,
                ParsedValue::Missing => CraneRequirement::None,
                ParsedValue::Invalid(raw) => {
                    return Err(input_error(
                        &task_id,
                        "crane",
                        format!("仅接受 -1/0/1: {}", raw),
                    ))
                }
            };

            let manpower = match &record.manpower {
                ParsedValue::Valid(v) if *v >= 0.0 => *v,
                ParsedValue::Valid(v) => {
                    return Err(input_error(&task_id, "manpower", format!("人力为负: {}", v)))
                }
                ParsedValue::Missing => 0.0,
                ParsedValue::Invalid(raw) => {
                    return Err(input_error(&task_id, "manpower", format!("无法解析: {}", raw)))
                }
            };

            tasks.push(Task {
                index,
                task_id,
                label: record.label.trim().to_string(),
                duration_min,
                crane,
                predecessors: Vec::new(),
                manpower,
            });
        }

        // 前置引用解析 (需要完整索引)
        for (index, record) in records.iter().enumerate() {
            let mut predecessors = Vec::new();
            for token in split_predecessors(&record.predecessors_raw) {
                let resolved = index_by_id.get(&token).copied();
                if resolved.is_none() {
                    let task_id = tasks[index].task_id.clone();
                    match settings.unresolved_predecessor_policy {
                        GuardPolicy::Strict => {
                            return Err(GraphError::UnresolvedPredecessor { task_id, token })
                        }
                        GuardPolicy::Lenient => {
                            warn!(
                                task_id = %task_id,
                                token = %token,
                                "前置作业无法解析,按无约束处理"
                            );
                            warnings.push(format!(
                                "作业 {} 的前置 {} 不存在,按无约束处理",
                                task_id, token
                            ));
                        }
                    }
                }
                predecessors.push(PredecessorRef {
                    token,
                    index: resolved,
                });
            }
            tasks[index].predecessors = predecessors;
        }

        Ok(Self {
            tasks,
            index_by_id,
            level_guard: settings.level_guard,
            cycle_guard_policy: settings.cycle_guard_policy,
            warnings,
        })
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, index: usize) -> &Task {
        &self.tasks[index]
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn index_of(&self, task_id: &str) -> Option<usize> {
        self.index_by_id.get(task_id).copied()
    }

    /// 构建期告警
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// 非线外作业总时长
    pub fn total_eligible_duration(&self) -> f64 {
        self.tasks
            .iter()
            .filter(|t| !t.is_excluded())
            .map(|t| t.duration_min)
            .sum()
    }

    /// 线外作业下标 (源表顺序)
    pub fn excluded_indices(&self) -> Vec<usize> {
        self.indices_where(|t| t.is_excluded())
    }

    /// 需吊车作业下标 (升序)
    pub fn crane_required_indices(&self) -> Vec<usize> {
        self.indices_where(|t| t.needs_crane())
    }

    fn indices_where<F: Fn(&Task) -> bool>(&self, pred: F) -> Vec<usize> {
        self.tasks
            .iter()
            .filter(|t| pred(t))
            .map(|t| t.index)
            .collect()
    }

    /// 前置约束下的最小工位
    ///
    /// # 返回
    /// - Some(-1): 无已放置前置
    /// - Some(n): 已放置前置的最大工位
    /// - None: 仍有可解析的非线外前置未放置
    pub fn placement_floor(&self, index: usize, placements: &[Placement]) -> Option<i64> {
        let mut floor = -1;
        for pred in self.tasks[index].resolved_predecessors() {
            match placements[pred] {
                Placement::Station(s) => floor = floor.max(s as i64),
                Placement::Excluded => {}
                Placement::Unplaced => {
                    if !self.tasks[pred].is_excluded() {
                        return None;
                    }
                }
            }
        }
        Some(floor)
    }

    // ==========================================
    // 分层展开
    // ==========================================

    /// 从起点作业沿未放置前置广度优先展开
    ///
    /// 规则:
    /// 1) 每个作业记录最大跳数与 after_pos (已放置前置的最大工位, 无则 -1)
    /// 2) 前置全部放置或超过层级保护时停止
    /// 3) 层内按 after_pos 升序; 层按跳数从远到近输出
    /// 4) after_pos 沿输出顺序向后传递, 保证下限单调不减
    pub fn compute_order(
        &self,
        start: usize,
        placements: &[Placement],
    ) -> Result<LeveledOrder, GraphError> {
        // (最大跳数, after_pos)
        let mut visited: Vec<Option<(usize, i64)>> = vec![None; self.tasks.len()];
        let mut frontier = vec![start];
        let mut level = 0usize;

        while !frontier.is_empty() && level <= self.level_guard {
            let mut next = Vec::new();
            for &j in &frontier {
                let mut after_pos = -1i64;
                for pred in self.tasks[j].resolved_predecessors() {
                    match placements[pred] {
                        Placement::Station(s) => after_pos = after_pos.max(s as i64),
                        Placement::Excluded => {}
                        Placement::Unplaced => {
                            if !self.tasks[pred].is_excluded() {
                                next.push(pred);
                            }
                        }
                    }
                }

                visited[j] = Some(match visited[j] {
                    Some((lvl, after)) => (lvl.max(level), after.max(after_pos)),
                    None => (level, after_pos),
                });
            }

            level += 1;
            next.sort_unstable();
            next.dedup();
            frontier = next;
        }

        let truncated = !frontier.is_empty();
        if truncated {
            let task_id = self.tasks[start].task_id.clone();
            match self.cycle_guard_policy {
                GuardPolicy::Strict => {
                    return Err(GraphError::CycleGuardExceeded {
                        task_id,
                        guard: self.level_guard,
                    })
                }
                GuardPolicy::Lenient => {
                    warn!(
                        task_id = %task_id,
                        guard = self.level_guard,
                        dropped = frontier.len(),
                        "前置展开超过层级保护,剩余前置被丢弃"
                    );
                }
            }
        }

        let mut by_hops: Vec<Vec<OrderEntry>> = vec![Vec::new(); level];
        for (task_index, slot) in visited.iter().enumerate() {
            if let Some((hops, after_pos)) = slot {
                by_hops[*hops].push(OrderEntry {
                    task_index,
                    min_station: *after_pos,
                    hops: *hops,
                });
            }
        }

        let mut levels: Vec<Vec<OrderEntry>> = by_hops
            .into_iter()
            .rev()
            .filter(|l| !l.is_empty())
            .collect();

        let mut prev_max = -1i64;
        for entries in levels.iter_mut() {
            entries.sort_by_key(|e| (e.min_station, e.task_index));
            for entry in entries.iter_mut() {
                entry.min_station = entry.min_station.max(prev_max);
            }
            if let Some(last) = entries.last() {
                prev_max = last.min_station;
            }
        }

        Ok(LeveledOrder { levels, truncated })
    }
}

fn input_error(task_id: &str, field: &str, message: String) -> GraphError {
    GraphError::InputShape {
        task_id: task_id.to_string(),
        field: field.to_string(),
        message,
    }
}

/// 拆分前置字段: 逗号分隔, 空白忽略
fn split_predecessors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, duration: f64, crane: CraneRequirement, preds: &str) -> TaskRecord {
        TaskRecord::new(id, &format!("step {}", id), duration, crane, preds, 1.0)
    }

    #[test]
    fn test_split_predecessors() {
        assert_eq!(split_predecessors(" 1, 2 ,,3 "), vec!["1", "2", "3"]);
        assert!(split_predecessors("   ").is_empty());
    }

    #[test]
    fn test_build_resolves_predecessors() {
        let records = vec![
            record("1", 2.0, CraneRequirement::None, ""),
            record("2", 3.0, CraneRequirement::None, "1, 99"),
        ];
        let graph = TaskGraph::build(&records, &EngineSettings::default()).unwrap();

        let preds = &graph.task(1).predecessors;
        assert_eq!(preds.len(), 2);
        assert_eq!(preds[0].index, Some(0));
        assert_eq!(preds[1].index, None);
        assert_eq!(graph.warnings().len(), 1);
    }

    #[test]
    fn test_build_strict_rejects_unresolved() {
        let records = vec![record("1", 2.0, CraneRequirement::None, "X")];
        let err = TaskGraph::build(&records, &EngineSettings::strict()).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnresolvedPredecessor {
                task_id: "1".to_string(),
                token: "X".to_string()
            }
        );
    }

    #[test]
    fn test_build_rejects_invalid_duration() {
        let mut bad = record("1", 0.0, CraneRequirement::None, "");
        bad.duration_min = ParsedValue::Invalid("abc".to_string());
        let err = TaskGraph::build(&[bad], &EngineSettings::default()).unwrap_err();
        assert!(matches!(err, GraphError::InputShape { ref field, .. } if field == "duration"));
    }

    #[test]
    fn test_build_missing_duration_is_zero_with_warning() {
        let mut rec = record("1", 0.0, CraneRequirement::None, "");
        rec.duration_min = ParsedValue::Missing;
        let graph = TaskGraph::build(&[rec], &EngineSettings::default()).unwrap();
        assert_eq!(graph.task(0).duration_min, 0.0);
        assert_eq!(graph.warnings().len(), 1);
    }

    #[test]
    fn test_build_rejects_duplicate_ids() {
        let records = vec![
            record("1", 2.0, CraneRequirement::None, ""),
            record("1", 3.0, CraneRequirement::None, ""),
        ];
        let err = TaskGraph::build(&records, &EngineSettings::default()).unwrap_err();
        assert_eq!(err, GraphError::DuplicateTaskId("1".to_string()));
    }

    #[test]
    fn test_total_eligible_duration_skips_excluded() {
        let records = vec![
            record("1", 2.0, CraneRequirement::None, ""),
            record("2", 30.0, CraneRequirement::Excluded, ""),
            record("3", 4.0, CraneRequirement::Required, ""),
        ];
        let graph = TaskGraph::build(&records, &EngineSettings::default()).unwrap();
        assert_eq!(graph.total_eligible_duration(), 6.0);
        assert_eq!(graph.excluded_indices(), vec![1]);
        assert_eq!(graph.crane_required_indices(), vec![2]);
    }

    #[test]
    fn test_compute_order_predecessors_first() {
        // 1 <- 2 <- 3, 1 <- 3
        let records = vec![
            record("1", 1.0, CraneRequirement::None, ""),
            record("2", 1.0, CraneRequirement::None, "1"),
            record("3", 1.0, CraneRequirement::None, "2, 1"),
        ];
        let graph = TaskGraph::build(&records, &EngineSettings::default()).unwrap();
        let placements = vec![Placement::Unplaced; 3];

        let order = graph.compute_order(2, &placements).unwrap();
        let sequence: Vec<usize> = order.entries().map(|e| e.task_index).collect();
        assert_eq!(sequence, vec![0, 1, 2]);
        assert!(!order.truncated);
        // 任务 1 经两条路径到达, 取最大跳数
        assert_eq!(order.levels[0][0].hops, 2);
    }

    #[test]
    fn test_compute_order_uses_placed_predecessor_station() {
        let records = vec![
            record("1", 1.0, CraneRequirement::None, ""),
            record("2", 1.0, CraneRequirement::None, ""),
            record("3", 1.0, CraneRequirement::None, "1, 2"),
        ];
        let graph = TaskGraph::build(&records, &EngineSettings::default()).unwrap();
        let placements = vec![Placement::Station(3), Placement::Unplaced, Placement::Unplaced];

        let order = graph.compute_order(2, &placements).unwrap();
        assert_eq!(order.levels.len(), 2);
        assert_eq!(order.levels[0][0].task_index, 1);
        assert_eq!(order.levels[0][0].min_station, -1);
        // 任务 3 的下限来自已放置的任务 1
        assert_eq!(order.levels[1][0].task_index, 2);
        assert_eq!(order.levels[1][0].min_station, 3);
    }

    #[test]
    fn test_compute_order_propagates_lower_bound() {
        // 任务 2 的前置 1 已在工位 4; 任务 3 依赖 2 但自身无已放置前置
        let records = vec![
            record("1", 1.0, CraneRequirement::None, ""),
            record("2", 1.0, CraneRequirement::None, "1"),
            record("3", 1.0, CraneRequirement::None, "2"),
        ];
        let graph = TaskGraph::build(&records, &EngineSettings::default()).unwrap();
        let placements = vec![Placement::Station(4), Placement::Unplaced, Placement::Unplaced];

        let order = graph.compute_order(2, &placements).unwrap();
        let mins: Vec<i64> = order.entries().map(|e| e.min_station).collect();
        assert_eq!(mins, vec![4, 4]);
    }

    #[test]
    fn test_compute_order_skips_excluded_predecessor() {
        let records = vec![
            record("1", 1.0, CraneRequirement::Excluded, ""),
            record("2", 1.0, CraneRequirement::None, "1"),
        ];
        let graph = TaskGraph::build(&records, &EngineSettings::default()).unwrap();
        let placements = vec![Placement::Unplaced; 2];

        let order = graph.compute_order(1, &placements).unwrap();
        assert_eq!(order.len(), 1);
        assert_eq!(graph.placement_floor(1, &placements), Some(-1));
    }

    #[test]
    fn test_compute_order_cycle_hits_guard() {
        let records = vec![
            record("C", 1.0, CraneRequirement::None, "D"),
            record("D", 1.0, CraneRequirement::None, "C"),
        ];
        let graph = TaskGraph::build(&records, &EngineSettings::default()).unwrap();
        let placements = vec![Placement::Unplaced; 2];

        let order = graph.compute_order(0, &placements).unwrap();
        assert!(order.truncated);
        assert_eq!(order.len(), 2);

        let strict = TaskGraph::build(&records, &EngineSettings::strict()).unwrap();
        let err = strict.compute_order(0, &placements).unwrap_err();
        assert_eq!(
            err,
            GraphError::CycleGuardExceeded {
                task_id: "C".to_string(),
                guard: 100
            }
        );
    }

    #[test]
    fn test_placement_floor() {
        let records = vec![
            record("1", 1.0, CraneRequirement::None, ""),
            record("2", 1.0, CraneRequirement::None, ""),
            record("3", 1.0, CraneRequirement::None, "1, 2"),
        ];
        let graph = TaskGraph::build(&records, &EngineSettings::default()).unwrap();

        let partial = vec![Placement::Station(2), Placement::Unplaced, Placement::Unplaced];
        assert_eq!(graph.placement_floor(2, &partial), None);

        let done = vec![Placement::Station(2), Placement::Station(5), Placement::Unplaced];
        assert_eq!(graph.placement_floor(2, &done), Some(5));
    }
}
