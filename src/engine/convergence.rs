// ==========================================
// 装配线平衡系统 - 工位数收敛循环
// ==========================================
// 职责: 反复执行工位分配, 工位数随溢出增长直至稳定
// 终止: 收敛 / 达到最大尝试次数 / 达到时间预算
// ==========================================
// 红线: 工位数在迭代间单调不减
// 红线: 每次尝试从零重建工位与放置状态
// ==========================================

use crate::config::EngineSettings;
use crate::domain::model::LineConfig;
use crate::domain::station::Station;
use crate::domain::task::Placement;
use crate::domain::types::TerminationReason;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::station_assigner::StationAssigner;
use crate::engine::task_graph::TaskGraph;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// ==========================================
// ConvergenceOutcome - 收敛结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceOutcome {
    pub stations: Vec<Station>,
    pub placements: Vec<Placement>,
    pub attempts: usize,
    /// 每次尝试使用的工位数
    pub station_history: Vec<usize>,
    pub termination: TerminationReason,
    pub truncated_orders: usize,
}

impl ConvergenceOutcome {
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
// ConvergenceLoop - 收敛循环
// ==========================================
#[derive(Debug, Clone)]
pub struct ConvergenceLoop {
    max_attempts: usize,
    time_budget: Option<Duration>,
}

impl ConvergenceLoop {
    pub fn new(max_attempts: usize, time_budget: Option<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            time_budget,
        }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(
            settings.max_attempts,
            settings.time_budget_ms.map(Duration::from_millis),
        )
    }

    /// 初始工位数 = max(基准工位数, ceil(有效总时长 / 节拍))
    pub fn initial_station_count(graph: &TaskGraph, line: &LineConfig) -> usize {
        let required = (graph.total_eligible_duration() / line.cycle_time_min).ceil();
        let required = if required.is_finite() && required > 0.0 {
            required as usize
        } else {
            0
        };
        line.baseline_stations.max(required)
    }

    /// 按工位数构建初始工位
    ///
    /// 工位数超过基准时, 在最前面插入 diff 个配吊车工位,
    /// 原配置的吊车位置整体后移 diff
    pub fn build_stations(working: usize, line: &LineConfig) -> Vec<Station> {
        let mut stations: Vec<Station> = (0..working)
            .map(|_| Station::new(line.cycle_time_min, false))
            .collect();

        let diff = working.saturating_sub(line.baseline_stations);
        let positions = (1..=diff).chain(line.crane_positions.iter().map(|p| p + diff));
        for pos in positions {
            if pos >= 1 && pos <= stations.len() {
                stations[pos - 1].crane_equipped = true;
            }
        }
        stations
    }

    /// 执行收敛循环
    pub fn run(&self, graph: &TaskGraph, line: &LineConfig) -> EngineResult<ConvergenceOutcome> {
        if !(line.cycle_time_min.is_finite() && line.cycle_time_min > 0.0) {
            return Err(EngineError::InvalidLineConfig(format!(
                "节拍必须为正数: {}",
                line.cycle_time_min
            )));
        }
        if line.baseline_stations == 0 {
            return Err(EngineError::InvalidLineConfig("基准工位数必须 >= 1".to_string()));
        }

        let started = Instant::now();
        let assigner = StationAssigner::new(graph, line.cycle_time_min);
        let mut working = Self::initial_station_count(graph, line);
        let mut history = Vec::new();
        let mut attempt = 0;

        loop {
            attempt += 1;
            history.push(working);

            let run = assigner.run(Self::build_stations(working, line))?;
            let observed = run.stations.len();
            debug!(attempt, working, observed, "收敛尝试");

            let termination = if observed <= working {
                Some(TerminationReason::Converged)
            } else if attempt >= self.max_attempts {
                Some(TerminationReason::IterationCapExhausted)
            } else if self.time_budget.is_some_and(|b| started.elapsed() >= b) {
                Some(TerminationReason::BudgetExhausted)
            } else {
                None
            };

            match termination {
                Some(reason) => {
                    if reason != TerminationReason::Converged {
                        warn!(attempt, observed, %reason, "收敛未完成,接受当前溢出");
                    }
                    return Ok(ConvergenceOutcome {
                        stations: run.stations,
                        placements: run.placements,
                        attempts: attempt,
                        station_history: history,
                        termination: reason,
                        truncated_orders: run.truncated_orders,
                    });
                }
                None => working = observed,
            }
        }
    }
}

impl Default for ConvergenceLoop {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}
