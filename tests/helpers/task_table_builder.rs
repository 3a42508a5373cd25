// ==========================================
// 作业表构建器 - 用于集成测试
// ==========================================

use line_balancing::domain::model::{LineConfig, ModelTable};
use line_balancing::domain::task::TaskRecord;
use line_balancing::domain::types::{CraneRequirement, ParsedValue};

// ==========================================
// TaskRecord 构建器
// ==========================================

pub struct TaskBuilder {
    task_id: String,
    label: String,
    duration_min: ParsedValue<f64>,
    crane: ParsedValue<CraneRequirement>,
    predecessors: String,
    manpower: ParsedValue<f64>,
}

impl TaskBuilder {
    pub fn new(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            label: format!("Step {}", task_id),
            duration_min: ParsedValue::Valid(1.0),
            crane: ParsedValue::Missing,
            predecessors: String::new(),
            manpower: ParsedValue::Valid(1.0),
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn duration(mut self, minutes: f64) -> Self {
        self.duration_min = ParsedValue::Valid(minutes);
        self
    }

    pub fn raw_duration(mut self, raw: &str) -> Self {
        self.duration_min = ParsedValue::parse_number(raw);
        self
    }

    pub fn crane(mut self, crane: CraneRequirement) -> Self {
        self.crane = ParsedValue::Valid(crane);
        self
    }

    pub fn after(mut self, predecessors: &str) -> Self {
        self.predecessors = predecessors.to_string();
        self
    }

    pub fn manpower(mut self, manpower: f64) -> Self {
        self.manpower = ParsedValue::Valid(manpower);
        self
    }

    pub fn build(self) -> TaskRecord {
        TaskRecord {
            row_no: 0,
            task_id: self.task_id,
            label: self.label,
            duration_min: self.duration_min,
            crane: self.crane,
            predecessors_raw: self.predecessors,
            manpower: self.manpower,
        }
    }
}

// ==========================================
// 常用作业表
// ==========================================

/// 无约束作业: 编号 1..=n, 时长依次取 durations
pub fn plain_tasks(durations: &[f64]) -> Vec<TaskRecord> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| TaskBuilder::new(&(i + 1).to_string()).duration(*d).build())
        .collect()
}

/// 两个作业互为前置 (C <-> D)
pub fn two_task_cycle() -> Vec<TaskRecord> {
    vec![
        TaskBuilder::new("C").duration(2.0).after("D").build(),
        TaskBuilder::new("D").duration(2.0).after("C").build(),
    ]
}

/// 含吊车作业与线外作业的装配流程
///
/// 1 -> 2, 1 -> 3(吊车), {2,3} -> 4 -> 5; 0 为线外作业
pub fn mixed_flow() -> Vec<TaskRecord> {
    vec![
        TaskBuilder::new("0")
            .label("Pre-assemble harness")
            .duration(6.0)
            .crane(CraneRequirement::Excluded)
            .manpower(2.0)
            .build(),
        TaskBuilder::new("1")
            .label("Load frame")
            .duration(3.0)
            .manpower(1.5)
            .build(),
        TaskBuilder::new("2")
            .label("Fit axle")
            .duration(4.0)
            .after("1")
            .manpower(1.2)
            .build(),
        TaskBuilder::new("3")
            .label("Drop engine")
            .duration(6.0)
            .crane(CraneRequirement::Required)
            .after("1")
            .manpower(2.0)
            .build(),
        TaskBuilder::new("4")
            .label("Connect drivetrain")
            .duration(5.0)
            .after("2, 3")
            .build(),
        TaskBuilder::new("5")
            .label("Final check")
            .duration(2.0)
            .after("4,0")
            .manpower(0.5)
            .build(),
    ]
}

pub fn model(name: &str, records: Vec<TaskRecord>) -> ModelTable {
    ModelTable::new(name, records)
}

pub fn line(
    cycle_time_min: f64,
    baseline_stations: usize,
    crane_positions: Vec<usize>,
) -> LineConfig {
    LineConfig::new(cycle_time_min, baseline_stations, crane_positions)
}
