// ==========================================
// 装配线平衡系统 - 作业任务领域模型
// ==========================================
// 职责: 源表行记录、图节点、放置状态
// ==========================================

use crate::domain::types::{CraneRequirement, ParsedValue};
use serde::{Deserialize, Serialize};

// ==========================================
// TaskRecord - 源表行记录 (类型化)
// ==========================================
// 用途: 导入层输出,TaskGraph 构建输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub row_no: usize,                        // 源表行号 (1 起, 含表头)
    pub task_id: String,                      // 作业编号 (TOTAL Order)
    pub label: String,                        // 作业描述 (Steps)
    pub duration_min: ParsedValue<f64>,       // 作业时长 (分钟)
    pub crane: ParsedValue<CraneRequirement>, // 吊车需求
    pub predecessors_raw: String,             // 前置作业编号 (逗号分隔)
    pub manpower: ParsedValue<f64>,           // 人力
}

impl TaskRecord {
    /// 构造全部字段合法的记录 (测试与程序化输入使用)
    pub fn new(
        task_id: &str,
        label: &str,
        duration_min: f64,
        crane: CraneRequirement,
        predecessors: &str,
        manpower: f64,
    ) -> Self {
        Self {
            row_no: 0,
            task_id: task_id.to_string(),
            label: label.to_string(),
            duration_min: ParsedValue::Valid(duration_min),
            crane: ParsedValue::Valid(crane),
            predecessors_raw: predecessors.to_string(),
            manpower: ParsedValue::Valid(manpower),
        }
    }
}

// ==========================================
// PredecessorRef - 前置引用
// ==========================================
// index = None 表示源表中找不到该编号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredecessorRef {
    pub token: String,
    pub index: Option<usize>,
}

// ==========================================
// Task - 图节点
// ==========================================
// 构建后不可变; 放置状态另存于 Placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub index: usize,
    pub task_id: String,
    pub label: String,
    pub duration_min: f64,
    pub crane: CraneRequirement,
    pub predecessors: Vec<PredecessorRef>,
    pub manpower: f64,
}

impl Task {
    pub fn is_excluded(&self) -> bool {
        self.crane == CraneRequirement::Excluded
    }

    pub fn needs_crane(&self) -> bool {
        self.crane == CraneRequirement::Required
    }

    /// 展示文本: "编号 -> 描述"
    pub fn display_label(&self) -> String {
        format!("{} -> {}", self.task_id, self.label)
    }

    /// 可解析的前置任务下标
    pub fn resolved_predecessors(&self) -> impl Iterator<Item = usize> + '_ {
        self.predecessors.iter().filter_map(|p| p.index)
    }
}

// ==========================================
// Placement - 单次迭代内的放置状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Placement {
    #[default]
    Unplaced,
    /// 线外作业,工位哨兵值 -1
    Excluded,
    Station(usize),
}

impl Placement {
    /// 是否已完成 (线外作业视为完成)
    pub fn is_done(&self) -> bool {
        !matches!(self, Placement::Unplaced)
    }

    /// 工位下标 (线外作业返回 -1)
    pub fn station_index(&self) -> Option<i64> {
        match self {
            Placement::Unplaced => None,
            Placement::Excluded => Some(-1),
            Placement::Station(idx) => Some(*idx as i64),
        }
    }
}
