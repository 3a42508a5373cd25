// ==========================================
// 装配线平衡系统 - 平衡结果
// ==========================================
// 序列化字段名与前端约定保持一致
// (crane_aval / task_order / time_rem / Station_Number ...)
// ==========================================

use crate::domain::types::TerminationReason;
use serde::{Deserialize, Serialize};

// ==========================================
// AnnotatedStation - 标注后的工位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedStation {
    #[serde(rename = "crane_aval")]
    pub crane_equipped: bool,

    /// 已分配作业编号 (分配顺序)
    pub task_order: Vec<String>,

    #[serde(rename = "time_rem")]
    pub remaining_min: f64,

    /// 基准工位从 1 连续编号; 溢出工位为非正数
    #[serde(rename = "Station_Number")]
    pub station_number: i64,

    #[serde(rename = "Total_Manpower")]
    pub total_manpower: i64,

    /// "编号 -> 描述" 列表
    #[serde(rename = "Final_Order")]
    pub final_order: Vec<String>,

    /// 线外作业列表 (同一车型所有工位相同)
    #[serde(rename = "Activity Need to done Before")]
    pub activity_before: Vec<String>,
}

// ==========================================
// TaskPlacementView - 单任务放置结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPlacementView {
    pub task_id: String,
    pub placed: bool,
    /// 线外作业为 -1; 未放置为 None
    pub station_index: Option<i64>,
}

// ==========================================
// ModelSolution - 单车型平衡结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSolution {
    pub model: String,
    pub stations: Vec<AnnotatedStation>,
    pub placements: Vec<TaskPlacementView>,
    /// 未能放置的作业编号
    pub unplaced: Vec<String>,
    pub warnings: Vec<String>,
    pub attempts: usize,
    /// 每次尝试使用的工位数
    pub station_history: Vec<usize>,
    pub termination: TerminationReason,
}

impl ModelSolution {
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// 按作业编号查找放置结果
    pub fn placement_of(&self, task_id: &str) -> Option<&TaskPlacementView> {
        self.placements.iter().find(|p| p.task_id == task_id)
    }

    /// 按作业编号查找所在工位 (线外作业/未放置返回 None)
    pub fn station_of(&self, task_id: &str) -> Option<&AnnotatedStation> {
        self.stations
            .iter()
            .find(|s| s.task_order.iter().any(|id| id == task_id))
    }
}
