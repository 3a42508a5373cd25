// ==========================================
// 装配线平衡系统 - 车型与产线配置
// ==========================================

use crate::domain::task::TaskRecord;
use serde::{Deserialize, Serialize};

// ==========================================
// ModelTable - 单车型作业表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTable {
    pub name: String,
    pub records: Vec<TaskRecord>,
}

impl ModelTable {
    pub fn new(name: &str, records: Vec<TaskRecord>) -> Self {
        Self {
            name: name.to_string(),
            records,
        }
    }
}

// ==========================================
// LineConfig - 产线参数 (单次请求内所有车型共用)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    pub cycle_time_min: f64,         // 节拍 (分钟)
    pub baseline_stations: usize,    // 基准工位数
    pub crane_positions: Vec<usize>, // 配吊车工位 (1 起)
}

impl LineConfig {
    pub fn new(cycle_time_min: f64, baseline_stations: usize, crane_positions: Vec<usize>) -> Self {
        Self {
            cycle_time_min,
            baseline_stations,
            crane_positions,
        }
    }
}
