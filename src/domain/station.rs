// ==========================================
// 装配线平衡系统 - 工位领域模型
// ==========================================
// 红线: 剩余时间只减不增; 仅单任务超节拍时允许为负
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Station - 工位 (单次迭代的可变记录)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub crane_equipped: bool,  // 是否配备吊车
    pub task_order: Vec<usize>, // 已分配任务下标 (按分配顺序)
    pub remaining_min: f64,    // 剩余时间 (分钟)
}

impl Station {
    /// 创建空工位,剩余时间 = 节拍
    pub fn new(cycle_time_min: f64, crane_equipped: bool) -> Self {
        Self {
            crane_equipped,
            task_order: Vec::new(),
            remaining_min: cycle_time_min,
        }
    }

    /// 创建溢出工位并直接放入一个任务
    pub fn overflow(
        cycle_time_min: f64,
        crane_equipped: bool,
        task_index: usize,
        duration_min: f64,
    ) -> Self {
        Self {
            crane_equipped,
            task_order: vec![task_index],
            remaining_min: cycle_time_min - duration_min,
        }
    }

    /// 检查是否可容纳任务
    pub fn can_host(&self, duration_min: f64, needs_crane: bool) -> bool {
        if needs_crane && !self.crane_equipped {
            return false;
        }
        duration_min <= self.remaining_min
    }

    /// 分配任务并扣减剩余时间
    pub fn assign(&mut self, task_index: usize, duration_min: f64) {
        self.task_order.push(task_index);
        self.remaining_min -= duration_min;
    }

    pub fn is_empty(&self) -> bool {
        self.task_order.is_empty()
    }
}
