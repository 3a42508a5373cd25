// ==========================================
// 装配线平衡系统 - 配置项全集
// ==========================================
// 职责: 引擎参数、源表列映射、班次时间
// 存储: JSON 文件 (缺省字段使用默认值)
// ==========================================

use crate::domain::types::GuardPolicy;
use serde::{Deserialize, Serialize};

// ==========================================
// 默认值常量
// ==========================================
pub mod defaults {
    /// 最大收敛尝试次数
    pub const MAX_ATTEMPTS: usize = 10;
    /// 前置展开层级保护
    pub const LEVEL_GUARD: usize = 100;
    /// General 班次总时间 (分钟)
    pub const GENERAL_SHIFT_MIN: f64 = 455.0;
    /// 其它班次总时间 (分钟)
    pub const OTHER_SHIFT_MIN: f64 = 425.0;
    /// 固定准备损耗 (分钟)
    pub const SETUP_LOSS_MIN: f64 = 2.2;
    /// 车型工作表前缀
    pub const SHEET_PREFIX: &str = "ModelData_";
}

// ==========================================
// EngineSettings - 引擎参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub max_attempts: usize,
    pub level_guard: usize,
    /// 时间预算 (毫秒); None 表示不限
    pub time_budget_ms: Option<u64>,
    pub unresolved_predecessor_policy: GuardPolicy,
    pub cycle_guard_policy: GuardPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            level_guard: defaults::LEVEL_GUARD,
            time_budget_ms: None,
            unresolved_predecessor_policy: GuardPolicy::Lenient,
            cycle_guard_policy: GuardPolicy::Lenient,
        }
    }
}

impl EngineSettings {
    /// 两项策略同时切换为严格模式
    pub fn strict() -> Self {
        Self {
            unresolved_predecessor_policy: GuardPolicy::Strict,
            cycle_guard_policy: GuardPolicy::Strict,
            ..Self::default()
        }
    }
}

// ==========================================
// ColumnMapping - 源表列名映射
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub task_id: String,
    pub label: String,
    pub duration: String,
    pub crane: String,
    pub predecessors: String,
    pub manpower: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            task_id: "TOTAL Order".to_string(),
            label: "Steps".to_string(),
            duration: "Time (in minutes)".to_string(),
            crane: "Crane Required".to_string(),
            predecessors: "Predecessors".to_string(),
            manpower: "Manpower (19)".to_string(),
        }
    }
}

// ==========================================
// ShiftSettings - 班次时间
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftSettings {
    pub general_shift_name: String,
    pub general_total_min: f64,
    pub other_total_min: f64,
    pub setup_loss_min: f64,
}

impl Default for ShiftSettings {
    fn default() -> Self {
        Self {
            general_shift_name: "General".to_string(),
            general_total_min: defaults::GENERAL_SHIFT_MIN,
            other_total_min: defaults::OTHER_SHIFT_MIN,
            setup_loss_min: defaults::SETUP_LOSS_MIN,
        }
    }
}

impl ShiftSettings {
    /// 班次总时间 (分钟)
    pub fn total_time_for(&self, shift: &str) -> f64 {
        if shift.trim() == self.general_shift_name {
            self.general_total_min
        } else {
            self.other_total_min
        }
    }
}

// ==========================================
// BalanceConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub engine: EngineSettings,
    pub columns: ColumnMapping,
    pub shift: ShiftSettings,
    pub sheet_prefix: String,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            columns: ColumnMapping::default(),
            shift: ShiftSettings::default(),
            sheet_prefix: defaults::SHEET_PREFIX.to_string(),
        }
    }
}
