// ==========================================
// 装配线平衡系统 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 作业图错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    // ===== 输入形态错误 =====
    #[error("输入字段非法 (作业 {task_id}, 字段 {field}): {message}")]
    InputShape {
        task_id: String,
        field: String,
        message: String,
    },

    #[error("作业编号重复: {0}")]
    DuplicateTaskId(String),

    // ===== 前置引用 =====
    #[error("前置作业无法解析 (作业 {task_id}): {token}")]
    UnresolvedPredecessor { task_id: String, token: String },

    // ===== 层级保护 =====
    #[error("前置展开超过层级保护 (起点作业 {task_id}, 上限 {guard} 层)")]
    CycleGuardExceeded { task_id: String, guard: usize },
}

/// 引擎错误
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("产线参数非法: {0}")]
    InvalidLineConfig(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
