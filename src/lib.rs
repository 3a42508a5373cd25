// ==========================================
// 装配线平衡系统 - 核心库
// ==========================================
// 系统定位: 按车型将作业分配到工位, 满足节拍、前置与吊车约束
// 主流程: 作业表 -> 作业图 -> 收敛循环(工位分配) -> 结果标注
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 平衡算法
pub mod engine;

// 导入层 - 外部工作簿
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 请求与响应
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CraneRequirement, GuardPolicy, ParsedValue, TerminationReason};

// 领域实体
pub use domain::{
    AnnotatedStation, LineConfig, ModelSolution, ModelTable, Placement, Station, Task, TaskRecord,
};

// 引擎
pub use engine::{
    BalanceOrchestrator, ConvergenceLoop, ResultAnnotator, StationAssigner, TaskGraph,
};

// API
pub use api::{LineBalanceApi, LineBalanceRequest, LineBalanceResponse};

// 配置
pub use config::{BalanceConfig, ConfigManager};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "装配线平衡系统";
