// ==========================================
// 装配线平衡系统 - 引擎层
// ==========================================
// 职责: 作业图、工位分配、收敛循环、结果标注
// 红线: 引擎不读文件, 所有放置失败必须输出原因
// ==========================================

pub mod annotator;
pub mod convergence;
pub mod error;
pub mod orchestrator;
pub mod station_assigner;
pub mod task_graph;

// 重导出核心引擎
pub use annotator::ResultAnnotator;
pub use convergence::{ConvergenceLoop, ConvergenceOutcome};
pub use error::{EngineError, EngineResult, GraphError};
pub use orchestrator::BalanceOrchestrator;
pub use station_assigner::{AssignPass, AssignmentRun, PlacementState, StationAssigner};
pub use task_graph::{LeveledOrder, OrderEntry, TaskGraph};
