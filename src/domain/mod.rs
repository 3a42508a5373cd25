// ==========================================
// 装配线平衡系统 - 领域层
// ==========================================
// 职责: 定义作业、工位、车型、平衡结果
// 红线: 领域层不含算法逻辑
// ==========================================

pub mod model;
pub mod solution;
pub mod station;
pub mod task;
pub mod types;

// 重导出核心实体
pub use model::{LineConfig, ModelTable};
pub use solution::{AnnotatedStation, ModelSolution, TaskPlacementView};
pub use station::Station;
pub use task::{Placement, PredecessorRef, Task, TaskRecord};
pub use types::{CraneRequirement, GuardPolicy, ParsedValue, TerminationReason};
