// ==========================================
// 装配线平衡系统 - API层
// ==========================================
// 职责: 请求校验、节拍推导、车型隔离计算、响应汇总
// ==========================================

pub mod dto;
pub mod error;
pub mod line_balance_api;

pub use dto::{CycleTimes, LineBalanceRequest, LineBalanceResponse, ModelDemand, ResponseMetadata};
pub use error::{ApiError, ApiResult};
pub use line_balance_api::LineBalanceApi;
