// ==========================================
// 装配线平衡系统 - 领域类型定义
// ==========================================
// 职责: 吊车需求三态、解析结果、策略模式、终止原因
// 红线: 解析失败必须显式标记,不得静默置零
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 吊车需求 (Crane Requirement)
// ==========================================
// 源数据编码: 0 = 不需要, 1 = 需要, -1 = 线外作业(不占工位)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CraneRequirement {
    #[default]
    None,
    Required,
    Excluded,
}

impl CraneRequirement {
    /// 从源数据编码转换
    ///
    /// 仅接受 -1 / 0 / 1 (允许 `1.0` 这类浮点写法)
    pub fn from_code(code: f64) -> Option<Self> {
        if code == 0.0 {
            Some(CraneRequirement::None)
        } else if code == 1.0 {
            Some(CraneRequirement::Required)
        } else if code == -1.0 {
            Some(CraneRequirement::Excluded)
        } else {
            None
        }
    }
}

impl fmt::Display for CraneRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CraneRequirement::None => write!(f, "NONE"),
            CraneRequirement::Required => write!(f, "REQUIRED"),
            CraneRequirement::Excluded => write!(f, "EXCLUDED"),
        }
    }
}

// ==========================================
// 单元格解析结果 (Parsed Value)
// ==========================================
// 替代 "解析失败即置零" 的宽松转换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParsedValue<T> {
    /// 合法值
    Valid(T),
    /// 空单元格
    Missing,
    /// 无法解析 (保留原文便于定位)
    Invalid(String),
}

impl ParsedValue<f64> {
    /// 解析数值单元格
    ///
    /// 空白 -> Missing; 非数值/NaN/无穷 -> Invalid
    pub fn parse_number(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ParsedValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => ParsedValue::Valid(v),
            _ => ParsedValue::Invalid(trimmed.to_string()),
        }
    }
}

impl ParsedValue<CraneRequirement> {
    /// 解析吊车需求单元格
    pub fn parse_crane(raw: &str) -> Self {
        match ParsedValue::parse_number(raw) {
            ParsedValue::Valid(code) => match CraneRequirement::from_code(code) {
                Some(req) => ParsedValue::Valid(req),
                None => ParsedValue::Invalid(raw.trim().to_string()),
            },
            ParsedValue::Missing => ParsedValue::Missing,
            ParsedValue::Invalid(text) => ParsedValue::Invalid(text),
        }
    }
}

// ==========================================
// 宽松/严格策略 (Guard Policy)
// ==========================================
// 用于: 前置任务无法解析、层级保护截断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardPolicy {
    /// 记录告警后继续 (与历史行为一致)
    #[default]
    Lenient,
    /// 直接判定该车型计算失败
    Strict,
}

impl fmt::Display for GuardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardPolicy::Lenient => write!(f, "LENIENT"),
            GuardPolicy::Strict => write!(f, "STRICT"),
        }
    }
}

// ==========================================
// 收敛终止原因 (Termination Reason)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationReason {
    /// 工位数不再增长
    Converged,
    /// 达到最大尝试次数,仍可能存在溢出
    IterationCapExhausted,
    /// 达到时间预算
    BudgetExhausted,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Converged => write!(f, "CONVERGED"),
            TerminationReason::IterationCapExhausted => write!(f, "ITERATION_CAP_EXHAUSTED"),
            TerminationReason::BudgetExhausted => write!(f, "BUDGET_EXHAUSTED"),
        }
    }
}
