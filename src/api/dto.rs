// ==========================================
// 装配线平衡系统 - 请求/响应 DTO
// ==========================================
// 字段名与前端表单约定保持一致 (noOfStations / crane_pos / models)
// ==========================================

use crate::api::error::ApiError;
use crate::domain::solution::ModelSolution;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 车型需求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDemand {
    pub name: String,
    pub quantity: u32,
}

/// 平衡请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBalanceRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub shift: String,
    #[serde(default)]
    pub line: Option<String>,
    #[serde(rename = "noOfStations")]
    pub no_of_stations: usize,
    /// 配吊车工位 (1 起); 非正数会被忽略
    #[serde(default)]
    pub crane_pos: Vec<i64>,
    #[serde(default)]
    pub models: Vec<ModelDemand>,
}

impl LineBalanceRequest {
    /// 需求总台数
    pub fn total_units(&self) -> u64 {
        self.models.iter().map(|m| m.quantity as u64).sum()
    }
}

/// 节拍推导结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleTimes {
    pub total_time: f64,
    pub total_units: u64,
    pub takt_time: f64,
    pub cycle_time: f64,
}

/// 响应汇总信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub cycle_time: f64,
    pub takt_time: f64,
    pub total_time: f64,
    pub total_models: u64,
    #[serde(rename = "noOfStations")]
    pub no_of_stations: usize,
    pub shift: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// 平衡响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBalanceResponse {
    pub success: bool,
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// 车型 -> 平衡结果
    pub data: BTreeMap<String, ModelSolution>,
    /// 车型 -> 失败原因
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub failures: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 诊断详情 (仅整体失败时)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LineBalanceResponse {
    /// 整体失败响应 (不含任何车型结果)
    pub fn failure(err: &ApiError) -> Self {
        Self {
            success: false,
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            data: BTreeMap::new(),
            failures: BTreeMap::new(),
            warnings: Vec::new(),
            metadata: None,
            message: Some(err.to_string()),
            detail: Some(format!("{:?}", err)),
        }
    }

    /// 全部车型均成功
    pub fn is_complete(&self) -> bool {
        self.success && self.failures.is_empty()
    }
}
