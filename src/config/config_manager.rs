// ==========================================
// 装配线平衡系统 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写
// 优先级: 显式路径 > 用户配置目录 > 内置默认值; 环境变量最后覆写
// ==========================================

use crate::config::balance_config::{BalanceConfig, ColumnMapping, EngineSettings, ShiftSettings};
use crate::config::config_reader::BalanceConfigReader;
use crate::domain::types::GuardPolicy;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

// ==========================================
// 环境变量键
// ==========================================
pub mod env_keys {
    pub const MAX_ATTEMPTS: &str = "LINE_BALANCING_MAX_ATTEMPTS";
    pub const LEVEL_GUARD: &str = "LINE_BALANCING_LEVEL_GUARD";
    pub const TIME_BUDGET_MS: &str = "LINE_BALANCING_TIME_BUDGET_MS";
    pub const STRICT: &str = "LINE_BALANCING_STRICT";
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    FormatError { path: String, message: String },

    #[error("配置值非法 (key: {key}, value: {value})")]
    ValueError { key: String, value: String },
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: BalanceConfig,
}

impl ConfigManager {
    /// 从已有配置创建
    pub fn from_config(config: BalanceConfig) -> Self {
        Self { config }
    }

    /// 加载配置并应用环境变量覆写
    ///
    /// # 参数
    /// - path: 显式配置文件路径; None 时尝试用户配置目录
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut manager = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_config_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => {
                    debug!("未找到配置文件,使用内置默认值");
                    Self::default()
                }
            },
        };

        manager.apply_env_overrides_from(|key| std::env::var(key).ok())?;
        Ok(manager)
    }

    /// 从 JSON 文件读取
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: BalanceConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::FormatError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        info!(path = %path.display(), "配置文件已加载");
        Ok(Self { config })
    }

    /// 用户配置目录下的默认配置路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("line-balancing").join("config.json"))
    }

    /// 应用环境变量覆写
    ///
    /// # 参数
    /// - lookup: 环境变量读取函数 (测试时可注入)
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(env_keys::MAX_ATTEMPTS) {
            self.config.engine.max_attempts = parse_positive(env_keys::MAX_ATTEMPTS, &v)?;
        }
        if let Some(v) = lookup(env_keys::LEVEL_GUARD) {
            self.config.engine.level_guard = parse_positive(env_keys::LEVEL_GUARD, &v)?;
        }
        if let Some(v) = lookup(env_keys::TIME_BUDGET_MS) {
            let ms = parse_positive(env_keys::TIME_BUDGET_MS, &v)?;
            self.config.engine.time_budget_ms = Some(ms as u64);
        }
        if let Some(v) = lookup(env_keys::STRICT) {
            let policy = if is_true(&v) {
                GuardPolicy::Strict
            } else {
                GuardPolicy::Lenient
            };
            self.config.engine.unresolved_predecessor_policy = policy;
            self.config.engine.cycle_guard_policy = policy;
        }
        Ok(())
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => {
            warn!(key, value, "环境变量值非法");
            Err(ConfigError::ValueError {
                key: key.to_string(),
                value: value.to_string(),
            })
        }
    }
}

impl BalanceConfigReader for ConfigManager {
    fn engine_settings(&self) -> EngineSettings {
        self.config.engine.clone()
    }

    fn column_mapping(&self) -> ColumnMapping {
        self.config.columns.clone()
    }

    fn shift_settings(&self) -> ShiftSettings {
        self.config.shift.clone()
    }

    fn sheet_prefix(&self) -> String {
        self.config.sheet_prefix.clone()
    }
}
