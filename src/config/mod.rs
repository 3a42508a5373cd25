// ==========================================
// 装配线平衡系统 - 配置层
// ==========================================
// 职责: 系统配置管理,支持文件与环境变量覆写
// 存储: JSON 文件
// ==========================================

pub mod balance_config;
pub mod config_manager;
pub mod config_reader;

// 重导出核心配置管理器
pub use balance_config::{BalanceConfig, ColumnMapping, EngineSettings, ShiftSettings};
pub use config_manager::{env_keys, ConfigError, ConfigManager};
pub use config_reader::BalanceConfigReader;
