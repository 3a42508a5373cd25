// ==========================================
// 装配线平衡系统 - 配置读取 Trait
// ==========================================
// 职责: 定义引擎/导入/请求层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::balance_config::{ColumnMapping, EngineSettings, ShiftSettings};

// ==========================================
// BalanceConfigReader Trait
// ==========================================
// 实现者: ConfigManager
pub trait BalanceConfigReader: Send + Sync {
    /// 引擎参数 (尝试次数、层级保护、策略)
    fn engine_settings(&self) -> EngineSettings;

    /// 源表列名映射
    fn column_mapping(&self) -> ColumnMapping;

    /// 班次时间
    fn shift_settings(&self) -> ShiftSettings;

    /// 车型工作表前缀
    ///
    /// # 默认值
    /// - "ModelData_"
    fn sheet_prefix(&self) -> String;
}
