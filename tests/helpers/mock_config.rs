// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use line_balancing::config::{BalanceConfigReader, ColumnMapping, EngineSettings, ShiftSettings};

/// Mock 配置结构
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub engine: EngineSettings,
    pub columns: ColumnMapping,
    pub shift: ShiftSettings,
    pub sheet_prefix: Option<String>,
}

impl MockConfig {
    /// 严格模式 (未解析前置、层级保护均报错)
    pub fn strict() -> Self {
        Self {
            engine: EngineSettings::strict(),
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.engine.max_attempts = max_attempts;
        self
    }
}

impl BalanceConfigReader for MockConfig {
    fn engine_settings(&self) -> EngineSettings {
        self.engine.clone()
    }

    fn column_mapping(&self) -> ColumnMapping {
        self.columns.clone()
    }

    fn shift_settings(&self) -> ShiftSettings {
        self.shift.clone()
    }

    fn sheet_prefix(&self) -> String {
        self.sheet_prefix
            .clone()
            .unwrap_or_else(|| "ModelData_".to_string())
    }
}
