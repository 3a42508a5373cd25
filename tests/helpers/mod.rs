// ==========================================
// 集成测试公共辅助
// ==========================================
#![allow(dead_code)]

pub mod mock_config;
pub mod task_table_builder;
