// ==========================================
// 装配线平衡系统 - 导入层
// ==========================================
// 职责: 外部工作簿 -> 各车型作业表
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod table_mapper;
pub mod workbook_source;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{
    normalize_model_name, CsvTableParser, ExcelWorkbookParser, RawRow, RawTable, TableParser,
    UniversalWorkbookParser,
};
pub use table_mapper::TaskTableMapper;
pub use workbook_source::{FileWorkbookSource, WorkbookSource};
