// ==========================================
// 装配线平衡系统 - 作业表来源
// ==========================================
// 职责: 读取工作簿并映射为各车型作业表
// 说明: 文件读取在阻塞线程执行, 不占用异步运行时
// ==========================================

use crate::config::BalanceConfigReader;
use crate::domain::model::ModelTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{TableParser, UniversalWorkbookParser};
use crate::importer::table_mapper::TaskTableMapper;
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

// ==========================================
// WorkbookSource Trait
// ==========================================
// 实现者: FileWorkbookSource
#[async_trait]
pub trait WorkbookSource: Send + Sync {
    /// 读取全部车型作业表
    ///
    /// # 返回
    /// - Ok(Vec<ModelTable>): 按工作表顺序
    /// - Err: 文件不存在、格式不支持、缺少必需列等
    async fn load_models(&self, path: &Path) -> ImportResult<Vec<ModelTable>>;
}

// ==========================================
// FileWorkbookSource - 本地文件实现
// ==========================================
#[derive(Debug, Clone)]
pub struct FileWorkbookSource {
    parser: UniversalWorkbookParser,
    mapper: TaskTableMapper,
}

impl FileWorkbookSource {
    pub fn new(parser: UniversalWorkbookParser, mapper: TaskTableMapper) -> Self {
        Self { parser, mapper }
    }

    pub fn from_config<C: BalanceConfigReader + ?Sized>(config: &C) -> Self {
        Self::new(
            UniversalWorkbookParser::new(&config.sheet_prefix()),
            TaskTableMapper::new(config.column_mapping()),
        )
    }

    /// 同步读取 (供阻塞线程与命令行工具使用)
    pub fn load_models_blocking(&self, path: &Path) -> ImportResult<Vec<ModelTable>> {
        let tables = self.parser.parse_tables(path)?;
        let models = tables
            .iter()
            .map(|t| self.mapper.map_table(t))
            .collect::<ImportResult<Vec<_>>>()?;

        info!(path = %path.display(), models = models.len(), "作业表读取完成");
        Ok(models)
    }
}

#[async_trait]
impl WorkbookSource for FileWorkbookSource {
    async fn load_models(&self, path: &Path) -> ImportResult<Vec<ModelTable>> {
        let source = self.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || source.load_models_blocking(&path))
            .await
            .map_err(|e| ImportError::InternalError(format!("读取任务异常终止: {}", e)))?
    }
}
