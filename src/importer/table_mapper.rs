// ==========================================
// 装配线平衡系统 - 作业表字段映射
// ==========================================
// 职责: 原始行 -> TaskRecord (数值单元格转为 ParsedValue)
// 红线: 映射层只做类型转换, 取值策略由作业图决定
// ==========================================

use crate::config::ColumnMapping;
use crate::domain::model::ModelTable;
use crate::domain::task::TaskRecord;
use crate::domain::types::ParsedValue;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, RawTable};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct TaskTableMapper {
    columns: ColumnMapping,
}

impl TaskTableMapper {
    pub fn new(columns: ColumnMapping) -> Self {
        Self { columns }
    }

    /// 映射整张表
    ///
    /// 必需列: 作业编号、时长; 其余列缺失时按空单元格处理
    /// 作业编号为空的行跳过
    pub fn map_table(&self, table: &RawTable) -> ImportResult<ModelTable> {
        for required in [&self.columns.task_id, &self.columns.duration] {
            if !table.has_column(required) {
                return Err(ImportError::MissingColumn {
                    table: table.name.clone(),
                    column: required.clone(),
                });
            }
        }

        let mut records = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            match self.map_row(row) {
                Some(record) => records.push(record),
                None => warn!(
                    table = %table.name,
                    row = row.row_no,
                    "作业编号为空,跳过该行"
                ),
            }
        }

        Ok(ModelTable::new(&table.name, records))
    }

    fn map_row(&self, row: &RawRow) -> Option<TaskRecord> {
        let task_id = cell(row, &self.columns.task_id).trim();
        if task_id.is_empty() {
            return None;
        }

        Some(TaskRecord {
            row_no: row.row_no,
            task_id: task_id.to_string(),
            label: cell(row, &self.columns.label).trim().to_string(),
            duration_min: ParsedValue::parse_number(cell(row, &self.columns.duration)),
            crane: ParsedValue::parse_crane(cell(row, &self.columns.crane)),
            predecessors_raw: cell(row, &self.columns.predecessors).to_string(),
            manpower: ParsedValue::parse_number(cell(row, &self.columns.manpower)),
        })
    }
}

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a str {
    row.cells.get(column).map(String::as_str).unwrap_or("")
}
