// ==========================================
// 装配线平衡系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls, 每个 ModelData_<车型> 工作表一张表)
//       CSV (.csv, 整个文件一张表, 以文件名为车型名)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// RawTable - 未类型化的表数据
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 源表行号 (表头为第 1 行)
    pub row_no: usize,
    pub cells: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

/// 车型名规范化: 去掉工作表前缀, '.' 替换为 '_'
pub fn normalize_model_name(raw: &str, prefix: &str) -> String {
    raw.strip_prefix(prefix).unwrap_or(raw).replace('.', "_")
}

/// 按表头组装一行; 完全空白返回 None
fn build_row<I, S>(headers: &[String], values: I, row_no: usize) -> Option<RawRow>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cells = HashMap::new();
    for (col_idx, value) in values.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if header.is_empty() {
                continue;
            }
            cells.insert(header.clone(), value.as_ref().trim().to_string());
        }
    }

    // 跳过完全空白的行
    if cells.values().all(|v| v.is_empty()) {
        return None;
    }
    Some(RawRow { row_no, cells })
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// TableParser Trait
// ==========================================
pub trait TableParser {
    /// 解析文件为若干张表
    fn parse_tables(&self, path: &Path) -> ImportResult<Vec<RawTable>>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvTableParser {
    pub sheet_prefix: String,
}

impl TableParser for CsvTableParser {
    fn parse_tables(&self, path: &Path) -> ImportResult<Vec<RawTable>> {
        check_exists(path)?;
        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            if let Some(row) = build_row(&headers, record.iter(), row_idx + 2) {
                rows.push(row);
            }
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        let name = normalize_model_name(stem, &self.sheet_prefix);
        debug!(table = %name, rows = rows.len(), "CSV 表解析完成");

        Ok(vec![RawTable {
            name,
            headers,
            rows,
        }])
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelWorkbookParser {
    pub sheet_prefix: String,
}

impl TableParser for ExcelWorkbookParser {
    fn parse_tables(&self, path: &Path) -> ImportResult<Vec<RawTable>> {
        check_exists(path)?;
        let ext = extension_of(path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names();

        let mut tables = Vec::new();
        for sheet_name in sheet_names {
            if !sheet_name.starts_with(&self.sheet_prefix) {
                continue;
            }

            let range = workbook.worksheet_range(&sheet_name)?;
            let mut rows_iter = range.rows();
            let headers: Vec<String> = match rows_iter.next() {
                Some(header_row) => header_row
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect(),
                None => {
                    debug!(sheet = %sheet_name, "工作表为空,跳过");
                    continue;
                }
            };

            let mut rows = Vec::new();
            for (row_idx, data_row) in rows_iter.enumerate() {
                let values = data_row.iter().map(|cell| cell.to_string());
                if let Some(row) = build_row(&headers, values, row_idx + 2) {
                    rows.push(row);
                }
            }

            let name = normalize_model_name(&sheet_name, &self.sheet_prefix);
            info!(
                sheet = %sheet_name,
                model = %name,
                rows = rows.len(),
                "车型工作表已读取"
            );
            tables.push(RawTable {
                name,
                headers,
                rows,
            });
        }

        if tables.is_empty() {
            return Err(ImportError::NoModelSheets(self.sheet_prefix.clone()));
        }
        Ok(tables)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone)]
pub struct UniversalWorkbookParser {
    pub sheet_prefix: String,
}

impl UniversalWorkbookParser {
    pub fn new(sheet_prefix: &str) -> Self {
        Self {
            sheet_prefix: sheet_prefix.to_string(),
        }
    }
}

impl TableParser for UniversalWorkbookParser {
    fn parse_tables(&self, path: &Path) -> ImportResult<Vec<RawTable>> {
        let sheet_prefix = self.sheet_prefix.clone();
        match extension_of(path).as_str() {
            "csv" => CsvTableParser { sheet_prefix }.parse_tables(path),
            "xlsx" | "xls" => ExcelWorkbookParser { sheet_prefix }.parse_tables(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
