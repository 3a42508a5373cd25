// ==========================================
// 导入层集成测试
// ==========================================
// 测试目标: 验证 CSV 作业表读取与映射
// 覆盖范围: 表名规范化、单元格取值、缺列、格式校验
// ==========================================

use line_balancing::config::ColumnMapping;
use line_balancing::domain::types::{CraneRequirement, ParsedValue};
use line_balancing::importer::{
    ExcelWorkbookParser, FileWorkbookSource, ImportError, TableParser, TaskTableMapper,
    UniversalWorkbookParser, WorkbookSource,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

// ==========================================
// 测试辅助函数
// ==========================================

fn write_csv(prefix: &str, lines: &[&str]) -> NamedTempFile {
    let mut file = Builder::new()
        .prefix(prefix)
        .suffix(".csv")
        .tempfile()
        .unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn source() -> FileWorkbookSource {
    FileWorkbookSource::new(
        UniversalWorkbookParser::new("ModelData_"),
        TaskTableMapper::new(ColumnMapping::default()),
    )
}

// ==========================================
// 测试用例
// ==========================================

#[tokio::test]
async fn test_load_csv_model() {
    let file = write_csv(
        "ModelData_",
        &[
            "TOTAL Order,Steps,Time (in minutes),Crane Required,Predecessors,Manpower (19)",
            "1,Load frame,3,0,,1.5",
            "2,Drop engine,6,1,1,2",
            ",,,,,",
            "3,Pre-assemble,4,-1,,",
        ],
    );

    let models = source().load_models(file.path()).await.unwrap();
    assert_eq!(models.len(), 1);

    let table = &models[0];
    assert!(!table.name.starts_with("ModelData_"));
    assert_eq!(table.records.len(), 3);
    assert_eq!(table.records[1].crane, ParsedValue::Valid(CraneRequirement::Required));
    assert_eq!(table.records[1].predecessors_raw, "1");
    assert_eq!(table.records[2].crane, ParsedValue::Valid(CraneRequirement::Excluded));
    assert_eq!(table.records[2].manpower, ParsedValue::Missing);
    // 空行被跳过, 行号保留源表位置
    assert_eq!(table.records[2].row_no, 5);
}

#[test]
fn test_missing_duration_column() {
    let file = write_csv("ModelData_", &["TOTAL Order,Steps", "1,Load frame"]);
    let err = source().load_models_blocking(file.path()).unwrap_err();

    assert!(matches!(err, ImportError::MissingColumn { .. }));
}

#[test]
fn test_missing_file() {
    let err = source()
        .load_models_blocking(Path::new("/nonexistent/ModelData_X.xlsx"))
        .unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
}

#[test]
fn test_unsupported_extension() {
    let file = Builder::new().suffix(".txt").tempfile().unwrap();
    let err = source().load_models_blocking(file.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}

// ==========================================
// Excel 工作簿
// ==========================================

#[test]
fn test_excel_keeps_only_prefixed_sheets() {
    let parser = ExcelWorkbookParser {
        sheet_prefix: "ModelData_".to_string(),
    };
    let tables = parser.parse_tables(&fixture("line_models.xlsx")).unwrap();

    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["X1_5", "Y2"]);
    assert!(tables[0].has_column("Time (in minutes)"));
    assert_eq!(tables[0].rows.len(), 4);
    assert_eq!(tables[0].rows[0].row_no, 2);
    assert_eq!(tables[0].rows[0].cells["Steps"], "Load frame");
}

#[tokio::test]
async fn test_excel_cells_map_to_records() {
    let models = source()
        .load_models(&fixture("line_models.xlsx"))
        .await
        .unwrap();
    assert_eq!(models.len(), 2);

    let x1 = &models[0];
    assert_eq!(x1.records.len(), 4);
    assert_eq!(x1.records[0].task_id, "1");
    assert_eq!(x1.records[0].manpower, ParsedValue::Valid(1.5));
    assert_eq!(x1.records[1].crane, ParsedValue::Valid(CraneRequirement::Required));
    assert_eq!(x1.records[2].crane, ParsedValue::Valid(CraneRequirement::Excluded));
    assert_eq!(x1.records[3].duration_min, ParsedValue::Valid(2.5));
    assert_eq!(x1.records[3].predecessors_raw, "2,3");

    let y2 = &models[1];
    assert_eq!(y2.records[1].crane, ParsedValue::Missing);
    assert_eq!(y2.records[1].predecessors_raw, "10");
}

#[test]
fn test_excel_without_model_sheets() {
    let err = source()
        .load_models_blocking(&fixture("no_model_sheets.xlsx"))
        .unwrap_err();

    match err {
        ImportError::NoModelSheets(prefix) => assert_eq!(prefix, "ModelData_"),
        other => panic!("unexpected error: {:?}", other),
    }
}
