// ==========================================
// 车行后台管理系统 - 文件解析器
// ==========================================
// 依据: Dealer_Import_Design_v0.4.md - 阶段 0: 文件读取与解析
// 支持: CSV (.csv) / Excel (.xlsx/.xls) / PDF (.pdf, 占位)
// ==========================================

use crate::domain::record::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// CsvParser
// ==========================================
// 已知限制: 引号内逗号不做转义处理（quoting 关闭，按字面逗号切分），
// 与线上表单的行为保持一致；引号由字段提取器剥离
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .quoting(false)
            .from_reader(file);

        // 表头行: 小写化 + TRIM
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeaderRow(
                file_path.display().to_string(),
            ));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let cells: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过整行空白
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow {
                headers: headers.clone(),
                cells,
            });
        }

        Ok(rows)
    }
}

// ==========================================
// ExcelParser
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(file_path)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 仅读取第一个工作表
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::MissingHeaderRow(file_path.display().to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_lowercase())
            .collect();

        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let cells: Vec<String> = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();

            // 跳过整行空白
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow {
                headers: headers.clone(),
                cells,
            });
        }

        Ok(rows)
    }
}

// ==========================================
// PdfParser
// ==========================================
// PDF 表格提取尚未接入真实依赖，这里是显式占位实现：
// 统一返回类型化错误，调用方不得假设任何输出
pub struct PdfParser;

impl FileParser for PdfParser {
    fn parse(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        Err(ImportError::PdfExtractionUnsupported(
            file_path.display().to_string(),
        ))
    }
}

// ==========================================
// UniversalFileParser（按扩展名自动分发）
// ==========================================
// 不支持的扩展名立即失败，不做部分解析
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse(path),
            "xlsx" | "xls" => ExcelParser.parse(path),
            "pdf" => PdfParser.parse(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
