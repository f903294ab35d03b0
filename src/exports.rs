//! Spreadsheet export for the record list
//!
//! Writes one worksheet with a fixed 11-column header and one row per
//! record. Date fields render in dd/mm/yy display form and the file name
//! is stamped with the export date, matching the printed intake sheets
//! the clinic already files.

use crate::records::{format_date_display, Record};
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Worksheet name ("List")
const SHEET_NAME: &str = "Danh sách";

/// Export file prefix ("consultation sheet list")
const FILE_PREFIX: &str = "danh_sach_phieu_tu_van";

/// Fixed header row
const HEADERS: [&str; 11] = [
    "ID",
    "Họ và tên",
    "Ngày sinh",
    "Giới tính",
    "SĐT",
    "Email",
    "Mã SV",
    "Khoa / Ngành",
    "Tình trạng chính",
    "Mục tiêu chính",
    "Ngày lập phiếu",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No records to export")]
    NoRecords,
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Summary of a completed export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    pub rows: usize,
    pub path: String,
}

/// Stamped file name for an export on the given date.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}_{}.xlsx", FILE_PREFIX, date.format("%Y-%m-%d"))
}

fn record_row(record: &Record) -> [String; 11] {
    [
        record.id.to_string(),
        record.full_name.clone(),
        format_date_display(&record.dob),
        record.gender.clone(),
        record.phone.clone(),
        record.email.clone(),
        record.student_code.clone(),
        record.major.clone(),
        record.main_issues.clone(),
        record.main_goal.clone(),
        format_date_display(&record.created_at),
    ]
}

/// Write the record list as a spreadsheet into `output_dir`.
pub fn export_records(
    records: &[Record],
    output_dir: &Path,
    date: NaiveDate,
) -> Result<ExportSummary, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, value) in record_row(record).iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, value)?;
        }
    }

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(export_file_name(date));
    workbook.save(&path)?;

    Ok(ExportSummary {
        rows: records.len(),
        path: path.display().to_string(),
    })
}
