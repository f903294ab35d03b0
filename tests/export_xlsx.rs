//! Spreadsheet export read back with calamine

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use skinconsult_lib::exports::{export_file_name, export_records};
use skinconsult_lib::records::Record;
use std::path::Path;
use tempfile::TempDir;

fn sample_records() -> Vec<Record> {
    vec![
        Record {
            id: 1723000000000,
            full_name: "Anh Le".to_string(),
            dob: "2004-05-17".to_string(),
            gender: "Nữ".to_string(),
            phone: "0900000000".to_string(),
            email: "anh.le@example.edu.vn".to_string(),
            student_code: "SV001".to_string(),
            major: "Dược".to_string(),
            main_issues: "Mụn viêm".to_string(),
            main_goal: "Hết mụn".to_string(),
            created_at: "2026-08-29T07:00:00.000Z".to_string(),
            ..Record::default()
        },
        Record {
            id: 1723000001000,
            full_name: "Minh Tran".to_string(),
            phone: "0911111111".to_string(),
            ..Record::default()
        },
    ]
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto(path).expect("open exported workbook");
    let range = workbook
        .worksheet_range("Danh sách")
        .expect("worksheet present");
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[test]
fn export_writes_fixed_header_row() {
    let dir = TempDir::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

    let summary = export_records(&sample_records(), dir.path(), date).expect("export succeeds");
    assert_eq!(summary.rows, 2);

    let rows = read_rows(Path::new(&summary.path));
    assert_eq!(
        rows[0],
        vec![
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
        ]
    );
    assert_eq!(rows.len(), 3);
}

#[test]
fn export_renders_dates_in_display_form() {
    let dir = TempDir::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

    let summary = export_records(&sample_records(), dir.path(), date).unwrap();
    let rows = read_rows(Path::new(&summary.path));

    let anh = &rows[1];
    assert_eq!(anh[1], "Anh Le");
    assert_eq!(anh[2], "17/05/04");
    assert_eq!(anh[10], "29/08/26");

    // Absent dates stay empty rather than erroring
    let minh = &rows[2];
    assert_eq!(minh[2], "");
}

#[test]
fn export_file_name_is_date_stamped() {
    let dir = TempDir::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

    let summary = export_records(&sample_records(), dir.path(), date).unwrap();
    assert!(summary.path.ends_with(&export_file_name(date)));
    assert!(Path::new(&summary.path).exists());
}
