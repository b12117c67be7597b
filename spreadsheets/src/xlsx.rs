use crate::error::SheetError;
use crate::import::{map_parsed_sheet, SheetImportReport};
use crate::mapper::RowMapper;
use crate::sheet::ParsedSheet;
use crate::writer::{sheet_rows, CellValue};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use rust_xlsxwriter::Workbook;
use shared_types::{CrmDataset, RecordKind};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Build an XLSX workbook with one sheet per collection.
pub fn write_workbook(dataset: &CrmDataset) -> Result<Vec<u8>, SheetError> {
    let mut workbook = build_workbook(dataset)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_workbook_file(dataset: &CrmDataset, path: &Path) -> Result<(), SheetError> {
    let mut workbook = build_workbook(dataset)?;
    workbook.save(path)?;
    tracing::info!("Wrote workbook to {}", path.display());
    Ok(())
}

fn build_workbook(dataset: &CrmDataset) -> Result<Workbook, SheetError> {
    let mut workbook = Workbook::new();

    for kind in RecordKind::ALL {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(kind.sheet_name())?;

        for (r, row) in sheet_rows(kind, dataset).iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    CellValue::Text(s) if s.is_empty() => {}
                    CellValue::Text(s) => {
                        worksheet.write_string(r, c, s.as_str())?;
                    }
                    CellValue::Number(n) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                }
            }
        }
    }

    Ok(workbook)
}

/// Read a workbook from memory. See [`read_workbook_file`].
pub fn read_workbook(bytes: &[u8], mapper: &RowMapper) -> Result<SheetImportReport, SheetError> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_sheets(workbook, mapper)
}

/// Read every sheet of a workbook. Sheets named after a collection (in any case) are read
/// as that kind; other sheets are identified by their header row.
pub fn read_workbook_file(path: &Path, mapper: &RowMapper) -> Result<SheetImportReport, SheetError> {
    let workbook = open_workbook_auto(path)?;
    read_sheets(workbook, mapper)
}

fn read_sheets<RS: Read + Seek>(
    mut workbook: calamine::Sheets<RS>,
    mapper: &RowMapper,
) -> Result<SheetImportReport, SheetError> {
    let mut report = SheetImportReport::default();

    for sheet_name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                report.push(sheet_name, Err(SheetError::Workbook(e.to_string())));
                continue;
            }
        };

        let kind_hint = RecordKind::ALL
            .into_iter()
            .find(|kind| kind.sheet_name().eq_ignore_ascii_case(sheet_name.trim()));

        let parsed = parse_range(&range);
        let result = map_parsed_sheet(&parsed, kind_hint, mapper);
        report.push(sheet_name, result);
    }

    Ok(report)
}

fn parse_range(range: &Range<Data>) -> ParsedSheet {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => return ParsedSheet::default(),
    };
    ParsedSheet::from_rows(
        &headers,
        rows.map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>()),
    )
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
