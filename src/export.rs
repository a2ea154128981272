use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{Format, Workbook};

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::layout::{Cell, ColumnGroup, Naming, Table, Variant};

const IG_FILL: u32 = 0x00FF_FF00;
const SITE_FILL: u32 = 0x00AD_D8E6;
const COMMENT_FILL: u32 = 0x00FF_C7CE;
const BLANK_FILL: u32 = 0x00F2_F2F2;
const MAX_WIDTH: usize = 255;

/// A rendered spreadsheet, not yet written to disk.
#[derive(Debug)]
pub struct Document {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

struct Formats {
    header: Format,
    plain: Format,
    ig: Format,
    site: Format,
    comment: Format,
    blank: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            plain: Format::new(),
            ig: Format::new().set_background_color(IG_FILL),
            site: Format::new().set_background_color(SITE_FILL),
            comment: Format::new().set_background_color(COMMENT_FILL),
            blank: Format::new().set_background_color(BLANK_FILL),
        }
    }

    /// Returns the fill for a cell in `group`. Comments are only highlighted
    /// when there is something to say.
    fn fill(&self, group: ColumnGroup, cell: &Cell) -> &Format {
        match group {
            ColumnGroup::Day => &self.plain,
            ColumnGroup::InstagramFacebook => &self.ig,
            ColumnGroup::Website => &self.site,
            ColumnGroup::Comments => match cell {
                Cell::Text(note) if !note.is_empty() => &self.comment,
                _ => &self.plain,
            },
            ColumnGroup::Blank => &self.blank,
        }
    }
}

fn display(cell: &Cell) -> String {
    match cell {
        Cell::Date(day) => day.to_string(),
        Cell::Money(amount) => amount.to_string(),
        Cell::Count(n) => n.to_string(),
        Cell::Text(text) => text.clone(),
        Cell::Blank => String::new(),
    }
}

/// Renders `table` as an XLSX workbook with a single sheet.
///
/// # Errors
///
/// Returns any error from building the workbook.
pub fn render(table: &Table) -> Result<Vec<u8>> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(table.variant.sheet)?;

    for (col, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(col).context("too many columns")?;
        let header = match column.group() {
            ColumnGroup::InstagramFacebook => formats.header.clone().set_background_color(IG_FILL),
            ColumnGroup::Website => formats.header.clone().set_background_color(SITE_FILL),
            ColumnGroup::Blank => formats.header.clone().set_background_color(BLANK_FILL),
            ColumnGroup::Day | ColumnGroup::Comments => formats.header.clone(),
        };
        sheet.write_string_with_format(0, col, column.header(), &header)?;

        let mut width = column.header().chars().count();
        for (row, cells) in table.rows.iter().enumerate() {
            let row = u32::try_from(row + 1).context("too many rows")?;
            let cell = &cells[usize::from(col)];
            let format = formats.fill(column.group(), cell);
            match cell {
                Cell::Date(day) => {
                    sheet.write_string_with_format(row, col, day.to_string(), format)?;
                }
                Cell::Money(amount) => {
                    let money = format.clone().set_num_format("0.00");
                    sheet.write_number_with_format(row, col, amount.dollars(), &money)?;
                }
                Cell::Count(n) => {
                    sheet.write_number_with_format(row, col, *n as f64, format)?;
                }
                Cell::Text(text) if !text.is_empty() => {
                    sheet.write_string_with_format(row, col, text, format)?;
                }
                Cell::Text(_) | Cell::Blank => {
                    sheet.write_blank(row, col, format)?;
                }
            }
            width = width.max(display(cell).chars().count());
        }
        sheet.set_column_width(col, (width + 2).min(MAX_WIDTH) as f64)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

/// Returns the file name for `variant` over data covering `days`.
///
/// Variants named by month get every distinct calendar month in the data,
/// in order:
///
/// ```txt
/// Tracker September 2024.xlsx
/// Tracker August 2024 & September 2024.xlsx
/// ```
#[must_use]
pub fn output_name(variant: &Variant, days: &[NaiveDate]) -> String {
    match variant.naming {
        Naming::Fixed => format!("{}.xlsx", variant.file_stem),
        Naming::ByMonth => {
            let months: BTreeMap<(i32, u32), String> = days
                .iter()
                .map(|d| ((d.year(), d.month()), d.format("%B %Y").to_string()))
                .collect();
            if months.is_empty() {
                return format!("{}.xlsx", variant.file_stem);
            }
            let months: Vec<_> = months.into_values().collect();
            format!("{} {}.xlsx", variant.file_stem, months.join(" & "))
        }
    }
}

/// Renders every table in memory, so that nothing is written unless all of
/// them succeed.
///
/// # Errors
///
/// Returns the first rendering error.
pub fn documents(tables: &[Table]) -> Result<Vec<Document>> {
    tables
        .iter()
        .map(|table| -> Result<Document> {
            let file_name = output_name(&table.variant, &table.days);
            let bytes = render(table).with_context(|| format!("rendering {file_name}"))?;
            Ok(Document { file_name, bytes })
        })
        .collect()
}

/// Writes `documents` into `dir`, returning the paths written.
///
/// # Errors
///
/// Returns an error naming the path if any file cannot be written.
pub fn write_all(documents: &[Document], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    documents
        .iter()
        .map(|doc| -> Result<PathBuf> {
            let path = dir.as_ref().join(&doc.file_name);
            fs::write(&path, &doc.bytes).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = doc.bytes.len(), "wrote report");
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::{
        campaigns::Campaigns,
        daily::aggregate,
        layout::{assemble, SUMMARY, TRACKER},
        record::read_csv,
    };

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn tables(path: &str) -> Vec<Table> {
        let records = read_csv(path).unwrap();
        let days = aggregate(&records, &Campaigns::from_file("testdata/campaigns").unwrap()).unwrap();
        vec![assemble(SUMMARY, &days), assemble(TRACKER, &days)]
    }

    #[test]
    fn output_name_fn_uses_fixed_name() {
        assert_eq!(output_name(&SUMMARY, &[date("2024-09-22")]), "Haircheck_Report.xlsx");
    }

    #[test]
    fn output_name_fn_names_single_month() {
        let days = [date("2024-09-21"), date("2024-09-22"), date("2024-09-30")];
        assert_eq!(output_name(&TRACKER, &days), "Tracker September 2024.xlsx");
    }

    #[test]
    fn output_name_fn_lists_every_month_in_order() {
        let days = [date("2024-10-01"), date("2024-08-31"), date("2024-09-15")];
        assert_eq!(
            output_name(&TRACKER, &days),
            "Tracker August 2024 & September 2024 & October 2024.xlsx"
        );
    }

    #[test]
    fn output_name_fn_separates_same_month_in_different_years() {
        let days = [date("2023-09-01"), date("2024-09-01")];
        assert_eq!(
            output_name(&TRACKER, &days),
            "Tracker September 2023 & September 2024.xlsx"
        );
    }

    #[test]
    fn output_name_fn_falls_back_to_stem_for_no_data() {
        assert_eq!(output_name(&TRACKER, &[]), "Tracker.xlsx");
    }

    #[test]
    fn render_fn_produces_xlsx_archive() {
        for table in tables("testdata/export.csv") {
            let bytes = render(&table).unwrap();
            assert!(bytes.starts_with(b"PK"), "not a zip archive");
        }
    }

    #[test]
    fn documents_fn_names_each_variant() {
        let docs = documents(&tables("testdata/two_months.csv")).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(
            names,
            ["Haircheck_Report.xlsx", "Tracker August 2024 & September 2024.xlsx"]
        );
    }

    #[test]
    fn write_all_fn_writes_every_document() {
        let dir = tempfile::tempdir().unwrap();
        let docs = documents(&tables("testdata/export.csv")).unwrap();
        let paths = write_all(&docs, dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        for (path, doc) in paths.iter().zip(&docs) {
            assert_eq!(fs::read(path).unwrap(), doc.bytes);
        }
    }

    #[test]
    fn write_all_fn_returns_error_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let docs = documents(&tables("testdata/export.csv")).unwrap();
        assert!(write_all(&docs, dir.path().join("bogus")).is_err());
    }
}
