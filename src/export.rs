use crate::error::ExportError;
use crate::results::{ProductRecord, ad_flag, day_month_year};
use crate::utils::export_stem;
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Spreadsheet headers, in the same order as the CSV columns
pub const COLUMNS: [&str; 15] = [
    "Title",
    "Grammage",
    "Selling Price",
    "MRP",
    "Discount %",
    "Deal Tags",
    "Quantity Bought",
    "Rating",
    "Reviews",
    "Link",
    "Ad/Not Ad",
    "Date",
    "Search Term",
    "Pincode",
    "Category",
];

/// Writes records as CSV with a header row taken from the field names
pub fn write_csv<W: Write>(writer: W, records: &[ProductRecord]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes one JSON object per line
pub fn write_json_lines<W: Write>(
    mut writer: W,
    records: &[ProductRecord],
) -> Result<(), ExportError> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes records as a single-sheet workbook
pub fn write_xlsx(path: &Path, records: &[ProductRecord]) -> Result<(), ExportError> {
    let mut workbook = workbook(records)?;
    workbook.save(path)?;
    Ok(())
}

enum Cell {
    Text(String),
    Number(f64),
}

fn cells(record: &ProductRecord) -> [Cell; 15] {
    use Cell::{Number, Text};
    [
        Text(record.title.clone()),
        Text(record.grammage.clone()),
        Text(record.selling_price.clone()),
        Text(record.reference_price.clone()),
        Number(record.discount_percent),
        Text(record.deal_tag.clone()),
        Text(record.recent_purchase_volume.clone()),
        Text(record.rating.clone()),
        Text(record.review_count.clone()),
        Text(record.link.clone()),
        Text(ad_flag::label(record.is_sponsored).to_string()),
        Text(record.captured_at.format(day_month_year::FORMAT).to_string()),
        Text(record.search_term.clone()),
        Text(record.geo_context.clone()),
        Text(record.category.clone()),
    ]
}

fn workbook(records: &[ProductRecord]) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Listings")?;

    for (col, header) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, cell) in cells(record).into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => sheet.write_string(row, col, text)?,
                Cell::Number(value) => sheet.write_number(row, col, value)?,
            };
        }
    }
    Ok(workbook)
}

/// Writes `{prefix}_{date}` as `.csv`, `.json` and `.xlsx` into `dir`, returning the paths
pub fn export_all(
    dir: &Path,
    prefix: &str,
    date: NaiveDate,
    records: &[ProductRecord],
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    let stem = export_stem(prefix, date);

    let csv_path = dir.join(format!("{stem}.csv"));
    write_csv(BufWriter::new(File::create(&csv_path)?), records)?;

    let json_path = dir.join(format!("{stem}.json"));
    write_json_lines(BufWriter::new(File::create(&json_path)?), records)?;

    let xlsx_path = dir.join(format!("{stem}.xlsx"));
    write_xlsx(&xlsx_path, records)?;

    ::log::info!("Exported {} records to {}", records.len(), dir.display());
    Ok(vec![csv_path, json_path, xlsx_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> ProductRecord {
        ProductRecord {
            title: "Brand X Cookies 200g Pack".to_string(),
            grammage: "200g".to_string(),
            selling_price: "1234.56".to_string(),
            reference_price: "1500.00".to_string(),
            discount_percent: 17.7,
            deal_tag: "No Deal".to_string(),
            recent_purchase_volume: "No data".to_string(),
            rating: "4.2".to_string(),
            review_count: "1,024".to_string(),
            link: "No Link".to_string(),
            is_sponsored: true,
            captured_at: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            search_term: "cookies".to_string(),
            geo_context: "560005".to_string(),
            category: "cookies".to_string(),
        }
    }

    #[test]
    fn test_csv_header_and_row() {
        let mut out = Vec::new();
        write_csv(&mut out, &[record()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Title,Grammage,Selling Price,MRP,Discount %,Deal Tags,Quantity Bought,Rating,Reviews,Link,Ad/Not Ad,Date,Search Term,Pincode,Category"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Brand X Cookies 200g Pack,200g,1234.56,1500.00,17.7,No Deal,No data,4.2,\"1,024\",No Link,Ad,18-10-2026,cookies,560005,cookies"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_json_lines_read_back() {
        let mut out = Vec::new();
        write_json_lines(&mut out, &[record(), record()]).unwrap();
        let text = String::from_utf8(out).unwrap();

        let rows = text
            .lines()
            .map(|line| serde_json::from_str::<ProductRecord>(line).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(rows, vec![record(), record()]);

        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["Ad/Not Ad"], "Ad");
        assert_eq!(first["Date"], "18-10-2026");
    }

    #[test]
    fn test_spreadsheet_columns_match_csv() {
        let mut out = Vec::new();
        write_csv(&mut out, &[record()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next().unwrap(), COLUMNS.join(","));

        let row = cells(&record())
            .into_iter()
            .map(|cell| match cell {
                Cell::Text(text) => text,
                Cell::Number(value) => value.to_string(),
            })
            .collect::<Vec<_>>()
            .join(",");
        assert_eq!(
            row,
            "Brand X Cookies 200g Pack,200g,1234.56,1500.00,17.7,No Deal,No data,4.2,1,024,No Link,Ad,18-10-2026,cookies,560005,cookies"
        );
    }

    #[test]
    fn test_workbook_is_written() {
        let bytes = workbook(&[record(), record()])
            .unwrap()
            .save_to_buffer()
            .unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
