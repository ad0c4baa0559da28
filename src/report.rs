use std::path::Path;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::error::{Error, Result};
use crate::record::{COLUMNS, Record};

/// Write `records` as CSV to `path`: a header row, then one row per record.
pub fn write_csv(records: &[Record], path: &Path) -> Result<()> {
    let output_err = |source: csv::Error| Error::Output {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(output_err)?;
    writer.write_record(COLUMNS).map_err(output_err)?;
    for record in records {
        writer.write_record(record.to_row()).map_err(output_err)?;
    }
    writer.flush().map_err(|e| output_err(e.into()))?;

    log::debug!("wrote {} row(s) to {}", records.len(), path.display());
    Ok(())
}

/// Console rendering of the same columns the CSV carries.
pub fn render_table(records: &[Record]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(COLUMNS.iter().map(|c| Cell::new(c).fg(Color::Cyan)));
    for record in records {
        table.add_row(record.to_row());
    }
    table
}

pub fn print_table(records: &[Record]) {
    println!("{}", render_table(records));
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::ErrorKind;
    use crate::record::Contributor;

    fn record(pmid: &str, email: Option<&str>) -> Record {
        Record::new(
            pmid.to_string(),
            format!("Title, with a comma {pmid}"),
            Some("2024".to_string()),
            vec![
                Contributor {
                    name: "Jane Smith".into(),
                    affiliation: "Genentech Inc., South San Francisco".into(),
                },
                Contributor {
                    name: "Li Wei".into(),
                    affiliation: "Acme Biotech Inc.".into(),
                },
            ],
            email.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let dir = TempDir::new().expect("tmp dir");
        let path = dir.path().join("papers.csv");
        let records = vec![
            record("1", Some("jane@gene.com")),
            record("2", None),
            record("3", None),
        ];
        write_csv(&records, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, COLUMNS);

        let rows: Vec<csv::StringRecord> = reader
            .records()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "Title, with a comma 1");
        assert_eq!(&rows[0][3], "Jane Smith, Li Wei");
        assert_eq!(
            &rows[0][4],
            "Genentech Inc., South San Francisco, Acme Biotech Inc."
        );
        assert_eq!(&rows[0][5], "jane@gene.com");
        assert_eq!(&rows[1][5], "");
    }

    #[test]
    fn empty_report_still_has_a_header() {
        let dir = TempDir::new().expect("tmp dir");
        let path = dir.path().join("empty.csv");
        write_csv(&[], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 6);
        assert_eq!(reader.records().count(), 0);
    }

    #[test]
    fn unwritable_destination_is_an_output_error() {
        let dir = TempDir::new().expect("tmp dir");
        let path = dir.path().join("missing").join("papers.csv");
        let err = write_csv(&[record("1", None)], &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Output);
        assert!(!path.exists());
    }

    #[test]
    fn table_lists_every_record() {
        let mut table = render_table(&[record("39000001", None), record("39000002", None)]);
        table.set_width(1000);
        let rendered = table.to_string();
        assert!(rendered.contains("PubmedID"));
        assert!(rendered.contains("Corresponding Author Email"));
        assert!(rendered.contains("39000001"));
        assert!(rendered.contains("39000002"));
    }
}
