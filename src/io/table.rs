//! Column-oriented view of search results

use crate::types::{Error, Record, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Column names, in table order
pub const COLUMNS: [&str; 6] = [
    "granule_name",
    "download_url",
    "flight_direction",
    "beam_mode",
    "footprint",
    "image_date",
];

/// Search results transposed into six named columns, provider order preserved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    pub granule_name: Vec<String>,
    pub download_url: Vec<String>,
    pub flight_direction: Vec<String>,
    pub beam_mode: Vec<String>,
    pub footprint: Vec<String>,
    pub image_date: Vec<String>,
}

impl ResultTable {
    pub fn from_records(records: &[Record]) -> Self {
        let mut table = ResultTable::default();
        for r in records {
            table.granule_name.push(r.granule_name.clone());
            table.download_url.push(r.download_url.clone());
            table.flight_direction.push(r.flight_direction.clone());
            table.beam_mode.push(r.beam_mode.clone());
            table.footprint.push(r.footprint.clone());
            table.image_date.push(r.image_date.clone());
        }
        table
    }

    pub fn column_names(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.granule_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column by name, `None` for names outside [`COLUMNS`]
    pub fn column(&self, name: &str) -> Option<&[String]> {
        let column = match name {
            "granule_name" => &self.granule_name,
            "download_url" => &self.download_url,
            "flight_direction" => &self.flight_direction,
            "beam_mode" => &self.beam_mode,
            "footprint" => &self.footprint,
            "image_date" => &self.image_date,
            _ => return None,
        };
        Some(column.as_slice())
    }

    /// Reassemble row `index` as a record
    pub fn row(&self, index: usize) -> Option<Record> {
        if index >= self.len() {
            return None;
        }
        Some(Record {
            granule_name: self.granule_name[index].clone(),
            download_url: self.download_url[index].clone(),
            flight_direction: self.flight_direction[index].clone(),
            beam_mode: self.beam_mode[index].clone(),
            footprint: self.footprint[index].clone(),
            image_date: self.image_date[index].clone(),
        })
    }

    /// All rows, in order
    pub fn records(&self) -> Vec<Record> {
        (0..self.len()).filter_map(|i| self.row(i)).collect()
    }

    /// Write the table as CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(COLUMNS)?;
        for i in 0..self.len() {
            csv_writer.write_record([
                &self.granule_name[i],
                &self.download_url[i],
                &self.flight_direction[i],
                &self.beam_mode[i],
                &self.footprint[i],
                &self.image_date[i],
            ])?;
        }
        csv_writer.flush().map_err(Error::Io)
    }

    pub fn to_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        log::info!("Writing {} rows to {}", self.len(), path.as_ref().display());
        let file = std::fs::File::create(path.as_ref())?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> Record {
        Record {
            granule_name: format!("S1A_IW_GRDH_1SDV_2021060{}T000000", n),
            download_url: format!("https://example.org/{}.zip", n),
            flight_direction: if n % 2 == 0 { "ASCENDING" } else { "DESCENDING" }.to_string(),
            beam_mode: "IW".to_string(),
            footprint: "POLYGON((0 0,1 0,1 1,0 0))".to_string(),
            image_date: format!("2021-06-0{}T00:00:00", n),
        }
    }

    #[test]
    fn test_columns_follow_record_order() {
        let records: Vec<Record> = (1..=3).map(record).collect();
        let table = ResultTable::from_records(&records);

        assert_eq!(table.len(), 3);
        assert_eq!(table.column("flight_direction").unwrap(), ["DESCENDING", "ASCENDING", "DESCENDING"]);
        assert_eq!(table.row(1), Some(records[1].clone()));
        assert_eq!(table.records(), records);
        assert!(table.column("granule").is_none());
        assert!(table.row(3).is_none());
    }

    #[test]
    fn test_empty_table_keeps_schema() {
        let table = ResultTable::from_records(&[]);
        assert!(table.is_empty());
        for name in table.column_names() {
            assert_eq!(table.column(name).map(|c| c.len()), Some(0));
        }
    }

    #[test]
    fn test_csv_output() {
        let table = ResultTable::from_records(&[record(1)]);
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("granule_name,download_url,flight_direction,beam_mode,footprint,image_date"));
        assert!(lines.next().unwrap().contains("\"POLYGON((0 0,1 0,1 1,0 0))\""));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_file_reads_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        let records: Vec<Record> = (1..=2).map(record).collect();
        ResultTable::from_records(&records).to_csv_path(&path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, COLUMNS);

        let rows: Vec<Record> = reader
            .records()
            .map(|row| {
                let row = row.unwrap();
                Record {
                    granule_name: row[0].to_string(),
                    download_url: row[1].to_string(),
                    flight_direction: row[2].to_string(),
                    beam_mode: row[3].to_string(),
                    footprint: row[4].to_string(),
                    image_date: row[5].to_string(),
                }
            })
            .collect();
        assert_eq!(rows, records);
    }

    #[test]
    fn test_csv_path_in_missing_directory_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("results.csv");
        let table = ResultTable::from_records(&[record(1)]);
        assert!(matches!(table.to_csv_path(&path), Err(Error::Io(_))));
    }
}
