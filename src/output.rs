use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::record::BusinessRecord;

/// Where the run's records end up: a file path, or standard output when the
/// destination is the literal `stdout`.
pub fn open_destination(destination: &str) -> Result<Box<dyn Write>> {
    if destination == "stdout" {
        return Ok(Box::new(io::stdout()));
    }
    if let Some(parent) = Path::new(destination).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(Box::new(File::create(destination)?))
}

/// Tabular projection: one row per record, registry payload serialized into
/// the last cell.
pub fn write_csv(writer: impl Write, records: &[BusinessRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(BusinessRecord::csv_headers())?;
    for record in records {
        csv_writer.write_record(record.csv_row())?;
    }
    csv_writer.flush()?;
    info!("wrote {} records as CSV", records.len());
    Ok(())
}

pub fn write_json(mut writer: impl Write, records: &[BusinessRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    info!("wrote {} records as JSON", records.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Address, SocialPlatform};

    fn sample_record() -> BusinessRecord {
        let mut record = BusinessRecord {
            title: "Acme".to_string(),
            city: "Warszawa".to_string(),
            website: "https://acme.pl".to_string(),
            phone: "123 456 789".to_string(),
            tax_id: "1234567890".to_string(),
            address: Address {
                street: "Długa".to_string(),
                number: "12".to_string(),
            },
            ..BusinessRecord::default()
        };
        record.set_emails(vec!["info@acme.pl".to_string()]);
        record
            .social_links
            .set(SocialPlatform::Facebook, "https://facebook.com/acme".to_string());
        record
    }

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[sample_record()]).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("title,address,city,website,phone,emails"));
        assert!(lines[1].contains("Długa 12"));
        assert!(lines[1].contains("info@acme.pl"));
    }

    #[test]
    fn json_round_trips_the_record_list() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &[sample_record()]).unwrap();

        let parsed: Vec<BusinessRecord> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, vec![sample_record()]);
    }

    #[test]
    fn file_destination_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results.csv");
        let destination = path.to_str().unwrap().to_string();

        let writer = open_destination(&destination).unwrap();
        write_csv(writer, &[sample_record()]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Acme"));
    }
}
