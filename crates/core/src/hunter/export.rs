//! CSV export of gem records.

use std::io::{self, Write};

use crate::scoring::round_to;

use super::GemRecord;

/// Header row, in column order.
pub const CSV_HEADERS: [&str; 9] = [
    "Title",
    "Channel",
    "Subscribers",
    "Views",
    "Views/Day",
    "Engagement%",
    "Viral Score",
    "Age(days)",
    "URL",
];

/// Write `records` as CSV, header first, in the given order.
pub fn write_csv<W: Write>(records: &[GemRecord], mut writer: W) -> io::Result<()> {
    write_row(&mut writer, CSV_HEADERS.iter().map(|h| h.to_string()))?;
    for record in records {
        write_row(&mut writer, record_fields(record))?;
    }
    writer.flush()
}

/// Render `records` as a CSV document.
pub fn to_csv_string(records: &[GemRecord]) -> io::Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn record_fields(record: &GemRecord) -> impl Iterator<Item = String> {
    [
        record.title.clone(),
        record.channel_title.clone(),
        record.subscriber_count.to_string(),
        record.view_count.to_string(),
        format!("{:.1}", round_to(record.views_per_day, 1)),
        format!("{:.2}", record.engagement_percent()),
        format!("{:.2}", record.display_score()),
        record.age_in_days.to_string(),
        record.video_url.clone(),
    ]
    .into_iter()
}

fn write_row<W: Write>(writer: &mut W, fields: impl Iterator<Item = String>) -> io::Result<()> {
    let line = fields.map(|f| escape(&f)).collect::<Vec<_>>().join(",");
    writeln!(writer, "{}", line)
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_header_only_for_empty() {
        assert_eq!(
            to_csv_string(&[]).unwrap(),
            "Title,Channel,Subscribers,Views,Views/Day,Engagement%,Viral Score,Age(days),URL\n"
        );
    }

    #[test]
    fn test_row_formatting() {
        let mut record = fixtures::gem_record("abc", 34_333.333_333);
        record.title = "My video".to_string();
        record.views_per_day = 10_000.04;

        let csv = to_csv_string(&[record]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "My video,Small Channel,2000,50000,10000.0,3.00,34333.33,5,https://www.youtube.com/watch?v=abc"
        );
    }

    #[test]
    fn test_quotes_special_fields() {
        let mut record = fixtures::gem_record("abc", 1.0);
        record.title = "AITA, for \"this\"?".to_string();
        record.channel_title = "two\nlines".to_string();

        let csv = to_csv_string(&[record]).unwrap();
        assert!(csv.contains("\"AITA, for \"\"this\"\"?\""));
        assert!(csv.contains("\"two\nlines\""));
    }

    #[test]
    fn test_keeps_record_order() {
        let records = vec![
            fixtures::gem_record("first", 5.0),
            fixtures::gem_record("second", 9.0),
        ];
        let csv = to_csv_string(&records).unwrap();
        let first = csv.find("v=first").unwrap();
        let second = csv.find("v=second").unwrap();
        assert!(first < second);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_is_returned() {
        let records = vec![fixtures::gem_record("abc", 1.0)];
        let err = write_csv(&records, FailingWriter).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gems.csv");
        let file = std::fs::File::create(&path).unwrap();

        write_csv(&[fixtures::gem_record("v1", 2.5)], file).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains(",2.50,"));
    }
}
