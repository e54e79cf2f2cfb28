//! Row and column selection over CSV record streams.
//!
//! Records from every source form one stream: row positions keep counting
//! across sources, as if the files were concatenated. Column positions
//! restart at 1 in every record.

use std::io::{Read, Write};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::{Axis, Cursor, RangeFilter};

/// Record counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub rows_read: usize,
    pub rows_written: usize,
}

/// A CSV writer that accepts records of differing lengths.
pub fn writer<W: Write>(output: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().flexible(true).from_writer(output)
}

/// Write a record with no fields as a bare line terminator. The csv writer
/// would render it as `""`, which reads back as one empty field.
fn write_empty_record<W: Write>(output: &mut csv::Writer<W>) -> Result<()> {
    output.flush()?;
    output.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Applies a row filter and a column filter to a stream of sources.
pub struct Selector<'a> {
    rows: Cursor<'a>,
    cols: &'a RangeFilter,
    comment: Option<u8>,
    stats: Selection,
}

impl<'a> Selector<'a> {
    pub fn new(rows: &'a RangeFilter, cols: &'a RangeFilter) -> Self {
        Self {
            rows: rows.cursor(),
            cols,
            comment: None,
            stats: Selection::default(),
        }
    }

    /// Skip input lines starting with `comment`.
    pub fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Read every record of one source and write the selected fields of the
    /// selected rows. Stops at the first record that fails to decode.
    pub fn process<R: Read, W: Write>(
        &mut self,
        name: &str,
        input: R,
        output: &mut csv::Writer<W>,
    ) -> Result<()> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(self.comment)
            .from_reader(input);
        let mut record = csv::ByteRecord::new();

        loop {
            match reader.read_byte_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(source) => {
                    return Err(Error::Decode {
                        name: name.to_string(),
                        row: self.stats.rows_read + 1,
                        source,
                    });
                }
            }
            self.stats.rows_read += 1;
            let row = self.stats.rows_read;
            debug!("{row}) got {} fields", record.len());

            if !self.rows.allows(row) {
                continue;
            }

            let mut cols = self.cols.cursor();
            let fields: Vec<&[u8]> = record
                .iter()
                .enumerate()
                .filter(|&(idx, _)| cols.allows(idx + 1))
                .map(|(_, field)| field)
                .collect();
            if fields.is_empty() {
                write_empty_record(output)?;
            } else {
                output.write_record(&fields).map_err(Error::Encode)?;
            }
            self.stats.rows_written += 1;
        }

        output.flush()?;
        Ok(())
    }

    pub fn finish(self) -> Selection {
        self.stats
    }
}

/// The row and column filters for one run.
#[derive(Debug, Clone)]
pub struct Filters {
    pub rows: RangeFilter,
    pub cols: RangeFilter,
}

impl Filters {
    /// Validate `config` and build both filters. Nothing is read from the
    /// data sources here, so a bad specification fails before any output.
    pub fn build(config: &Config) -> Result<Self> {
        config.validate()?;
        let rows = config.rows.build_filter(Axis::Row)?;
        let cols = config.cols.build_filter(Axis::Column)?;
        debug!("row filter: {rows}");
        debug!("column filter: {cols}");
        Ok(Self { rows, cols })
    }
}

/// Select from every source of `config` into `output`.
pub fn run<W: Write>(config: &Config, filters: &Filters, output: W) -> Result<Selection> {
    let mut output = writer(output);
    let mut selector = Selector::new(&filters.rows, &filters.cols).with_comment(config.comment);
    for input in config.sources() {
        info!("parsing {input}");
        let reader = input.open()?;
        selector.process(&input.to_string(), reader, &mut output)?;
    }

    let stats = selector.finish();
    info!(
        "{} records in, {} records out",
        stats.rows_read, stats.rows_written
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::source::Input;

    fn select(rows: &str, cols: &str, input: &str) -> (String, Selection) {
        let mut row_filter = RangeFilter::new();
        if !rows.is_empty() {
            row_filter.update(rows).unwrap();
        }
        let mut col_filter = RangeFilter::new();
        if !cols.is_empty() {
            col_filter.update(cols).unwrap();
        }

        let mut output = writer(Vec::new());
        let mut selector = Selector::new(&row_filter, &col_filter).with_comment(Some(b'#'));
        selector.process("test", input.as_bytes(), &mut output).unwrap();
        let stats = selector.finish();
        let bytes = output.into_inner().unwrap();
        (String::from_utf8(bytes).unwrap(), stats)
    }

    fn numbered_rows(n: usize) -> String {
        (1..=n).map(|i| format!("r{i},x\n")).collect()
    }

    #[test]
    fn test_pass_through() {
        let input = "a,b,c\n1,2,3\n";
        let (output, stats) = select("", "", input);
        assert_eq!(output, input);
        assert_eq!(stats, Selection { rows_read: 2, rows_written: 2 });
    }

    #[test]
    fn test_select_columns() {
        let (output, _) = select("", "1,3-", "a,b,c,d\n1,2,3,4\n");
        assert_eq!(output, "a,c,d\n1,3,4\n");
    }

    #[test]
    fn test_select_rows_first_and_tail() {
        let (output, stats) = select("1,10-", "1", &numbered_rows(12));
        assert_eq!(output, "r1\nr10\nr11\nr12\n");
        assert_eq!(stats.rows_read, 12);
        assert_eq!(stats.rows_written, 4);
    }

    #[test]
    fn test_select_mixed_rows() {
        let (output, _) = select("-3,5-7,9,11-", "1", &numbered_rows(12));
        let rows: Vec<&str> = output.lines().collect();
        assert_eq!(
            rows,
            vec!["r1", "r2", "r3", "r5", "r6", "r7", "r9", "r11", "r12"]
        );
    }

    #[test]
    fn test_ragged_records() {
        let (output, _) = select("", "2-3", "a,b\na,b,c,d\na,b,c\n");
        assert_eq!(output.lines().collect::<Vec<_>>(), vec!["b", "b,c", "b,c"]);
    }

    #[test]
    fn test_row_without_selected_columns_is_empty_line() {
        let (output, stats) = select("", "5", "a,b\nc,d\n");
        assert_eq!(output, "\n\n");
        assert_eq!(stats.rows_written, 2);
    }

    #[test]
    fn test_empty_lines_keep_their_place() {
        let (output, _) = select("", "3", "a,b,c\nd\ne,f,g\n");
        assert_eq!(output, "c\n\ng\n");
    }

    #[test]
    fn test_comment_lines_skipped() {
        let (output, stats) = select("2", "", "# header\nfirst\nsecond\n");
        assert_eq!(output, "second\n");
        assert_eq!(stats.rows_read, 2);
    }

    #[test]
    fn test_quoted_fields_survive() {
        let (output, _) = select("", "2", "1,\"a, b\",3\n");
        assert_eq!(output, "\"a, b\"\n");
    }

    #[test]
    fn test_row_count_continues_across_sources() {
        let mut rows = RangeFilter::new();
        rows.update("2-3").unwrap();
        let cols = RangeFilter::new();

        let mut output = writer(Vec::new());
        let mut selector = Selector::new(&rows, &cols);
        selector.process("one", "a\nb\n".as_bytes(), &mut output).unwrap();
        selector.process("two", "c\nd\n".as_bytes(), &mut output).unwrap();
        let stats = selector.finish();

        let text = String::from_utf8(output.into_inner().unwrap()).unwrap();
        assert_eq!(text, "b\nc\n");
        assert_eq!(stats.rows_read, 4);
    }

    #[test]
    fn test_invalid_utf8_passes_through() {
        let rows = RangeFilter::new();
        let cols = RangeFilter::new();
        let mut output = writer(Vec::new());
        let mut selector = Selector::new(&rows, &cols);
        selector
            .process("bytes", &b"caf\xe9,1\n"[..], &mut output)
            .unwrap();
        assert_eq!(output.into_inner().unwrap(), b"caf\xe9,1\n");
    }

    #[test]
    fn test_bad_spec_fails_before_reading() {
        let config = Config {
            files: vec![Input::parse("/nonexistent/never-read.csv")],
            rows: crate::config::AxisSpec::new(Some("3-1".to_string()), None),
            ..Config::default()
        };
        let err = Filters::build(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn test_missing_data_file_is_source_error() {
        let config = Config {
            files: vec![Input::parse("/nonexistent/data.csv")],
            ..Config::default()
        };
        let filters = Filters::build(&config).unwrap();
        let err = run(&config, &filters, Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    }

    #[test]
    fn test_decode_error_stops_processing() {
        let rows = RangeFilter::new();
        let cols = RangeFilter::new();
        let mut output = writer(Vec::new());
        let mut selector = Selector::new(&rows, &cols);
        let err = selector
            .process("broken", FailingReader(&b"a,b\n"[..]), &mut output)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_decode_error_skips_later_sources() {
        let broken = tempfile::tempdir().unwrap();
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "later,record").unwrap();

        // Opening a directory succeeds; reading from it fails.
        let config = Config {
            files: vec![
                Input::Path(broken.path().to_path_buf()),
                Input::Path(good.path().to_path_buf()),
            ],
            ..Config::default()
        };
        let filters = Filters::build(&config).unwrap();

        let mut output = Vec::new();
        let err = run(&config, &filters, &mut output).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.kind().exit_code(), 5);
        assert!(!String::from_utf8_lossy(&output).contains("later"));
    }

    /// Yields its bytes once, then fails.
    struct FailingReader<'a>(&'a [u8]);

    impl Read for FailingReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() {
                return Err(std::io::Error::other("device went away"));
            }
            let n = self.0.read(buf)?;
            Ok(n)
        }
    }
}
