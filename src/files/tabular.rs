use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use super::FieldProcessor;

/// Passes the header row through and rewrites every cell of the other rows.
/// Blank lines, which the reader skips, are written back as empty rows.
pub(crate) fn process_csv(processor: &FieldProcessor<'_>, text: &str) -> Result<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut output = Vec::with_capacity(text.len());
    let mut previous_start = None;
    let mut rows = 0;

    for (index, record) in reader.records().enumerate() {
        let record = match index {
            0 => record.context("Failed to parse CSV header")?,
            _ => record.with_context(|| format!("Failed to parse CSV row {}", index + 1))?,
        };
        let start = record.position().map_or(0, |pos| pos.byte() as usize);
        write_blank_lines(&mut output, blank_lines_between(text, previous_start, start));
        previous_start = Some(start);

        if index == 0 {
            write_row(&mut output, record.iter()).context("Failed to write CSV header")?;
            continue;
        }

        let cells = record
            .iter()
            .map(|cell| processor.render_text(cell))
            .collect::<Result<Vec<String>>>()?;
        write_row(&mut output, &cells).context("Failed to write CSV row")?;
        rows += 1;
    }

    let Some(last_start) = previous_start else {
        bail!("CSV file has no header row");
    };
    write_blank_lines(&mut output, blank_lines_between(text, Some(last_start), text.len()));
    debug!("Rewrote {} CSV rows", rows);

    String::from_utf8(output).context("CSV output is not valid UTF-8")
}

fn write_row<I, T>(output: &mut Vec<u8>, cells: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new().flexible(true).from_writer(output);
    writer.write_record(cells)?;
    writer.flush()?;
    Ok(())
}

fn write_blank_lines(output: &mut Vec<u8>, count: usize) {
    output.extend(std::iter::repeat(b'\n').take(count));
}

/// Empty lines around `at`, the offset where the reader picked up after the
/// record starting at `previous`. The reader resumes somewhere inside the
/// run of line breaks separating two records, so the whole run is measured.
fn blank_lines_between(text: &str, previous: Option<usize>, at: usize) -> usize {
    let bytes = text.as_bytes();
    let is_break = |b: &&u8| **b == b'\r' || **b == b'\n';

    let floor = previous.unwrap_or(0);
    let left = bytes[floor..at].iter().rev().take_while(is_break).count();
    let right = bytes[at..].iter().take_while(is_break).count();
    let breaks = line_breaks(&bytes[at - left..at + right]);

    match previous {
        // the first break terminates the previous record
        Some(_) => breaks.saturating_sub(1),
        None => breaks,
    }
}

/// `\r\n` counts as a single break
fn line_breaks(run: &[u8]) -> usize {
    run.iter()
        .enumerate()
        .filter(|&(i, &b)| b == b'\n' || (b == b'\r' && run.get(i + 1) != Some(&b'\n')))
        .count()
}

#[cfg(test)]
mod tests {
    use super::super::{process_file, FileUpload, Mode};
    use crate::pii::PiiService;

    fn run(content: &str, whitelist: Option<&str>, mode: Mode) -> String {
        let upload = FileUpload::new("people.csv", content.as_bytes());
        process_file(&PiiService::default(), Some(&upload), None, whitelist, mode).display
    }

    #[test]
    fn test_header_unchanged_cells_anonymized() {
        let output = run("name,email\nJohn Doe,john@example.com\n", None, Mode::Anonymize);
        assert_eq!(output, "name,email\n<PERSON>,<EMAIL_ADDRESS>\n");
    }

    #[test]
    fn test_header_only() {
        assert_eq!(run("name,email\n", None, Mode::Anonymize), "name,email\n");
    }

    #[test]
    fn test_ragged_rows_keep_their_length() {
        let output = run("a,b\nx\ny,z,extra\n", None, Mode::Anonymize);
        assert_eq!(output, "a,b\nx\ny,z,extra\n");
    }

    #[test]
    fn test_whitelist_applies_per_cell() {
        let output = run(
            "name,email\nJohn Doe,john@example.com\n",
            Some("John Doe"),
            Mode::Anonymize,
        );
        assert_eq!(output, "name,email\nJohn Doe,<EMAIL_ADDRESS>\n");
    }

    #[test]
    fn test_detect_cells_hold_quoted_json() {
        let output = run("email\njohn@example.com\n", None, Mode::Detect);
        assert_eq!(
            output,
            "email\n\"[{\"\"entity\"\":\"\"EMAIL_ADDRESS\"\",\"\"score\"\":1.0,\"\"text\"\":\"\"john@example.com\"\"}]\"\n"
        );
    }

    #[test]
    fn test_detect_empty_cell_is_empty_list() {
        assert_eq!(run("a,b\n,x\n", None, Mode::Detect), "a,b\n[],[]\n");
    }

    #[test]
    fn test_blank_lines_kept_as_empty_rows() {
        let output = run(
            "name,email\n\nJohn Doe,john@example.com\n\n",
            None,
            Mode::Anonymize,
        );
        assert_eq!(output, "name,email\n\n<PERSON>,<EMAIL_ADDRESS>\n\n");
    }

    #[test]
    fn test_crlf_blank_line_and_multiline_cell() {
        let output = run("a\r\n\r\n\"x\ny\"\r\n", None, Mode::Anonymize);
        assert_eq!(output, "a\n\n\"x\ny\"\n");
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let output = run("", None, Mode::Anonymize);
        assert_eq!(output, "Error processing people.csv: CSV file has no header row");
    }
}
