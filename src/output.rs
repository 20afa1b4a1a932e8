use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::parser::ProblemRecord;

const HEADERS: [&str; 3] = ["number", "problem", "explanation"];

/// Totals reported once the sink has drained the record stream.
pub struct WriteStats {
    pub records: usize,
    pub with_items: usize,
}

/// Stream records into a CSV file, returning the path actually written
/// (".csv" is appended when missing). The header row is always written,
/// even for an empty stream.
pub fn write_csv<I>(path: &Path, records: I) -> Result<(PathBuf, WriteStats)>
where
    I: Iterator<Item = Result<ProblemRecord>>,
{
    let path = ensure_csv_extension(path);
    let mut file =
        File::create(&path).with_context(|| format!("cannot create {}", path.display()))?;
    // UTF-8 BOM so spreadsheet apps pick the right encoding.
    file.write_all(b"\xEF\xBB\xBF")?;
    let stats = write_records(file, records)?;
    Ok((path, stats))
}

/// CSV body, separated from the file handling so it can be tested
/// against an in-memory writer.
pub fn write_records<W, I>(writer: W, records: I) -> Result<WriteStats>
where
    W: Write,
    I: Iterator<Item = Result<ProblemRecord>>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    let mut stats = WriteStats { records: 0, with_items: 0 };
    for record in records {
        let record = record?;
        let explanation = record.explanation();
        csv_writer.write_record([
            record.number.as_str(),
            record.title.as_str(),
            explanation.as_str(),
        ])?;
        stats.records += 1;
        if !record.sub_items.is_empty() {
            stats.with_items += 1;
        }
    }
    csv_writer.flush()?;
    Ok(stats)
}

fn ensure_csv_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => path.to_path_buf(),
        _ => {
            let mut os_string = path.as_os_str().to_owned();
            os_string.push(".csv");
            PathBuf::from(os_string)
        }
    }
}
