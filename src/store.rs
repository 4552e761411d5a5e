use crate::answer::{Answer, LabeledRow};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Writer};
use std::{fs::OpenOptions, iter, path::Path};

/// Header cell of the trailing label column.
pub const LABEL_COLUMN: &str = "Party";

/// Reads every stored survey from an append-only csv file. A file that does
/// not exist yet simply holds no rows.
///
/// Rows are read flexibly: a row of the wrong width is returned as-is so the
/// classifier can reject it with its own error.
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledRow>> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("no stored surveys at {}", path.display());
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line());
        let row = parse_record(&record)
            .with_context(|| format!("bad record on line {} of {}", line, path.display()))?;
        rows.push(row);
    }

    log::debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn parse_record(record: &StringRecord) -> Result<LabeledRow> {
    let fields: Vec<&str> = record.iter().collect();
    let (label, answers) = fields
        .split_last()
        .context("csv record missing party entry.")?;

    let answers = answers
        .iter()
        .map(|cell| cell.parse::<Answer>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LabeledRow::new(answers, label.trim()))
}

/// Appends one completed survey, writing the `Q1..Qn,Party` header first
/// when the file is new or empty.
pub fn append_row<P: AsRef<Path>>(path: P, row: &LabeledRow) -> Result<()> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {} for appending", path.display()))?;
    let is_new = file.metadata()?.len() == 0;

    let mut writer = Writer::from_writer(file);
    if is_new {
        let header = (1..=row.answers.len())
            .map(|q| format!("Q{}", q))
            .chain(iter::once(LABEL_COLUMN.to_string()));
        writer.write_record(header)?;
    }

    let record = row
        .answers
        .iter()
        .map(Answer::to_string)
        .chain(iter::once(row.label.clone()));
    writer.write_record(record)?;
    writer.flush()?;

    Ok(())
}
