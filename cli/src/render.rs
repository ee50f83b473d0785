//! Plain-text and JSON presentation of task records. Read-only.

use std::io::{self, Write};

use tasks5_core::api::TaskRecord;

const SHORT_ID_LEN: usize = 8;

/// First `SHORT_ID_LEN` chars of an id, cut on a char boundary.
pub fn short_id(id: &str) -> &str {
    let end = id
        .char_indices()
        .nth(SHORT_ID_LEN)
        .map(|(i, _)| i)
        .unwrap_or(id.len());
    &id[..end]
}

fn tag_suffix(record: &TaskRecord) -> String {
    if record.tags().is_empty() {
        String::new()
    } else {
        format!(" [{}]", record.tags().join(", "))
    }
}

pub fn write_table(out: &mut dyn Write, records: &[&TaskRecord]) -> io::Result<()> {
    writeln!(out, "{:<8}  {:<10}  C  DESCRIPTION", "ID", "CREATED")?;
    for r in records {
        writeln!(
            out,
            "{:<8}  {}  {}  {}{}",
            short_id(r.id()),
            r.created().format("%Y-%m-%d"),
            if r.completed() { "✓" } else { " " },
            r.description(),
            tag_suffix(r)
        )?;
    }
    Ok(())
}

pub fn write_lines(out: &mut dyn Write, records: &[&TaskRecord]) -> io::Result<()> {
    for r in records {
        writeln!(out, "{}: {}", short_id(r.id()), r.description())?;
    }
    Ok(())
}

pub fn write_json<T: serde::Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

pub fn write_detail(out: &mut dyn Write, record: &TaskRecord) -> io::Result<()> {
    writeln!(out, "id:          {}", record.id())?;
    writeln!(out, "description: {}", record.description())?;
    writeln!(out, "created:     {}", record.created().to_rfc3339())?;
    writeln!(
        out,
        "completed:   {}",
        if record.completed() { "yes" } else { "no" }
    )?;
    writeln!(out, "tags:        {}", record.tags().join(", "))
}
