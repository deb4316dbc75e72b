use std::io::{self, Write};

use anyhow::Result;
use archivist_core::ArchivistError;

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub(super) fn eprint_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stderr = io::stderr().lock();
    serde_json::to_writer_pretty(&mut stderr, value)?;
    writeln!(stderr)?;
    Ok(())
}

pub(crate) fn report_failure(operation: &str, err: &anyhow::Error) {
    let payload = match err.downcast_ref::<ArchivistError>() {
        Some(core) => core.to_payload(operation),
        None => ArchivistError::Internal(format!("{err:#}")).to_payload(operation),
    };
    if eprint_json(&payload).is_err() {
        eprintln!("{operation} failed: {err:#}");
    }
}
