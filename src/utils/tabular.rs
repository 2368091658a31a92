use crate::utils::error::{BiggError, Result};

/// In-memory CSV/TSV writer.
pub fn writer(delimiter: u8, has_headers: bool) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .from_writer(Vec::new())
}

/// Flushes `writer` and returns what it wrote.
pub fn into_string(mut writer: csv::Writer<Vec<u8>>) -> Result<String> {
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()))?;
    String::from_utf8(bytes)
        .map_err(|e| BiggError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
