//! Asynchronous column read of a dropped file.
//!
//! Strategy selection and parsing live in `common::reader`; this side reads
//! the blob and waits out the placeholder latency.

use common::model::data_file::FileMeta;
use common::reader::{FileColumnReader, ReadError};
use gloo_file::futures::read_as_bytes;
use gloo_file::File;
use gloo_timers::future::TimeoutFuture;

pub fn file_meta(file: &File) -> FileMeta {
    FileMeta::new(file.name(), file.size())
}

/// Resolves to the file's column names. Only delimited text is actually
/// read; the size limit is checked before touching the content.
pub async fn read_columns(reader: FileColumnReader, file: File) -> Result<Vec<String>, ReadError> {
    let meta = file_meta(&file);
    reader.check_size(&meta)?;

    let strategy = reader.strategy(&meta);
    if let Some(delay) = reader.delay(strategy) {
        TimeoutFuture::new(u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)).await;
    }

    let content = if strategy.needs_content() {
        read_as_bytes(&file).await.map_err(|e| ReadError::Io {
            file: meta.name.clone(),
            reason: e.to_string(),
        })?
    } else {
        Vec::new()
    };

    reader.read(&meta, &content)
}
