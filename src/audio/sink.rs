//! Opening track files as `rodio` sources.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::Decoder;

use super::types::EngineError;

/// Open and decode `path`, ready to be appended to a sink.
pub(super) fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>, EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
