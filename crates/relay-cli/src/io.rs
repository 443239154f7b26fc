use std::path::Path;

use crate::error::{convert_io_error, CliError};

pub fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|e| convert_io_error(e, path.to_path_buf()))
}
