use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyIndexError, PyOSError, PyValueError};
use pyo3::PyErr;

use encdata_core::types::DatasetError;

create_exception!(rust_encdata, EncDataError, PyException, "Base class for dataset errors.");
create_exception!(rust_encdata, AuthenticationError, EncDataError, "Wrong password or tampered file.");
create_exception!(rust_encdata, FormatError, EncDataError, "File is not an encrypted item.");
create_exception!(rust_encdata, DecodeError, EncDataError, "Decrypted bytes are not an image.");
create_exception!(rust_encdata, PoolShutdownError, EncDataError, "Dataset has been closed.");

/// Map a core error onto the Python exception hierarchy.
///
/// Out-of-range indices raise `IndexError` so plain `for x in ds` terminates.
pub fn to_py_err(e: DatasetError) -> PyErr {
    let msg = e.to_string();
    match e {
        DatasetError::Authentication { .. } => AuthenticationError::new_err(msg),
        DatasetError::Format { .. } => FormatError::new_err(msg),
        DatasetError::Decode { .. } => DecodeError::new_err(msg),
        DatasetError::PoolShutdown => PoolShutdownError::new_err(msg),
        DatasetError::IndexOutOfRange { .. } => PyIndexError::new_err(msg),
        DatasetError::Io { .. } => PyOSError::new_err(msg),
        DatasetError::Config(_) | DatasetError::Validation(_) => PyValueError::new_err(msg),
    }
}
