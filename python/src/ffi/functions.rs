use std::path::PathBuf;

use pyo3::prelude::*;
use pyo3::types::PyBytes;

use encdata_core::config::DatasetConfig;
use encdata_core::crypto::{self, Key};
use encdata_core::session::probe_password;
use encdata_core::types::DatasetError;

use super::errors::to_py_err;

fn codec_err(e: crypto::CryptoError) -> PyErr {
    to_py_err(DatasetError::from_crypto(&PathBuf::from("<bytes>"), e))
}

/// Encrypt `data` into a single envelope.
#[pyfunction]
pub fn encrypt<'py>(py: Python<'py>, password: &str, data: &[u8]) -> PyResult<Bound<'py, PyBytes>> {
    let key = Key::from_password(password);
    let out = py.allow_threads(|| crypto::encrypt(&key, data)).map_err(codec_err)?;
    Ok(PyBytes::new_bound(py, &out))
}

#[pyfunction]
pub fn decrypt<'py>(py: Python<'py>, password: &str, data: &[u8]) -> PyResult<Bound<'py, PyBytes>> {
    let key = Key::from_password(password);
    let out = py.allow_threads(|| crypto::decrypt(&key, data)).map_err(codec_err)?;
    Ok(PyBytes::new_bound(py, &out))
}

/// True if `password` opens the first encrypted item in `data_dir`.
#[pyfunction]
pub fn test_decrypt(py: Python<'_>, data_dir: PathBuf, password: &str) -> PyResult<bool> {
    match py.allow_threads(|| probe_password(&data_dir, password, &DatasetConfig::default())) {
        Ok(()) => Ok(true),
        Err(e) if e.is_authentication() => Ok(false),
        Err(e) => Err(to_py_err(e)),
    }
}
