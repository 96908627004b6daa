//! Everything exported to Python is registered here.

use pyo3::prelude::*;

mod errors;
mod dataset;
mod functions;

use errors::{AuthenticationError, DecodeError, EncDataError, FormatError, PoolShutdownError};

pub fn register(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("EncDataError", py.get_type_bound::<EncDataError>())?;
    m.add("AuthenticationError", py.get_type_bound::<AuthenticationError>())?;
    m.add("FormatError", py.get_type_bound::<FormatError>())?;
    m.add("DecodeError", py.get_type_bound::<DecodeError>())?;
    m.add("PoolShutdownError", py.get_type_bound::<PoolShutdownError>())?;

    m.add_class::<dataset::EncryptedDataset>()?;

    m.add_function(wrap_pyfunction!(functions::encrypt, m)?)?;
    m.add_function(wrap_pyfunction!(functions::decrypt, m)?)?;
    m.add_function(wrap_pyfunction!(functions::test_decrypt, m)?)?;
    Ok(())
}
