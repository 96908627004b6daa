use std::path::PathBuf;

use log::debug;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use encdata_core::config::DatasetConfig;
use encdata_core::constants::DEFAULT_SHUFFLE_SEED;
use encdata_core::session::Dataset;
use encdata_core::types::DatasetError;

use super::errors::to_py_err;

/// Encrypted image directory with background decryption.
///
/// Indexing moves the prefetch window to the requested item and returns its
/// decrypted bytes. Decryption runs with the GIL released.
#[pyclass(module = "rust_encdata", name = "EncryptedDataset")]
pub struct EncryptedDataset {
    inner: Option<Dataset>,
    data_dir: PathBuf,
}

impl EncryptedDataset {
    fn dataset(&mut self) -> PyResult<&mut Dataset> {
        self.inner
            .as_mut()
            .ok_or_else(|| to_py_err(DatasetError::PoolShutdown))
    }

    fn resolve(&mut self, index: isize) -> PyResult<usize> {
        let len = self.dataset()?.len();
        let resolved = if index < 0 { index + len as isize } else { index };
        if resolved < 0 || resolved as usize >= len {
            return Err(to_py_err(DatasetError::IndexOutOfRange {
                index: index.unsigned_abs(),
                len,
            }));
        }
        Ok(resolved as usize)
    }
}

#[pymethods]
impl EncryptedDataset {
    #[new]
    #[pyo3(signature = (data_dir, password, num_processes=2, prefetch_distance=None, file_blacklist=None))]
    fn new(
        py: Python<'_>,
        data_dir: PathBuf,
        password: &str,
        num_processes: usize,
        prefetch_distance: Option<usize>,
        file_blacklist: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let mut config = DatasetConfig::default().with_workers(num_processes);
        config.prefetch_distance = prefetch_distance;
        if let Some(names) = file_blacklist {
            let names = names
                .iter()?
                .map(|name| name.and_then(|n| n.extract::<String>()))
                .collect::<PyResult<Vec<String>>>()?;
            config = config.with_blacklist(names);
        }

        let password = password.to_owned();
        let dataset = py
            .allow_threads(|| Dataset::open(&data_dir, &password, &config))
            .map_err(to_py_err)?;
        debug!("[PY] opened {} with {} items", data_dir.display(), dataset.len());

        Ok(Self { inner: Some(dataset), data_dir })
    }

    fn __len__(&mut self) -> PyResult<usize> {
        Ok(self.dataset()?.len())
    }

    fn __getitem__<'py>(&mut self, py: Python<'py>, index: isize) -> PyResult<Bound<'py, PyBytes>> {
        let i = self.resolve(index)?;
        let dataset = self.dataset()?;
        let bytes = py.allow_threads(|| dataset.get_bytes(i)).map_err(to_py_err)?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    /// Bytes of item `index`, checked to be a JPEG or PNG.
    fn get_image<'py>(&mut self, py: Python<'py>, index: isize) -> PyResult<Bound<'py, PyBytes>> {
        let i = self.resolve(index)?;
        let dataset = self.dataset()?;
        let image = py.allow_threads(|| dataset.get_image(i)).map_err(to_py_err)?;
        Ok(PyBytes::new_bound(py, &image.bytes))
    }

    fn get_file_name(&mut self, index: isize) -> PyResult<String> {
        let i = self.resolve(index)?;
        self.dataset()?.file_name(i).map_err(to_py_err)
    }

    /// Move the prefetch window without reading anything.
    fn advance(&mut self, index: isize) -> PyResult<()> {
        let i = self.resolve(index)?;
        self.dataset()?.advance(i).map_err(to_py_err)
    }

    #[pyo3(signature = (seed=DEFAULT_SHUFFLE_SEED))]
    fn shuffle(&mut self, seed: u64) -> PyResult<()> {
        self.dataset()?.shuffle(seed).map(|_| ()).map_err(to_py_err)
    }

    /// Stop the workers. Later calls raise `PoolShutdownError`.
    fn close(&mut self, py: Python<'_>) {
        if let Some(dataset) = self.inner.take() {
            py.allow_threads(|| dataset.close());
            debug!("[PY] closed {}", self.data_dir.display());
        }
    }

    fn __repr__(&self) -> String {
        match &self.inner {
            Some(ds) => format!("EncryptedDataset({:?}, len={})", self.data_dir.display().to_string(), ds.len()),
            None => format!("EncryptedDataset({:?}, closed)", self.data_dir.display().to_string()),
        }
    }
}
