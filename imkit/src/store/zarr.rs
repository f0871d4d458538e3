//! Zarr v2数组读取，数据块的解码（blosc、gzip等）交给`zarrs`。

use super::PixelArray;
use crate::error::{Error, Result};
use ndarray::{ArrayD, IxDyn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use zarrs::array::{Array, DataType};
use zarrs::filesystem::FilesystemStore;

/// 标识数组数据目录的元数据文件名。
pub const ZARRAY: &str = ".zarray";

/// 读取以`root`为根的Zarr数组。数组目录是`root`本身，或者是`root/0`。
pub fn read_zarr<P: AsRef<Path>>(root: P) -> Result<PixelArray> {
    let root = root.as_ref();
    debug!("Reading ZARR: {}", root.display());
    let data_root = locate_data_root(root)?;
    let fail = |msg: String| Error::Store {
        path: data_root.clone(),
        msg,
    };

    let store = FilesystemStore::new(&data_root).map_err(|e| fail(e.to_string()))?;
    let array = Array::open(Arc::new(store), "/").map_err(|e| fail(e.to_string()))?;
    let shape = array
        .shape()
        .iter()
        .map(|&n| usize::try_from(n))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| fail(e.to_string()))?;
    let subset = array.subset_all();

    match array.data_type() {
        DataType::UInt8 => {
            let values = array
                .retrieve_array_subset_elements::<u8>(&subset)
                .map_err(|e| fail(e.to_string()))?;
            Ok(PixelArray::U8(into_array(&data_root, &shape, values)?))
        }
        DataType::UInt16 => {
            let values = array
                .retrieve_array_subset_elements::<u16>(&subset)
                .map_err(|e| fail(e.to_string()))?;
            Ok(PixelArray::U16(into_array(&data_root, &shape, values)?))
        }
        other => Err(fail(format!("unsupported data type {other:?}"))),
    }
}

/// 找到包含`.zarray`的数组目录。
pub fn locate_data_root(root: &Path) -> Result<PathBuf> {
    if root.join(ZARRAY).is_file() {
        return Ok(root.to_path_buf());
    }
    let nested = root.join("0");
    if nested.join(ZARRAY).is_file() {
        return Ok(nested);
    }
    Err(Error::StoreNotFound {
        path: root.to_path_buf(),
    })
}

fn into_array<T>(dir: &Path, shape: &[usize], values: Vec<T>) -> Result<ArrayD<T>> {
    ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|e| Error::Store {
        path: dir.to_path_buf(),
        msg: e.to_string(),
    })
}
