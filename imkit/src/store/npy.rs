//! `.npy`文件读取。

use super::PixelArray;
use crate::error::Result;
use ndarray::ArrayD;
use ndarray_npy::ReadNpyError;
use std::path::Path;
use tracing::debug;

/// 读取`.npy`像素数组。先按u8读取，数据类型不符时再按u16读取。
pub fn read_npy<P: AsRef<Path>>(path: P) -> Result<PixelArray> {
    let path = path.as_ref();
    debug!("Reading NPY: {}", path.display());
    match ndarray_npy::read_npy::<_, ArrayD<u8>>(path) {
        Ok(arr) => return Ok(PixelArray::U8(arr)),
        Err(ReadNpyError::WrongDescriptor(_)) => (),
        Err(e) => return Err(e.into()),
    }
    let arr: ArrayD<u16> = ndarray_npy::read_npy(path)?;
    Ok(PixelArray::U16(arr))
}
