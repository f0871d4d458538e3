//! 像素数组的读取（Zarr数据仓库或`.npy`文件）。

pub mod npy;
pub mod zarr;

pub use npy::read_npy;
pub use zarr::{locate_data_root, read_zarr};

use crate::error::Result;
use crate::geometry::ImagePoint3D;
use crate::measure::{
    compute_pixel_statistics, PixelStatisticsRecord, RegionOptions, RegionalPixelStatistics,
};
use crate::types::ImagingChannel;
use ndarray::ArrayD;
use std::path::Path;

/// 读入内存的像素数组，元素为u8或u16。
#[derive(Clone, Debug, PartialEq)]
pub enum PixelArray {
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
}

impl PixelArray {
    #[inline]
    pub fn shape(&self) -> &[usize] {
        match self {
            PixelArray::U8(a) => a.shape(),
            PixelArray::U16(a) => a.shape(),
        }
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// 将整个数组视为(z, y, x)区域，见`RegionalPixelStatistics::from_image`。
    pub fn region_statistics(
        &self,
        central_z: f64,
        opts: RegionOptions,
    ) -> Result<RegionalPixelStatistics> {
        match self {
            PixelArray::U8(a) => RegionalPixelStatistics::from_image(a, central_z, opts),
            PixelArray::U16(a) => RegionalPixelStatistics::from_image(a, central_z, opts),
        }
    }

    /// 见`compute_pixel_statistics`。
    pub fn pixel_statistics<I>(
        &self,
        pt: &ImagePoint3D,
        channels: I,
        diameter: usize,
        channel_column: &str,
    ) -> Result<Vec<PixelStatisticsRecord>>
    where
        I: IntoIterator<Item = ImagingChannel>,
    {
        match self {
            PixelArray::U8(a) => compute_pixel_statistics(a, pt, channels, diameter, channel_column),
            PixelArray::U16(a) => {
                compute_pixel_statistics(a, pt, channels, diameter, channel_column)
            }
        }
    }
}

/// 按扩展名读取：`.npy`文件走`read_npy`，其余视为Zarr根目录。
pub fn load_pixel_array<P: AsRef<Path>>(path: P) -> Result<PixelArray> {
    let path = path.as_ref();
    match path.extension() {
        Some(ext) if ext == "npy" => read_npy(path),
        _ => read_zarr(path),
    }
}
