//! 以点为中心的方形区域：裁剪边界与按通道输出的统计记录。

use super::stats::{RegionOptions, RegionalPixelStatistics};
use crate::error::{Error, Result};
use crate::geometry::{ImagePoint3D, LocatableXY, LocatableZ};
use crate::types::{CsvRow, ImagingChannel, PixelValue};
use json::JsonValue;
use ndarray::{s, ArrayBase, Axis, Data, Dimension, Ix4};
use std::ops::Range;

/// 裁剪区域的像素边界(半开区间)。保存的是按直径计算出的原始值，可能为负或超出图像。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PixelBounds {
    pub y_min_px: i64,
    pub y_max_px: i64,
    pub x_min_px: i64,
    pub x_max_px: i64,
}

impl PixelBounds {
    /// 输出记录中各边界的字段名，顺序与`values()`一致。
    pub const FIELDS: [&'static str; 4] = ["y_min_px", "y_max_px", "x_min_px", "x_max_px"];

    /// 以`pt`为中心、边长为`diameter`的方形区域。
    ///
    /// 超出`i64`的坐标饱和到边界值，保证`min <= max`。
    pub fn around<P: LocatableXY>(pt: &P, diameter: usize) -> Self {
        let half = diameter as f64 / 2.0;
        let side = i64::try_from(diameter).unwrap_or(i64::MAX);
        let left = (pt.x() - half).round_ties_even() as i64;
        let top = (pt.y() - half).round_ties_even() as i64;
        Self {
            y_min_px: top,
            y_max_px: top.saturating_add(side),
            x_min_px: left,
            x_max_px: left.saturating_add(side),
        }
    }

    #[inline]
    pub fn values(&self) -> [i64; 4] {
        [self.y_min_px, self.y_max_px, self.x_min_px, self.x_max_px]
    }

    /// 截断到`(h_len, w_len)`图像范围内的(y, x)切片区间。
    pub fn clamped(&self, h_len: usize, w_len: usize) -> (Range<usize>, Range<usize>) {
        let clamp = |v: i64, len: usize| v.clamp(0, len as i64) as usize;
        (
            clamp(self.y_min_px, h_len)..clamp(self.y_max_px, h_len),
            clamp(self.x_min_px, w_len)..clamp(self.x_max_px, w_len),
        )
    }
}

/// 一个通道的统计结果，相当于数据表中的一行。
#[derive(Clone, Debug, PartialEq)]
pub struct PixelStatisticsRecord {
    /// 存放通道编号的字段名。
    pub channel_column: String,
    pub channel: ImagingChannel,
    pub bounds: PixelBounds,
    pub stats: RegionalPixelStatistics,
}

impl PixelStatisticsRecord {
    /// 表头：通道字段、四个边界、五个统计量。
    pub fn header(&self) -> CsvRow {
        std::iter::once(self.channel_column.clone())
            .chain(PixelBounds::FIELDS.iter().map(|s| s.to_string()))
            .chain(RegionalPixelStatistics::FIELDS.iter().map(|s| s.to_string()))
            .collect()
    }

    pub fn to_csv_row(&self) -> CsvRow {
        std::iter::once(self.channel.to_string())
            .chain(self.bounds.values().iter().map(|v| v.to_string()))
            .chain(self.stats.values().iter().map(|v| v.to_string()))
            .collect()
    }
}

impl From<&PixelStatisticsRecord> for JsonValue {
    fn from(r: &PixelStatisticsRecord) -> Self {
        let mut obj = JsonValue::new_object();
        obj[r.channel_column.as_str()] = r.channel.get().into();
        for (k, v) in PixelBounds::FIELDS.into_iter().zip(r.bounds.values()) {
            obj[k] = v.into();
        }
        for (k, v) in r.stats.to_pairs() {
            obj[k] = v.into();
        }
        obj
    }
}

/// 在(c, z, y, x)图像中，对以`pt`为中心、边长`diameter`的方形区域逐通道统计像素值。
///
/// 每个通道输出一条记录，顺序与`channels`一致。记录中的边界是未截断的计算值，
/// 而实际切片使用截断到图像范围内的边界。z方向使用`pt.z`和默认的上下切片数。
pub fn compute_pixel_statistics<T, S, D, I>(
    img: &ArrayBase<S, D>,
    pt: &ImagePoint3D,
    channels: I,
    diameter: usize,
    channel_column: &str,
) -> Result<Vec<PixelStatisticsRecord>>
where
    T: PixelValue,
    S: Data<Elem = T>,
    D: Dimension,
    I: IntoIterator<Item = ImagingChannel>,
{
    if img.ndim() != 4 {
        return Err(Error::Shape(format!(
            "Image for per-channel pixel statistics must be 4D (c, z, y, x), not {}D",
            img.ndim()
        )));
    }
    if diameter == 0 {
        return Err(Error::Range("Region diameter must be positive".to_string()));
    }
    let img = img
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|e| Error::Shape(e.to_string()))?;
    let (c_len, _, h_len, w_len) = img.dim();
    let bounds = PixelBounds::around(pt, diameter);
    let (ys, xs) = bounds.clamped(h_len, w_len);

    let mut result = Vec::new();
    for ch in channels {
        if ch.get() >= c_len {
            return Err(Error::Range(format!(
                "Channel {ch} out of range for image with {c_len} channel(s)"
            )));
        }
        let sub = img
            .index_axis(Axis(0), ch.get())
            .slice_move(s![.., ys.clone(), xs.clone()]);
        let stats = RegionalPixelStatistics::from_image(&sub, pt.z(), RegionOptions::default())?;
        result.push(PixelStatisticsRecord {
            channel_column: channel_column.to_string(),
            channel: ch,
            bounds,
            stats,
        });
    }
    Ok(result)
}
