//! 中心z切片邻域内的像素统计量。

use crate::error::{Error, Result};
use crate::types::PixelValue;
use ndarray::{s, ArrayBase, Axis, Data, Dimension, Ix3};
use std::ops::Range;
use tracing::{debug, warn};

pub mod consts {
    /// 中心切片两侧默认各取的切片数。
    pub const DEFAULT_PLUS_MINUS_PLANES: i64 = 1;
}

/// 统计区域的选项。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegionOptions {
    /// 中心切片两侧各取多少张切片，不能为负。
    pub plus_minus_planes: i64,
    /// 为`true`时，z窗口必须完整落在图像内，否则返回错误；为`false`时直接截断。
    pub require_full_padding: bool,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            plus_minus_planes: consts::DEFAULT_PLUS_MINUS_PLANES,
            require_full_padding: false,
        }
    }
}

/// 一个感兴趣区域（ROI）中的像素统计量。
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegionalPixelStatistics {
    pub center_mean: f64,
    pub center_sigma: f64,
    pub center_min: f64,
    pub center_med: f64,
    pub center_max: f64,
}

impl RegionalPixelStatistics {
    /// 输出记录中各统计量的字段名，顺序与`values()`一致。
    pub const FIELDS: [&'static str; 5] = [
        "center_mean",
        "center_sigma",
        "center_min",
        "center_med",
        "center_max",
    ];

    /// 以整张(z, y, x)图像作为区域，统计`central_z`附近切片的像素值。
    ///
    /// `central_z`按四舍六入五成双取整。若取整结果恰好等于z深度而原值仍小于深度，
    /// 则改为向下截断并记录警告。
    pub fn from_image<T, S, D>(
        img: &ArrayBase<S, D>,
        central_z: f64,
        opts: RegionOptions,
    ) -> Result<Self>
    where
        T: PixelValue,
        S: Data<Elem = T>,
        D: Dimension,
    {
        if img.ndim() != 3 {
            return Err(Error::Shape(format!(
                "To build RegionalPixelStatistics, image must be 3D, not {}D",
                img.ndim()
            )));
        }
        let img = img
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|e| Error::Shape(e.to_string()))?;
        let window = central_slice_window(central_z, img.len_of(Axis(0)), opts)?;
        let planes = img.slice(s![window, .., ..]);
        Self::from_samples(planes.iter().map(|&v| v.into()).collect())
    }

    /// 按`FIELDS`的顺序返回各统计量。
    #[inline]
    pub fn values(&self) -> [f64; 5] {
        [
            self.center_mean,
            self.center_sigma,
            self.center_min,
            self.center_med,
            self.center_max,
        ]
    }

    /// 字段名与值的配对。
    pub fn to_pairs(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::FIELDS.into_iter().zip(self.values())
    }

    fn from_samples(mut samples: Vec<f64>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::Range(
                "Cannot compute pixel statistics over an empty region".to_string(),
            ));
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        samples.sort_unstable_by(f64::total_cmp);
        let mid = samples.len() / 2;
        let med = if samples.len() % 2 == 0 {
            (samples[mid - 1] + samples[mid]) / 2.0
        } else {
            samples[mid]
        };
        Ok(Self {
            center_mean: mean,
            center_sigma: var.sqrt(),
            center_min: samples[0],
            center_med: med,
            center_max: samples[samples.len() - 1],
        })
    }
}

/// 同`RegionalPixelStatistics::from_image`。
#[inline]
pub fn compute_region_statistics<T, S, D>(
    img: &ArrayBase<S, D>,
    central_z: f64,
    opts: RegionOptions,
) -> Result<RegionalPixelStatistics>
where
    T: PixelValue,
    S: Data<Elem = T>,
    D: Dimension,
{
    RegionalPixelStatistics::from_image(img, central_z, opts)
}

/// 计算以`central_z`为中心的z切片窗口`[lower, upper)`，已截断到`[0, depth)`。
fn central_slice_window(
    central_z: f64,
    depth: usize,
    opts: RegionOptions,
) -> Result<Range<usize>> {
    let pm = opts.plus_minus_planes;
    if pm < 0 {
        return Err(Error::Range(format!(
            "Number of planes on either side of the central plane can't be negative; got {pm}"
        )));
    }
    if !central_z.is_finite() {
        return Err(Error::Range(format!(
            "Cannot extract pixel values from non-finite z-slice {central_z}"
        )));
    }
    let depth_i = depth as i64;
    let mut round_z = central_z.round_ties_even() as i64;
    if round_z < 0 {
        return Err(Error::Range(format!(
            "Cannot extract pixel values from negative z-slice. ({round_z}, from {central_z})"
        )));
    }
    if round_z == depth_i && central_z < depth as f64 {
        warn!("Rounding central_z down from {central_z} to comply with z-depth of {depth}");
        round_z = central_z.trunc() as i64;
    } else if round_z >= depth_i {
        return Err(Error::Range(format!(
            "Cannot extract pixel values from z-slice ({round_z}, from {central_z}) for image with {depth} z-slice(s)."
        )));
    }

    let lower = round_z.saturating_sub(pm);
    let upper = round_z.saturating_add(pm).saturating_add(1);
    if lower < 0 || upper > depth_i {
        let msg = format!("[{lower}, {upper}) slice for image of {depth} z-slices");
        if opts.require_full_padding {
            return Err(Error::Range(msg));
        }
        debug!("{msg}");
    }
    Ok(lower.max(0) as usize..upper.min(depth_i) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, Array3, IxDyn};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

    /// 5 x 4 x 4 的图像，第z张切片的像素值为`10 * z + (y * 4 + x) % 7`。
    fn stack() -> Array3<u16> {
        Array3::from_shape_fn((5, 4, 4), |(z, y, x)| (10 * z + (y * 4 + x) % 7) as u16)
    }

    fn defaults() -> RegionOptions {
        RegionOptions::default()
    }

    #[test]
    fn test_requires_3d() {
        let flat = Array::<u8, _>::zeros(IxDyn(&[4, 4]));
        let err = RegionalPixelStatistics::from_image(&flat, 0.0, defaults()).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
        assert_eq!(
            err.to_string(),
            "To build RegionalPixelStatistics, image must be 3D, not 2D"
        );
        let four = Array::<u8, _>::zeros(IxDyn(&[1, 2, 2, 2]));
        assert!(matches!(
            RegionalPixelStatistics::from_image(&four, 0.0, defaults()),
            Err(Error::Shape(_))
        ));
    }

    #[test]
    fn test_ordering_properties() {
        let img = stack();
        for z in [0.0, 1.2, 2.5, 3.9, 4.0] {
            let st = RegionalPixelStatistics::from_image(&img, z, defaults()).unwrap();
            assert!(st.center_min <= st.center_med);
            assert!(st.center_med <= st.center_max);
            assert!(st.center_min <= st.center_mean && st.center_mean <= st.center_max);
            assert!(st.center_sigma >= 0.0);
        }
    }

    #[test]
    fn test_zero_padding_is_single_plane() {
        let img = stack();
        let opts = RegionOptions {
            plus_minus_planes: 0,
            require_full_padding: true,
        };
        let st = RegionalPixelStatistics::from_image(&img, 2.0, opts).unwrap();
        let direct = RegionalPixelStatistics::from_image(&img.slice(s![2..3, .., ..]), 0.0, opts)
            .unwrap();
        assert_eq!(st, direct);
        assert_eq!(st.center_min, 20.0);
        assert_eq!(st.center_max, 26.0);
    }

    #[test]
    fn test_boundary_rounding_is_corrected() {
        let img = stack();
        // 4.6 -> 5 == depth，修正为4
        let st = RegionalPixelStatistics::from_image(&img, 4.6, defaults()).unwrap();
        let expected = RegionalPixelStatistics::from_image(&img, 4.0, defaults()).unwrap();
        assert_eq!(st, expected);
    }

    #[test]
    fn test_beyond_depth_is_error() {
        let img = stack();
        for z in [5.0, 5.6, 9.0] {
            assert!(matches!(
                RegionalPixelStatistics::from_image(&img, z, defaults()),
                Err(Error::Range(_))
            ));
        }
    }

    #[test]
    fn test_negative_inputs_are_errors() {
        let img = stack();
        assert!(matches!(
            RegionalPixelStatistics::from_image(&img, -0.6, defaults()),
            Err(Error::Range(_))
        ));
        // -0.4 rounds to zero, which is a legal slice
        assert!(RegionalPixelStatistics::from_image(&img, -0.4, defaults()).is_ok());
        for z in [0.0, 2.0, 10.0] {
            let opts = RegionOptions {
                plus_minus_planes: -1,
                require_full_padding: false,
            };
            assert!(matches!(
                RegionalPixelStatistics::from_image(&img, z, opts),
                Err(Error::Range(_))
            ));
        }
    }

    #[test]
    fn test_window_clamped_or_rejected() {
        let img = stack();
        let clamped = RegionalPixelStatistics::from_image(&img, 0.0, defaults()).unwrap();
        let manual =
            RegionalPixelStatistics::from_image(&img.slice(s![0..2, .., ..]), 0.0, defaults())
                .unwrap();
        assert_eq!(clamped, manual);
        assert_eq!(clamped.center_min, 0.0);
        assert_eq!(clamped.center_max, 16.0);

        let strict = RegionOptions {
            plus_minus_planes: 1,
            require_full_padding: true,
        };
        assert!(matches!(
            RegionalPixelStatistics::from_image(&img, 0.0, strict),
            Err(Error::Range(_))
        ));
        assert!(matches!(
            RegionalPixelStatistics::from_image(&img, 4.0, strict),
            Err(Error::Range(_))
        ));
        assert!(RegionalPixelStatistics::from_image(&img, 2.0, strict).is_ok());
    }

    #[test]
    fn test_known_values() {
        let img = Array3::from_shape_vec((1, 2, 2), vec![1_u8, 2, 3, 4]).unwrap();
        let st = RegionalPixelStatistics::from_image(&img, 0.0, defaults()).unwrap();
        assert_eq!(st.center_mean, 2.5);
        assert_eq!(st.center_min, 1.0);
        assert_eq!(st.center_med, 2.5);
        assert_eq!(st.center_max, 4.0);
        assert!((st.center_sigma - 1.25_f64.sqrt()).abs() < 1e-12);

        let odd = Array3::from_shape_vec((1, 1, 3), vec![9_u16, 1, 5]).unwrap();
        let st = RegionalPixelStatistics::from_image(&odd, 0.0, defaults()).unwrap();
        assert_eq!(st.center_med, 5.0);
    }

    #[test]
    fn test_empty_region() {
        let img = Array3::<u8>::zeros((3, 0, 4));
        assert!(matches!(
            RegionalPixelStatistics::from_image(&img, 1.0, defaults()),
            Err(Error::Range(_))
        ));
    }

    /// 收集日志输出的缓冲区。
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// 在DEBUG级别下运行`f`，返回`f`期间输出的日志行。
    fn captured_logs<F: FnOnce()>(f: F) -> Vec<String> {
        let buf = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .with_writer(buf.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_rounding_correction_logs_warning() {
        let img = stack();
        let lines = captured_logs(|| {
            RegionalPixelStatistics::from_image(&img, 4.6, defaults()).unwrap();
        });
        let warned: Vec<_> = lines
            .iter()
            .filter(|l| l.contains("Rounding central_z down from 4.6"))
            .collect();
        assert_eq!(warned.len(), 1);
        assert!(warned[0].contains("WARN"));
    }

    #[test]
    fn test_clamped_window_logs_debug() {
        let img = stack();
        let lines = captured_logs(|| {
            RegionalPixelStatistics::from_image(&img, 0.0, defaults()).unwrap();
        });
        let clamped: Vec<_> = lines
            .iter()
            .filter(|l| l.contains("[-1, 2) slice for image of 5 z-slices"))
            .collect();
        assert_eq!(clamped.len(), 1);
        assert!(clamped[0].contains("DEBUG"));
        assert!(lines.iter().all(|l| !l.contains("WARN")));

        let inside = captured_logs(|| {
            RegionalPixelStatistics::from_image(&img, 2.0, defaults()).unwrap();
        });
        assert!(inside.is_empty());
    }

    #[test]
    fn test_pairs() {
        let img = Array3::from_elem((1, 1, 1), 7_u8);
        let st = RegionalPixelStatistics::from_image(&img, 0.0, defaults()).unwrap();
        let pairs: Vec<_> = st.to_pairs().collect();
        assert_eq!(pairs[0], ("center_mean", 7.0));
        assert_eq!(pairs[1], ("center_sigma", 0.0));
        assert_eq!(pairs[4], ("center_max", 7.0));
    }
}
