//! 常用的数据类型：带校验的整数包装与像素值。

use crate::error::{Error, Result};
use std::fmt;

/// 图像像素值类型（8位或16位无符号整数）。
pub trait PixelValue: Copy + PartialOrd + Into<f64> + Send + Sync + 'static {}

impl PixelValue for u8 {}

impl PixelValue for u16 {}

/// 一行CSV数据。
pub type CsvRow = Vec<String>;

macro_rules! checked_int {
    ($(#[$doc: meta])* $name: ident, $min: expr, $msg: literal) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(usize);

        impl $name {
            #[inline]
            pub fn new(value: usize) -> Result<Self> {
                let value = i64::try_from(value).map_err(|_| {
                    Error::Value(format!(
                        concat!(stringify!($name), " out of range; got {}"),
                        value
                    ))
                })?;
                Self::try_from(value)
            }

            #[inline]
            pub fn get(self) -> usize {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = Error;

            fn try_from(value: i64) -> Result<Self> {
                if value < $min {
                    return Err(Error::Value(format!(concat!($msg, "; got {}"), value)));
                }
                Ok(Self(value as usize))
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

checked_int!(
    /// 1起始的视野（field of view）编号。
    FieldOfViewFrom1,
    1,
    "1-based FOV view must be positive int"
);

checked_int!(
    /// 成像通道，非负整数。
    ImagingChannel,
    0,
    "Imaging channel must be nonnegative"
);

checked_int!(
    /// 1起始的细胞核编号。
    NucleusNumber,
    1,
    "Nucleus number must be positive int"
);

checked_int!(
    /// 0起始的时间点。
    TimepointFrom0,
    0,
    "Timepoint must be nonnegative int"
);

checked_int!(
    /// 0起始的轨迹编号。
    TraceIdFrom0,
    0,
    "Trace ID must be nonnegative int"
);

impl From<usize> for ImagingChannel {
    #[inline]
    fn from(ch: usize) -> Self {
        Self(ch)
    }
}
