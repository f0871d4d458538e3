//! 几何类型：图像中的二维、三维点。

use crate::error::{Error, Result};

/// 具有x、y坐标的对象。
pub trait LocatableXY {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

/// 具有z坐标（z切片位置）的对象。
pub trait LocatableZ {
    fn z(&self) -> f64;
}

#[inline]
fn check_coordinate(axis: &str, c: f64) -> Result<f64> {
    if !c.is_finite() {
        return Err(Error::Value(format!("{axis}-coordinate is not finite: {c}")));
    }
    if c < 0.0 {
        return Err(Error::Value(format!("{axis}-coordinate is negative: {c}")));
    }
    Ok(c)
}

/// 图像中的二维点(x, y)，坐标非负。
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImagePoint2D {
    x: f64,
    y: f64,
}

impl ImagePoint2D {
    pub fn new(x: f64, y: f64) -> Result<Self> {
        Ok(Self {
            x: check_coordinate("x", x)?,
            y: check_coordinate("y", y)?,
        })
    }

    #[inline]
    pub fn to_tuple(self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl LocatableXY for ImagePoint2D {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    fn y(&self) -> f64 {
        self.y
    }
}

/// 图像中的三维点(x, y, z)。z可以是小数，也可以直接是切片序号。
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImagePoint3D {
    xy: ImagePoint2D,
    z: f64,
}

impl ImagePoint3D {
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        Ok(Self {
            xy: ImagePoint2D::new(x, y)?,
            z: check_coordinate("z", z)?,
        })
    }

    /// 以整数z切片序号构造。
    pub fn at_slice(x: f64, y: f64, z: usize) -> Result<Self> {
        Self::new(x, y, z as f64)
    }

    #[inline]
    pub fn xy(self) -> ImagePoint2D {
        self.xy
    }

    #[inline]
    pub fn to_tuple(self) -> (f64, f64, f64) {
        (self.xy.x, self.xy.y, self.z)
    }
}

impl LocatableXY for ImagePoint3D {
    #[inline]
    fn x(&self) -> f64 {
        self.xy.x
    }

    #[inline]
    fn y(&self) -> f64 {
        self.xy.y
    }
}

impl LocatableZ for ImagePoint3D {
    #[inline]
    fn z(&self) -> f64 {
        self.z
    }
}
