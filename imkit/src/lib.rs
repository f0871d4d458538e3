//! 显微成像课题组的常用工具：区域像素统计、图像点与通道类型、
//! 像素数组读取，以及实验与视野相关的路径工具。

pub mod error;
pub mod geometry;
pub mod measure;
pub mod paths;
pub mod prelude;
pub mod store;
pub mod types;

pub use error::{Error, Result};
