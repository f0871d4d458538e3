//! 本库统一的错误类型。

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// 数组维数不符合操作要求。
    #[error("{0}")]
    Shape(String),

    /// 索引或窗口越出数组范围。
    #[error("{0}")]
    Range(String),

    /// 值本身不合法（负坐标、非正编号等）。
    #[error("{0}")]
    Value(String),

    /// 在给定根目录下找不到`.zarray`。
    #[error("Parsing {} failed with message: Failed to find .zarray to indicate data folder", .path.display())]
    StoreNotFound { path: PathBuf },

    /// 数据仓库无法打开或解码，或数据类型不受支持。
    #[error("Parsing {} failed with message: {msg}", .path.display())]
    Store { path: PathBuf, msg: String },

    #[error("{0}")]
    PathWrapper(String),

    /// 同一个视野对应了多个路径。
    #[error("{count} paths for FOV {fov} in {}", .folder.display())]
    RepeatedFov {
        folder: PathBuf,
        fov: i64,
        count: usize,
    },

    #[error("{message}")]
    IllegalExperimentNumber { number: i64, message: String },

    /// 线程池中的任务没有返回结果。
    #[error("{0}")]
    Worker(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Npy(#[from] ndarray_npy::ReadNpyError),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// 若为非法实验编号错误，返回该编号。
    pub fn experiment_number(&self) -> Option<i64> {
        match self {
            Error::IllegalExperimentNumber { number, .. } => Some(*number),
            _ => None,
        }
    }
}
