//! 带校验的路径包装，以及按视野（FOV）查找路径。

use crate::error::{Error, Result};
use crate::types::FieldOfViewFrom1;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use walkdir::WalkDir;

/// 对路径做某种校验的包装。只能通过校验构造，构造后不可变。
pub trait PathWrapper: Sized + fmt::Display + FromStr<Err = Error> + AsRef<Path> {
    /// 检查`path`是否满足该包装的要求。
    fn validate(path: &Path) -> Result<()>;

    fn new(path: PathBuf) -> Result<Self>;

    fn path(&self) -> &Path;

    fn into_path(self) -> PathBuf;
}

macro_rules! path_wrapper {
    ($(#[$doc: meta])* $name: ident, $ok: expr, $msg: literal) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Eq, PartialEq, Hash)]
        pub struct $name {
            path: PathBuf,
        }

        impl PathWrapper for $name {
            fn validate(path: &Path) -> Result<()> {
                let ok: fn(&Path) -> bool = $ok;
                if ok(path) {
                    Ok(())
                } else {
                    Err(Error::PathWrapper(format!(concat!($msg, ": {}"), path.display())))
                }
            }

            fn new(path: PathBuf) -> Result<Self> {
                Self::validate(&path)?;
                Ok(Self { path })
            }

            #[inline]
            fn path(&self) -> &Path {
                &self.path
            }

            #[inline]
            fn into_path(self) -> PathBuf {
                self.path
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(PathBuf::from(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.path.display())
            }
        }

        impl AsRef<Path> for $name {
            #[inline]
            fn as_ref(&self) -> &Path {
                &self.path
            }
        }
    };
}

path_wrapper!(
    /// 已存在的文件。
    ExtantFile,
    |p| p.is_file(),
    "Not an extant file"
);

path_wrapper!(
    /// 已存在的目录。
    ExtantFolder,
    |p| p.is_dir(),
    "Not an extant folder"
);

path_wrapper!(
    /// 尚不存在的路径。
    NonExtantPath,
    |p| !p.exists(),
    "Path already exists"
);

/// 从形如`P0001.zarr`的文件名中解析出视野编号。文件名必须以`extension`结尾，
/// 其余部分必须是`P`加数字。
pub fn get_fov_sort_key<P: AsRef<Path>>(path: P, extension: &str) -> Option<FieldOfViewFrom1> {
    let name = path.as_ref().file_name()?.to_str()?;
    let digits = name.strip_suffix(extension)?.strip_prefix('P')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    FieldOfViewFrom1::try_from(digits.parse::<i64>().ok()?).ok()
}

/// 列出`folder`下（不递归）能解析出视野编号的路径，按视野分组。
pub fn find_multiple_paths_by_fov<P: AsRef<Path>>(
    folder: P,
    extension: &str,
) -> Result<BTreeMap<FieldOfViewFrom1, Vec<PathBuf>>> {
    let folder = ExtantFolder::new(folder.as_ref().to_path_buf())?;
    let mut by_fov: BTreeMap<FieldOfViewFrom1, Vec<PathBuf>> = BTreeMap::new();
    for entry in WalkDir::new(folder.path())
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        match get_fov_sort_key(entry.path(), extension) {
            Some(fov) => by_fov.entry(fov).or_default().push(entry.into_path()),
            None => debug!("Skipping non-FOV path: {}", entry.path().display()),
        }
    }
    Ok(by_fov)
}

/// 同`find_multiple_paths_by_fov`，但要求每个视野只有一个路径。
pub fn find_single_path_by_fov<P: AsRef<Path>>(
    folder: P,
    extension: &str,
) -> Result<BTreeMap<FieldOfViewFrom1, PathBuf>> {
    let folder = folder.as_ref();
    let mut result = BTreeMap::new();
    for (fov, mut paths) in find_multiple_paths_by_fov(folder, extension)? {
        if paths.len() != 1 {
            return Err(Error::RepeatedFov {
                folder: folder.to_path_buf(),
                fov: fov.get() as i64,
                count: paths.len(),
            });
        }
        result.insert(fov, paths.remove(0));
    }
    Ok(result)
}
