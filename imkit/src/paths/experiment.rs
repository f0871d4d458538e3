//! 课题组共享存储上实验目录的路径。

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub mod consts {
    /// 共享存储根目录。
    pub const GROUPS_HOME: &str = "/groups";

    /// 课题组目录名。
    pub const GROUP_NAME: &str = "gerlich";

    /// 实验编号的字符数（不足时左侧补零）。
    pub const EXPERIMENT_NUMBER_CHARACTER_COUNT: usize = 6;
}

use consts::*;

/// 获得实验`exp`对应的目录：
/// `{groups_home}/gerlich/experiments/Experiments_{idx}/{idx}`，其中`idx`是`exp`向下取整到100的倍数并补零到6位。
///
/// `groups_home`缺省时使用`/groups`。`must_exist`为`true`时要求该目录已存在。
pub fn get_experiment_path(
    exp: i64,
    groups_home: Option<&Path>,
    must_exist: bool,
) -> Result<PathBuf> {
    let illegal = |message: String| Error::IllegalExperimentNumber {
        number: exp,
        message,
    };
    if exp < 0 {
        return Err(illegal(format!("Negative experiment number: {exp}")));
    }
    if exp.to_string().len() > EXPERIMENT_NUMBER_CHARACTER_COUNT {
        return Err(illegal(format!(
            "Impossible to represent given experiment number with {EXPERIMENT_NUMBER_CHARACTER_COUNT} characters: {exp}"
        )));
    }
    let idx = format!(
        "{:0width$}",
        experiment_index(exp),
        width = EXPERIMENT_NUMBER_CHARACTER_COUNT
    );
    let mut path = experiments_folder_path(groups_home);
    path.extend([format!("Experiments_{idx}"), idx]);
    if must_exist && !path.is_dir() {
        return Err(illegal(format!(
            "Folder path ({}) isn't a directory for experiment: {exp}",
            path.display()
        )));
    }
    Ok(path)
}

/// 课题组的实验总目录。
pub fn experiments_folder_path(groups_home: Option<&Path>) -> PathBuf {
    let mut path = groups_home
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(GROUPS_HOME));
    path.extend([GROUP_NAME, "experiments"]);
    path
}

#[inline]
fn experiment_index(exp: i64) -> i64 {
    100 * (exp / 100)
}
