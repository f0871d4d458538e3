pub mod experiment;
pub mod pathtools;

pub use experiment::{experiments_folder_path, get_experiment_path};
pub use pathtools::{
    find_multiple_paths_by_fov, find_single_path_by_fov, get_fov_sort_key, ExtantFile,
    ExtantFolder, NonExtantPath, PathWrapper,
};
