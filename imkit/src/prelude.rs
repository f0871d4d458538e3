pub use super::error::{Error, Result};
pub use super::geometry::{ImagePoint2D, ImagePoint3D, LocatableXY, LocatableZ};
pub use super::measure::{
    compute_pixel_statistics, compute_pixel_statistics_batch, compute_region_statistics,
    PixelBounds, PixelStatisticsRecord, RegionOptions, RegionalPixelStatistics,
};
pub use super::paths::{
    find_multiple_paths_by_fov, find_single_path_by_fov, get_experiment_path, get_fov_sort_key,
    ExtantFile, ExtantFolder, NonExtantPath, PathWrapper,
};
pub use super::store::{load_pixel_array, read_npy, read_zarr, PixelArray};
pub use super::types::{
    FieldOfViewFrom1, ImagingChannel, NucleusNumber, PixelValue, TimepointFrom0, TraceIdFrom0,
};
