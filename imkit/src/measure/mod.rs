pub mod batch;
pub mod region;
pub mod stats;

pub use batch::compute_pixel_statistics_batch;
pub use region::{compute_pixel_statistics, PixelBounds, PixelStatisticsRecord};
pub use stats::{compute_region_statistics, RegionOptions, RegionalPixelStatistics};
