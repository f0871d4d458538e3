//! 多个感兴趣区域的并行统计。

use super::region::{compute_pixel_statistics, PixelStatisticsRecord};
use crate::error::{Error, Result};
use crate::geometry::ImagePoint3D;
use crate::types::{ImagingChannel, PixelValue};
use ndarray::{Array, Dimension};
use std::sync::mpsc::channel;
use std::sync::Arc;
use threadpool::ThreadPool;
use tracing::debug;

/// 对`points`中的每个点执行`compute_pixel_statistics`。
///
/// 图像以`Arc`只读共享给线程池中的各个任务；结果按`points`的顺序返回。
/// 若有多个点出错，返回顺序最靠前的那个错误。
pub fn compute_pixel_statistics_batch<T, D>(
    img: Arc<Array<T, D>>,
    points: &[ImagePoint3D],
    channels: &[ImagingChannel],
    diameter: usize,
    channel_column: &str,
) -> Result<Vec<Vec<PixelStatisticsRecord>>>
where
    T: PixelValue,
    D: Dimension + 'static,
{
    let n = points.len();
    let results: Vec<(usize, Result<Vec<PixelStatisticsRecord>>)> = match num_cpus::get() {
        1 => points
            .iter()
            .enumerate()
            .map(|(i, pt)| {
                let r = compute_pixel_statistics(
                    img.as_ref(),
                    pt,
                    channels.iter().copied(),
                    diameter,
                    channel_column,
                );
                (i, r)
            })
            .collect(),
        cpus => {
            debug!("Computing pixel statistics for {n} point(s) on {cpus} threads");
            let pool = ThreadPool::new(cpus);
            let (tx, rx) = channel();
            let channels: Arc<[ImagingChannel]> = channels.into();
            for (index, pt) in points.iter().copied().enumerate() {
                let tx = tx.clone();
                let img = Arc::clone(&img);
                let channels = Arc::clone(&channels);
                let column = channel_column.to_string();
                pool.execute(move || {
                    let r = compute_pixel_statistics(
                        img.as_ref(),
                        &pt,
                        channels.iter().copied(),
                        diameter,
                        &column,
                    );
                    // 接收端在收齐之前一直存活
                    let _ = tx.send((index, r));
                });
            }
            drop(tx);
            rx.iter().take(n).collect()
        }
    };
    if results.len() != n {
        return Err(Error::Worker(format!(
            "{} of {n} pixel statistics job(s) did not report back",
            n - results.len()
        )));
    }

    let mut ordered: Vec<Option<Result<Vec<PixelStatisticsRecord>>>> =
        (0..n).map(|_| None).collect();
    for (i, r) in results {
        ordered[i] = Some(r);
    }
    ordered.into_iter().flatten().collect()
}
