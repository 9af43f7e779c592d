use std::fmt::Display;
use std::time::Instant;

/// Timings from a benchmark run, in milliseconds.
#[derive(Debug, Default)]
pub struct BenchStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
}

/// Run `f` `trials` times and print timing statistics under `description`.
pub fn run_bench<F: FnMut(), D: Display>(trials: usize, description: D, mut f: F) -> BenchStats {
    let mut times: Vec<f32> = (0..trials)
        .map(|_| {
            let start = Instant::now();
            f();
            (start.elapsed().as_secs_f64() * 1000.0) as f32
        })
        .collect();

    let (Some(&min), Some(&max)) = (
        times.iter().min_by(|a, b| a.total_cmp(b)),
        times.iter().max_by(|a, b| a.total_cmp(b)),
    ) else {
        return BenchStats::default();
    };

    times.sort_by(|a, b| a.total_cmp(b));
    let mid = times.len() / 2;
    let median = if times.len() % 2 == 1 {
        times[mid]
    } else {
        (times[mid - 1] + times[mid]) / 2.
    };
    let mean = times.iter().sum::<f32>() / times.len() as f32;

    println!(
        "{}. mean {:.3}ms median {:.3} min {:.3} max {:.3}",
        description, mean, median, min, max
    );

    BenchStats {
        min,
        max,
        mean,
        median,
    }
}
