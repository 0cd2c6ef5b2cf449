use env_logger::Env;
use ffnet::dataset::features::encode_point;
use ffnet::dataset::{DataItem, Dataset, Point, Preset};
use ffnet::net::Network;
use ffnet::Result;

/// Logs at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// The four-point set a single sigmoid neuron can fit: both inputs off maps
/// to 0, both on to 1, exactly one on to 0.5.
pub fn separable_dataset() -> Dataset {
    Dataset::new(vec![
        DataItem::from_flat(vec![0.0, 0.0], vec![0.0]),
        DataItem::from_flat(vec![1.0, 1.0], vec![1.0]),
        DataItem::from_flat(vec![1.0, 0.0], vec![0.5]),
        DataItem::from_flat(vec![0.0, 1.0], vec![0.5]),
    ])
}

pub fn xor_dataset() -> Dataset {
    Dataset::new(vec![
        DataItem::from_flat(vec![0.0, 0.0], vec![0.0]),
        DataItem::from_flat(vec![0.0, 1.0], vec![1.0]),
        DataItem::from_flat(vec![1.0, 0.0], vec![1.0]),
        DataItem::from_flat(vec![1.0, 1.0], vec![0.0]),
    ])
}

/// Text rendering of the network's decision over the preset canvas, one
/// character per cell: `#` for outputs of at least 0.5, `.` otherwise.
/// The top row is the largest `y`.
pub fn decision_map(network: &mut Network, preset: Preset, cols: usize, rows: usize) -> Result<String> {
    let canvas = preset.canvas();
    let features = preset.features();
    let mut out = String::with_capacity((cols + 1) * rows);
    for row in (0..rows).rev() {
        for col in 0..cols {
            let x = canvas.min_x() + (col as f32 + 0.5) * canvas.width / cols as f32;
            let y = canvas.min_y() + (row as f32 + 0.5) * canvas.height / rows as f32;
            let output = network.predict(&encode_point(&features, Point::new(x, y)))?;
            out.push(if output.get(0) >= 0.5 { '#' } else { '.' });
        }
        out.push('\n');
    }
    Ok(out)
}
