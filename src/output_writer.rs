use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use itertools::izip;

use crate::solver::Trajectory;
use crate::stats::ResponseStats;

/// Writes trajectories as tab-delimited text: a header row, then one row
/// per output time with 4-decimal fixed formatting for downstream
/// reproducibility.
pub struct TrajectoryWriter<W: Write> {
    sink: W,
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(mut sink: W) -> io::Result<Self> {
        writeln!(sink, "t\tx1\tx2\tx1_dot\tx2_dot")?;
        Ok(Self { sink })
    }

    pub fn write_row(&mut self, t: f64, x1: f64, x2: f64, v1: f64, v2: f64) -> io::Result<()> {
        writeln!(
            self.sink,
            "{t:.4}\t{x1:.4}\t{x2:.4}\t{v1:.4}\t{v2:.4}"
        )
    }

    pub fn write_trajectory(&mut self, trajectory: &Trajectory) -> io::Result<()> {
        for (t, x1, x2, v1, v2) in izip!(
            &trajectory.time,
            &trajectory.blade_position,
            &trajectory.tower_position,
            &trajectory.blade_velocity,
            &trajectory.tower_velocity,
        ) {
            self.write_row(*t, *x1, *x2, *v1, *v2)?;
        }
        Ok(())
    }
}

/// Writes one trajectory to a file.
pub fn write_trajectory_file(path: &Path, trajectory: &Trajectory) -> io::Result<()> {
    let mut writer = TrajectoryWriter::new(BufWriter::new(File::create(path)?))?;
    writer.write_trajectory(trajectory)
}

/// Writes the batch summary table: one row per simulated record with its
/// wind climate and displacement statistics.
pub fn write_summary_file(path: &Path, rows: &[ResponseStats]) -> io::Result<()> {
    let mut sink = BufWriter::new(File::create(path)?);
    writeln!(
        sink,
        "U_mean\tTI\tx1_rel_mean\tx1_rel_std\tx2_mean\tx2_std"
    )?;
    for row in rows {
        writeln!(
            sink,
            "{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
            row.mean_wind_speed,
            row.turbulence_intensity,
            row.blade_relative.mean,
            row.blade_relative.std_dev,
            row.tower.mean,
            row.tower.std_dev,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_tab_delimited_with_four_decimals() {
        let trajectory = Trajectory {
            time: vec![0., 0.01],
            blade_position: vec![0., 0.123456],
            tower_position: vec![0., 0.05],
            blade_velocity: vec![0., 1.5],
            tower_velocity: vec![0., -0.25],
        };

        let mut buffer = vec![];
        let mut writer = TrajectoryWriter::new(&mut buffer).unwrap();
        writer.write_trajectory(&trajectory).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "t\tx1\tx2\tx1_dot\tx2_dot");
        assert_eq!(lines[1], "0.0000\t0.0000\t0.0000\t0.0000\t0.0000");
        assert_eq!(lines[2], "0.0100\t0.1235\t0.0500\t1.5000\t-0.2500");
    }
}
