use std::{env, fs, path::PathBuf, process};

use turbie::{
    dynamics::ForcingContext,
    inputs,
    model::TurbineModel,
    output_writer,
    solver::{simulate_from_rest, SolverParameters},
    stats::{response_stats, ResponseStats},
    wind::WindSignal,
};

const TRANSIENT_SKIP: f64 = 60.;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("usage: turbie-response <parameter-file> <ct-table> <wind-file-or-dir> [output-dir]");
        process::exit(1);
    }
    let parameter_path = PathBuf::from(&args[0]);
    let ct_path = PathBuf::from(&args[1]);
    let wind_path = PathBuf::from(&args[2]);
    let out_dir = PathBuf::from(args.get(3).map(String::as_str).unwrap_or("output"));

    let params = inputs::read_parameters(&parameter_path).unwrap_or_else(|e| fail(&e));
    let model = TurbineModel::new(&params).unwrap_or_else(|e| fail(&e));
    let ct_curve = inputs::load_ct_curve(&ct_path).unwrap_or_else(|e| fail(&e));

    let wind_files = collect_wind_files(&wind_path);
    if wind_files.is_empty() {
        eprintln!("no wind files found at {}", wind_path.display());
        process::exit(1);
    }
    fs::create_dir_all(&out_dir).unwrap_or_else(|e| fail(&e));

    // Per-record failures are reported and skipped; the batch keeps going.
    let mut summary: Vec<ResponseStats> = vec![];
    for wind_file in &wind_files {
        match run_record(&model, &ct_curve, wind_file, &out_dir) {
            Ok(stats) => {
                println!(
                    "{}: U = {:.2} m/s, TI = {:.3}, x1_rel std = {:.4} m",
                    wind_file.display(),
                    stats.mean_wind_speed,
                    stats.turbulence_intensity,
                    stats.blade_relative.std_dev,
                );
                summary.push(stats);
            }
            Err(e) => eprintln!("{}: {e}", wind_file.display()),
        }
    }

    let summary_path = out_dir.join("summary.txt");
    output_writer::write_summary_file(&summary_path, &summary).unwrap_or_else(|e| fail(&e));
    println!(
        "{} of {} records simulated, summary in {}",
        summary.len(),
        wind_files.len(),
        summary_path.display(),
    );
}

fn run_record(
    model: &TurbineModel,
    ct_curve: &turbie::aero::CtCurve,
    wind_file: &PathBuf,
    out_dir: &PathBuf,
) -> Result<ResponseStats, Box<dyn std::error::Error>> {
    let record = inputs::read_wind_record(wind_file, 0.)?;
    let wind = WindSignal::new(&record)?;
    let ct = ct_curve.ct(record.mean_speed())?;
    let context = ForcingContext {
        model,
        wind: &wind,
        ct,
    };

    let parameters = SolverParameters::new(record.start_time(), record.end_time());
    let trajectory = simulate_from_rest(&context, &parameters)?;

    let stem = wind_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "record".into());
    output_writer::write_trajectory_file(&out_dir.join(format!("resp_{stem}.txt")), &trajectory)?;

    Ok(response_stats(&record, &trajectory, TRANSIENT_SKIP))
}

fn collect_wind_files(path: &PathBuf) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.clone()];
    }
    let Ok(entries) = fs::read_dir(path) else {
        return vec![];
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().map(|x| x == "txt").unwrap_or(false))
        .collect();
    files.sort();
    files
}

fn fail(error: &dyn std::fmt::Display) -> ! {
    eprintln!("{error}");
    process::exit(1);
}
