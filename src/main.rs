// src/main.rs

use std::env;
use std::error::Error;
use std::path::Path;

use diffexp::constants::{DOWNSAMPLE_FACTOR, STIMULUS_ANGLES};
use diffexp::data_analysis::metrics::{
    detected_saccade_rows, exact_saccade_stats, mse_rows, peak_velocity_rows, timing_rows, Metric,
    MetricRow,
};
use diffexp::data_input::trial_data::{Status, Trial};
use diffexp::data_input::trial_parser::{iterate_trial_folder, parse_trial_file};
use diffexp::export::{write_exact_saccades, write_metric_table};
use diffexp::plot_functions::plot_method_comparison::plot_method_comparison;

fn print_usage(program: &str) {
    eprintln!("DiffExp {} - Differentiation Methods Selection Experiment", diffexp::crate_version());
    eprintln!();
    eprintln!("Usage: {program} <command> <path> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  --extract-mse <data_dir>          Extract the MSE table (mse.csv)");
    eprintln!("  --extract-biomarkers <data_dir>   Extract peak velocity, latency and duration tables");
    eprintln!("  --detected-saccades <data_dir>    Extract detection-count errors and print tallies");
    eprintln!("  --exact-saccades <data_dir>       Extract reference saccade statistics");
    eprintln!("  --describe <data_dir>             Show the trial distribution per status and angle");
    eprintln!("  --plot-methods <trial.csv> [baseline] [candidate]");
    eprintln!("                                    Render a method-comparison figure (default cd3 vs sl7)");
}

/// Loads every trial under `data_dir` and applies the fixed extraction
/// decimation.
fn downsampled_trials(data_dir: &Path) -> Result<Vec<Trial>, Box<dyn Error>> {
    let mut trials = Vec::new();
    for trial in iterate_trial_folder(data_dir)? {
        trials.push(trial.downsampled(DOWNSAMPLE_FACTOR)?);
    }
    println!("Loaded {} trials from '{}'", trials.len(), data_dir.display());
    Ok(trials)
}

fn extract_mse(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut rows = Vec::new();
    for trial in downsampled_trials(data_dir)? {
        println!("Extracting MSE from \"{}\"", trial.filename);
        rows.extend(mse_rows(&trial)?);
    }
    write_metric_table(&data_dir.join("mse.csv"), Metric::Mse, &rows)?;
    Ok(())
}

fn extract_biomarkers(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut peak_rows: Vec<MetricRow> = Vec::new();
    let mut time_rows: Vec<MetricRow> = Vec::new();
    for trial in downsampled_trials(data_dir)? {
        println!("Extracting biomarkers from \"{}\"", trial.filename);
        peak_rows.extend(peak_velocity_rows(&trial)?);
        time_rows.extend(timing_rows(&trial)?);
    }
    write_metric_table(&data_dir.join("peak_velocities.csv"), Metric::PeakVelocity, &peak_rows)?;
    write_metric_table(&data_dir.join("latencies.csv"), Metric::Latency, &time_rows)?;
    write_metric_table(&data_dir.join("durations.csv"), Metric::Duration, &time_rows)?;
    Ok(())
}

fn detected_saccades_analysis(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut rows: Vec<MetricRow> = Vec::new();
    for trial in downsampled_trials(data_dir)? {
        println!("Counting detections in \"{}\"", trial.filename);
        rows.extend(detected_saccade_rows(&trial)?);
    }
    write_metric_table(&data_dir.join("detected_saccades.csv"), Metric::DetectedSaccades, &rows)?;

    // Per-method tallies of missed and spurious detections.
    let mut stats: Vec<(&'static str, i64, i64)> = Vec::new();
    for row in &rows {
        let idx = match stats.iter().position(|(name, _, _)| *name == row.method) {
            Some(idx) => idx,
            None => {
                stats.push((row.method, 0, 0));
                stats.len() - 1
            }
        };
        if row.value < 0.0 {
            stats[idx].1 += row.value as i64;
        } else if row.value > 0.0 {
            stats[idx].2 += row.value as i64;
        }
    }
    stats.sort_by_key(|(_, unidentified, overidentified)| unidentified.abs() + overidentified);

    println!("\nMissidentified saccades per method:");
    println!("{:>8} {:>14} {:>15}", "Method", "Unidentified", "Overidentified");
    for (method, unidentified, overidentified) in &stats {
        println!("{method:>8} {unidentified:>14} {overidentified:>15}");
    }
    Ok(())
}

fn exact_saccades(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut rows = Vec::new();
    for trial in downsampled_trials(data_dir)? {
        rows.extend(exact_saccade_stats(&trial));
    }
    write_exact_saccades(&data_dir.join("exact_saccades.csv"), &rows)?;
    println!("Job completed");
    Ok(())
}

fn describe_data(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let trials = iterate_trial_folder(data_dir)?;

    let mut counts = [[0usize; STIMULUS_ANGLES.len()]; 2];
    let mut saccades_total = 0usize;
    for trial in &trials {
        let row = trial.status.as_value() as usize;
        if let Some(col) = STIMULUS_ANGLES.iter().position(|&a| a == trial.angle) {
            counts[row][col] += 1;
        }
        saccades_total += trial.saccades_count;
    }

    println!("\nRecords distribution:");
    println!("{:>10} {:>6} {:>6} {:>6} {:>7}", "Class", "20", "30", "60", "Total");
    for (status, label) in [(Status::Healthy, "Healthy"), (Status::Affected, "Affected")] {
        let row = &counts[status.as_value() as usize];
        let total: usize = row.iter().sum();
        println!("{label:>10} {:>6} {:>6} {:>6} {total:>7}", row[0], row[1], row[2]);
    }
    let angle_totals: Vec<usize> = (0..STIMULUS_ANGLES.len())
        .map(|col| counts[0][col] + counts[1][col])
        .collect();
    let total: usize = angle_totals.iter().sum();
    println!(
        "{:>10} {:>6} {:>6} {:>6} {total:>7}",
        "Total", angle_totals[0], angle_totals[1], angle_totals[2]
    );
    println!("\nSaccades Count: {saccades_total}");
    Ok(())
}

fn plot_methods(trial_file: &Path, baseline: &str, candidate: &str) -> Result<(), Box<dyn Error>> {
    let trial = parse_trial_file(trial_file)?.downsampled(DOWNSAMPLE_FACTOR)?;
    let root_name = trial_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trial".to_string());
    plot_method_comparison(&trial, baseline, candidate, &root_name)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        print_usage(args.first().map(String::as_str).unwrap_or("diffexp"));
        std::process::exit(1);
    }

    let command = args[1].as_str();
    let path = Path::new(&args[2]);
    match command {
        "--extract-mse" => extract_mse(path),
        "--extract-biomarkers" => extract_biomarkers(path),
        "--detected-saccades" => detected_saccades_analysis(path),
        "--exact-saccades" => exact_saccades(path),
        "--describe" => describe_data(path),
        "--plot-methods" => {
            let baseline = args.get(3).map(String::as_str).unwrap_or("cd3");
            let candidate = args.get(4).map(String::as_str).unwrap_or("sl7");
            plot_methods(path, baseline, candidate)
        }
        _ => {
            eprintln!("Unknown command: '{command}'\n");
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}
