// src/data_input/trial_parser.rs

use csv::ReaderBuilder;
use ndarray::Array1;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::data_input::trial_data::{Status, Trial};

/// Parses one trial file.
///
/// The format carries the scalar trial attributes as leading `key,value`
/// metadata lines, followed by a `time,position,velocity,clean_position`
/// CSV table holding the four sample sequences:
///
/// ```text
/// filename,RegScSimul20_1000_0.1_S
/// angle,20
/// noise,0.1
/// step,0.001
/// status,S
/// saccades,5
/// threshold,30
/// time,position,velocity,clean_position
/// 0.000,0.0,0.0,0.0
/// ...
/// ```
///
/// Rows that fail to parse are skipped with a warning; missing metadata
/// aborts the parse.
pub fn parse_trial_file(input_file_path: &Path) -> Result<Trial, Box<dyn Error>> {
    let file = File::open(input_file_path)?;
    let fallback_name = input_file_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_trial_reader(BufReader::new(file), &fallback_name)
}

fn parse_trial_reader<R: BufRead>(reader: R, fallback_name: &str) -> Result<Trial, Box<dyn Error>> {
    // --- Metadata Extraction ---
    let mut metadata: Vec<(String, String)> = Vec::new();
    let mut csv_lines: Vec<String> = Vec::new();
    let mut found_csv_headers = false;

    // First pass: split the file into metadata lines and CSV lines.
    for line_result in reader.lines() {
        let line = line_result?;
        let trimmed_line = line.trim();

        if trimmed_line.is_empty() {
            continue;
        }

        if !found_csv_headers
            && trimmed_line.contains("time")
            && trimmed_line.contains("position")
        {
            found_csv_headers = true;
            csv_lines.push(line);
            continue;
        }

        if found_csv_headers {
            csv_lines.push(line);
        } else if let Some((key, value)) = trimmed_line.split_once(',') {
            let key = key.trim().trim_matches('"').to_string();
            let value = value.trim().trim_matches('"').to_string();
            if !key.is_empty() {
                metadata.push((key, value));
            }
        }
    }

    if !found_csv_headers {
        return Err("Could not find the sample-table header in the trial file".into());
    }

    let filename = lookup(&metadata, "filename")
        .map(|v| v.to_string())
        .unwrap_or_else(|| fallback_name.to_string());
    let angle: u32 = required(&metadata, "angle")?.parse()?;
    let noise: f64 = required(&metadata, "noise")?.parse()?;
    let step: f64 = required(&metadata, "step")?.parse()?;
    let status_code = required(&metadata, "status")?;
    let status = Status::from_code(status_code)
        .ok_or_else(|| format!("Unknown status code '{}'", status_code))?;
    let saccades_count: usize = required(&metadata, "saccades")?.parse()?;
    let threshold: f64 = required(&metadata, "threshold")?.parse()?;

    // --- Sample Reading and Storage ---
    let csv_content = csv_lines.join("\n");
    let mut time = Vec::new();
    let mut position = Vec::new();
    let mut true_velocity = Vec::new();
    let mut clean_position = Vec::new();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    for (row_index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let parse_field = |idx: usize| -> Option<f64> {
                    record.get(idx).and_then(|v| v.parse::<f64>().ok())
                };
                match (parse_field(0), parse_field(1), parse_field(2), parse_field(3)) {
                    (Some(t), Some(y), Some(v), Some(y0)) => {
                        time.push(t);
                        position.push(y);
                        true_velocity.push(v);
                        clean_position.push(y0);
                    }
                    _ => {
                        eprintln!(
                            "Warning: Skipping row {} of '{}' due to missing or invalid sample values",
                            row_index + 1,
                            filename
                        );
                    }
                }
            }
            Err(e) => {
                eprintln!(
                    "Warning: Skipping row {} of '{}' due to CSV read error: {}",
                    row_index + 1,
                    filename,
                    e
                );
            }
        }
    }

    let trial = Trial::new(
        filename,
        angle,
        noise,
        step,
        status,
        saccades_count,
        threshold,
        Array1::from(time),
        Array1::from(position),
        Array1::from(true_velocity),
        Array1::from(clean_position),
    )?;
    Ok(trial)
}

fn lookup<'m>(metadata: &'m [(String, String)], key: &str) -> Option<&'m str> {
    metadata
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn required<'m>(metadata: &'m [(String, String)], key: &str) -> Result<&'m str, Box<dyn Error>> {
    lookup(metadata, key)
        .ok_or_else(|| format!("Missing required metadata entry '{}'", key).into())
}

/// Parses every `.csv` trial file directly under `path`, in sorted order.
pub fn iterate_trial_folder(path: &Path) -> Result<Vec<Trial>, Box<dyn Error>> {
    let mut files: Vec<_> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map(|ext| ext == "csv").unwrap_or(false))
        .collect();
    files.sort();

    let mut trials = Vec::with_capacity(files.len());
    for file in &files {
        println!("Processing \"{}\"", file.display());
        trials.push(parse_trial_file(file)?);
    }
    Ok(trials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Cursor;

    const SAMPLE: &str = "\
filename,RegScSimul20_1000_0.1_S
angle,20
noise,0.1
step,0.001
status,S
saccades,5
threshold,30
time,position,velocity,clean_position
0.000,0.0,0.0,0.0
0.001,0.5,500.0,0.45
0.002,1.0,480.0,0.95
0.003,1.4,20.0,1.40
";

    #[test]
    fn test_parses_metadata_and_samples() {
        let trial = parse_trial_reader(Cursor::new(SAMPLE), "fallback").unwrap();
        assert_eq!(trial.filename, "RegScSimul20_1000_0.1_S");
        assert_eq!(trial.angle, 20);
        assert_abs_diff_eq!(trial.noise, 0.1, epsilon = 0.0);
        assert_abs_diff_eq!(trial.step, 0.001, epsilon = 0.0);
        assert_eq!(trial.status, Status::Healthy);
        assert_eq!(trial.saccades_count, 5);
        assert_abs_diff_eq!(trial.threshold, 30.0, epsilon = 0.0);
        assert_eq!(trial.samples(), 4);
        assert_abs_diff_eq!(trial.position[1], 0.5, epsilon = 0.0);
        assert_abs_diff_eq!(trial.true_velocity[2], 480.0, epsilon = 0.0);
        assert_abs_diff_eq!(trial.clean_position[3], 1.4, epsilon = 0.0);
    }

    #[test]
    fn test_filename_falls_back_to_the_file_stem() {
        let without_name: String = SAMPLE
            .lines()
            .filter(|l| !l.starts_with("filename"))
            .collect::<Vec<_>>()
            .join("\n");
        let trial = parse_trial_reader(Cursor::new(without_name), "stem_name").unwrap();
        assert_eq!(trial.filename, "stem_name");
    }

    #[test]
    fn test_missing_metadata_is_an_error() {
        let broken: String = SAMPLE
            .lines()
            .filter(|l| !l.starts_with("threshold"))
            .collect::<Vec<_>>()
            .join("\n");
        let err = parse_trial_reader(Cursor::new(broken), "x").unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let err = parse_trial_reader(Cursor::new("angle,20\nnoise,0.1\n"), "x").unwrap_err();
        assert!(err.to_string().contains("header"));
    }

    #[test]
    fn test_bad_sample_rows_are_skipped() {
        let with_bad_row = SAMPLE.replace("0.002,1.0,480.0,0.95", "0.002,oops,480.0,0.95");
        let trial = parse_trial_reader(Cursor::new(with_bad_row), "x").unwrap();
        assert_eq!(trial.samples(), 3);
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let broken = SAMPLE.replace("status,S", "status,Q");
        let err = parse_trial_reader(Cursor::new(broken), "x").unwrap_err();
        assert!(err.to_string().contains("status code"));
    }
}
