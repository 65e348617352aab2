// tests/trial_parser_test.rs
//
// Round-trip check of the trial-file format against the parser, driven
// through real files in a scratch directory.

use std::fs;
use std::path::PathBuf;

use diffexp::data_input::trial_data::{Status, Trial};
use diffexp::data_input::trial_parser::{iterate_trial_folder, parse_trial_file};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("diffexp_parser_{}_{}", tag, std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn render_trial_file(trial: &Trial) -> String {
    let mut out = String::new();
    out.push_str(&format!("filename,{}\n", trial.filename));
    out.push_str(&format!("angle,{}\n", trial.angle));
    out.push_str(&format!("noise,{}\n", trial.noise));
    out.push_str(&format!("step,{}\n", trial.step));
    out.push_str(&format!(
        "status,{}\n",
        match trial.status {
            Status::Healthy => "S",
            Status::Affected => "E",
        }
    ));
    out.push_str(&format!("saccades,{}\n", trial.saccades_count));
    out.push_str(&format!("threshold,{}\n", trial.threshold));
    out.push_str("time,position,velocity,clean_position\n");
    for i in 0..trial.samples() {
        out.push_str(&format!(
            "{},{},{},{}\n",
            trial.time[i], trial.position[i], trial.true_velocity[i], trial.clean_position[i]
        ));
    }
    out
}

fn sample_trial(name: &str, angle: u32, status: Status) -> Trial {
    let n = 50;
    let step = 0.001;
    let time = ndarray::Array1::from_iter((0..n).map(|i| i as f64 * step));
    let position = time.mapv(|t| 12.0 * t * t);
    let velocity = time.mapv(|t| 24.0 * t);
    let clean = position.clone();
    Trial::new(
        name.to_string(),
        angle,
        0.25,
        step,
        status,
        4,
        35.5,
        time,
        position,
        velocity,
        clean,
    )
    .unwrap()
}

#[test]
fn test_written_trial_parses_back_identically() {
    let dir = scratch_dir("roundtrip");
    let trial = sample_trial("roundtrip_30_0.25_E", 30, Status::Affected);
    let path = dir.join("trial.csv");
    fs::write(&path, render_trial_file(&trial)).unwrap();

    let parsed = parse_trial_file(&path).unwrap();
    assert_eq!(parsed.filename, trial.filename);
    assert_eq!(parsed.angle, trial.angle);
    assert_eq!(parsed.noise, trial.noise);
    assert_eq!(parsed.step, trial.step);
    assert_eq!(parsed.status, trial.status);
    assert_eq!(parsed.saccades_count, trial.saccades_count);
    assert_eq!(parsed.threshold, trial.threshold);
    assert_eq!(parsed.samples(), trial.samples());
    for i in 0..trial.samples() {
        assert!((parsed.position[i] - trial.position[i]).abs() < 1e-12);
        assert!((parsed.true_velocity[i] - trial.true_velocity[i]).abs() < 1e-12);
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_folder_iteration_is_sorted_and_filtered() {
    let dir = scratch_dir("folder");
    let second = sample_trial("b_trial", 60, Status::Healthy);
    let first = sample_trial("a_trial", 20, Status::Affected);
    fs::write(dir.join("b.csv"), render_trial_file(&second)).unwrap();
    fs::write(dir.join("a.csv"), render_trial_file(&first)).unwrap();
    fs::write(dir.join("notes.txt"), "not a trial").unwrap();

    let trials = iterate_trial_folder(&dir).unwrap();
    assert_eq!(trials.len(), 2);
    assert_eq!(trials[0].filename, "a_trial");
    assert_eq!(trials[1].filename, "b_trial");

    fs::remove_dir_all(&dir).unwrap();
}
