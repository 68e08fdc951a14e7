//! Tests for CLI instrument module.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::tempdir;

use crate::instrument::*;

fn fake_zone(root: &Path, id: &str, name: &str, max: &str, energy: &str) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("name"), format!("{name}\n")).unwrap();
    if !max.is_empty() {
        fs::write(dir.join("max_energy_range_uj"), format!("{max}\n")).unwrap();
    }
    fs::write(dir.join("energy_uj"), format!("{energy}\n")).unwrap();
}

// =========================================================================
// Counters
// =========================================================================

#[test]
fn test_energy_delta_without_wrap() {
    assert_eq!(energy_delta(1_000, 4_500, 10_000), 3_500);
    assert_eq!(energy_delta(42, 42, 10_000), 0);
}

#[test]
fn test_energy_delta_with_wrap() {
    // 900 -> max 1000 -> 0 -> 100
    assert_eq!(energy_delta(900, 100, 1_000), 200);
}

#[test]
fn test_parse_statm() {
    assert_eq!(parse_statm("6161 1289 1024 1 0 354 0\n"), Some(6161));
    assert_eq!(parse_statm(""), None);
    assert_eq!(parse_statm("abc"), None);
}

#[test]
fn test_memory_bytes_is_page_aligned() {
    let bytes = memory_bytes();

    assert_eq!(bytes % 512, 0);
}

// =========================================================================
// Discovery
// =========================================================================

#[test]
fn test_discover_rapl_zones() {
    // Arrange
    let root = tempdir().unwrap();
    fake_zone(root.path(), "intel-rapl:1", "dram", "65532610987", "10");
    fake_zone(root.path(), "intel-rapl:0", "package-0", "262143328850", "20");
    fake_zone(root.path(), "intel-rapl:2", "psys", "", "30");
    fake_zone(root.path(), "dtpm", "dtpm", "100", "0");

    // Act
    let domains = discover_rapl(root.path());

    // Assert
    let names: Vec<&str> = domains.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["package-0", "dram"]);
    assert_eq!(domains[0].id, "intel-rapl:0");
    assert_eq!(domains[0].max_energy_range_uj, 262_143_328_850);
    assert_eq!(domains[1].energy_uj(), Some(10));
}

#[test]
fn test_discover_rapl_without_powercap() {
    let domains = discover_rapl(Path::new("/nonexistent/powercap"));

    assert!(domains.is_empty());
}

#[test]
fn test_header_lists_energy_domains() {
    let root = tempdir().unwrap();
    fake_zone(root.path(), "intel-rapl:0", "package-0", "1000", "0");
    fake_zone(root.path(), "intel-rapl:0:0", "core", "1000", "0");

    let instruments = Instruments::with_domains(discover_rapl(root.path()));

    assert_eq!(
        instruments.header(),
        "time,memory,energy_package-0,energy_core"
    );
    assert_eq!(Instruments::with_domains(Vec::new()).header(), "time,memory");
}

// =========================================================================
// Recording
// =========================================================================

#[test]
fn test_recording_accumulates_energy() {
    // Arrange
    let root = tempdir().unwrap();
    fake_zone(root.path(), "intel-rapl:0", "package-0", "10000000", "1000000");
    let instruments = Instruments::with_domains(discover_rapl(root.path()));

    // Act
    let recording = instruments.start();
    fs::write(root.path().join("intel-rapl:0/energy_uj"), "3500000\n").unwrap();
    let measurement = recording.stop();

    // Assert
    assert_eq!(measurement.energy_joules.len(), 1);
    assert!((measurement.energy_joules[0] - 2.5).abs() < 1e-9);
    assert!(measurement.seconds >= 0.0);
}

#[test]
fn test_sampler_catches_wraps() {
    // Arrange
    let root = tempdir().unwrap();
    let energy = root.path().join("intel-rapl:0/energy_uj");
    fake_zone(root.path(), "intel-rapl:0", "package-0", "1000", "900");
    let instruments = Instruments::with_domains(discover_rapl(root.path()));

    // Act - one sample sees 950, then the counter wraps to 100
    let recording = instruments.start_with_interval(Duration::from_millis(20));
    fs::write(&energy, "950\n").unwrap();
    std::thread::sleep(Duration::from_millis(200));
    fs::write(&energy, "100\n").unwrap();
    let measurement = recording.stop();

    // Assert - 50 uJ before the wrap, 150 uJ after
    assert!((measurement.energy_joules[0] - 200.0 / 1_000_000.0).abs() < 1e-12);
}

#[test]
fn test_recording_without_domains() {
    let instruments = Instruments::with_domains(Vec::new());

    let measurement = instruments.start().stop();

    assert!(measurement.energy_joules.is_empty());
    assert_eq!(measurement.csv_fields().split(',').count(), 2);
}

#[test]
fn test_measurement_csv_fields() {
    let measurement = Measurement {
        seconds: 1.5,
        memory_bytes: 4096,
        energy_joules: vec![12.25, 0.5],
    };

    assert_eq!(measurement.csv_fields(), "1.500000,4096,12.250000,0.500000");
}
