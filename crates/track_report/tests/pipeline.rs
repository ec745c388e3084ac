//! End-to-end run on a generated tracker file.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use track_core::input::TrackFileFormat;
use track_core::AnalysisConfig;
use track_report::{render_from_samples, run_analysis, RunSummary, SUMMARY_FILE};

/// Two players moving diagonally in opposite directions, player 5 absent
/// from every third frame.
fn write_tracks(path: &Path, frames: u64) {
    let mut csv = String::from("frame,x1,y1,x2,y2,track_id\n");
    for f in 0..frames {
        let t = f as f64 * 8.0;
        writeln!(csv, "{f},{},{},{},{},2", 40.0 + t, 30.0 + t, 60.0 + t, 70.0 + t).unwrap();
        if f % 3 != 2 {
            writeln!(csv, "{f},{},{},{},{},5", 900.0 - t, 600.0 - t, 920.0 - t, 640.0 - t)
                .unwrap();
        }
    }
    fs::write(path, csv).unwrap();
}

fn small_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.heatmap.pixels_per_meter = 3;
    config
}

#[test]
fn test_analyze_writes_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let tracks = dir.path().join("tracks.csv");
    write_tracks(&tracks, 30);
    let out = dir.path().join("out");

    let summary = run_analysis(&small_config(), &tracks, TrackFileFormat::Xyxy, &out).unwrap();

    assert_eq!(summary.frames_processed, 30);
    assert_eq!(summary.identities, vec![2, 5]);
    assert_eq!(summary.samples, 30 + 20);
    assert_eq!(summary.malformed_boxes, 0);

    let metrics = fs::read_to_string(out.join("player_tracking_data.csv")).unwrap();
    let mut lines = metrics.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Player ID,Total Distance (m),Average Speed (m/s),Average Acceleration (m/s²),Positional Points"
    );
    assert!(lines.next().unwrap().starts_with("2,"));
    assert!(lines.next().unwrap().starts_with("5,"));
    assert!(lines.next().is_none());

    let samples = fs::read_to_string(out.join("heatmap_tracking_data.csv")).unwrap();
    assert_eq!(samples.lines().count(), 1 + 50);

    for name in ["team_heatmap.png", "player_2_heatmap.png", "player_5_heatmap.png"] {
        let png = fs::read(out.join(name)).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n", "{name} is not a PNG");
    }
    assert_eq!(summary.heatmaps.written.len(), 3);
    assert!(summary.heatmaps.skipped.is_empty());

    let json = fs::read_to_string(out.join(SUMMARY_FILE)).unwrap();
    let saved: RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(saved.identities, summary.identities);
}

#[test]
fn test_metrics_export_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let tracks = dir.path().join("tracks.csv");
    write_tracks(&tracks, 12);

    let first = dir.path().join("a");
    let second = dir.path().join("b");
    run_analysis(&small_config(), &tracks, TrackFileFormat::Xyxy, &first).unwrap();
    run_analysis(&small_config(), &tracks, TrackFileFormat::Xyxy, &second).unwrap();

    assert_eq!(
        fs::read(first.join("player_tracking_data.csv")).unwrap(),
        fs::read(second.join("player_tracking_data.csv")).unwrap()
    );
}

#[test]
fn test_identity_filter_draws_single_heatmap() {
    let dir = tempfile::tempdir().unwrap();
    let tracks = dir.path().join("tracks.csv");
    write_tracks(&tracks, 9);
    let out = dir.path().join("out");

    let mut config = small_config();
    config.heatmap.identity_filter = Some(5);
    let summary = run_analysis(&config, &tracks, TrackFileFormat::Xyxy, &out).unwrap();

    assert_eq!(summary.heatmaps.written, vec![out.join("player_5_heatmap.png")]);
    assert!(!out.join("team_heatmap.png").exists());
}

#[test]
fn test_heatmaps_rebuilt_from_samples() {
    let dir = tempfile::tempdir().unwrap();
    let tracks = dir.path().join("tracks.csv");
    write_tracks(&tracks, 10);
    let out = dir.path().join("run");
    run_analysis(&small_config(), &tracks, TrackFileFormat::Xyxy, &out).unwrap();

    let redraw = dir.path().join("redraw");
    let mut config = small_config();
    config.heatmap.per_player = false;
    let heatmaps =
        render_from_samples(&config, &out.join("heatmap_tracking_data.csv"), &redraw).unwrap();

    assert_eq!(heatmaps.written, vec![redraw.join("team_heatmap.png")]);
    assert!(redraw.join("team_heatmap.png").exists());
}

#[test]
fn test_unknown_player_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let tracks = dir.path().join("tracks.csv");
    write_tracks(&tracks, 6);
    let out = dir.path().join("out");

    let mut config = small_config();
    config.heatmap.identity_filter = Some(99);
    let summary = run_analysis(&config, &tracks, TrackFileFormat::Xyxy, &out).unwrap();

    assert!(summary.heatmaps.written.is_empty());
    assert_eq!(summary.heatmaps.skipped.len(), 1);
    assert!(summary.heatmaps.skipped[0].reason.contains("99"));
    assert!(out.join("player_tracking_data.csv").exists());
}
