use approx::assert_relative_eq;
use hifitime::Epoch;

use vortrack::{
    CandidateHistory, ChooseCenter, ChooseCenterParams, RadarSite, Severity, VolumeCandidates,
};

mod common;

fn site() -> RadarSite {
    RadarSite::new(30.5, -88.3)
}

#[test]
fn test_short_history_uses_last_scored_mean() {
    let t0 = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
    let history = common::storm_history(3, 6.0, t0);
    let params = ChooseCenterParams::builder(
        Epoch::from_gregorian_utc(2005, 8, 28, 11, 0, 0, 0),
        Epoch::from_gregorian_utc(2005, 8, 28, 14, 0, 0, 0),
    )
    .build()
    .unwrap();

    let outcome = ChooseCenter::new(&history, &params, site())
        .find_center()
        .unwrap();

    assert!(outcome.used_fallback);
    assert_eq!(outcome.diagnostics[0].severity, Severity::Warning);

    // The record carries the latest volume's scored aggregates, perturbation
    // included, with no fit to measure an RMW uncertainty against.
    let (x_obs, y_obs) = common::observed_center(2, 6.0);
    let (lat, lon) = site().offset_to_lat_lon(x_obs, y_obs);
    for level in 0..common::HEIGHTS_KM.len() {
        let entry = outcome.record.level(level).unwrap();
        assert_relative_eq!(entry.latitude_deg.unwrap(), lat);
        assert_relative_eq!(entry.longitude_deg.unwrap(), lon);
        assert_relative_eq!(entry.max_wind.unwrap(), common::observed_wind(2));
        assert_relative_eq!(entry.rmw_km.unwrap(), common::RMW_KM);
        assert_eq!(entry.rmw_uncertainty_km, None);
        assert_eq!(entry.center_std_km, Some(5.0));
        assert_eq!(entry.converging_centers, Some(20));
    }
    assert!(outcome.record.best_level.is_some());
}

#[test]
fn test_latest_volume_outside_window_uses_last_scored_mean() {
    // Eight volumes would support a fit, but the window closes before the
    // newest scan, so the pass degrades to that scan's aggregates.
    let t0 = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
    let history = common::storm_history(8, 6.0, t0);
    let params = ChooseCenterParams::builder(
        Epoch::from_gregorian_utc(2005, 8, 28, 11, 0, 0, 0),
        Epoch::from_gregorian_utc(2005, 8, 28, 12, 30, 0, 0),
    )
    .build()
    .unwrap();

    let outcome = ChooseCenter::new(&history, &params, site())
        .find_center()
        .unwrap();

    assert!(outcome.used_fallback);
    assert!(outcome.diagnostics[0].message.contains("outside"));

    let (x_obs, y_obs) = common::observed_center(7, 6.0);
    let (lat, _) = site().offset_to_lat_lon(x_obs, y_obs);
    let entry = outcome.record.level(0).unwrap();
    assert_relative_eq!(entry.latitude_deg.unwrap(), lat);
    assert_eq!(entry.rmw_uncertainty_km, None);
}

#[test]
fn test_negative_scores_still_populate_fallback_record() {
    // Count-dominant weights and a low converging count make every
    // composite score negative. The fallback record must still resolve the
    // level from the best of those scores rather than dropping it.
    let t0 = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
    let mut volume = VolumeCandidates::new(
        t0,
        vec![2.0],
        vec![10.0, 20.0, 30.0, 40.0, 50.0],
        2,
        25,
    );
    for (r, w) in [10.0, 20.0, 35.0, 20.0, 10.0].iter().enumerate() {
        volume.set_mean_center(0, r, 4.0, -2.0);
        volume.set_mean_wind(0, r, *w);
        volume.set_center_std(0, r, 5.0);
        volume.set_converging_centers(0, r, 2);
    }
    let mut history = CandidateHistory::new();
    history.push(volume);

    let params = ChooseCenterParams::builder(
        Epoch::from_gregorian_utc(2005, 8, 28, 11, 0, 0, 0),
        Epoch::from_gregorian_utc(2005, 8, 28, 14, 0, 0, 0),
    )
    .score_weights(0.05, 0.05, 0.9)
    .build()
    .unwrap();

    let outcome = ChooseCenter::new(&history, &params, site())
        .find_center()
        .unwrap();

    assert!(outcome.used_fallback);
    let entry = outcome.record.level(0).unwrap();
    assert!(entry.latitude_deg.is_some());
    assert_relative_eq!(entry.rmw_km.unwrap(), 30.0);
    assert_relative_eq!(entry.max_wind.unwrap(), 35.0);
}

#[test]
fn test_sparse_heights_use_last_scored_mean() {
    // Enough volumes for the window check, but no height is seen four
    // times, so every bucket is pruned before fitting.
    let t0 = Epoch::from_gregorian_utc(2005, 8, 28, 12, 0, 0, 0);
    let history = common::storm_history(3, 6.0, t0);
    let params = ChooseCenterParams::builder(
        Epoch::from_gregorian_utc(2005, 8, 28, 11, 0, 0, 0),
        Epoch::from_gregorian_utc(2005, 8, 28, 14, 0, 0, 0),
    )
    .min_volumes(3)
    .build()
    .unwrap();

    let outcome = ChooseCenter::new(&history, &params, site())
        .find_center()
        .unwrap();

    assert!(outcome.used_fallback);
    assert!(outcome.diagnostics[0]
        .message
        .contains("no height observed often enough"));
    assert!(outcome.record.level(0).unwrap().latitude_deg.is_some());
}
