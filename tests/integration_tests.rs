use survival_estimators::{
    AdditiveHazardsAdapter, AdditiveHazardsConfig, Estimator, FitOptions, Frame,
    ProportionalHazardsAdapter, ProportionalHazardsConfig, SurvivalError, TieMethod,
};
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// regime-duration style data: one-hot regime dummies (one level dropped), a
/// scaled start year, whole-year durations & right censoring
fn create_regime_data(n_samples: usize, effect: f64, seed: u64) -> (Frame, Frame) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut military = Vec::with_capacity(n_samples);
    let mut monarchy = Vec::with_capacity(n_samples);
    let mut start_year = Vec::with_capacity(n_samples);
    let mut durations = Vec::with_capacity(n_samples);
    let mut observed = Vec::with_capacity(n_samples);

    for _ in 0..n_samples {
        let regime = rng.gen_range(0..3); // 0 = civilian (dropped level)
        let mil = if regime == 1 { 1.0 } else { 0.0 };
        let mon = if regime == 2 { 1.0 } else { 0.0 };
        let year: f64 = rng.gen_range(-1.0..1.0);

        let risk = (effect * (0.3 * mil - 0.2 * mon + 0.3 * year)).exp();
        let u: f64 = 1.0 - rng.gen_range(0.0..1.0_f64); // (0, 1]
        let time = (-u.ln() * 12.0 / risk).ceil().max(1.0);
        let censor_time = rng.gen_range(5.0..60.0_f64).ceil();

        military.push(mil);
        monarchy.push(mon);
        start_year.push(year);
        if time <= censor_time {
            durations.push(time);
            observed.push(1.0);
        } else {
            durations.push(censor_time);
            observed.push(0.0);
        }
    }

    let x = Frame::from_columns(vec![
        ("regime_military", military),
        ("regime_monarchy", monarchy),
        ("start_year", start_year),
    ])
    .unwrap();
    let y = Frame::from_columns(vec![("duration", durations), ("observed", observed)]).unwrap();
    (x, y)
}

fn ph_config() -> ProportionalHazardsConfig {
    ProportionalHazardsConfig::new()
        .with_duration_column("duration")
        .with_event_column("observed")
        .with_penalizer(0.001)
}

fn fit_and_predict<E: Estimator>(
    estimator: &mut E,
    x: &Frame,
    y: &Frame,
) -> survival_estimators::Result<f64> {
    estimator.fit(x, y, &FitOptions::new())?.predict(x)
}

#[test]
fn test_proportional_hazards_end_to_end() {
    init_logging();
    let (x, y) = create_regime_data(400, 1.0, 42);

    // hold out the last row
    let train: Vec<usize> = (0..399).collect();
    let x_train = x.take_rows(&train).unwrap();
    let y_train = y.take_rows(&train).unwrap();
    let held_out = x.take_rows(&[399]).unwrap();

    let mut adapter = ProportionalHazardsAdapter::new(ph_config());
    let lifetime = adapter
        .fit(&x_train, &y_train, &FitOptions::new())
        .unwrap()
        .predict(&held_out)
        .unwrap();

    assert!(lifetime.is_finite());
    assert!(lifetime > 4.0, "expected lifetime {lifetime} too short");

    let model = adapter.fitted_model().unwrap();
    assert_eq!(model.coefficients().unwrap().len(), 3);
    assert_eq!(
        model.covariate_names().unwrap(),
        &["regime_military", "regime_monarchy", "start_year"]
    );
}

#[test]
fn test_fit_does_not_touch_covariates() {
    let (x, y) = create_regime_data(120, 1.0, 7);
    let snapshot = x.clone();

    let mut ph = ProportionalHazardsAdapter::new(ph_config());
    fit_and_predict(&mut ph, &x, &y).unwrap();
    assert_eq!(x, snapshot);

    let mut ah = AdditiveHazardsAdapter::new(
        AdditiveHazardsConfig::new()
            .with_duration_column("duration")
            .with_event_column("observed"),
    );
    fit_and_predict(&mut ah, &x, &y).unwrap();
    assert_eq!(x, snapshot);
}

#[test]
fn test_predict_before_fit_both_adapters() {
    let (x, _) = create_regime_data(10, 1.0, 1);

    let ph = ProportionalHazardsAdapter::new(ph_config());
    assert_eq!(ph.predict(&x), Err(SurvivalError::ModelNotFitted));

    let ah =
        AdditiveHazardsAdapter::new(AdditiveHazardsConfig::new().with_duration_column("duration"));
    assert_eq!(ah.predict(&x), Err(SurvivalError::ModelNotFitted));
}

#[test]
fn test_multi_row_predict_is_first_row() {
    let (x, y) = create_regime_data(150, 1.0, 11);

    let mut adapter = ProportionalHazardsAdapter::new(ph_config());
    adapter.fit(&x, &y, &FitOptions::new()).unwrap();

    let per_row = adapter.fitted_model().unwrap().predict_expectation(&x).unwrap();
    assert_eq!(per_row.len(), 150);
    assert_relative_eq!(adapter.predict(&x).unwrap(), per_row[0], epsilon = 1e-12);
}

#[test]
fn test_refit_without_reconstruction() {
    let (x, y) = create_regime_data(150, 1.0, 3);
    let (x2, y2) = create_regime_data(150, 1.0, 4);

    let mut adapter = ProportionalHazardsAdapter::new(ph_config());
    let first = fit_and_predict(&mut adapter, &x, &y).unwrap();
    let first_coefs = adapter.fitted_model().unwrap().coefficients().unwrap().to_owned();

    adapter.fit(&x2, &y2, &FitOptions::new()).unwrap();
    let second = adapter.predict(&x).unwrap();
    let second_coefs = adapter.fitted_model().unwrap().coefficients().unwrap().to_owned();

    assert!(first.is_finite() && second.is_finite());
    assert!(first_coefs
        .iter()
        .zip(second_coefs.iter())
        .any(|(a, b)| (a - b).abs() > 1e-8));
}

#[test]
fn test_concordance_tracks_signal() {
    let (x, y) = create_regime_data(300, 3.0, 99);

    let mut adapter = ProportionalHazardsAdapter::new(ph_config());
    adapter.fit(&x, &y, &FitOptions::new()).unwrap();

    let c = adapter.score(&x, &y).unwrap();
    assert!(c > 0.6, "concordance {c} too low for a strong signal");
}

#[test]
fn test_breslow_and_efron_agree_roughly() {
    let (x, y) = create_regime_data(200, 1.0, 5);

    let mut efron = ProportionalHazardsAdapter::new(ph_config());
    efron.fit(&x, &y, &FitOptions::new()).unwrap();
    let mut breslow =
        ProportionalHazardsAdapter::new(ph_config().with_tie_method(TieMethod::Breslow));
    breslow.fit(&x, &y, &FitOptions::new()).unwrap();

    let e = efron.fitted_model().unwrap().coefficients().unwrap().to_owned();
    let b = breslow.fitted_model().unwrap().coefficients().unwrap().to_owned();
    for (ce, cb) in e.iter().zip(b.iter()) {
        assert!((ce - cb).abs() < 0.5, "efron {ce} vs breslow {cb}");
    }
}

#[test]
fn test_stratified_fit() {
    let (x, y) = create_regime_data(200, 1.0, 8);

    let mut adapter = ProportionalHazardsAdapter::new(
        ph_config().with_strata(vec!["regime_military".to_string()]),
    );
    let lifetime = fit_and_predict(&mut adapter, &x, &y).unwrap();
    assert!(lifetime.is_finite() && lifetime > 0.0);

    let model = adapter.fitted_model().unwrap();
    assert_eq!(model.baseline_cumulative_hazard().unwrap().len(), 2);
    assert_eq!(model.covariate_names().unwrap(), &["regime_monarchy", "start_year"]);
}

#[test]
fn test_additive_hazards_with_id_column() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(21);

    // long format: some subjects get a second row after a covariate change
    let mut ids = Vec::new();
    let mut dose = Vec::new();
    let mut durations = Vec::new();
    let mut observed = Vec::new();
    for subject in 0..60 {
        let exit: f64 = rng.gen_range(2.0..30.0_f64).round();
        let event = if rng.gen_range(0.0..1.0_f64) < 0.7 { 1.0 } else { 0.0 };
        let base_dose: f64 = rng.gen_range(0.0..1.0);

        if subject % 3 == 0 {
            ids.push(subject as f64);
            dose.push(base_dose);
            durations.push((exit / 2.0).floor().max(1.0));
            observed.push(0.0);
        }
        ids.push(subject as f64);
        dose.push(base_dose + 0.5);
        durations.push(exit);
        observed.push(event);
    }

    let x = Frame::from_columns(vec![("id", ids), ("dose", dose)]).unwrap();
    let y = Frame::from_columns(vec![("duration", durations), ("observed", observed)]).unwrap();

    let mut adapter = AdditiveHazardsAdapter::new(
        AdditiveHazardsConfig::new()
            .with_duration_column("duration")
            .with_event_column("observed")
            .with_id_column("id"),
    );
    let lifetime = fit_and_predict(&mut adapter, &x, &y).unwrap();

    assert!(lifetime.is_finite());
    assert!(lifetime >= 0.0);
    assert_eq!(
        adapter.fitted_model().unwrap().coefficient_names().unwrap(),
        vec!["dose".to_string(), "baseline".to_string()]
    );
}

#[test]
fn test_additive_confidence_bands_bracket_estimates() {
    let (x, y) = create_regime_data(150, 1.0, 13);

    let mut adapter = AdditiveHazardsAdapter::new(
        AdditiveHazardsConfig::new()
            .with_duration_column("duration")
            .with_event_column("observed")
            .with_alpha(0.9),
    );
    adapter.fit(&x, &y, &FitOptions::new()).unwrap();

    let model = adapter.fitted_model().unwrap();
    let estimates = model.cumulative_coefficients().unwrap();
    let (lower, upper) = model.confidence_intervals().unwrap();
    for ((&b, &lo), &hi) in estimates.iter().zip(lower.iter()).zip(upper.iter()) {
        assert!(lo <= b && b <= hi);
    }
}

#[test]
fn test_from_csv_and_toml() {
    let csv = "age,treated,duration,observed\n\
               50,true,12,1\n\
               61,false,5,1\n\
               47,true,20,0\n\
               70,false,3,1\n\
               58,true,9,1\n\
               66,false,7,\n";
    let table = Frame::from_csv_reader(csv.as_bytes()).unwrap();
    let x = table.select(&["age", "treated"]).unwrap();
    let y = table.select(&["duration", "observed"]).unwrap();

    let config = ProportionalHazardsConfig::from_toml_str(
        r#"
        duration_column = "duration"
        event_column = "observed"
        penalizer = 0.5

        [extra]
        max_iterations = 100
        "#,
    )
    .unwrap();

    let mut adapter = ProportionalHazardsAdapter::new(config.clone());
    let lifetime = fit_and_predict(&mut adapter, &x, &y).unwrap();
    assert!(lifetime.is_finite() && lifetime > 0.0);
    assert_eq!(adapter.config(), &config);
}

#[test]
fn test_downstream_errors_pass_through() {
    let (x, y) = create_regime_data(50, 1.0, 17);

    let mut adapter = ProportionalHazardsAdapter::new(ph_config().with_alpha(1.5));
    let err = adapter.fit(&x, &y, &FitOptions::new()).unwrap_err();
    assert_eq!(err, SurvivalError::invalid_parameter("alpha", "1.5"));

    let mut adapter = ProportionalHazardsAdapter::new(ph_config().with_initial_beta(vec![0.0]));
    let err = adapter.fit(&x, &y, &FitOptions::new()).unwrap_err();
    assert!(matches!(err, SurvivalError::InvalidDimensions { .. }));
    assert!(!adapter.is_fitted());
}
