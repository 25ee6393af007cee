use survival_estimators::{
    AdditiveHazardsAdapter, AdditiveHazardsConfig, Estimator, FitOptions, Frame,
    ProportionalHazardsAdapter, ProportionalHazardsConfig, TieMethod,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Survival Estimators - Basic Usage Example");
    println!("=========================================\n");

    // Covariates: age, treatment (0/1), biomarker level
    let x = Frame::from_columns(vec![
        ("age", vec![65.0, 70.0, 55.0, 62.0, 68.0, 72.0, 58.0, 66.0, 71.0, 59.0,
                     63.0, 69.0, 57.0, 64.0, 67.0, 73.0, 61.0, 65.0, 70.0, 56.0]),
        ("treatment", vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0,
                           0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]),
        ("biomarker", vec![2.3, 1.8, 3.1, 2.1, 2.8, 1.5, 3.4, 1.9, 2.6, 2.0,
                           2.9, 1.7, 3.2, 2.2, 2.7, 1.6, 3.0, 1.8, 2.5, 2.4]),
    ])?;

    // Labels: follow-up time & whether the event was observed
    let y = Frame::from_columns(vec![
        ("duration", vec![1.2, 2.1, 3.5, 4.2, 5.8, 6.1, 7.3, 8.9, 9.2, 10.5,
                          2.3, 3.1, 4.8, 5.2, 6.9, 7.1, 8.3, 9.8, 10.1, 11.2]),
        ("observed", vec![1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0,
                          1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]),
    ])?;

    println!("Dataset Information:");
    println!("  - Number of samples: {}", x.n_rows());
    println!("  - Covariates: {}", x.column_names().join(", "));
    println!(
        "  - Number of events: {}",
        y.column("observed")?.iter().filter(|&&e| e != 0.0).count()
    );
    println!();

    // Example 1: proportional hazards through the estimator interface
    println!("Example 1: Proportional Hazards Adapter");
    println!("---------------------------------------");

    let config = ProportionalHazardsConfig::new()
        .with_duration_column("duration")
        .with_event_column("observed")
        .with_penalizer(0.1);
    let mut cox = ProportionalHazardsAdapter::new(config);
    cox.fit(&x, &y, &FitOptions::new())?;

    if let Some(model) = cox.fitted_model() {
        model.summary()?.print();
    }
    println!();
    println!("Expected lifetime of patient 1: {:.3}", cox.predict(&x)?);
    println!("Concordance on training data:  {:.3}", cox.score(&x, &y)?);
    println!("\n");

    // Example 2: Breslow ties + solver options passed at fit time
    println!("Example 2: Breslow Ties with Solver Options");
    println!("-------------------------------------------");

    let mut breslow = ProportionalHazardsAdapter::new(
        cox.config().clone().with_tie_method(TieMethod::Breslow),
    );
    let options = FitOptions::new()
        .with("max_iterations", 200)
        .with("tolerance", 1e-9);
    breslow.fit(&x, &y, &options)?;
    println!("Expected lifetime of patient 1: {:.3}", breslow.predict(&x)?);
    println!("\n");

    // Example 3: per-row predictions for new patients
    println!("Example 3: Predictions for New Patients");
    println!("---------------------------------------");

    let new_patients = Frame::from_columns(vec![
        ("age", vec![60.0, 75.0, 52.0]),
        ("treatment", vec![0.0, 1.0, 0.0]),
        ("biomarker", vec![2.5, 1.2, 3.8]),
    ])?;

    if let Some(model) = cox.fitted_model() {
        let hazards = model.predict_partial_hazard(&new_patients)?;
        let lifetimes = model.predict_expectation(&new_patients)?;
        let times = [1.0, 2.0, 3.0, 5.0, 10.0];
        let survival = model.predict_survival_function(&new_patients, &times)?;

        println!("{:<10} {:>14} {:>18}", "Patient", "Partial hazard", "Expected lifetime");
        for (i, (h, l)) in hazards.iter().zip(lifetimes.iter()).enumerate() {
            println!("{:<10} {:>14.4} {:>18.3}", (b'A' + i as u8) as char, h, l);
        }
        println!();

        println!("Survival probabilities:");
        println!("Time:       1.0    2.0    3.0    5.0   10.0");
        for (i, row) in survival.rows().into_iter().enumerate() {
            print!("Patient {}: ", (b'A' + i as u8) as char);
            for s in row {
                print!(" {:.3}", s);
            }
            println!();
        }
    }
    println!("\n");

    // Example 4: additive hazards
    println!("Example 4: Additive Hazards Adapter");
    println!("-----------------------------------");

    let config = AdditiveHazardsConfig::new()
        .with_duration_column("duration")
        .with_event_column("observed")
        .with_coef_penalizer(1.0);
    let mut aalen = AdditiveHazardsAdapter::new(config);
    aalen.fit(&x, &y, &FitOptions::new())?;

    println!("Expected lifetime of patient 1: {:.3}", aalen.predict(&x)?);
    if let Some(model) = aalen.fitted_model() {
        let names = model.coefficient_names()?;
        let cumulative = model.cumulative_coefficients()?;
        let last = cumulative.nrows() - 1;
        println!("Cumulative coefficients at t = {}:", model.timeline()?[last]);
        for (j, name) in names.iter().enumerate() {
            println!("  {:<12} {:>10.4}", name, cumulative[[last, j]]);
        }
    }

    Ok(())
}
