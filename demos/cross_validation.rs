use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use survival_estimators::{
    AdditiveHazardsAdapter, AdditiveHazardsConfig, Estimator, FitOptions, Frame,
    ProportionalHazardsAdapter, ProportionalHazardsConfig,
};

fn generate_synthetic_dataset(
    n_samples: usize,
    n_features: usize,
    seed: u64,
) -> survival_estimators::Result<(Frame, Frame)> {
    let mut rng = StdRng::seed_from_u64(seed);

    let columns: Vec<(String, Vec<f64>)> = (0..n_features)
        .map(|j| {
            let values = (0..n_samples).map(|_| rng.gen_range(-2.0..2.0)).collect();
            (format!("x{j}"), values)
        })
        .collect();
    let x = Frame::from_columns(columns)?;

    // True coefficients - only the first 3 features affect survival
    let true_coefficients = [0.8, -0.5, 0.3];

    let mut durations = Vec::with_capacity(n_samples);
    let mut observed = Vec::with_capacity(n_samples);
    for row in x.values().rows() {
        let linear_pred: f64 = row.iter().zip(true_coefficients.iter()).map(|(v, b)| v * b).sum();
        let hazard = 0.1 * linear_pred.exp();

        let u: f64 = 1.0 - rng.gen_range(0.0..1.0_f64);
        let time = -u.ln() / hazard;
        let censoring_time = rng.gen_range(1.0..15.0);

        if time < censoring_time {
            durations.push(time);
            observed.push(1.0);
        } else {
            durations.push(censoring_time);
            observed.push(0.0);
        }
    }

    let y = Frame::from_columns(vec![("duration", durations), ("observed", observed)])?;
    Ok((x, y))
}

/// mean & std of a score over k contiguous folds
fn k_fold_cross_validation<F>(
    x: &Frame,
    y: &Frame,
    k: usize,
    mut fit_and_score: F,
) -> survival_estimators::Result<(f64, f64)>
where
    F: FnMut(&Frame, &Frame, &Frame, &Frame) -> survival_estimators::Result<f64>,
{
    let n_samples = x.n_rows();
    let fold_size = n_samples / k;
    let mut scores = Vec::with_capacity(k);

    for fold in 0..k {
        let test_start = fold * fold_size;
        let test_end = if fold == k - 1 { n_samples } else { (fold + 1) * fold_size };

        let (test_indices, train_indices): (Vec<usize>, Vec<usize>) =
            (0..n_samples).partition(|&i| i >= test_start && i < test_end);

        let score = fit_and_score(
            &x.take_rows(&train_indices)?,
            &y.take_rows(&train_indices)?,
            &x.take_rows(&test_indices)?,
            &y.take_rows(&test_indices)?,
        )?;
        scores.push(score);
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64;
    Ok((mean, variance.sqrt()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Survival Estimators - Cross-Validation Example");
    println!("==============================================\n");

    let (x, y) = generate_synthetic_dataset(300, 6, 42)?;
    let n_events = y.column("observed")?.iter().filter(|&&e| e != 0.0).count();

    println!("Dataset created:");
    println!("  - Samples: {}", x.n_rows());
    println!("  - Features: {}", x.n_columns());
    println!("  - Events: {}", n_events);
    println!("  - Censored: {}", x.n_rows() - n_events);
    println!();

    // Hold out the last 20% for a final check
    let train_size = (x.n_rows() as f64 * 0.8) as usize;
    let train: Vec<usize> = (0..train_size).collect();
    let test: Vec<usize> = (train_size..x.n_rows()).collect();
    let (x_train, y_train) = (x.take_rows(&train)?, y.take_rows(&train)?);
    let (x_test, y_test) = (x.take_rows(&test)?, y.take_rows(&test)?);

    println!("Proportional hazards: penalizer grid");
    println!("{:<10} {:<12} {:<12}", "Penalizer", "Mean C-idx", "Std C-idx");
    println!("{:-<34}", "");

    let base = ProportionalHazardsConfig::new()
        .with_duration_column("duration")
        .with_event_column("observed");

    let mut best = (0.0, f64::NEG_INFINITY);
    for penalizer in [0.001, 0.01, 0.1, 1.0] {
        let config = base.clone().with_penalizer(penalizer);
        let (mean, std) = k_fold_cross_validation(&x_train, &y_train, 5, |xt, yt, xv, yv| {
            let mut model = ProportionalHazardsAdapter::new(config.clone());
            model.fit(xt, yt, &FitOptions::new())?;
            model.score(xv, yv)
        })?;
        println!("{:<10.3} {:<12.4} {:<12.4}", penalizer, mean, std);
        if mean > best.1 {
            best = (penalizer, mean);
        }
    }
    println!("Best penalizer: {:.3} (C-index {:.4})\n", best.0, best.1);

    println!("Additive hazards: coef_penalizer grid");
    println!("{:<10} {:<12} {:<12}", "Penalizer", "Mean C-idx", "Std C-idx");
    println!("{:-<34}", "");

    let aalen_base = AdditiveHazardsConfig::new()
        .with_duration_column("duration")
        .with_event_column("observed");

    for coef_penalizer in [0.1, 0.5, 2.0] {
        let config = aalen_base.clone().with_coef_penalizer(coef_penalizer);
        let (mean, std) = k_fold_cross_validation(&x_train, &y_train, 5, |xt, yt, xv, yv| {
            let mut model = AdditiveHazardsAdapter::new(config.clone());
            model.fit(xt, yt, &FitOptions::new())?;
            model.score(xv, yv)
        })?;
        println!("{:<10.3} {:<12.4} {:<12.4}", coef_penalizer, mean, std);
    }
    println!();

    // Final model on the full training split
    println!("Final Model Evaluation");
    println!("======================");

    let mut final_model = ProportionalHazardsAdapter::new(base.with_penalizer(best.0));
    final_model.fit(&x_train, &y_train, &FitOptions::new())?;

    println!("Test C-index: {:.4}", final_model.score(&x_test, &y_test)?);
    println!("Expected lifetime of first test subject: {:.3}", final_model.predict(&x_test)?);
    if let Some(model) = final_model.fitted_model() {
        model.summary()?.print();
    }

    Ok(())
}
