use ndarray::ArrayView1;

use crate::error::{Result, SurvivalError};

/// concordance index - how often does a longer predicted time go w/ a longer observed time?
///
/// a pair (i, j) is comparable when i had an observed event and j outlived it
/// (or was censored no earlier). tied predictions count as half concordant.
pub fn concordance_index(
    predicted_times: ArrayView1<f64>,
    durations: ArrayView1<f64>,
    events: ArrayView1<bool>,
) -> Result<f64> {
    let n = predicted_times.len();
    if n != durations.len() || n != events.len() {
        return Err(SurvivalError::invalid_dimensions(
            "predictions, durations, and events must have same length",
        ));
    }

    let mut concordant = 0.0;
    let mut comparable = 0.0;

    for i in 0..n {
        if !events[i] {
            continue; // censored obs can't anchor a pair
        }

        for j in 0..n {
            if i == j {
                continue;
            }

            if durations[j] > durations[i] || (!events[j] && durations[j] >= durations[i]) {
                comparable += 1.0;

                if predicted_times[j] > predicted_times[i] {
                    concordant += 1.0;
                } else if predicted_times[j] == predicted_times[i] {
                    concordant += 0.5;
                }
            }
        }
    }

    if comparable == 0.0 {
        return Err(SurvivalError::numerical_error(
            "no comparable pairs for concordance calc",
        ));
    }

    Ok(concordant / comparable)
}
