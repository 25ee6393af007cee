use statrs::function::erf::{erf_inv, erfc};

/// two-sided critical value of the standard normal for a confidence level, e.g. 0.95 -> 1.96
pub(crate) fn z_critical(confidence: f64) -> f64 {
    std::f64::consts::SQRT_2 * erf_inv(confidence)
}

/// two-sided p-value of a standard normal test statistic
pub(crate) fn two_sided_p_value(z: f64) -> f64 {
    erfc(z.abs() / std::f64::consts::SQRT_2)
}
