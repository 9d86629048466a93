pub fn has_converged(old_values: &[f64], new_values: &[f64], tolerance: f64) -> bool {
    let change = calculate_l1_change(old_values, new_values);
    change <= tolerance
}

/// Sum of absolute differences. Any non-finite entry makes the change infinite.
pub fn calculate_l1_change(old_values: &[f64], new_values: &[f64]) -> f64 {
    let change: f64 = old_values
        .iter()
        .zip(new_values)
        .map(|(old, new)| compute_change(*old, *new))
        .sum();

    if change.is_nan() { f64::INFINITY } else { change }
}

fn compute_change(old_val: f64, new_val: f64) -> f64 {
    (new_val - old_val).abs()
}

pub fn should_continue(iteration: usize, max_iterations: usize) -> bool {
    iteration < max_iterations
}
