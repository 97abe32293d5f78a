//! Test fixtures and constants.

/// Configuration lines used across tests
pub mod configs {
    /// Three iterations: β = 0.02, 0.04, 0.08
    pub const THREE_EXACT: &str = "--lambda 0.01 --beta_max 0.1 --kappa 2 --exact true";

    /// Same schedule, conjugate gradient
    pub const THREE_ITERATIVE: &str = "--exact false --kappa 2 --beta_max 0.1 --lambda 0.01";

    /// 33 iterations with κ = 1.5
    pub const LONG: &str = "--lambda 0.01 --beta_max 10000 --kappa 1.5 --exact true";

    /// κ must exceed 1
    pub const NON_INCREASING_KAPPA: &str = "--lambda 0.01 --beta_max 10000 --kappa 1 --exact true";

    pub const MISSING_FIELD: &str = "--lambda 0.01 --beta_max 10000 --kappa 1.5";
}

/// Left half black, right half white.
pub fn step_edge(width: u32, height: u32) -> Vec<u8> {
    (0..height)
        .flat_map(|_| (0..width).map(move |x| if x < width / 2 { 0 } else { 255 }))
        .collect()
}

/// Red left half, blue right half, constant green.
pub fn rgb_step_edge(width: u32, height: u32) -> Vec<u8> {
    step_edge(width, height)
        .into_iter()
        .flat_map(|v| [v, 90, 255 - v])
        .collect()
}
