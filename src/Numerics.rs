/// bounded hybrid secant/quadratic root finder for scalar equations
/// # Examples
/// ```
/// use KiRates::Numerics::root_find::RootFind;
/// let mut rf = RootFind::new(|x: f64| x * x - 2.0);
/// let report = rf.solve(0.0, 2.0, 100, 0.0, None).unwrap();
/// assert!(report.converged);
/// assert!((report.x - 2.0f64.sqrt()).abs() < 1e-6);
/// ```
pub mod root_find;
