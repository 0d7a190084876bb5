/// two-region species thermo grouped by midpoint temperature
/// # Examples
/// ```
/// use KiRates::Thermodynamics::piecewise_thermo::NasaThermo;
/// use KiRates::Thermodynamics::species_thermo::ThermoType;
/// let mut thermo = NasaThermo::new();
/// // constant cp/R = 3.5 on both sides of 1000 K
/// let mut coeffs = vec![1000.0];
/// coeffs.extend([3.5, 0.0, 0.0, 0.0, 0.0, 0.0, 4.0]);
/// coeffs.extend([3.5, 0.0, 0.0, 0.0, 0.0, 0.0, 4.0]);
/// thermo.install("X", 0, ThermoType::Nasa, &coeffs, 300.0, 3000.0, 101325.0).unwrap();
/// let (mut cp, mut h, mut s) = ([0.0], [0.0], [0.0]);
/// thermo.update(500.0, &mut cp, &mut h, &mut s).unwrap();
/// assert_eq!(cp[0], 3.5);
/// ```
pub mod piecewise_thermo;
/// Shomate and NASA 7 polynomial families
pub mod poly_forms;
/// common trait of the thermo managers, dispatched with enum_dispatch
pub mod species_thermo;
