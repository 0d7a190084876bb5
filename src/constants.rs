//! Physical constants shared by the thermo and kinetics managers.
//!
//! Units follow the kmol-based SI convention used for rates of progress:
//! energies in J/kmol, pressures in Pa.

/// Universal gas constant, J/(kmol·K)
pub const GAS_CONSTANT: f64 = 8314.47215;

/// One standard atmosphere, Pa
pub const ONE_ATM: f64 = 101325.0;

/// Default reference pressure of standard-state thermo data, Pa
pub const STANDARD_PRESSURE: f64 = ONE_ATM;

/// Reference temperature of formation enthalpies, K
pub const T298: f64 = 298.15;
