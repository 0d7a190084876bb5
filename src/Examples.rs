/// stoichiometry manager: building a mechanism, rates of progress to species rates, source generation
pub mod kinetics_examples;
/// bounded root finder on scalar residuals
pub mod root_find_examples;
/// Shomate and NASA species thermo managers
pub mod thermo_examples;
