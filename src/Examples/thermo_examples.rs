use crate::Thermodynamics::piecewise_thermo::{NasaThermo, ShomateThermo};
use crate::Thermodynamics::species_thermo::{
    SpeciesThermo, SpeciesThermoRecord, ThermoType, create_species_thermo,
};
use crate::Utils::diagnostics::CollectingSink;
use crate::constants::{GAS_CONSTANT, ONE_ATM};
use crate::settings::{PressureMismatchPolicy, ThermoSettings};
use approx::assert_relative_eq;
use serde_json::json;
use std::sync::Arc;

// NIST WebBook Shomate data
const N2_SHOMATE: [f64; 15] = [
    500.0, 28.98641, 1.853978, -9.647459, 16.63537, 0.000117, -8.671914, 226.4168, 19.50583,
    19.88705, -8.598535, 1.369784, 0.527601, -4.935202, 212.3900,
];
// GRI-Mech 3.0
const O2_NASA: [f64; 15] = [
    1000.0,
    3.78245636E+00,
    -2.99673416E-03,
    9.84730201E-06,
    -9.68129509E-09,
    3.24372837E-12,
    -1.06394356E+03,
    3.65767573E+00,
    3.28253784E+00,
    1.48308754E-03,
    -7.57966669E-07,
    2.09470555E-10,
    -2.16717794E-14,
    -1.08845772E+03,
    5.45323129E+00,
];

pub fn thermo_examples(thermotask: usize) {
    match thermotask {
        0 => {
            // Shomate manager: cp/R, h/RT, s/R of N2 over a temperature scan
            let mut thermo = ShomateThermo::new();
            thermo
                .install("N2", 0, ThermoType::Shomate, &N2_SHOMATE, 100.0, 2000.0, ONE_ATM)
                .unwrap();
            thermo.pretty_print();
            let (mut cp, mut h, mut s) = ([0.0], [0.0], [0.0]);
            for t in [298.15, 500.0, 1000.0, 1500.0] {
                thermo.update(t, &mut cp, &mut h, &mut s).unwrap();
                println!("T = {} K: cp/R = {}, h/RT = {}, s/R = {}", t, cp[0], h[0], s[0]);
            }
            thermo.update(298.15, &mut cp, &mut h, &mut s).unwrap();
            assert_relative_eq!(cp[0], 3.5027829, epsilon = 1e-6);
            let hf = thermo.report_hf298(0).unwrap();
            println!("H(298.15) of N2 = {} J/kmol", hf);
        }
        1 => {
            // NASA manager from JSON records, shifting the formation enthalpy
            let record = json!({
                "name": "O2",
                "index": 0,
                "thermo_type": ThermoType::NASA_TAG,
                "coeffs": O2_NASA.to_vec(),
                "min_temp": 200.0,
                "max_temp": 3500.0,
                "ref_pressure": ONE_ATM
            });
            let record = SpeciesThermoRecord::from_serde(record).unwrap();
            let mut thermo = NasaThermo::new();
            thermo.install_record(&record).unwrap();
            let (mut cp, mut h, mut s) = ([0.0], [0.0], [0.0]);
            thermo.update(298.15, &mut cp, &mut h, &mut s).unwrap();
            assert_relative_eq!(cp[0], 3.5333836, epsilon = 1e-6);
            let h_before = h[0];

            thermo.modify_one_hf298(0, 1.0e6).unwrap();
            assert_relative_eq!(thermo.report_hf298(0).unwrap(), 1.0e6, max_relative = 1e-9);
            thermo.update(298.15, &mut cp, &mut h, &mut s).unwrap();
            println!(
                "h/RT at 298.15 K: {} before, {} after the shift",
                h_before, h[0]
            );
            assert_relative_eq!(h[0], 1.0e6 / (GAS_CONSTANT * 298.15), max_relative = 1e-9);
            println!("{:?}", thermo.report_params(0).unwrap());
        }
        2 => {
            // either family behind one type; mismatched reference pressures are reported
            let sink = Arc::new(CollectingSink::new());
            let settings = ThermoSettings {
                pressure_policy: PressureMismatchPolicy::KeepFirst,
                ..ThermoSettings::default()
            };
            let mut thermo = NasaThermo::new()
                .with_settings(settings)
                .with_sink(sink.clone());
            thermo
                .install("O2", 0, ThermoType::Nasa, &O2_NASA, 200.0, 3500.0, ONE_ATM)
                .unwrap();
            thermo
                .install("O2_bar", 1, ThermoType::Nasa, &O2_NASA, 300.0, 3000.0, 1.0e5)
                .unwrap();
            println!("warnings: {:?}", sink.messages());
            assert_eq!(thermo.ref_pressure(), ONE_ATM);
            println!(
                "valid for all species: {} - {} K",
                thermo.min_temp(None).unwrap(),
                thermo.max_temp(None).unwrap()
            );

            let mut generic = create_species_thermo(ThermoType::Shomate);
            generic
                .install("N2", 0, ThermoType::Shomate, &N2_SHOMATE, 100.0, 2000.0, ONE_ATM)
                .unwrap();
            let (mut cp, mut h, mut s) = ([0.0], [0.0], [0.0]);
            generic.update_one(0, 1000.0, &mut cp, &mut h, &mut s).unwrap();
            assert_relative_eq!(cp[0], 3.9319068, epsilon = 1e-6);
            generic.pretty_print();
        }
        _ => {
            println!("no such example");
        }
    }
}
