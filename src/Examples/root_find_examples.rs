use crate::Numerics::root_find::RootFind;
use crate::Thermodynamics::piecewise_thermo::ShomateThermo;
use crate::Thermodynamics::species_thermo::ThermoType;
use crate::constants::{GAS_CONSTANT, ONE_ATM};
use crate::settings::RootFindSettings;
use approx::assert_relative_eq;

pub fn root_find_examples(task: usize) {
    match task {
        0 => {
            // sqrt(2) as the root of x^2 = 2 on [0, 4]
            let mut rf = RootFind::new(|x: f64| x * x);
            rf.set_print_lvl(1);
            let report = rf.solve(0.0, 4.0, 50, 2.0, None).unwrap();
            println!("{:?}", report);
            assert!(report.converged);
            assert_relative_eq!(report.x, 2.0_f64.sqrt(), max_relative = 1e-5);
        }
        1 => {
            // temperature at which N2 reaches a given enthalpy
            let mut thermo = ShomateThermo::new();
            let coeffs = [
                500.0, 28.98641, 1.853978, -9.647459, 16.63537, 0.000117, -8.671914, 226.4168,
                19.50583, 19.88705, -8.598535, 1.369784, 0.527601, -4.935202, 212.3900,
            ];
            thermo
                .install("N2", 0, ThermoType::Shomate, &coeffs, 100.0, 2000.0, ONE_ATM)
                .unwrap();
            let enthalpy = |t: f64| {
                let (mut cp, mut h, mut s) = ([0.0], [0.0], [0.0]);
                match thermo.update_one(0, t, &mut cp, &mut h, &mut s) {
                    Ok(()) => h[0] * GAS_CONSTANT * t,
                    Err(_) => f64::NAN,
                }
            };
            let h_target = enthalpy(1000.0);
            let settings = RootFindSettings {
                // residual in J/kmol
                rtol: 1e-6,
                atol: 1.0,
                print_level: 3,
                ..RootFindSettings::default()
            };
            let mut rf = RootFind::from_settings(enthalpy, &settings);
            let t = rf
                .find_root(300.0, 2000.0, h_target, Some(800.0))
                .unwrap()
                .into_result()
                .unwrap();
            println!("T = {} K for h = {} J/kmol", t, h_target);
            assert_relative_eq!(t, 1000.0, max_relative = 1e-4);
        }
        2 => {
            // iteration cap reached: the best point is still reported
            let mut rf = RootFind::new(|x: f64| x.powi(3) - x);
            let report = rf.solve(0.5, 3.0, 1, 5.0, Some(0.6)).unwrap();
            println!("{:?}", report);
            match report.into_result() {
                Ok(x) => println!("converged to {}", x),
                Err(e) => println!("{}", e),
            }
        }
        _ => {
            println!("no such example");
        }
    }
}
