//! # Polynomial Families
//!
//! ## Purpose
//! Two-region species thermo is stored as 7 coefficients per region. How the
//! 7 numbers turn into cp/R, h/RT and s/R depends on the family:
//! - **Shomate** (NIST WebBook form), `t = T/1000`, coefficients A..G in J/mol units
//! - **NASA 7** (Chemkin form), coefficients a0..a6 already dimensionless
//!
//! ## Architecture
//! Each family is a zero-sized marker type implementing [`PolyForm`]. The
//! manager is generic over it, so the inner loop is monomorphized and the
//! temperature-power vector lives on the stack.
use super::species_thermo::ThermoType;
use crate::constants::GAS_CONSTANT;
use std::fmt::Debug;

/// A polynomial family of two-region thermo data.
pub trait PolyForm: Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// parameterization tag accepted by `install`
    const THERMO_TYPE: ThermoType;

    /// temperature-dependent terms shared by every species at temperature `t`
    fn temperature_powers(t: f64) -> [f64; 7];

    /// (cp/R, h/RT, s/R) of one region
    fn evaluate(c: &[f64; 7], tt: &[f64; 7]) -> (f64, f64, f64);

    /// index of the enthalpy constant and the enthalpy (J/kmol) carried by one unit of it
    fn enthalpy_constant() -> (usize, f64);
}

/// Shomate polynomial:
///
/// cp = A + B t + C t² + D t³ + E/t²  \[J/(mol K)\]
///
/// h - h298 = A t + B t²/2 + C t³/3 + D t⁴/4 - E/t + F  \[kJ/mol\]
///
/// s = A ln t + B t + C t²/2 + D t³/3 - E/(2t²) + G  \[J/(mol K)\]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Shomate;

impl PolyForm for Shomate {
    const THERMO_TYPE: ThermoType = ThermoType::Shomate;

    #[inline]
    fn temperature_powers(t: f64) -> [f64; 7] {
        let tt = 1.0e-3 * t;
        [
            tt,
            tt * tt,
            tt * tt * tt,
            1.0 / (tt * tt),
            tt.ln(),
            1.0 / GAS_CONSTANT,
            1.0 / (GAS_CONSTANT * t),
        ]
    }

    #[inline]
    fn evaluate(c: &[f64; 7], tt: &[f64; 7]) -> (f64, f64, f64) {
        let [a, b, cc, d, e, f, g] = *c;
        let cp = a + b * tt[0] + cc * tt[1] + d * tt[2] + e * tt[3];
        let h = a * tt[0] + b * tt[1] / 2.0 + cc * tt[2] / 3.0 + d * tt[2] * tt[0] / 4.0
            - e * tt[3] * tt[0]
            + f;
        let s = a * tt[4] + b * tt[0] + cc * tt[1] / 2.0 + d * tt[2] / 3.0 - e * tt[3] / 2.0 + g;
        (1.0e3 * cp * tt[5], 1.0e6 * h * tt[6], 1.0e3 * s * tt[5])
    }

    /// F is in kJ/mol
    fn enthalpy_constant() -> (usize, f64) {
        (5, 1.0e6)
    }
}

/// NASA 7-coefficient polynomial:
///
/// cp/R = a0 + a1 T + a2 T² + a3 T³ + a4 T⁴
///
/// h/RT = a0 + a1 T/2 + a2 T²/3 + a3 T³/4 + a4 T⁴/5 + a5/T
///
/// s/R = a0 ln T + a1 T + a2 T²/2 + a3 T³/3 + a4 T⁴/4 + a6
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Nasa7;

impl PolyForm for Nasa7 {
    const THERMO_TYPE: ThermoType = ThermoType::Nasa;

    #[inline]
    fn temperature_powers(t: f64) -> [f64; 7] {
        [t, t * t, t * t * t, t * t * t * t, 1.0 / t, t.ln(), 0.0]
    }

    #[inline]
    fn evaluate(c: &[f64; 7], tt: &[f64; 7]) -> (f64, f64, f64) {
        let cp = c[0] + c[1] * tt[0] + c[2] * tt[1] + c[3] * tt[2] + c[4] * tt[3];
        let h = c[0]
            + c[1] * tt[0] / 2.0
            + c[2] * tt[1] / 3.0
            + c[3] * tt[2] / 4.0
            + c[4] * tt[3] / 5.0
            + c[5] * tt[4];
        let s = c[0] * tt[5]
            + c[1] * tt[0]
            + c[2] * tt[1] / 2.0
            + c[3] * tt[2] / 3.0
            + c[4] * tt[3] / 4.0
            + c[6];
        (cp, h, s)
    }

    /// a5 is h/R at 0 K
    fn enthalpy_constant() -> (usize, f64) {
        (5, GAS_CONSTANT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shomate_n2_at_298() {
        // N2, NIST WebBook, 100 - 500 K
        let c = [
            28.98641, 1.853978, -9.647459, 16.63537, 0.000117, -8.671914, 226.4168,
        ];
        let tt = Shomate::temperature_powers(298.15);
        let (cp, h, s) = Shomate::evaluate(&c, &tt);
        assert_relative_eq!(cp * GAS_CONSTANT / 1.0e3, 29.124, epsilon = 1e-3);
        assert_relative_eq!(cp, 3.5027829, epsilon = 1e-6);
        assert_relative_eq!(h, 1.1123e-5, epsilon = 1e-8);
        assert_relative_eq!(s, 23.0452297, epsilon = 1e-6);
    }

    #[test]
    fn test_nasa_o2() {
        // O2, GRI-Mech 3.0, 200 - 1000 K
        let c = [
            3.78245636E+00,
            -2.99673416E-03,
            9.84730201E-06,
            -9.68129509E-09,
            3.24372837E-12,
            -1.06394356E+03,
            3.65767573E+00,
        ];
        let tt = Nasa7::temperature_powers(298.15);
        let (cp, h, s) = Nasa7::evaluate(&c, &tt);
        assert_relative_eq!(cp, 3.5333836, epsilon = 1e-6);
        assert_relative_eq!(h, 0.0, epsilon = 1e-7);
        assert_relative_eq!(s, 24.6736689, epsilon = 1e-6);
    }

    #[test]
    fn test_enthalpy_constant_shift() {
        // one unit of the constant moves h by the reported amount
        let t = 750.0;
        let mut c = [30.0, 1.0, -2.0, 0.5, 0.1, -9.0, 220.0];
        let (idx, per_unit) = Shomate::enthalpy_constant();
        let tt = Shomate::temperature_powers(t);
        let (_, h0, _) = Shomate::evaluate(&c, &tt);
        c[idx] += 1.0;
        let (_, h1, _) = Shomate::evaluate(&c, &tt);
        assert_relative_eq!((h1 - h0) * GAS_CONSTANT * t, per_unit, max_relative = 1e-10);

        let mut a = [3.5, 1e-3, 0.0, 0.0, 0.0, -1000.0, 4.0];
        let (idx, per_unit) = Nasa7::enthalpy_constant();
        let tt = Nasa7::temperature_powers(t);
        let (_, h0, _) = Nasa7::evaluate(&a, &tt);
        a[idx] += 1.0;
        let (_, h1, _) = Nasa7::evaluate(&a, &tt);
        assert_relative_eq!((h1 - h0) * GAS_CONSTANT * t, per_unit, max_relative = 1e-10);
    }
}
