//! # Bounded Root Finder
//!
//! ## Purpose
//! Solves `f(x) = target` for a scalar `x` inside `[xmin, xmax]`: surface site
//! balances, temperature from enthalpy and similar one-dimensional sub-problems.
//!
//! ## Method
//! Secant steps, blended with the root of a quadratic through the last three
//! points once three points exist. Every trial is then safeguarded:
//! 1. a trial between the last two points stays inside the middle 80 % of them
//! 2. an extrapolating trial moves at most twice the previous step
//! 3. a trial outside the bracket goes half-way from the last point to the bound
//! 4. once residuals of both signs were seen, the trial stays inside that straddle
//!
//! Convergence: `|f| / norm < rtol` or `|f| < atol`, where `norm` is seeded from the
//! first two residuals (target zero) or set to `1e-6 + atol/rtol` (non-zero target).
//!
//! Running out of iterations is not an error by itself: `solve` returns a report
//! with `converged == false` and the best point seen. `RootFindReport::into_result`
//! turns that into `KineticsError::RootFindNotConverged` for callers who want `?`.
use crate::error::KineticsError;
use crate::settings::RootFindSettings;
use log::{debug, info, warn};
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

/// Residual of a scalar problem. Closures `FnMut(f64) -> f64` implement it.
pub trait ResidEval {
    fn eval(&mut self, x: f64) -> f64;
}

impl<F: FnMut(f64) -> f64> ResidEval for F {
    fn eval(&mut self, x: f64) -> f64 {
        self(x)
    }
}

/// Outcome of one `solve` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RootFindReport {
    /// converged point, or the point with the smallest residual when not converged
    pub x: f64,
    /// `f(x) - target` at `x`
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl RootFindReport {
    /// `Ok(x)` when converged, `RootFindNotConverged` with the best estimate otherwise
    pub fn into_result(self) -> Result<f64, KineticsError> {
        if self.converged {
            Ok(self.x)
        } else {
            Err(KineticsError::RootFindNotConverged {
                best: self.x,
                residual: self.residual,
                iterations: self.iterations,
            })
        }
    }
}

fn dsign(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else if x > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Points where a positive and a negative residual were observed.
#[derive(Debug, Default)]
struct Straddle {
    pos: Option<f64>,
    neg: Option<f64>,
}

impl Straddle {
    fn found(&self) -> Option<(f64, f64)> {
        self.pos.zip(self.neg)
    }

    fn observe(&mut self, x: f64, f: f64) {
        match self.found() {
            // shrink towards the root
            Some((pos, neg)) => {
                let (lo, hi) = if pos < neg { (pos, neg) } else { (neg, pos) };
                if lo < x && x < hi {
                    if f > 0.0 {
                        self.pos = Some(x);
                    } else {
                        self.neg = Some(x);
                    }
                }
            }
            None => {
                if f > 0.0 && self.pos.is_none() {
                    self.pos = Some(x);
                } else if f < 0.0 && self.neg.is_none() {
                    self.neg = Some(x);
                }
            }
        }
    }

    /// keeps `xnew` between `x2` and the straddle point of opposite sign to `f2`
    fn clamp(&self, xnew: f64, x2: f64, f2: f64) -> f64 {
        let Some((pos, neg)) = self.found() else {
            return xnew;
        };
        let opposite = if f2 > 0.0 { neg } else { pos };
        let (lo, hi) = if opposite < x2 {
            (opposite, x2)
        } else {
            (x2, opposite)
        };
        if xnew < lo || xnew > hi {
            0.5 * (opposite + x2)
        } else {
            xnew
        }
    }
}

/// smallest |f| seen during one solve
#[derive(Debug)]
struct BestPoint {
    x: f64,
    f: f64,
}

/// Result of fitting a quadratic through the last three points.
#[derive(Debug, Clone, Copy, PartialEq)]
enum QuadFit {
    /// real root nearest to the newest point
    Root(f64),
    NoRealRoot,
    /// singular system or non-finite coefficients
    Degenerate,
}

fn quadratic_fit(x: [f64; 3], f: [f64; 3]) -> QuadFit {
    let m = Matrix3::new(
        1.0,
        x[0],
        x[0] * x[0],
        1.0,
        x[1],
        x[1] * x[1],
        1.0,
        x[2],
        x[2] * x[2],
    );
    let Some(a) = m.lu().solve(&Vector3::new(f[0], f[1], f[2])) else {
        return QuadFit::Degenerate;
    };
    let (a0, a1, a2) = (a[0], a[1], a[2]);
    if !(a0.is_finite() && a1.is_finite() && a2.is_finite()) {
        return QuadFit::Degenerate;
    }
    let disc = a1 * a1 - 4.0 * a2 * a0;
    if disc < 0.0 {
        return QuadFit::NoRealRoot;
    }
    // q/a2 and a0/q avoid cancellation; a2 == 0 leaves only the linear root
    let q = -0.5 * (a1 + a1.signum() * disc.sqrt());
    let x2 = x[2];
    [q / a2, a0 / q]
        .into_iter()
        .filter(|r| r.is_finite())
        .min_by(|r, s| (r - x2).abs().total_cmp(&(s - x2).abs()))
        .map_or(QuadFit::Degenerate, QuadFit::Root)
}

/// Bounded hybrid secant/quadratic root finder bound to one residual.
#[derive(Debug, Clone)]
pub struct RootFind<R: ResidEval> {
    resid: R,
    rtol: f64,
    atol: f64,
    max_iterations: usize,
    print_level: u8,
}

impl<R: ResidEval> RootFind<R> {
    pub fn new(resid: R) -> Self {
        Self::from_settings(resid, &RootFindSettings::default())
    }

    pub fn from_settings(resid: R, settings: &RootFindSettings) -> Self {
        Self {
            resid,
            rtol: settings.rtol,
            atol: settings.atol,
            max_iterations: settings.max_iterations,
            print_level: settings.print_level,
        }
    }

    pub fn set_tol(&mut self, rtol: f64, atol: f64) {
        self.rtol = rtol;
        self.atol = atol;
    }

    /// 0 - silent, >= 1 - summary of every solve, >= 3 - every iteration (debug level)
    pub fn set_print_lvl(&mut self, print_level: u8) {
        self.print_level = print_level;
    }

    pub fn tolerances(&self) -> (f64, f64) {
        (self.rtol, self.atol)
    }

    /// gives the residual back
    pub fn into_inner(self) -> R {
        self.resid
    }

    /// `solve` with the iteration cap from the settings
    pub fn find_root(
        &mut self,
        xmin: f64,
        xmax: f64,
        target: f64,
        guess: Option<f64>,
    ) -> Result<RootFindReport, KineticsError> {
        self.solve(xmin, xmax, self.max_iterations, target, guess)
    }

    fn residual(&mut self, x: f64, target: f64, best: &mut BestPoint) -> f64 {
        let f = self.resid.eval(x) - target;
        if f.abs() < best.f.abs() || best.f.is_nan() {
            best.x = x;
            best.f = f;
        }
        f
    }

    fn is_converged(&self, f: f64, fnorm: f64) -> bool {
        (f / fnorm).abs() < self.rtol || f.abs() < self.atol
    }

    fn report(&self, x: f64, residual: f64, iterations: usize, converged: bool) -> RootFindReport {
        let report = RootFindReport {
            x,
            residual,
            iterations,
            converged,
        };
        if self.print_level >= 1 {
            if converged {
                info!(
                    "RootFind: converged to x = {} (residual {}) in {} iterations",
                    x, residual, iterations
                );
            } else {
                warn!(
                    "RootFind: no convergence in {} iterations, best x = {} (residual {})",
                    iterations, x, residual
                );
            }
        }
        report
    }

    /// Finds `x` in `[xmin, xmax]` with `f(x) = target`.
    ///
    /// # Arguments
    /// * `itmax` - iteration cap, at least 1
    /// * `guess` - starting point; absent or outside the bracket means the bracket midpoint
    ///
    /// # Errors
    /// `ConfigurationError` for an empty or non-finite bracket or a zero cap; nothing
    /// is evaluated in that case.
    pub fn solve(
        &mut self,
        xmin: f64,
        xmax: f64,
        itmax: usize,
        target: f64,
        guess: Option<f64>,
    ) -> Result<RootFindReport, KineticsError> {
        if !(xmin.is_finite() && xmax.is_finite()) || xmax <= xmin {
            return Err(KineticsError::config(
                "RootFind::solve",
                format!("xmin and xmax are bad: {} {}", xmin, xmax),
            ));
        }
        if itmax == 0 {
            return Err(KineticsError::config(
                "RootFind::solve",
                "iteration cap must be at least 1",
            ));
        }
        let trace = self.print_level >= 3;
        let mut best = BestPoint {
            x: f64::NAN,
            f: f64::NAN,
        };
        let mut straddle = Straddle::default();

        let mut x1 = match guess {
            Some(g) if g >= xmin && g <= xmax => g,
            _ => 0.5 * (xmin + xmax),
        };
        let mut f1 = self.residual(x1, target, &mut best);
        if trace {
            debug!("RootFind: start x = {:e}, f = {:e}", x1, f1);
        }
        if f1 == 0.0 {
            return Ok(self.report(x1, f1, 0, true));
        }
        straddle.observe(x1, f1);

        let mut x2 = x1 * 1.1;
        if x2 > xmax || x2 < xmin || x2 == x1 {
            let step = (xmax - xmin) / 100.0;
            x2 = if x1 - step >= xmin { x1 - step } else { x1 + step };
        }
        let mut f2 = self.residual(x2, target, &mut best);
        if trace {
            debug!("RootFind: second point x = {:e}, f = {:e}", x2, f2);
        }
        if f2 == 0.0 {
            return Ok(self.report(x2, f2, 0, true));
        }
        straddle.observe(x2, f2);

        let mut fnorm = if target != 0.0 {
            1.0e-6 + self.atol / self.rtol
        } else {
            0.5 * (f1.abs() + f2.abs())
        };
        if !(fnorm > 0.0) || !fnorm.is_finite() {
            fnorm = self.atol / self.rtol;
        }

        let (mut x0, mut f0) = (0.0, 0.0);
        let mut its = 0;
        while its < itmax {
            let slope = (f2 - f1) / (x2 - x1);
            let mut xnew = if slope == 0.0 || !slope.is_finite() {
                if trace {
                    debug!(
                        "RootFind: equal residuals {:e} at {:e} and {:e}, perturbing",
                        f2, x1, x2
                    );
                }
                2.0 * x2 - x1 + 1.0e-3
            } else {
                x2 - f2 / slope
            };

            if its > 0 {
                match quadratic_fit([x0, x1, x2], [f0, f1, f2]) {
                    QuadFit::Root(xquad) => {
                        let step = (xnew - x2).abs();
                        let theta = if step == 0.0 {
                            1.0
                        } else {
                            ((xquad - xnew).abs() / step).min(1.0)
                        };
                        xnew = theta * xnew + (1.0 - theta) * xquad;
                    }
                    // accelerate a monotone run of steps
                    QuadFit::NoRealRoot => {
                        if dsign(xnew - x2) == dsign(x2 - x1) && dsign(x2 - x1) == dsign(x1 - x0) {
                            xnew += xnew - x2;
                        }
                    }
                    QuadFit::Degenerate => {}
                }
            }

            if (xnew > x1 && xnew < x2) || (xnew < x1 && xnew > x2) {
                let d = (x2 - x1).abs() / 10.0;
                if (xnew - x1).abs() < d {
                    xnew = x1 + dsign(xnew - x1) * d;
                }
                if (xnew - x2).abs() < d {
                    xnew = x2 + dsign(xnew - x2) * d;
                }
            } else {
                let limit = 2.0 * (x2 - x1).abs();
                if (xnew - x2).abs() > limit {
                    xnew = x2 + dsign(xnew - x2) * limit;
                }
            }
            if xnew > xmax {
                xnew = x2 + (xmax - x2) / 2.0;
            }
            if xnew < xmin {
                xnew = x2 - (x2 - xmin) / 2.0;
            }
            xnew = straddle.clamp(xnew, x2, f2);

            let fnew = self.residual(xnew, target, &mut best);
            its += 1;
            if trace {
                debug!("RootFind: iteration {} x = {:e}, f = {:e}", its, xnew, fnew);
            }
            if fnew == 0.0 {
                return Ok(self.report(xnew, fnew, its, true));
            }
            straddle.observe(xnew, fnew);

            x0 = x1;
            f0 = f1;
            x1 = x2;
            f1 = f2;
            x2 = xnew;
            f2 = fnew;
            if self.is_converged(fnew, fnorm) {
                return Ok(self.report(x2, f2, its, true));
            }
        }
        Ok(self.report(best.x, best.f, its, false))
    }
}
