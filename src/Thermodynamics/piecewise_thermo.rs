//! # Piecewise Species Thermo Manager
//!
//! ## Purpose
//! Evaluates dimensionless heat capacity, enthalpy and entropy (cp/R, h/RT, s/R)
//! of every species of a phase from two-region polynomial fits: one polynomial
//! below the midpoint temperature, one above it.
//!
//! ## Architecture
//! - species sharing a midpoint form a **group**; inside a group the low-region and
//!   high-region coefficients of all members are stored contiguously
//! - groups are found by the midpoint rounded to 1e-3 K
//! - a flat per-species slot table maps the species index to (group, position)
//! - the polynomial family is a type parameter (`Shomate`, `Nasa7`)
//!
//! `update` computes the temperature powers once and then walks every group, so the
//! cost is proportional to the number of installed species. The midpoint itself
//! belongs to the low region.
//!
//! ## Coefficient layout
//! `[t_mid, low_0 .. low_6, high_0 .. high_6]` - 15 numbers per species.
//!
//! ## Usage
//! ```rust, ignore
//! let mut thermo = ShomateThermo::new();
//! thermo.install("N2", 0, ThermoType::Shomate, &coeffs, 100.0, 6000.0, 101325.0)?;
//! thermo.update(298.15, &mut cp_r, &mut h_rt, &mut s_r)?;
//! ```
use super::poly_forms::{Nasa7, PolyForm, Shomate};
use super::species_thermo::{SpeciesThermoParams, SpeciesThermoRecord, ThermoType};
use crate::Utils::diagnostics::{DiagnosticSink, LogSink};
use crate::constants::{GAS_CONSTANT, ONE_ATM, T298};
use crate::error::{KineticsError, check_len};
use crate::settings::{PressureMismatchPolicy, ThermoSettings};
use log::{debug, info};
use prettytable::{Cell, Row, Table};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// largest midpoint change `modify_params` tolerates, K
const MIDPOINT_TOLERANCE: f64 = 1.0e-3;
/// species indices at or above this are refused by `install`
pub const MAX_SPECIES: usize = 1 << 20;

pub type ShomateThermo = PiecewiseThermo<Shomate>;
pub type NasaThermo = PiecewiseThermo<Nasa7>;

/// species sharing one midpoint temperature
#[derive(Debug, Clone)]
struct ThermoGroup {
    t_mid: f64,
    species: Vec<usize>,
    low: Vec<[f64; 7]>,
    high: Vec<[f64; 7]>,
}

#[derive(Debug, Clone)]
struct SpeciesSlot {
    name: String,
    group: usize,
    pos: usize,
    min_temp: f64,
    max_temp: f64,
    ref_pressure: f64,
}

/// Two-region polynomial thermo of a set of species.
#[derive(Debug, Clone)]
pub struct PiecewiseThermo<P: PolyForm> {
    groups: Vec<ThermoGroup>,
    /// quantized midpoint -> group
    group_index: HashMap<i64, usize>,
    /// species index -> slot, None for species never installed
    slots: Vec<Option<SpeciesSlot>>,
    /// highest low bound over all species
    tlow_max: f64,
    /// lowest high bound over all species
    thigh_min: f64,
    p0: Option<f64>,
    settings: ThermoSettings,
    sink: Arc<dyn DiagnosticSink>,
    _form: PhantomData<P>,
}

impl<P: PolyForm> Default for PiecewiseThermo<P> {
    fn default() -> Self {
        Self::new()
    }
}

fn midpoint_key(t_mid: f64) -> i64 {
    (t_mid / MIDPOINT_TOLERANCE).round() as i64
}

fn check_temperature(context: &'static str, t: f64) -> Result<(), KineticsError> {
    if t.is_finite() && t > 0.0 {
        Ok(())
    } else {
        Err(KineticsError::invariant(
            context,
            format!("temperature must be positive and finite, got {}", t),
        ))
    }
}

fn split_coeffs(coeffs: &[f64]) -> ([f64; 7], [f64; 7]) {
    let mut low = [0.0; 7];
    let mut high = [0.0; 7];
    low.copy_from_slice(&coeffs[1..8]);
    high.copy_from_slice(&coeffs[8..15]);
    (low, high)
}

impl<P: PolyForm> PiecewiseThermo<P> {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            group_index: HashMap::new(),
            slots: Vec::new(),
            tlow_max: 0.0,
            thigh_min: f64::INFINITY,
            p0: None,
            settings: ThermoSettings::default(),
            sink: Arc::new(LogSink),
            _form: PhantomData,
        }
    }

    pub fn with_settings(mut self, settings: ThermoSettings) -> Self {
        self.settings = settings;
        self
    }

    /// replaces the default `LogSink`
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn thermo_type(&self) -> ThermoType {
        P::THERMO_TYPE
    }

    /// number of installed species
    pub fn n_species(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn is_installed(&self, k: usize) -> bool {
        matches!(self.slots.get(k), Some(Some(_)))
    }

    fn slot(&self, context: &'static str, k: usize) -> Result<&SpeciesSlot, KineticsError> {
        match self.slots.get(k) {
            Some(Some(slot)) => Ok(slot),
            _ => Err(KineticsError::invariant(
                context,
                format!("species {} has no thermo data installed", k),
            )),
        }
    }

    fn check_coeffs(&self, coeffs: &[f64]) -> Result<(), KineticsError> {
        if coeffs.len() != 15 {
            return Err(KineticsError::config(
                "PiecewiseThermo::install",
                format!("15 coefficients expected, got {}", coeffs.len()),
            ));
        }
        if let Some(c) = coeffs.iter().find(|c| !c.is_finite()) {
            return Err(KineticsError::config(
                "PiecewiseThermo::install",
                format!("non-finite coefficient {}", c),
            ));
        }
        Ok(())
    }

    /// Adds one species.
    ///
    /// `coeffs[0]` is the midpoint, `coeffs[1..8]` the low region and
    /// `coeffs[8..15]` the high region. On error nothing is changed.
    #[allow(clippy::too_many_arguments)]
    pub fn install(
        &mut self,
        name: &str,
        k: usize,
        thermo_type: ThermoType,
        coeffs: &[f64],
        min_temp: f64,
        max_temp: f64,
        ref_pressure: f64,
    ) -> Result<(), KineticsError> {
        const CTX: &str = "PiecewiseThermo::install";
        if thermo_type != P::THERMO_TYPE {
            return Err(KineticsError::config(
                CTX,
                format!(
                    "species {}: parameterization {:?} given to a {:?} manager",
                    name,
                    thermo_type,
                    P::THERMO_TYPE
                ),
            ));
        }
        self.check_coeffs(coeffs)?;
        let t_mid = coeffs[0];
        if !(min_temp.is_finite() && max_temp.is_finite() && min_temp > 0.0) {
            return Err(KineticsError::config(
                CTX,
                format!(
                    "species {}: bad temperature range {} - {}",
                    name, min_temp, max_temp
                ),
            ));
        }
        if !(min_temp <= t_mid && t_mid <= max_temp) {
            return Err(KineticsError::config(
                CTX,
                format!(
                    "species {}: midpoint {} outside of range {} - {}",
                    name, t_mid, min_temp, max_temp
                ),
            ));
        }
        if !(ref_pressure.is_finite() && ref_pressure > 0.0) {
            return Err(KineticsError::config(
                CTX,
                format!("species {}: bad reference pressure {}", name, ref_pressure),
            ));
        }
        if self.is_installed(k) {
            return Err(KineticsError::config(
                CTX,
                format!("species index {} ({}) is already installed", k, name),
            ));
        }
        if k >= MAX_SPECIES {
            return Err(KineticsError::config(
                CTX,
                format!("species {}: index {} exceeds the limit {}", name, k, MAX_SPECIES),
            ));
        }
        let new_p0 = self.resolve_ref_pressure(name, ref_pressure)?;
        if self.slots.len() <= k {
            self.slots
                .try_reserve(k + 1 - self.slots.len())
                .map_err(|e| KineticsError::config(CTX, format!("species {}: {}", name, e)))?;
        }

        // everything checked, commit
        if self.slots.len() <= k {
            self.slots.resize(k + 1, None);
        }
        let (low, high) = split_coeffs(coeffs);
        let key = midpoint_key(t_mid);
        let group = match self.group_index.get(&key) {
            Some(&g) => g,
            None => {
                self.groups.push(ThermoGroup {
                    t_mid,
                    species: Vec::new(),
                    low: Vec::new(),
                    high: Vec::new(),
                });
                self.group_index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        let g = &mut self.groups[group];
        g.species.push(k);
        g.low.push(low);
        g.high.push(high);
        let pos = g.species.len() - 1;
        let group_t_mid = g.t_mid;

        self.slots[k] = Some(SpeciesSlot {
            name: name.to_string(),
            group,
            pos,
            min_temp,
            max_temp,
            ref_pressure,
        });
        self.tlow_max = self.tlow_max.max(min_temp);
        self.thigh_min = self.thigh_min.min(max_temp);
        self.p0 = Some(new_p0);

        if self.settings.check_continuity {
            self.check_continuity(name, group_t_mid, &low, &high);
        }
        debug!(
            "{:?} thermo of {} installed as species {} (group T_mid = {})",
            P::THERMO_TYPE,
            name,
            k,
            group_t_mid
        );
        Ok(())
    }

    /// installs a species from its serde record
    pub fn install_record(&mut self, record: &SpeciesThermoRecord) -> Result<(), KineticsError> {
        self.install(
            &record.name,
            record.index,
            record.thermo_type,
            &record.coeffs,
            record.min_temp,
            record.max_temp,
            record.ref_pressure,
        )
    }

    /// reference pressure the manager holds after accepting `ref_pressure`
    fn resolve_ref_pressure(&self, name: &str, ref_pressure: f64) -> Result<f64, KineticsError> {
        let Some(p0) = self.p0 else {
            return Ok(ref_pressure);
        };
        if (p0 - ref_pressure).abs() <= self.settings.pressure_tolerance {
            return Ok(p0);
        }
        self.sink.emit_warning(&format!(
            "PiecewiseThermo::install: reference pressure of species {} ({} Pa) differs from the \
             one already established ({} Pa)",
            name, ref_pressure, p0
        ));
        match self.settings.pressure_policy {
            PressureMismatchPolicy::Overwrite => Ok(ref_pressure),
            PressureMismatchPolicy::KeepFirst => Ok(p0),
            PressureMismatchPolicy::Reject => Err(KineticsError::config(
                "PiecewiseThermo::install",
                format!(
                    "species {}: reference pressure {} Pa conflicts with {} Pa",
                    name, ref_pressure, p0
                ),
            )),
        }
    }

    /// warns when the two regions disagree at the midpoint
    fn check_continuity(&self, name: &str, t_mid: f64, low: &[f64; 7], high: &[f64; 7]) {
        let tt = P::temperature_powers(t_mid);
        let (cp_lo, h_lo, _) = P::evaluate(low, &tt);
        let (cp_hi, h_hi, _) = P::evaluate(high, &tt);
        let cp_jump = (cp_lo - cp_hi).abs() / cp_lo.abs().max(f64::EPSILON);
        if cp_jump > 1.0e-2 {
            self.sink.emit_warning(&format!(
                "species {}: cp/R is discontinuous at T_mid = {} K ({} vs {})",
                name, t_mid, cp_lo, cp_hi
            ));
        }
        if (h_lo - h_hi).abs() > 1.0e-3 * cp_lo.abs() {
            self.sink.emit_warning(&format!(
                "species {}: h/RT is discontinuous at T_mid = {} K ({} vs {})",
                name, t_mid, h_lo, h_hi
            ));
        }
    }

    /// cp/R, h/RT and s/R of every installed species at temperature `t`.
    ///
    /// Output slots of species that were never installed are not written.
    pub fn update(
        &self,
        t: f64,
        cp_r: &mut [f64],
        h_rt: &mut [f64],
        s_r: &mut [f64],
    ) -> Result<(), KineticsError> {
        const CTX: &str = "PiecewiseThermo::update";
        check_temperature(CTX, t)?;
        let n = self.slots.len();
        check_len(CTX, "cp_R", cp_r.len(), n)?;
        check_len(CTX, "h_RT", h_rt.len(), n)?;
        check_len(CTX, "s_R", s_r.len(), n)?;

        let tt = P::temperature_powers(t);
        for g in &self.groups {
            let coeffs = if t > g.t_mid { &g.high } else { &g.low };
            for (&k, c) in g.species.iter().zip(coeffs.iter()) {
                let (cp, h, s) = P::evaluate(c, &tt);
                cp_r[k] = cp;
                h_rt[k] = h;
                s_r[k] = s;
            }
        }
        Ok(())
    }

    /// `update` restricted to species `k`
    pub fn update_one(
        &self,
        k: usize,
        t: f64,
        cp_r: &mut [f64],
        h_rt: &mut [f64],
        s_r: &mut [f64],
    ) -> Result<(), KineticsError> {
        const CTX: &str = "PiecewiseThermo::update_one";
        check_temperature(CTX, t)?;
        let slot = self.slot(CTX, k)?;
        check_len(CTX, "cp_R", cp_r.len(), k + 1)?;
        check_len(CTX, "h_RT", h_rt.len(), k + 1)?;
        check_len(CTX, "s_R", s_r.len(), k + 1)?;
        let (cp, h, s) = self.evaluate_slot(slot, t);
        cp_r[k] = cp;
        h_rt[k] = h;
        s_r[k] = s;
        Ok(())
    }

    fn evaluate_slot(&self, slot: &SpeciesSlot, t: f64) -> (f64, f64, f64) {
        let g = &self.groups[slot.group];
        let c = if t > g.t_mid {
            &g.high[slot.pos]
        } else {
            &g.low[slot.pos]
        };
        P::evaluate(c, &P::temperature_powers(t))
    }

    /// Lower bound of validity: for species `k`, or the highest lower bound of all
    /// species when `k` is None.
    pub fn min_temp(&self, k: Option<usize>) -> Result<f64, KineticsError> {
        match k {
            None => Ok(self.tlow_max),
            Some(k) => Ok(self.slot("PiecewiseThermo::min_temp", k)?.min_temp),
        }
    }

    /// Upper bound of validity: for species `k`, or the lowest upper bound of all
    /// species when `k` is None.
    pub fn max_temp(&self, k: Option<usize>) -> Result<f64, KineticsError> {
        match k {
            None => Ok(self.thigh_min),
            Some(k) => Ok(self.slot("PiecewiseThermo::max_temp", k)?.max_temp),
        }
    }

    /// established reference pressure, one atmosphere before any install
    pub fn ref_pressure(&self) -> f64 {
        self.p0.unwrap_or(ONE_ATM)
    }

    pub fn report_params(&self, k: usize) -> Result<SpeciesThermoParams, KineticsError> {
        let slot = self.slot("PiecewiseThermo::report_params", k)?;
        let g = &self.groups[slot.group];
        let mut coeffs = Vec::with_capacity(15);
        coeffs.push(g.t_mid);
        coeffs.extend_from_slice(&g.low[slot.pos]);
        coeffs.extend_from_slice(&g.high[slot.pos]);
        Ok(SpeciesThermoParams {
            thermo_type: P::THERMO_TYPE,
            coeffs,
            min_temp: slot.min_temp,
            max_temp: slot.max_temp,
            ref_pressure: slot.ref_pressure,
        })
    }

    /// Overwrites both polynomials of species `k`. The midpoint must stay where it
    /// is (within 1e-3 K); moving it would require regrouping.
    pub fn modify_params(&mut self, k: usize, coeffs: &[f64]) -> Result<(), KineticsError> {
        const CTX: &str = "PiecewiseThermo::modify_params";
        let slot = self.slot(CTX, k)?;
        let (group, pos, name) = (slot.group, slot.pos, slot.name.clone());
        if coeffs.len() != 15 || coeffs.iter().any(|c| !c.is_finite()) {
            return Err(KineticsError::config(
                CTX,
                format!(
                    "species {}: 15 finite coefficients expected, got {:?}",
                    name, coeffs
                ),
            ));
        }
        let t_mid = self.groups[group].t_mid;
        if (coeffs[0] - t_mid).abs() > MIDPOINT_TOLERANCE {
            return Err(KineticsError::config(
                CTX,
                format!(
                    "species {}: midpoint cannot be changed from {} to {}",
                    name, t_mid, coeffs[0]
                ),
            ));
        }
        let (low, high) = split_coeffs(coeffs);
        self.groups[group].low[pos] = low;
        self.groups[group].high[pos] = high;
        if self.settings.check_continuity {
            self.check_continuity(&name, t_mid, &low, &high);
        }
        Ok(())
    }

    /// enthalpy of species `k` at 298.15 K, J/kmol
    pub fn report_hf298(&self, k: usize) -> Result<f64, KineticsError> {
        let slot = self.slot("PiecewiseThermo::report_hf298", k)?;
        let (_, h_rt, _) = self.evaluate_slot(slot, T298);
        Ok(h_rt * GAS_CONSTANT * T298)
    }

    /// Shifts the enthalpy constant of both regions of species `k` so that its
    /// enthalpy at 298.15 K becomes `h298_new` (J/kmol).
    pub fn modify_one_hf298(&mut self, k: usize, h298_new: f64) -> Result<(), KineticsError> {
        const CTX: &str = "PiecewiseThermo::modify_one_hf298";
        if !h298_new.is_finite() {
            return Err(KineticsError::config(
                CTX,
                format!("non-finite enthalpy {}", h298_new),
            ));
        }
        let h_now = self.report_hf298(k)?;
        let slot = self.slot(CTX, k)?;
        let (group, pos) = (slot.group, slot.pos);
        let (idx, per_unit) = P::enthalpy_constant();
        let shift = (h298_new - h_now) / per_unit;
        let g = &mut self.groups[group];
        g.low[pos][idx] += shift;
        g.high[pos][idx] += shift;
        info!(
            "Hf298 of species {} changed from {} to {} J/kmol",
            k, h_now, h298_new
        );
        Ok(())
    }

    /// table of installed species with their groups and ranges
    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("k"),
            Cell::new("species"),
            Cell::new("T_mid, K"),
            Cell::new("T_min, K"),
            Cell::new("T_max, K"),
            Cell::new("p_ref, Pa"),
        ]));
        for (k, slot) in self.slots.iter().enumerate() {
            if let Some(slot) = slot {
                table.add_row(Row::new(vec![
                    Cell::new(&k.to_string()),
                    Cell::new(&slot.name),
                    Cell::new(&self.groups[slot.group].t_mid.to_string()),
                    Cell::new(&slot.min_temp.to_string()),
                    Cell::new(&slot.max_temp.to_string()),
                    Cell::new(&slot.ref_pressure.to_string()),
                ]));
            }
        }
        println!(
            "{:?} thermo: {} species in {} groups, valid for {} - {} K",
            P::THERMO_TYPE,
            self.n_species(),
            self.n_groups(),
            self.tlow_max,
            self.thigh_min
        );
        table.printstd();
    }
}
