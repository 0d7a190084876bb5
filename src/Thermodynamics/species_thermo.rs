//! Common interface of the species thermo managers and the records they exchange.
//!
//! `SpeciesThermoEnum` lets a phase hold either family behind one type; calls are
//! dispatched with `enum_dispatch`, without trait objects.
use super::piecewise_thermo::{NasaThermo, ShomateThermo};
use super::poly_forms::PolyForm;
use crate::error::KineticsError;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameterization of two-region thermo data. Records carry it as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ThermoType {
    Nasa,
    Shomate,
}

impl ThermoType {
    pub const NASA_TAG: i32 = 4;
    pub const SHOMATE_TAG: i32 = 8;

    pub fn tag(self) -> i32 {
        match self {
            ThermoType::Nasa => Self::NASA_TAG,
            ThermoType::Shomate => Self::SHOMATE_TAG,
        }
    }
}

impl TryFrom<i32> for ThermoType {
    type Error = KineticsError;
    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        match tag {
            Self::NASA_TAG => Ok(ThermoType::Nasa),
            Self::SHOMATE_TAG => Ok(ThermoType::Shomate),
            other => Err(KineticsError::config(
                "ThermoType::try_from",
                format!("unknown parameterization tag {}", other),
            )),
        }
    }
}

impl From<ThermoType> for i32 {
    fn from(t: ThermoType) -> i32 {
        t.tag()
    }
}

/// What `report_params` hands back; `coeffs` is `[t_mid, low.., high..]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesThermoParams {
    pub thermo_type: ThermoType,
    pub coeffs: Vec<f64>,
    pub min_temp: f64,
    pub max_temp: f64,
    pub ref_pressure: f64,
}

/// Thermo data of one species as produced by the parsing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesThermoRecord {
    pub name: String,
    pub index: usize,
    pub thermo_type: ThermoType,
    pub coeffs: Vec<f64>,
    pub min_temp: f64,
    pub max_temp: f64,
    #[serde(default = "default_ref_pressure")]
    pub ref_pressure: f64,
}

fn default_ref_pressure() -> f64 {
    crate::constants::STANDARD_PRESSURE
}

impl SpeciesThermoRecord {
    /// takes serde Value and parses it into the record
    pub fn from_serde(value: Value) -> Result<Self, KineticsError> {
        Ok(serde_json::from_value(value)?)
    }
}

#[enum_dispatch]
pub trait SpeciesThermo {
    fn thermo_type(&self) -> ThermoType;
    fn n_species(&self) -> usize;
    #[allow(clippy::too_many_arguments)]
    fn install(
        &mut self,
        name: &str,
        k: usize,
        thermo_type: ThermoType,
        coeffs: &[f64],
        min_temp: f64,
        max_temp: f64,
        ref_pressure: f64,
    ) -> Result<(), KineticsError>;
    fn install_record(&mut self, record: &SpeciesThermoRecord) -> Result<(), KineticsError>;
    fn update(
        &self,
        t: f64,
        cp_r: &mut [f64],
        h_rt: &mut [f64],
        s_r: &mut [f64],
    ) -> Result<(), KineticsError>;
    fn update_one(
        &self,
        k: usize,
        t: f64,
        cp_r: &mut [f64],
        h_rt: &mut [f64],
        s_r: &mut [f64],
    ) -> Result<(), KineticsError>;
    fn min_temp(&self, k: Option<usize>) -> Result<f64, KineticsError>;
    fn max_temp(&self, k: Option<usize>) -> Result<f64, KineticsError>;
    fn ref_pressure(&self) -> f64;
    fn report_params(&self, k: usize) -> Result<SpeciesThermoParams, KineticsError>;
    fn modify_params(&mut self, k: usize, coeffs: &[f64]) -> Result<(), KineticsError>;
    fn report_hf298(&self, k: usize) -> Result<f64, KineticsError>;
    fn modify_one_hf298(&mut self, k: usize, h298_new: f64) -> Result<(), KineticsError>;
    fn pretty_print(&self);
}

// the trait forwards to the inherent methods of the generic manager
impl<P: PolyForm> SpeciesThermo for super::piecewise_thermo::PiecewiseThermo<P> {
    fn thermo_type(&self) -> ThermoType {
        P::THERMO_TYPE
    }
    fn n_species(&self) -> usize {
        Self::n_species(self)
    }
    fn install(
        &mut self,
        name: &str,
        k: usize,
        thermo_type: ThermoType,
        coeffs: &[f64],
        min_temp: f64,
        max_temp: f64,
        ref_pressure: f64,
    ) -> Result<(), KineticsError> {
        Self::install(
            self,
            name,
            k,
            thermo_type,
            coeffs,
            min_temp,
            max_temp,
            ref_pressure,
        )
    }
    fn install_record(&mut self, record: &SpeciesThermoRecord) -> Result<(), KineticsError> {
        Self::install_record(self, record)
    }
    fn update(
        &self,
        t: f64,
        cp_r: &mut [f64],
        h_rt: &mut [f64],
        s_r: &mut [f64],
    ) -> Result<(), KineticsError> {
        Self::update(self, t, cp_r, h_rt, s_r)
    }
    fn update_one(
        &self,
        k: usize,
        t: f64,
        cp_r: &mut [f64],
        h_rt: &mut [f64],
        s_r: &mut [f64],
    ) -> Result<(), KineticsError> {
        Self::update_one(self, k, t, cp_r, h_rt, s_r)
    }
    fn min_temp(&self, k: Option<usize>) -> Result<f64, KineticsError> {
        Self::min_temp(self, k)
    }
    fn max_temp(&self, k: Option<usize>) -> Result<f64, KineticsError> {
        Self::max_temp(self, k)
    }
    fn ref_pressure(&self) -> f64 {
        Self::ref_pressure(self)
    }
    fn report_params(&self, k: usize) -> Result<SpeciesThermoParams, KineticsError> {
        Self::report_params(self, k)
    }
    fn modify_params(&mut self, k: usize, coeffs: &[f64]) -> Result<(), KineticsError> {
        Self::modify_params(self, k, coeffs)
    }
    fn report_hf298(&self, k: usize) -> Result<f64, KineticsError> {
        Self::report_hf298(self, k)
    }
    fn modify_one_hf298(&mut self, k: usize, h298_new: f64) -> Result<(), KineticsError> {
        Self::modify_one_hf298(self, k, h298_new)
    }
    fn pretty_print(&self) {
        Self::pretty_print(self)
    }
}

#[derive(Debug, Clone)]
#[enum_dispatch(SpeciesThermo)]
pub enum SpeciesThermoEnum {
    Shomate(ShomateThermo),
    Nasa(NasaThermo),
}

/// empty manager of the given family
pub fn create_species_thermo(thermo_type: ThermoType) -> SpeciesThermoEnum {
    match thermo_type {
        ThermoType::Shomate => SpeciesThermoEnum::Shomate(ShomateThermo::new()),
        ThermoType::Nasa => SpeciesThermoEnum::Nasa(NasaThermo::new()),
    }
}
