//! Participant record of one reaction, as handed over by the mechanism layer.
use crate::error::KineticsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Species, stoichiometric coefficients and reaction orders of one reaction.
///
/// Coefficients may be fractional. Orders are only meaningful for "global"
/// reactions (empirical rate laws); when absent they default to the coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReactionRecord {
    pub reactants: Vec<usize>,
    pub reactant_stoich: Vec<f64>,
    #[serde(default)]
    pub reactant_orders: Option<Vec<f64>>,
    pub products: Vec<usize>,
    pub product_stoich: Vec<f64>,
    #[serde(default)]
    pub product_orders: Option<Vec<f64>>,
    #[serde(default)]
    pub reversible: bool,
    /// custom orders: both sides go to the general (N-ary) evaluation path
    #[serde(default)]
    pub global: bool,
    /// allows fractional product coefficients on a reversible reaction
    #[serde(default)]
    pub reversible_with_frac: bool,
}

/// How one side of a reaction is stored.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SideLayout {
    /// one species index per unit of stoichiometry
    Expanded(Vec<usize>),
    General {
        species: Vec<usize>,
        orders: Vec<f64>,
        stoich: Vec<f64>,
    },
}

impl ReactionRecord {
    /// reactants and products with integer (or fractional) coefficients
    pub fn new(
        reactants: Vec<(usize, f64)>,
        products: Vec<(usize, f64)>,
        reversible: bool,
    ) -> Self {
        let (reactants, reactant_stoich): (Vec<usize>, Vec<f64>) = reactants.into_iter().unzip();
        let (products, product_stoich): (Vec<usize>, Vec<f64>) = products.into_iter().unzip();
        Self {
            reactants,
            reactant_stoich,
            products,
            product_stoich,
            reversible,
            ..Default::default()
        }
    }

    /// marks the reaction as global with explicit reactant orders
    pub fn with_reactant_orders(mut self, orders: Vec<f64>) -> Self {
        self.reactant_orders = Some(orders);
        self.global = true;
        self
    }

    pub fn with_product_orders(mut self, orders: Vec<f64>) -> Self {
        self.product_orders = Some(orders);
        self.global = true;
        self
    }

    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    pub fn reversible_with_frac(mut self, flag: bool) -> Self {
        self.reversible_with_frac = flag;
        self
    }

    /// takes serde Value and parses it into the record
    pub fn from_serde(value: Value) -> Result<Self, KineticsError> {
        Ok(serde_json::from_value(value)?)
    }

    /// checks array lengths, species indices and coefficient values
    pub fn validate(&self, n_species: usize) -> Result<(), KineticsError> {
        validate_side(
            "reactant",
            &self.reactants,
            &self.reactant_stoich,
            self.reactant_orders.as_deref(),
            n_species,
        )?;
        validate_side(
            "product",
            &self.products,
            &self.product_stoich,
            self.product_orders.as_deref(),
            n_species,
        )?;
        if self.reactants.is_empty() && self.products.is_empty() {
            return Err(KineticsError::config(
                "ReactionStoichMgr::add",
                "reaction has neither reactants nor products",
            ));
        }
        Ok(())
    }

    /// Storage layout of the reactant side.
    pub(crate) fn reactant_layout(&self) -> SideLayout {
        let (expanded, is_frac) = expand(&self.reactants, &self.reactant_stoich);
        if is_frac || self.global || expanded.len() > 3 {
            general(&self.reactants, &self.reactant_stoich, self.reactant_orders.as_deref())
        } else {
            SideLayout::Expanded(expanded)
        }
    }

    /// Storage layout of the product side. Fractional coefficients on a reversible
    /// reaction are refused unless `reversible_with_frac` is set.
    pub(crate) fn product_layout(&self) -> Result<SideLayout, KineticsError> {
        let (expanded, is_frac) = expand(&self.products, &self.product_stoich);
        let general_layout =
            || general(&self.products, &self.product_stoich, self.product_orders.as_deref());
        if self.reversible {
            if is_frac && !self.reversible_with_frac {
                return Err(KineticsError::config(
                    "ReactionStoichMgr::add",
                    "fractional product stoichiometric coefficients are only allowed for \
                     irreversible reactions, or reversible ones flagged reversible_with_frac",
                ));
            }
            if expanded.len() > 3 || self.reversible_with_frac || self.global {
                return Ok(general_layout());
            }
            Ok(SideLayout::Expanded(expanded))
        } else if is_frac || self.global || expanded.len() > 3 {
            Ok(general_layout())
        } else {
            Ok(SideLayout::Expanded(expanded))
        }
    }
}

fn validate_side(
    side: &str,
    species: &[usize],
    stoich: &[f64],
    orders: Option<&[f64]>,
    n_species: usize,
) -> Result<(), KineticsError> {
    const CTX: &str = "ReactionStoichMgr::add";
    if species.len() != stoich.len() {
        return Err(KineticsError::config(
            CTX,
            format!(
                "{} species count {} differs from coefficient count {}",
                side,
                species.len(),
                stoich.len()
            ),
        ));
    }
    if let Some(orders) = orders {
        if orders.len() != species.len() {
            return Err(KineticsError::config(
                CTX,
                format!(
                    "{} species count {} differs from order count {}",
                    side,
                    species.len(),
                    orders.len()
                ),
            ));
        }
        if let Some(o) = orders.iter().find(|o| !o.is_finite() || **o < 0.0) {
            return Err(KineticsError::config(
                CTX,
                format!("{} order {} must be finite and non-negative", side, o),
            ));
        }
    }
    if let Some(&k) = species.iter().find(|&&k| k >= n_species) {
        return Err(KineticsError::config(
            CTX,
            format!(
                "{} species index {} out of range (number of species {})",
                side, k, n_species
            ),
        ));
    }
    if let Some(nu) = stoich.iter().find(|nu| !nu.is_finite() || **nu <= 0.0) {
        return Err(KineticsError::config(
            CTX,
            format!("{} coefficient {} must be finite and positive", side, nu),
        ));
    }
    Ok(())
}

/// repeats every species by the integer part of its coefficient; reports whether
/// any coefficient has a fractional part
fn expand(species: &[usize], stoich: &[f64]) -> (Vec<usize>, bool) {
    let mut expanded = Vec::new();
    let mut is_frac = false;
    for (&k, &nu) in species.iter().zip(stoich.iter()) {
        if nu.fract() != 0.0 {
            is_frac = true;
        }
        let units = nu.trunc() as usize;
        // anything above 3 goes N-ary anyway, no need to materialize huge lists
        for _ in 0..units.min(4) {
            expanded.push(k);
        }
    }
    (expanded, is_frac)
}

fn general(species: &[usize], stoich: &[f64], orders: Option<&[f64]>) -> SideLayout {
    SideLayout::General {
        species: species.to_vec(),
        orders: orders.map(|o| o.to_vec()).unwrap_or_else(|| stoich.to_vec()),
        stoich: stoich.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_sides_expand() {
        let r = ReactionRecord::new(vec![(0, 2.0), (1, 1.0)], vec![(2, 1.0)], true);
        assert_eq!(r.reactant_layout(), SideLayout::Expanded(vec![0, 0, 1]));
        assert_eq!(r.product_layout().unwrap(), SideLayout::Expanded(vec![2]));
    }

    #[test]
    fn test_large_multiplicity_goes_general() {
        let r = ReactionRecord::new(vec![(0, 2.0), (1, 2.0)], vec![(2, 4.0)], false);
        assert_eq!(
            r.reactant_layout(),
            SideLayout::General {
                species: vec![0, 1],
                orders: vec![2.0, 2.0],
                stoich: vec![2.0, 2.0]
            }
        );
        assert!(matches!(
            r.product_layout().unwrap(),
            SideLayout::General { .. }
        ));
    }

    #[test]
    fn test_fractional_products() {
        let irrev = ReactionRecord::new(vec![(0, 1.0)], vec![(1, 0.5), (2, 1.5)], false);
        assert!(matches!(
            irrev.product_layout().unwrap(),
            SideLayout::General { .. }
        ));
        let rev = ReactionRecord::new(vec![(0, 1.0)], vec![(1, 0.5)], true);
        assert!(rev.product_layout().unwrap_err().is_configuration_error());
        let rev = rev.reversible_with_frac(true);
        assert!(matches!(
            rev.product_layout().unwrap(),
            SideLayout::General { .. }
        ));
    }

    #[test]
    fn test_global_orders() {
        let r = ReactionRecord::new(vec![(0, 1.0), (1, 2.0)], vec![(2, 1.0)], false)
            .with_reactant_orders(vec![0.25, 1.5]);
        assert_eq!(
            r.reactant_layout(),
            SideLayout::General {
                species: vec![0, 1],
                orders: vec![0.25, 1.5],
                stoich: vec![1.0, 2.0]
            }
        );
    }

    #[test]
    fn test_validate() {
        let r = ReactionRecord::new(vec![(0, 1.0)], vec![(3, 1.0)], false);
        assert!(r.validate(4).is_ok());
        assert!(r.validate(3).unwrap_err().is_configuration_error());

        let mut bad = r.clone();
        bad.reactant_stoich.push(1.0);
        assert!(bad.validate(4).is_err());

        let bad = ReactionRecord::new(vec![(0, 0.0)], vec![(1, 1.0)], false);
        assert!(bad.validate(4).is_err());

        let bad = ReactionRecord::new(vec![(0, 1.0)], vec![(1, 1.0)], false)
            .with_reactant_orders(vec![1.0, 2.0]);
        assert!(bad.validate(4).is_err());

        let empty = ReactionRecord::new(vec![], vec![], false);
        assert!(empty.validate(4).is_err());
    }

    #[test]
    fn test_from_serde() {
        let value = json!({
            "reactants": [0, 1],
            "reactant_stoich": [1.0, 0.5],
            "products": [2],
            "product_stoich": [1.0],
            "global": true,
            "reactant_orders": [1.0, 0.5]
        });
        let r = ReactionRecord::from_serde(value).unwrap();
        assert!(r.global);
        assert!(!r.reversible);
        assert_eq!(r.reactant_orders, Some(vec![1.0, 0.5]));

        let negative = json!({
            "reactants": [-1],
            "reactant_stoich": [1.0],
            "products": [2],
            "product_stoich": [1.0]
        });
        assert!(matches!(
            ReactionRecord::from_serde(negative),
            Err(KineticsError::Serde(_))
        ));
    }
}
