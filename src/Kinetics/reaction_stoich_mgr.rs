//! # Reaction Stoichiometry Manager
//!
//! ## Aim
//! Turns rates of progress of reactions into creation, destruction and net
//! production rates of species, computes per-reaction changes of any
//! per-species quantity (e.g. ΔG of reaction from chemical potentials), and
//! applies the law of mass action to rate constants.
//!
//! ## Main Data Structures and Logic
//! - `ReactionStoichMgrBuilder`: collects reactions during setup, validates every
//!   entry before it touches the buckets
//! - `ReactionStoichMgr`: the frozen result of `build()`; evaluation only needs
//!   `&self`, so one instance can be shared between threads
//! - three `StoichManagerN` sets: reactants of all reactions, products of the
//!   reversible reactions, products of the irreversible reactions
//!
//! ## Usage
//! ```rust, ignore
//! let mut builder = ReactionStoichMgrBuilder::new(n_species, n_reactions);
//! builder.add(0, &ReactionRecord::new(vec![(0, 1.0), (1, 1.0)], vec![(2, 1.0)], false))?;
//! let mgr = builder.build();
//! mgr.get_net_production_rates(&rop_net, &mut wdot)?;
//! ```
use super::reaction_record::{ReactionRecord, SideLayout};
use super::stoich_manager::{BucketCounts, StoichManagerN};
use crate::error::{KineticsError, check_len};
use log::debug;
use prettytable::{Cell, Row, Table};
use serde::Serialize;

/// bucket occupancy of the three sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoichSummary {
    pub reactants: BucketCounts,
    pub rev_products: BucketCounts,
    pub irrev_products: BucketCounts,
}

/// Setup-phase collector of reactions.
#[derive(Debug, Clone)]
pub struct ReactionStoichMgrBuilder {
    n_species: usize,
    n_reactions: usize,
    reactants: StoichManagerN,
    revproducts: StoichManagerN,
    irrevproducts: StoichManagerN,
    /// Some(reversible) once a reaction index is registered
    registered: Vec<Option<bool>>,
}

impl ReactionStoichMgrBuilder {
    pub fn new(n_species: usize, n_reactions: usize) -> Self {
        Self {
            n_species,
            n_reactions,
            reactants: StoichManagerN::new(),
            revproducts: StoichManagerN::new(),
            irrevproducts: StoichManagerN::new(),
            registered: vec![None; n_reactions],
        }
    }

    fn check_reaction_index(&self, rxn: usize) -> Result<(), KineticsError> {
        if rxn >= self.n_reactions {
            return Err(KineticsError::config(
                "ReactionStoichMgr::add",
                format!(
                    "reaction index {} out of range (number of reactions {})",
                    rxn, self.n_reactions
                ),
            ));
        }
        if self.registered[rxn].is_some() {
            return Err(KineticsError::config(
                "ReactionStoichMgr::add",
                format!("reaction {} is already registered", rxn),
            ));
        }
        Ok(())
    }

    /// Registers a reaction with integer stoichiometry given as expanded lists:
    /// a species appears once per unit of its coefficient (2A + B -> [A, A, B]).
    pub fn add_expanded(
        &mut self,
        rxn: usize,
        reactants: &[usize],
        products: &[usize],
        reversible: bool,
    ) -> Result<(), KineticsError> {
        self.check_reaction_index(rxn)?;
        if let Some(&k) = reactants
            .iter()
            .chain(products.iter())
            .find(|&&k| k >= self.n_species)
        {
            return Err(KineticsError::config(
                "ReactionStoichMgr::add",
                format!(
                    "species index {} out of range (number of species {})",
                    k, self.n_species
                ),
            ));
        }
        if reactants.is_empty() && products.is_empty() {
            return Err(KineticsError::config(
                "ReactionStoichMgr::add",
                "reaction has neither reactants nor products",
            ));
        }
        self.reactants.add(rxn, reactants);
        if reversible {
            self.revproducts.add(rxn, products);
        } else {
            self.irrevproducts.add(rxn, products);
        }
        self.registered[rxn] = Some(reversible);
        Ok(())
    }

    /// Registers a reaction from its full record. Integer sides with at most three
    /// units of stoichiometry use the unrolled buckets; fractional, global or larger
    /// sides use the general bucket.
    pub fn add(&mut self, rxn: usize, r: &ReactionRecord) -> Result<(), KineticsError> {
        self.check_reaction_index(rxn)?;
        r.validate(self.n_species)?;
        // both layouts are computed before anything is stored
        let reactant_layout = r.reactant_layout();
        let product_layout = r.product_layout()?;

        store(&mut self.reactants, rxn, reactant_layout);
        if r.reversible {
            store(&mut self.revproducts, rxn, product_layout);
        } else {
            store(&mut self.irrevproducts, rxn, product_layout);
        }
        self.registered[rxn] = Some(r.reversible);
        debug!(
            "reaction {} registered ({})",
            rxn,
            if r.reversible {
                "reversible"
            } else {
                "irreversible"
            }
        );
        Ok(())
    }

    pub fn n_registered(&self) -> usize {
        self.registered.iter().filter(|r| r.is_some()).count()
    }

    /// freezes the collected reactions
    pub fn build(self) -> ReactionStoichMgr {
        ReactionStoichMgr {
            n_species: self.n_species,
            n_reactions: self.n_reactions,
            reactants: self.reactants,
            revproducts: self.revproducts,
            irrevproducts: self.irrevproducts,
            registered: self.registered,
        }
    }
}

fn store(set: &mut StoichManagerN, rxn: usize, layout: SideLayout) {
    match layout {
        SideLayout::Expanded(k) => set.add(rxn, &k),
        SideLayout::General {
            species,
            orders,
            stoich,
        } => set.add_general(rxn, &species, &orders, &stoich),
    }
}

/// Immutable stoichiometry of a mechanism.
#[derive(Debug, Clone)]
pub struct ReactionStoichMgr {
    pub(crate) n_species: usize,
    pub(crate) n_reactions: usize,
    pub(crate) reactants: StoichManagerN,
    pub(crate) revproducts: StoichManagerN,
    pub(crate) irrevproducts: StoichManagerN,
    registered: Vec<Option<bool>>,
}

impl ReactionStoichMgr {
    pub fn n_species(&self) -> usize {
        self.n_species
    }
    pub fn n_reactions(&self) -> usize {
        self.n_reactions
    }
    pub fn is_registered(&self, rxn: usize) -> bool {
        self.registered.get(rxn).is_some_and(|r| r.is_some())
    }
    /// None for unknown reactions
    pub fn is_reversible(&self, rxn: usize) -> Option<bool> {
        self.registered.get(rxn).copied().flatten()
    }

    /// net stoichiometric coefficient of species `k` in reaction `rxn`
    /// (products minus reactants)
    pub fn net_stoich_coeff(&self, k: usize, rxn: usize) -> f64 {
        let sum = |set: &StoichManagerN| -> f64 {
            set.participants(rxn)
                .into_iter()
                .filter(|(sp, _)| *sp == k)
                .map(|(_, nu)| nu)
                .sum()
        };
        sum(&self.revproducts) + sum(&self.irrevproducts) - sum(&self.reactants)
    }

    fn check_species_io(
        &self,
        context: &'static str,
        rates: &[&[f64]],
        out: &[f64],
    ) -> Result<(), KineticsError> {
        for r in rates {
            check_len(context, "rate-of-progress array", r.len(), self.n_reactions)?;
        }
        check_len(context, "species output array", out.len(), self.n_species)
    }

    fn check_reaction_io(
        &self,
        context: &'static str,
        species_input: &[f64],
        out: &[f64],
    ) -> Result<(), KineticsError> {
        check_len(context, "species input array", species_input.len(), self.n_species)?;
        check_len(context, "reaction output array", out.len(), self.n_reactions)
    }

    /// Species creation rates: products are created by the forward direction,
    /// reactants by the reverse direction.
    pub fn get_creation_rates(
        &self,
        ropf: &[f64],
        ropr: &[f64],
        c: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.check_species_io("ReactionStoichMgr::get_creation_rates", &[ropf, ropr], c)?;
        c[..self.n_species].fill(0.0);
        self.revproducts.increment_species(ropf, c);
        self.irrevproducts.increment_species(ropf, c);
        self.reactants.increment_species(ropr, c);
        Ok(())
    }

    /// Species destruction rates: products are destroyed by the reverse direction,
    /// reactants by the forward direction. The reverse rate of an irreversible
    /// reaction is normally zero; it is still counted so that creation minus
    /// destruction equals the net rate for any input.
    pub fn get_destruction_rates(
        &self,
        ropf: &[f64],
        ropr: &[f64],
        d: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.check_species_io("ReactionStoichMgr::get_destruction_rates", &[ropf, ropr], d)?;
        d[..self.n_species].fill(0.0);
        self.revproducts.increment_species(ropr, d);
        self.irrevproducts.increment_species(ropr, d);
        self.reactants.increment_species(ropf, d);
        Ok(())
    }

    /// Species net production rates from net rates of progress.
    pub fn get_net_production_rates(
        &self,
        ropnet: &[f64],
        w: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.check_species_io("ReactionStoichMgr::get_net_production_rates", &[ropnet], w)?;
        w[..self.n_species].fill(0.0);
        self.revproducts.increment_species(ropnet, w);
        self.irrevproducts.increment_species(ropnet, w);
        self.reactants.decrement_species(ropnet, w);
        Ok(())
    }

    /// Per-reaction change of a per-species quantity `g`: Σ products − Σ reactants.
    pub fn get_reaction_delta(&self, g: &[f64], dg: &mut [f64]) -> Result<(), KineticsError> {
        self.check_reaction_io("ReactionStoichMgr::get_reaction_delta", g, dg)?;
        dg[..self.n_reactions].fill(0.0);
        self.revproducts.increment_reactions(g, dg);
        self.irrevproducts.increment_reactions(g, dg);
        self.reactants.decrement_reactions(g, dg);
        Ok(())
    }

    /// Like `get_reaction_delta`, but only products of reversible reactions count.
    pub fn get_rev_reaction_delta(
        &self,
        g: &[f64],
        dg: &mut [f64],
    ) -> Result<(), KineticsError> {
        self.check_reaction_io("ReactionStoichMgr::get_rev_reaction_delta", g, dg)?;
        dg[..self.n_reactions].fill(0.0);
        self.revproducts.increment_reactions(g, dg);
        self.reactants.decrement_reactions(g, dg);
        Ok(())
    }

    /// `r[i] *= Π c[k]^ν` over the reactants of reaction i (forward rates of progress)
    pub fn multiply_reactants(&self, c: &[f64], r: &mut [f64]) -> Result<(), KineticsError> {
        self.check_reaction_io("ReactionStoichMgr::multiply_reactants", c, r)?;
        self.reactants.multiply(c, r);
        Ok(())
    }

    /// `r[i] *= Π c[k]^ν` over the products of reversible reaction i (reverse rates)
    pub fn multiply_rev_products(&self, c: &[f64], r: &mut [f64]) -> Result<(), KineticsError> {
        self.check_reaction_io("ReactionStoichMgr::multiply_rev_products", c, r)?;
        self.revproducts.multiply(c, r);
        Ok(())
    }

    pub fn summary(&self) -> StoichSummary {
        StoichSummary {
            reactants: self.reactants.counts(),
            rev_products: self.revproducts.counts(),
            irrev_products: self.irrevproducts.counts(),
        }
    }

    /// prints the bucket occupancy as a table
    pub fn pretty_print(&self) {
        let summary = self.summary();
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("set"),
            Cell::new("1 species"),
            Cell::new("2 species"),
            Cell::new("3 species"),
            Cell::new("general"),
        ]));
        for (name, counts) in [
            ("reactants", summary.reactants),
            ("reversible products", summary.rev_products),
            ("irreversible products", summary.irrev_products),
        ] {
            table.add_row(Row::new(vec![
                Cell::new(name),
                Cell::new(&counts.c1.to_string()),
                Cell::new(&counts.c2.to_string()),
                Cell::new(&counts.c3.to_string()),
                Cell::new(&counts.cn.to_string()),
            ]));
        }
        println!(
            "{} species, {} reactions ({} registered)",
            self.n_species,
            self.n_reactions,
            self.registered.iter().filter(|r| r.is_some()).count()
        );
        table.printstd();
    }
}
