//! Export of a built stoichiometry manager as Rust source text.
//!
//! The generated module repeats the accumulation the manager performs at run
//! time, with every index baked in:
//! ```rust, ignore
//! pub mod mech {
//!     pub fn get_creation_rates(rf: &[f64], rb: &[f64], c: &mut [f64]) {
//!         c[0] = rb[0];
//!         c[2] = rf[0] + rf[1];
//!     }
//!     ...
//! }
//! ```
//! Species that no reaction touches are written as `= 0.0`.
use super::reaction_stoich_mgr::ReactionStoichMgr;
use crate::error::KineticsError;
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// joins signed terms ("+ x", "- 0.5 * x") into one expression
fn join_terms(terms: &[String]) -> String {
    let mut expr = String::new();
    for (i, term) in terms.iter().enumerate() {
        if i == 0 {
            if let Some(rest) = term.strip_prefix("+ ") {
                expr.push_str(rest);
            } else if let Some(rest) = term.strip_prefix("- ") {
                expr.push('-');
                expr.push_str(rest);
            } else {
                expr.push_str(term);
            }
        } else {
            expr.push(' ');
            expr.push_str(term);
        }
    }
    expr
}

fn write_assignments(
    src: &mut String,
    out: &str,
    n: usize,
    terms: &BTreeMap<usize, Vec<String>>,
) {
    for k in 0..n {
        match terms.get(&k) {
            Some(t) if !t.is_empty() => {
                src.push_str(&format!("        {}[{}] = {};\n", out, k, join_terms(t)));
            }
            _ => {
                src.push_str(&format!("        {}[{}] = 0.0;\n", out, k));
            }
        }
    }
}

fn write_products(src: &mut String, out: &str, factors: &BTreeMap<usize, Vec<String>>) {
    for (rxn, f) in factors {
        if !f.is_empty() {
            src.push_str(&format!("        {}[{}] *= {};\n", out, rxn, f.join(" * ")));
        }
    }
}

impl ReactionStoichMgr {
    /// Rust source of a `mech` module equivalent to this manager.
    pub fn write_source(&self) -> String {
        let mut src = format!(
            "// stoichiometry of {} species and {} reactions\n",
            self.n_species, self.n_reactions
        );
        src.push_str("#[allow(unused_variables)]\npub mod mech {\n");

        let mut creation = BTreeMap::new();
        self.revproducts.write_increment_species("rf", &mut creation);
        self.irrevproducts.write_increment_species("rf", &mut creation);
        self.reactants.write_increment_species("rb", &mut creation);
        src.push_str("    pub fn get_creation_rates(rf: &[f64], rb: &[f64], c: &mut [f64]) {\n");
        write_assignments(&mut src, "c", self.n_species, &creation);
        src.push_str("    }\n\n");

        let mut destruction = BTreeMap::new();
        self.revproducts.write_increment_species("rb", &mut destruction);
        self.irrevproducts.write_increment_species("rb", &mut destruction);
        self.reactants.write_increment_species("rf", &mut destruction);
        src.push_str("    pub fn get_destruction_rates(rf: &[f64], rb: &[f64], d: &mut [f64]) {\n");
        write_assignments(&mut src, "d", self.n_species, &destruction);
        src.push_str("    }\n\n");

        let mut net = BTreeMap::new();
        self.revproducts.write_increment_species("r", &mut net);
        self.irrevproducts.write_increment_species("r", &mut net);
        self.reactants.write_decrement_species("r", &mut net);
        src.push_str("    pub fn get_net_production_rates(r: &[f64], w: &mut [f64]) {\n");
        write_assignments(&mut src, "w", self.n_species, &net);
        src.push_str("    }\n\n");

        let mut fwd = BTreeMap::new();
        self.reactants.write_multiply("c", &mut fwd);
        src.push_str("    pub fn multiply_reactants(c: &[f64], r: &mut [f64]) {\n");
        write_products(&mut src, "r", &fwd);
        src.push_str("    }\n\n");

        let mut rev = BTreeMap::new();
        self.revproducts.write_multiply("c", &mut rev);
        src.push_str("    pub fn multiply_rev_products(c: &[f64], r: &mut [f64]) {\n");
        write_products(&mut src, "r", &rev);
        src.push_str("    }\n}\n");
        src
    }

    /// writes `write_source()` into `path`
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), KineticsError> {
        let path = path.as_ref();
        fs::write(path, self.write_source())?;
        info!("stoichiometry source written to {}", path.display());
        Ok(())
    }
}
