//! Single-reaction stoichiometric terms.
//!
//! A term ties one reaction to the species it involves on one side (reactants,
//! reversible products or irreversible products). Terms with one, two or three
//! participants keep flat indices so their loops are fully unrolled; a species
//! entering twice (2A) simply appears twice. Everything else (fractional
//! coefficients, custom orders, more than three units of stoichiometry) is an
//! N-ary term with explicit orders and coefficients.
//!
//! Every term implements [`StoichTerm`]; the buckets in `stoich_manager` are
//! monomorphic `Vec`s, so the hot loops dispatch statically.
use std::collections::BTreeMap;

/// Operations one stoichiometric term supports.
///
/// `input`/`output` are indexed by species or by reaction, as named:
/// * `multiply` - `output[rxn] *= Π input[k]^order_k` (law of mass action)
/// * `increment_species` - `output[k] += ν_k · input[rxn]`
/// * `increment_reaction` - `output[rxn] += Σ ν_k · input[k]`
///
/// and the `decrement_*` counterparts subtract.
pub trait StoichTerm {
    fn reaction(&self) -> usize;
    /// (species, stoichiometric coefficient) pairs of this term
    fn participants(&self) -> Vec<(usize, f64)>;
    fn multiply(&self, input: &[f64], output: &mut [f64]);
    fn increment_species(&self, input: &[f64], output: &mut [f64]);
    fn decrement_species(&self, input: &[f64], output: &mut [f64]);
    fn increment_reaction(&self, input: &[f64], output: &mut [f64]);
    fn decrement_reaction(&self, input: &[f64], output: &mut [f64]);
    /// source text of `multiply`, keyed by reaction
    fn write_multiply(&self, input: &str, out: &mut BTreeMap<usize, Vec<String>>);
    /// source text of the species increments, keyed by species; `sign` is "+" or "-"
    fn write_species(&self, input: &str, sign: &str, out: &mut BTreeMap<usize, Vec<String>>);
}

fn push_term(out: &mut BTreeMap<usize, Vec<String>>, k: usize, term: String) {
    out.entry(k).or_default().push(term);
}

/// one participant
#[derive(Debug, Clone, PartialEq)]
pub struct C1 {
    rxn: usize,
    ic0: usize,
}

impl C1 {
    pub fn new(rxn: usize, ic0: usize) -> Self {
        Self { rxn, ic0 }
    }
}

impl StoichTerm for C1 {
    fn reaction(&self) -> usize {
        self.rxn
    }
    fn participants(&self) -> Vec<(usize, f64)> {
        vec![(self.ic0, 1.0)]
    }
    #[inline]
    fn multiply(&self, input: &[f64], output: &mut [f64]) {
        output[self.rxn] *= input[self.ic0];
    }
    #[inline]
    fn increment_species(&self, input: &[f64], output: &mut [f64]) {
        output[self.ic0] += input[self.rxn];
    }
    #[inline]
    fn decrement_species(&self, input: &[f64], output: &mut [f64]) {
        output[self.ic0] -= input[self.rxn];
    }
    #[inline]
    fn increment_reaction(&self, input: &[f64], output: &mut [f64]) {
        output[self.rxn] += input[self.ic0];
    }
    #[inline]
    fn decrement_reaction(&self, input: &[f64], output: &mut [f64]) {
        output[self.rxn] -= input[self.ic0];
    }
    fn write_multiply(&self, input: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        push_term(out, self.rxn, format!("{}[{}]", input, self.ic0));
    }
    fn write_species(&self, input: &str, sign: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        push_term(out, self.ic0, format!("{} {}[{}]", sign, input, self.rxn));
    }
}

/// two participants (A + B, or 2A)
#[derive(Debug, Clone, PartialEq)]
pub struct C2 {
    rxn: usize,
    ic0: usize,
    ic1: usize,
}

impl C2 {
    pub fn new(rxn: usize, ic0: usize, ic1: usize) -> Self {
        Self { rxn, ic0, ic1 }
    }
}

impl StoichTerm for C2 {
    fn reaction(&self) -> usize {
        self.rxn
    }
    fn participants(&self) -> Vec<(usize, f64)> {
        vec![(self.ic0, 1.0), (self.ic1, 1.0)]
    }
    #[inline]
    fn multiply(&self, input: &[f64], output: &mut [f64]) {
        output[self.rxn] *= input[self.ic0] * input[self.ic1];
    }
    #[inline]
    fn increment_species(&self, input: &[f64], output: &mut [f64]) {
        let x = input[self.rxn];
        output[self.ic0] += x;
        output[self.ic1] += x;
    }
    #[inline]
    fn decrement_species(&self, input: &[f64], output: &mut [f64]) {
        let x = input[self.rxn];
        output[self.ic0] -= x;
        output[self.ic1] -= x;
    }
    #[inline]
    fn increment_reaction(&self, input: &[f64], output: &mut [f64]) {
        output[self.rxn] += input[self.ic0] + input[self.ic1];
    }
    #[inline]
    fn decrement_reaction(&self, input: &[f64], output: &mut [f64]) {
        output[self.rxn] -= input[self.ic0] + input[self.ic1];
    }
    fn write_multiply(&self, input: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        push_term(out, self.rxn, format!("{}[{}]", input, self.ic0));
        push_term(out, self.rxn, format!("{}[{}]", input, self.ic1));
    }
    fn write_species(&self, input: &str, sign: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        for k in [self.ic0, self.ic1] {
            push_term(out, k, format!("{} {}[{}]", sign, input, self.rxn));
        }
    }
}

/// three participants
#[derive(Debug, Clone, PartialEq)]
pub struct C3 {
    rxn: usize,
    ic0: usize,
    ic1: usize,
    ic2: usize,
}

impl C3 {
    pub fn new(rxn: usize, ic0: usize, ic1: usize, ic2: usize) -> Self {
        Self { rxn, ic0, ic1, ic2 }
    }
}

impl StoichTerm for C3 {
    fn reaction(&self) -> usize {
        self.rxn
    }
    fn participants(&self) -> Vec<(usize, f64)> {
        vec![(self.ic0, 1.0), (self.ic1, 1.0), (self.ic2, 1.0)]
    }
    #[inline]
    fn multiply(&self, input: &[f64], output: &mut [f64]) {
        output[self.rxn] *= input[self.ic0] * input[self.ic1] * input[self.ic2];
    }
    #[inline]
    fn increment_species(&self, input: &[f64], output: &mut [f64]) {
        let x = input[self.rxn];
        output[self.ic0] += x;
        output[self.ic1] += x;
        output[self.ic2] += x;
    }
    #[inline]
    fn decrement_species(&self, input: &[f64], output: &mut [f64]) {
        let x = input[self.rxn];
        output[self.ic0] -= x;
        output[self.ic1] -= x;
        output[self.ic2] -= x;
    }
    #[inline]
    fn increment_reaction(&self, input: &[f64], output: &mut [f64]) {
        output[self.rxn] += input[self.ic0] + input[self.ic1] + input[self.ic2];
    }
    #[inline]
    fn decrement_reaction(&self, input: &[f64], output: &mut [f64]) {
        output[self.rxn] -= input[self.ic0] + input[self.ic1] + input[self.ic2];
    }
    fn write_multiply(&self, input: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        for k in [self.ic0, self.ic1, self.ic2] {
            push_term(out, self.rxn, format!("{}[{}]", input, k));
        }
    }
    fn write_species(&self, input: &str, sign: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        for k in [self.ic0, self.ic1, self.ic2] {
            push_term(out, k, format!("{} {}[{}]", sign, input, self.rxn));
        }
    }
}

/// any number of participants with real-valued orders and coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct CN {
    rxn: usize,
    ic: Vec<usize>,
    order: Vec<f64>,
    stoich: Vec<f64>,
}

impl CN {
    /// `ic`, `order` and `stoich` must have equal lengths; the caller validates
    pub fn new(rxn: usize, ic: Vec<usize>, order: Vec<f64>, stoich: Vec<f64>) -> Self {
        debug_assert!(ic.len() == order.len() && ic.len() == stoich.len());
        Self {
            rxn,
            ic,
            order,
            stoich,
        }
    }
    pub fn orders(&self) -> &[f64] {
        &self.order
    }
}

impl StoichTerm for CN {
    fn reaction(&self) -> usize {
        self.rxn
    }
    fn participants(&self) -> Vec<(usize, f64)> {
        self.ic.iter().copied().zip(self.stoich.iter().copied()).collect()
    }
    fn multiply(&self, input: &[f64], output: &mut [f64]) {
        for (&k, &order) in self.ic.iter().zip(self.order.iter()) {
            if order != 0.0 {
                let c = input[k];
                if c > 0.0 {
                    output[self.rxn] *= c.powf(order);
                } else {
                    output[self.rxn] = 0.0;
                }
            }
        }
    }
    fn increment_species(&self, input: &[f64], output: &mut [f64]) {
        let x = input[self.rxn];
        for (&k, &nu) in self.ic.iter().zip(self.stoich.iter()) {
            output[k] += nu * x;
        }
    }
    fn decrement_species(&self, input: &[f64], output: &mut [f64]) {
        let x = input[self.rxn];
        for (&k, &nu) in self.ic.iter().zip(self.stoich.iter()) {
            output[k] -= nu * x;
        }
    }
    fn increment_reaction(&self, input: &[f64], output: &mut [f64]) {
        for (&k, &nu) in self.ic.iter().zip(self.stoich.iter()) {
            output[self.rxn] += nu * input[k];
        }
    }
    fn decrement_reaction(&self, input: &[f64], output: &mut [f64]) {
        for (&k, &nu) in self.ic.iter().zip(self.stoich.iter()) {
            output[self.rxn] -= nu * input[k];
        }
    }
    fn write_multiply(&self, input: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        for (&k, &order) in self.ic.iter().zip(self.order.iter()) {
            if order == 0.0 {
                continue;
            }
            // clamped like `multiply`: a non-positive concentration gives a zero rate
            let factor = if order == 1.0 {
                format!("{}[{}].max(0.0)", input, k)
            } else {
                format!("{}[{}].max(0.0).powf({:?})", input, k, order)
            };
            push_term(out, self.rxn, factor);
        }
    }
    fn write_species(&self, input: &str, sign: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        for (&k, &nu) in self.ic.iter().zip(self.stoich.iter()) {
            let term = if nu == 1.0 {
                format!("{} {}[{}]", sign, input, self.rxn)
            } else {
                format!("{} {:?} * {}[{}]", sign, nu, input, self.rxn)
            };
            push_term(out, k, term);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_c2_repeated_species() {
        // 2A: both slots point to species 0
        let t = C2::new(1, 0, 0);
        let conc = [3.0, 5.0];
        let mut k = [1.0, 2.0];
        t.multiply(&conc, &mut k);
        assert_eq!(k, [1.0, 18.0]);

        let rop = [0.0, 0.5];
        let mut w = [0.0, 0.0];
        t.increment_species(&rop, &mut w);
        assert_eq!(w, [1.0, 0.0]);
        t.decrement_species(&rop, &mut w);
        assert_eq!(w, [0.0, 0.0]);

        let g = [10.0, 20.0];
        let mut dg = [0.0, 0.0];
        t.increment_reaction(&g, &mut dg);
        assert_eq!(dg, [0.0, 20.0]);
    }

    #[test]
    fn test_c3_multiply_and_reaction_delta() {
        let t = C3::new(0, 0, 1, 2);
        let conc = [2.0, 3.0, 4.0];
        let mut k = [0.5];
        t.multiply(&conc, &mut k);
        assert_relative_eq!(k[0], 12.0);
        let mut dg = [1.0];
        t.decrement_reaction(&conc, &mut dg);
        assert_relative_eq!(dg[0], -8.0);
    }

    #[test]
    fn test_cn_fractional_orders() {
        // 0.5 A + 1.5 B with orders 0.5 and 1.0
        let t = CN::new(0, vec![0, 1], vec![0.5, 1.0], vec![0.5, 1.5]);
        let conc = [4.0, 3.0];
        let mut k = [2.0];
        t.multiply(&conc, &mut k);
        assert_relative_eq!(k[0], 2.0 * 2.0 * 3.0);

        let rop = [2.0];
        let mut w = [0.0, 0.0];
        t.increment_species(&rop, &mut w);
        assert_relative_eq!(w[0], 1.0);
        assert_relative_eq!(w[1], 3.0);
    }

    #[test]
    fn test_cn_nonpositive_concentration_zeroes_rate() {
        let t = CN::new(0, vec![0, 1], vec![0.5, 0.0], vec![1.0, 1.0]);
        let mut k = [7.0];
        t.multiply(&[-1e-20, 0.0], &mut k);
        assert_eq!(k[0], 0.0);
        // zero order ignores the concentration entirely
        let t = CN::new(0, vec![1], vec![0.0], vec![1.0]);
        let mut k = [7.0];
        t.multiply(&[1.0, -3.0], &mut k);
        assert_eq!(k[0], 7.0);
    }

    #[test]
    fn test_cn_first_order_export_matches_multiply() {
        let t = CN::new(1, vec![2], vec![1.0], vec![1.0]);
        let mut k = [1.0, 4.0];
        t.multiply(&[0.0, 0.0, -2.0], &mut k);
        assert_eq!(k[1], 0.0);
        // the exported factor evaluates the same way
        let mut mult = BTreeMap::new();
        t.write_multiply("c", &mut mult);
        assert_eq!(mult[&1], vec!["c[2].max(0.0)".to_string()]);
        assert_eq!(4.0 * (-2.0f64).max(0.0), k[1]);
    }

    #[test]
    fn test_write_terms() {
        let mut out = BTreeMap::new();
        C2::new(3, 1, 4).write_species("rf", "+", &mut out);
        CN::new(5, vec![1], vec![0.5], vec![0.5]).write_species("rf", "-", &mut out);
        assert_eq!(out[&1], vec!["+ rf[3]".to_string(), "- 0.5 * rf[5]".to_string()]);
        assert_eq!(out[&4], vec!["+ rf[3]".to_string()]);

        let mut mult = BTreeMap::new();
        CN::new(2, vec![0, 7], vec![1.0, 0.5], vec![1.0, 1.0]).write_multiply("c", &mut mult);
        assert_eq!(
            mult[&2],
            vec!["c[0].max(0.0)".to_string(), "c[7].max(0.0).powf(0.5)".to_string()]
        );
    }
}
