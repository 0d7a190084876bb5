//! Sparse stoichiometric multiplier set: all terms of one side of a mechanism,
//! bucketed by arity.
use super::stoich_terms::{C1, C2, C3, CN, StoichTerm};
use serde::Serialize;
use std::collections::BTreeMap;

/// number of terms in each bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub c1: usize,
    pub c2: usize,
    pub c3: usize,
    pub cn: usize,
}

impl BucketCounts {
    pub fn total(&self) -> usize {
        self.c1 + self.c2 + self.c3 + self.cn
    }
}

/// Holds the terms of one side (reactants, reversible products or irreversible
/// products) of every reaction. Terms are only ever added; the set is read-only
/// once the owning manager is built.
#[derive(Debug, Clone, Default)]
pub struct StoichManagerN {
    c1_list: Vec<C1>,
    c2_list: Vec<C2>,
    c3_list: Vec<C3>,
    cn_list: Vec<CN>,
}

impl StoichManagerN {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reaction given as an expanded multiset of species indices, one entry
    /// per unit of stoichiometry. Up to three entries go to the unrolled buckets,
    /// longer lists to the N-ary bucket with unit orders and coefficients.
    pub fn add(&mut self, rxn: usize, k: &[usize]) {
        match *k {
            [] => {}
            [a] => self.c1_list.push(C1::new(rxn, a)),
            [a, b] => self.c2_list.push(C2::new(rxn, a, b)),
            [a, b, c] => self.c3_list.push(C3::new(rxn, a, b, c)),
            _ => {
                let ones = vec![1.0; k.len()];
                self.cn_list
                    .push(CN::new(rxn, k.to_vec(), ones.clone(), ones));
            }
        }
    }

    /// Adds a reaction with explicit orders and (possibly fractional) coefficients.
    pub fn add_general(&mut self, rxn: usize, k: &[usize], order: &[f64], stoich: &[f64]) {
        if k.is_empty() {
            return;
        }
        self.cn_list
            .push(CN::new(rxn, k.to_vec(), order.to_vec(), stoich.to_vec()));
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            c1: self.c1_list.len(),
            c2: self.c2_list.len(),
            c3: self.c3_list.len(),
            cn: self.cn_list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }

    /// (species, coefficient) pairs of reaction `rxn` in this set
    pub fn participants(&self, rxn: usize) -> Vec<(usize, f64)> {
        let mut out = Vec::new();
        collect_participants(&self.c1_list, rxn, &mut out);
        collect_participants(&self.c2_list, rxn, &mut out);
        collect_participants(&self.c3_list, rxn, &mut out);
        collect_participants(&self.cn_list, rxn, &mut out);
        out
    }

    pub fn multiply(&self, input: &[f64], output: &mut [f64]) {
        for t in &self.c1_list {
            t.multiply(input, output);
        }
        for t in &self.c2_list {
            t.multiply(input, output);
        }
        for t in &self.c3_list {
            t.multiply(input, output);
        }
        for t in &self.cn_list {
            t.multiply(input, output);
        }
    }

    pub fn increment_species(&self, input: &[f64], output: &mut [f64]) {
        for t in &self.c1_list {
            t.increment_species(input, output);
        }
        for t in &self.c2_list {
            t.increment_species(input, output);
        }
        for t in &self.c3_list {
            t.increment_species(input, output);
        }
        for t in &self.cn_list {
            t.increment_species(input, output);
        }
    }

    pub fn decrement_species(&self, input: &[f64], output: &mut [f64]) {
        for t in &self.c1_list {
            t.decrement_species(input, output);
        }
        for t in &self.c2_list {
            t.decrement_species(input, output);
        }
        for t in &self.c3_list {
            t.decrement_species(input, output);
        }
        for t in &self.cn_list {
            t.decrement_species(input, output);
        }
    }

    pub fn increment_reactions(&self, input: &[f64], output: &mut [f64]) {
        for t in &self.c1_list {
            t.increment_reaction(input, output);
        }
        for t in &self.c2_list {
            t.increment_reaction(input, output);
        }
        for t in &self.c3_list {
            t.increment_reaction(input, output);
        }
        for t in &self.cn_list {
            t.increment_reaction(input, output);
        }
    }

    pub fn decrement_reactions(&self, input: &[f64], output: &mut [f64]) {
        for t in &self.c1_list {
            t.decrement_reaction(input, output);
        }
        for t in &self.c2_list {
            t.decrement_reaction(input, output);
        }
        for t in &self.c3_list {
            t.decrement_reaction(input, output);
        }
        for t in &self.cn_list {
            t.decrement_reaction(input, output);
        }
    }

    pub fn write_multiply(&self, input: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        write_all(&self.c1_list, out, |t, o| t.write_multiply(input, o));
        write_all(&self.c2_list, out, |t, o| t.write_multiply(input, o));
        write_all(&self.c3_list, out, |t, o| t.write_multiply(input, o));
        write_all(&self.cn_list, out, |t, o| t.write_multiply(input, o));
    }

    pub fn write_increment_species(&self, input: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        self.write_species(input, "+", out);
    }

    pub fn write_decrement_species(&self, input: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        self.write_species(input, "-", out);
    }

    fn write_species(&self, input: &str, sign: &str, out: &mut BTreeMap<usize, Vec<String>>) {
        write_all(&self.c1_list, out, |t, o| t.write_species(input, sign, o));
        write_all(&self.c2_list, out, |t, o| t.write_species(input, sign, o));
        write_all(&self.c3_list, out, |t, o| t.write_species(input, sign, o));
        write_all(&self.cn_list, out, |t, o| t.write_species(input, sign, o));
    }
}

fn collect_participants<T: StoichTerm>(terms: &[T], rxn: usize, out: &mut Vec<(usize, f64)>) {
    for t in terms.iter().filter(|t| t.reaction() == rxn) {
        out.extend(t.participants());
    }
}

fn write_all<T, F>(terms: &[T], out: &mut BTreeMap<usize, Vec<String>>, f: F)
where
    T: StoichTerm,
    F: Fn(&T, &mut BTreeMap<usize, Vec<String>>),
{
    for t in terms {
        f(t, out);
    }
}
