use crate::Kinetics::reaction_record::ReactionRecord;
use crate::Kinetics::reaction_stoich_mgr::{ReactionStoichMgr, ReactionStoichMgrBuilder};
use approx::assert_relative_eq;
use serde_json::json;

// species: 0 H, 1 O2, 2 O, 3 OH, 4 H2O, 5 H2
fn h2_o2_mechanism() -> ReactionStoichMgr {
    let mut builder = ReactionStoichMgrBuilder::new(6, 4);
    // H + O2 <=> O + OH
    builder.add_expanded(0, &[0, 1], &[2, 3], true).unwrap();
    // 2 OH <=> H2O + O
    builder
        .add(1, &ReactionRecord::new(vec![(3, 2.0)], vec![(4, 1.0), (2, 1.0)], true))
        .unwrap();
    // H2 + O -> 2 OH
    builder
        .add(2, &ReactionRecord::new(vec![(5, 1.0), (2, 1.0)], vec![(3, 2.0)], false))
        .unwrap();
    // global H2 + 0.5 O2 -> H2O with empirical orders
    builder
        .add(
            3,
            &ReactionRecord::new(vec![(5, 1.0), (1, 0.5)], vec![(4, 1.0)], false)
                .with_reactant_orders(vec![1.0, 0.25]),
        )
        .unwrap();
    builder.build()
}

pub fn kin_examples(kintask: usize) {
    match kintask {
        0 => {
            // net production rates from net rates of progress
            let mgr = h2_o2_mechanism();
            mgr.pretty_print();
            let ropnet = [1.0, 0.5, 0.2, 0.1];
            let mut wdot = vec![0.0; mgr.n_species()];
            mgr.get_net_production_rates(&ropnet, &mut wdot).unwrap();
            println!("net production rates: {:?}", wdot);
            // H2: -0.2 - 0.1
            assert_relative_eq!(wdot[5], -0.3, epsilon = 1e-12);
            // OH: 1.0 - 2*0.5 + 2*0.2
            assert_relative_eq!(wdot[3], 0.4, epsilon = 1e-12);
            let total: f64 = (0..mgr.n_reactions())
                .map(|rxn| mgr.net_stoich_coeff(4, rxn))
                .sum();
            println!("net stoichiometric coefficients of H2O summed over reactions: {}", total);
        }
        1 => {
            // creation and destruction rates, mass-action products
            let mgr = h2_o2_mechanism();
            let ropf = [2.0, 1.0, 0.5, 0.3];
            let ropr = [0.5, 0.25, 0.0, 0.0];
            let mut cdot = vec![0.0; 6];
            let mut ddot = vec![0.0; 6];
            mgr.get_creation_rates(&ropf, &ropr, &mut cdot).unwrap();
            mgr.get_destruction_rates(&ropf, &ropr, &mut ddot).unwrap();
            println!("creation: {:?}", cdot);
            println!("destruction: {:?}", ddot);

            let conc = [1.0e-3, 0.2, 1.0e-4, 2.0e-4, 0.05, 0.1];
            let mut rate = [1.0e10, 1.0e9, 1.0e8, 1.0e6];
            mgr.multiply_reactants(&conc, &mut rate).unwrap();
            println!("forward rates of progress: {:?}", rate);
            // global reaction: k * [H2] * [O2]^0.25
            assert_relative_eq!(rate[3], 1.0e6 * 0.1 * 0.2_f64.powf(0.25), max_relative = 1e-12);
        }
        2 => {
            // reaction records as they come from a mechanism file
            let records = json!([
                {"reactants": [0, 1], "reactant_stoich": [1.0, 1.0],
                 "products": [2], "product_stoich": [1.0], "reversible": true},
                {"reactants": [2], "reactant_stoich": [1.0],
                 "products": [0, 3], "product_stoich": [1.0, 0.5],
                 "reversible": false}
            ]);
            let records: Vec<ReactionRecord> = serde_json::from_value(records).unwrap();
            let mut builder = ReactionStoichMgrBuilder::new(4, records.len());
            for (rxn, record) in records.iter().enumerate() {
                builder.add(rxn, record).unwrap();
            }
            let mgr = builder.build();
            println!("{}", serde_json::to_string_pretty(&mgr.summary()).unwrap());
            // species rates as generated source code
            println!("{}", mgr.write_source());
        }
        _ => {
            println!("no such example");
        }
    }
}
