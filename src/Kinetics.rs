/// participant record of one reaction: species, stoichiometric coefficients, orders,
/// reversibility. Deserializable from JSON with `ReactionRecord::from_serde`
pub mod reaction_record;
/// Stoichiometry manager of a mechanism. Built once from reaction records, then
/// evaluates creation, destruction and net production rates of species,
/// per-reaction deltas of species quantities and the law of mass action.
/// # Examples
/// ```
/// use KiRates::Kinetics::reaction_stoich_mgr::ReactionStoichMgrBuilder;
/// // A + B -> C
/// let mut builder = ReactionStoichMgrBuilder::new(3, 1);
/// builder.add_expanded(0, &[0, 1], &[2], false).unwrap();
/// let mgr = builder.build();
/// let mut wdot = [0.0; 3];
/// mgr.get_net_production_rates(&[2.0], &mut wdot).unwrap();
/// assert_eq!(wdot, [-2.0, -2.0, 2.0]);
/// ```
pub mod reaction_stoich_mgr;
/// tests
pub mod reaction_stoich_mgr_tests;
/// sparse multiplier set: the terms of one side of all reactions, bucketed by arity
pub mod stoich_manager;
/// single-reaction terms with 1, 2, 3 or any number of participants
pub mod stoich_terms;
/// export of a built manager as Rust source text
pub mod stoich_writer;
