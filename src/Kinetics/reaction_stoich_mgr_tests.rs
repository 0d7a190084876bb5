/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Kinetics::reaction_record::ReactionRecord;
    use crate::Kinetics::reaction_stoich_mgr::{ReactionStoichMgr, ReactionStoichMgrBuilder};
    use crate::Kinetics::stoich_manager::BucketCounts;
    use crate::error::KineticsError;
    use approx::assert_relative_eq;
    use serde_json::json;

    /// H2/O2 flavoured toy mechanism over 6 species
    /// 0: H + O2 <=> O + OH
    /// 1: 2 OH <=> H2O + O
    /// 2: H2 + O -> 2 OH
    /// 3: 0.5 O2 + H2 -> H2O  (fractional, irreversible)
    /// 4: 2 H2 + O2 + 2 H -> 2 H2O + 2 H  (5 units, N-ary)
    /// species: 0 H, 1 O2, 2 O, 3 OH, 4 H2O, 5 H2
    fn toy_mechanism() -> ReactionStoichMgr {
        let mut b = ReactionStoichMgrBuilder::new(6, 5);
        b.add_expanded(0, &[0, 1], &[2, 3], true).unwrap();
        b.add(1, &ReactionRecord::new(vec![(3, 2.0)], vec![(4, 1.0), (2, 1.0)], true))
            .unwrap();
        b.add(2, &ReactionRecord::new(vec![(5, 1.0), (2, 1.0)], vec![(3, 2.0)], false))
            .unwrap();
        b.add(3, &ReactionRecord::new(vec![(1, 0.5), (5, 1.0)], vec![(4, 1.0)], false))
            .unwrap();
        b.add(
            4,
            &ReactionRecord::new(
                vec![(5, 2.0), (1, 1.0), (0, 2.0)],
                vec![(4, 2.0), (0, 2.0)],
                false,
            ),
        )
        .unwrap();
        b.build()
    }

    #[test]
    fn test_single_reaction_net_rates() {
        // A + B -> C with net rate r
        let mut b = ReactionStoichMgrBuilder::new(4, 1);
        b.add_expanded(0, &[0, 1], &[2], false).unwrap();
        let mgr = b.build();
        let r = 2.5;
        let mut w = [9.0; 4];
        mgr.get_net_production_rates(&[r], &mut w).unwrap();
        assert_eq!(w, [-r, -r, r, 0.0]);
    }

    #[test]
    fn test_creation_minus_destruction_is_net() {
        let mgr = toy_mechanism();
        let ropf = [1.3, 0.7, 2.2, 0.4, 0.05];
        // arbitrary reverse rates, irreversible reactions included
        let ropr = [0.6, 0.2, 0.3, 0.1, 0.02];
        let ropnet: Vec<f64> = ropf.iter().zip(ropr.iter()).map(|(f, r)| f - r).collect();

        let mut c = [0.0; 6];
        let mut d = [0.0; 6];
        let mut w = [0.0; 6];
        mgr.get_creation_rates(&ropf, &ropr, &mut c).unwrap();
        mgr.get_destruction_rates(&ropf, &ropr, &mut d).unwrap();
        mgr.get_net_production_rates(&ropnet, &mut w).unwrap();
        for k in 0..6 {
            assert_relative_eq!(c[k] - d[k], w[k], epsilon = 1e-12);
        }
        // O2 is a reactant of reactions 0, 3 (half) and 4
        assert_relative_eq!(d[1], 1.3 + 0.5 * 0.4 + 0.05, epsilon = 1e-12);
        assert_relative_eq!(c[1], 0.6 + 0.5 * 0.1 + 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_net_stoich_coefficients() {
        let mgr = toy_mechanism();
        assert_relative_eq!(mgr.net_stoich_coeff(3, 1), -2.0);
        assert_relative_eq!(mgr.net_stoich_coeff(3, 2), 2.0);
        assert_relative_eq!(mgr.net_stoich_coeff(1, 3), -0.5);
        // H on both sides of reaction 4 cancels
        assert_relative_eq!(mgr.net_stoich_coeff(0, 4), 0.0);
        assert_relative_eq!(mgr.net_stoich_coeff(5, 4), -2.0);
    }

    #[test]
    fn test_reaction_delta() {
        let mgr = toy_mechanism();
        let g = [1.0, 10.0, 100.0, 1000.0, 10000.0, 100000.0];
        let mut dg = [0.0; 5];
        mgr.get_reaction_delta(&g, &mut dg).unwrap();
        assert_relative_eq!(dg[0], 100.0 + 1000.0 - 1.0 - 10.0);
        assert_relative_eq!(dg[1], 10000.0 + 100.0 - 2000.0);
        assert_relative_eq!(dg[2], 2000.0 - 100000.0 - 100.0);
        assert_relative_eq!(dg[3], 10000.0 - 5.0 - 100000.0);
        assert_relative_eq!(dg[4], 20000.0 + 2.0 - 200000.0 - 10.0 - 2.0);

        let mut drev = [7.0; 5];
        mgr.get_rev_reaction_delta(&g, &mut drev).unwrap();
        assert_relative_eq!(drev[0], dg[0]);
        assert_relative_eq!(drev[1], dg[1]);
        // irreversible: only the reactant sum remains
        assert_relative_eq!(drev[2], -100000.0 - 100.0);
        assert_relative_eq!(drev[3], -5.0 - 100000.0);
    }

    #[test]
    fn test_mass_action() {
        let mgr = toy_mechanism();
        let conc = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let mut kf = [1.0, 2.0, 3.0, 4.0, 5.0];
        mgr.multiply_reactants(&conc, &mut kf).unwrap();
        assert_relative_eq!(kf[0], 1.0 * 0.1 * 0.2, epsilon = 1e-14);
        assert_relative_eq!(kf[1], 2.0 * 0.4 * 0.4, epsilon = 1e-14);
        assert_relative_eq!(kf[2], 3.0 * 0.6 * 0.3, epsilon = 1e-14);
        assert_relative_eq!(kf[3], 4.0 * 0.2f64.sqrt() * 0.6, epsilon = 1e-14);
        assert_relative_eq!(
            kf[4],
            5.0 * 0.6 * 0.6 * 0.2 * 0.1 * 0.1,
            epsilon = 1e-14
        );

        let mut kr = [1.0, 2.0, 3.0, 4.0, 5.0];
        mgr.multiply_rev_products(&conc, &mut kr).unwrap();
        assert_relative_eq!(kr[0], 0.3 * 0.4, epsilon = 1e-14);
        assert_relative_eq!(kr[1], 2.0 * 0.5 * 0.3, epsilon = 1e-14);
        // irreversible reactions are untouched
        assert_eq!(&kr[2..], &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_fractional_order_with_zero_concentration() {
        let mut b = ReactionStoichMgrBuilder::new(2, 1);
        b.add(
            0,
            &ReactionRecord::new(vec![(0, 1.0)], vec![(1, 1.0)], false)
                .with_reactant_orders(vec![0.5]),
        )
        .unwrap();
        let mgr = b.build();
        let mut k = [3.0];
        mgr.multiply_reactants(&[0.0, 1.0], &mut k).unwrap();
        assert_eq!(k[0], 0.0);
        let mut k = [3.0];
        mgr.multiply_reactants(&[-1e-30, 1.0], &mut k).unwrap();
        assert_eq!(k[0], 0.0);
        assert!(k[0].is_finite());
    }

    #[test]
    fn test_flat_and_general_paths_agree() {
        // 2A + B <=> C, once expanded and once as a global reaction with the same orders
        let mut flat = ReactionStoichMgrBuilder::new(3, 1);
        flat.add_expanded(0, &[0, 0, 1], &[2], true).unwrap();
        let flat = flat.build();

        let mut general = ReactionStoichMgrBuilder::new(3, 1);
        general
            .add(
                0,
                &ReactionRecord::new(vec![(0, 2.0), (1, 1.0)], vec![(2, 1.0)], true)
                    .with_reactant_orders(vec![2.0, 1.0]),
            )
            .unwrap();
        let general = general.build();
        assert_eq!(flat.summary().reactants.c3, 1);
        assert_eq!(general.summary().reactants.cn, 1);

        let conc = [0.7, 1.9, 0.1];
        let (mut k1, mut k2) = ([4.0], [4.0]);
        flat.multiply_reactants(&conc, &mut k1).unwrap();
        general.multiply_reactants(&conc, &mut k2).unwrap();
        assert_relative_eq!(k1[0], k2[0], epsilon = 1e-13);

        let (mut w1, mut w2) = ([0.0; 3], [0.0; 3]);
        flat.get_net_production_rates(&[1.7], &mut w1).unwrap();
        general.get_net_production_rates(&[1.7], &mut w2).unwrap();
        for k in 0..3 {
            assert_relative_eq!(w1[k], w2[k], epsilon = 1e-13);
        }
        assert_relative_eq!(w1[0], -3.4, epsilon = 1e-13);
    }

    #[test]
    fn test_bucket_summary() {
        let mgr = toy_mechanism();
        let s = mgr.summary();
        assert_eq!(
            s.reactants,
            BucketCounts {
                c1: 0,
                c2: 3,
                c3: 0,
                cn: 2
            }
        );
        assert_eq!(
            s.rev_products,
            BucketCounts {
                c1: 0,
                c2: 2,
                c3: 0,
                cn: 0
            }
        );
        // reaction 4 products: 2 H2O + 2 H = 4 units -> N-ary
        assert_eq!(
            s.irrev_products,
            BucketCounts {
                c1: 1,
                c2: 1,
                c3: 0,
                cn: 1
            }
        );
        assert!(mgr.is_registered(4));
        assert!(!mgr.is_registered(5));
        assert_eq!(mgr.is_reversible(1), Some(true));
        assert_eq!(mgr.is_reversible(2), Some(false));
        assert_eq!(mgr.is_reversible(9), None);
        mgr.pretty_print();
    }

    #[test]
    fn test_reversible_fractional_products_rejected() {
        let mut b = ReactionStoichMgrBuilder::new(3, 2);
        let rec = ReactionRecord::new(vec![(0, 1.0)], vec![(1, 0.5), (2, 0.5)], true);
        let err = b.add(0, &rec).unwrap_err();
        assert!(err.is_configuration_error());
        // nothing was registered, the index is still free
        assert_eq!(b.n_registered(), 0);

        b.add(0, &rec.reversible_with_frac(true)).unwrap();
        let mgr = b.build();
        assert_eq!(mgr.summary().rev_products.cn, 1);
        let mut kr = [2.0, 1.0];
        mgr.multiply_rev_products(&[1.0, 0.25, 0.04], &mut kr).unwrap();
        assert_relative_eq!(kr[0], 2.0 * 0.5 * 0.2, epsilon = 1e-14);
    }

    #[test]
    fn test_registration_errors() {
        let mut b = ReactionStoichMgrBuilder::new(3, 2);
        b.add_expanded(0, &[0], &[1], false).unwrap();
        // duplicate index
        let err = b.add_expanded(0, &[1], &[2], false).unwrap_err();
        assert!(err.is_configuration_error());
        let err = b
            .add(0, &ReactionRecord::new(vec![(1, 1.0)], vec![(2, 1.0)], false))
            .unwrap_err();
        assert!(err.is_configuration_error());
        // reaction index out of range
        assert!(b.add_expanded(2, &[0], &[1], false).is_err());
        // species index out of range
        assert!(b.add_expanded(1, &[0], &[3], false).is_err());
        assert!(
            b.add(1, &ReactionRecord::new(vec![(7, 1.0)], vec![(1, 1.0)], false))
                .is_err()
        );
        // negative order
        let neg = ReactionRecord::new(vec![(0, 1.0)], vec![(1, 1.0)], false)
            .with_reactant_orders(vec![-1.0]);
        assert!(b.add(1, &neg).unwrap_err().is_configuration_error());
        assert_eq!(b.n_registered(), 1);
        let mgr = b.build();
        assert_eq!(mgr.summary().reactants.total(), 1);
    }

    #[test]
    fn test_undersized_buffers() {
        let mgr = toy_mechanism();
        let ropf = [1.0; 5];
        let mut short = [0.0; 5];
        let err = mgr
            .get_creation_rates(&ropf, &ropf, &mut short)
            .unwrap_err();
        assert!(err.is_invariant_violation());
        // nothing written
        assert_eq!(short, [0.0; 5]);

        let mut w = [0.0; 6];
        assert!(
            mgr.get_net_production_rates(&[1.0; 4], &mut w)
                .unwrap_err()
                .is_invariant_violation()
        );
        let mut dg = [0.0; 4];
        assert!(matches!(
            mgr.get_reaction_delta(&[0.0; 6], &mut dg),
            Err(KineticsError::InvariantViolation { .. })
        ));
        let mut k = [1.0; 5];
        assert!(mgr.multiply_reactants(&[1.0; 5], &mut k).is_err());
        assert!(mgr.multiply_rev_products(&[1.0; 6], &mut k).is_ok());
    }

    #[test]
    fn test_empty_side_contributes_nothing() {
        // A -> (nothing tracked)
        let mut b = ReactionStoichMgrBuilder::new(2, 1);
        b.add_expanded(0, &[0], &[], false).unwrap();
        let mgr = b.build();
        let mut w = [0.0; 2];
        mgr.get_net_production_rates(&[3.0], &mut w).unwrap();
        assert_eq!(w, [-3.0, 0.0]);
    }

    #[test]
    fn test_record_from_json_and_shared_between_threads() {
        let value = json!({
            "reactants": [0, 1],
            "reactant_stoich": [1.0, 1.0],
            "products": [2],
            "product_stoich": [1.0],
            "reversible": true
        });
        let rec = ReactionRecord::from_serde(value).unwrap();
        let mut b = ReactionStoichMgrBuilder::new(3, 1);
        b.add(0, &rec).unwrap();
        let mgr = std::sync::Arc::new(b.build());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mgr = mgr.clone();
                std::thread::spawn(move || {
                    let mut w = [0.0; 3];
                    mgr.get_net_production_rates(&[i as f64], &mut w).unwrap();
                    w
                })
            })
            .collect();
        for (i, h) in handles.into_iter().enumerate() {
            let w = h.join().unwrap();
            assert_eq!(w, [-(i as f64), -(i as f64), i as f64]);
        }
    }
}
