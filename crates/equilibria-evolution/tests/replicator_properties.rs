//! Property tests for the replicator step

use equilibria_common::{MovePayoffs, PayoffMatrix, PerStrategy, StrategyId, StrategyRegistry};
use equilibria_evolution::{fitness_landscape, PopulationState, ReplicatorRule, ReplicatorStep};
use proptest::prelude::*;

fn classic_state(cooperators: u64, defectors: u64) -> (StrategyRegistry, PopulationState) {
    let registry = StrategyRegistry::classic();
    let state = PopulationState::initial(
        PerStrategy::from_vec(vec![cooperators, defectors]),
        &registry,
    );
    (registry, state)
}

fn positive_payoffs() -> impl Strategy<Value = MovePayoffs> {
    (0.1f64..10.0, 0.1f64..10.0, 0.1f64..10.0, 0.1f64..10.0)
        .prop_map(|(cc, cd, dc, dd)| MovePayoffs { cc, cd, dc, dd })
}

fn any_rule() -> impl Strategy<Value = ReplicatorRule> {
    prop_oneof![
        Just(ReplicatorRule::Normalized),
        Just(ReplicatorRule::ShareWeighted)
    ]
}

proptest! {
    #[test]
    fn population_is_conserved_within_rounding(
        cooperators in 0u64..500,
        defectors in 0u64..500,
        payoffs in positive_payoffs(),
        rule in any_rule(),
    ) {
        prop_assume!(cooperators + defectors > 0);
        let (registry, state) = classic_state(cooperators, defectors);
        let matrix = PayoffMatrix::two_by_two(&payoffs);
        let step = ReplicatorStep::new(&registry, &matrix).with_rule(rule);

        let mut current = state.clone();
        for _ in 0..10 {
            let next = step.next(&current);
            let drift = next.total() as i64 - current.total() as i64;
            prop_assert!(drift.abs() <= registry.len() as i64);
            prop_assert_eq!(next.generation(), current.generation() + 1);
            current = next;
        }
    }

    #[test]
    fn cooperation_rate_stays_in_unit_interval(
        cooperators in 0u64..500,
        defectors in 0u64..500,
        payoffs in positive_payoffs(),
    ) {
        let (registry, state) = classic_state(cooperators, defectors);
        let matrix = PayoffMatrix::two_by_two(&payoffs);
        let next = ReplicatorStep::new(&registry, &matrix).next(&state);
        prop_assert!((0.0..=1.0).contains(&next.cooperation_rate()));
    }

    #[test]
    fn equal_fitness_is_a_fixed_point(half in 1u64..500, payoff in 0.1f64..10.0) {
        let (registry, state) = classic_state(half, half);
        let matrix = PayoffMatrix::two_by_two(&MovePayoffs {
            cc: payoff,
            cd: payoff,
            dc: payoff,
            dd: payoff,
        });
        let next = ReplicatorStep::new(&registry, &matrix).next(&state);
        prop_assert!(next.same_composition(&state));
    }

    #[test]
    fn above_mean_strategy_does_not_shrink_under_share_weighting(
        cooperators in 1u64..500,
        defectors in 1u64..500,
        payoffs in positive_payoffs(),
    ) {
        let (registry, state) = classic_state(cooperators, defectors);
        let matrix = PayoffMatrix::two_by_two(&payoffs);
        let landscape = fitness_landscape(&state, &matrix);
        let next = ReplicatorStep::new(&registry, &matrix)
            .with_rule(ReplicatorRule::ShareWeighted)
            .next(&state);

        for id in [StrategyId(0), StrategyId(1)] {
            if landscape.fitness[id] > landscape.mean_fitness {
                // one individual of rounding slack
                prop_assert!(next.count(id) + 1 >= state.count(id));
            }
        }
    }
}
