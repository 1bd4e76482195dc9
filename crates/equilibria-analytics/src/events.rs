//! Significant-event detection over a generation history

use equilibria_common::{StrategyId, StrategyRegistry, DOMINANCE_SHARE};
use equilibria_evolution::PopulationState;
use serde::{Deserialize, Serialize};

/// Kind of population transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Count dropped from above zero to zero
    Extinction,
    /// Count rose from zero to above zero
    Emergence,
    /// Share crossed from below 50% to 50% or more
    Dominance,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EventKind::Extinction => "extinction",
            EventKind::Emergence => "emergence",
            EventKind::Dominance => "dominance",
        };
        f.write_str(label)
    }
}

/// A transition observed at `generation`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificantEvent {
    /// Generation at which the new state was observed
    pub generation: u64,
    pub kind: EventKind,
    pub strategy: StrategyId,
}

/// Scan consecutive generation pairs for extinction, emergence and dominance
///
/// Events come out in generation order, then registry order, then
/// extinction / emergence / dominance.
pub fn detect_significant_events(
    history: &[PopulationState],
    strategies: &StrategyRegistry,
) -> Vec<SignificantEvent> {
    let mut events = Vec::new();

    for pair in history.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        for id in strategies.ids() {
            let (before, after) = (prev.count(id), cur.count(id));
            let mut emit = |kind| {
                events.push(SignificantEvent {
                    generation: cur.generation(),
                    kind,
                    strategy: id,
                })
            };

            if before > 0 && after == 0 {
                emit(EventKind::Extinction);
            }
            if before == 0 && after > 0 {
                emit(EventKind::Emergence);
            }
            if prev.share(id) < DOMINANCE_SHARE && cur.share(id) >= DOMINANCE_SHARE {
                emit(EventKind::Dominance);
            }
        }
    }

    events
}
