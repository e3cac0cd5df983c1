use std::collections::{HashMap, HashSet};

use crate::entities::{LocalId, ServerId, StopInput, Waypoint, WaypointRef};

#[derive(Clone, Debug, PartialEq)]
pub enum StopMutation {
    Delete(ServerId),
    Create { local: LocalId, input: StopInput },
    Update { id: ServerId, input: StopInput },
}

/// Ordered list of remote calls that brings the server in line with the editor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SavePlan {
    pub mutations: Vec<StopMutation>,
}

impl SavePlan {
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StopMutation> {
        self.mutations.iter()
    }

    pub fn deletes(&self) -> usize {
        self.count(|m| matches!(m, StopMutation::Delete(_)))
    }

    pub fn creates(&self) -> usize {
        self.count(|m| matches!(m, StopMutation::Create { .. }))
    }

    pub fn updates(&self) -> usize {
        self.count(|m| matches!(m, StopMutation::Update { .. }))
    }

    fn count(&self, f: impl Fn(&StopMutation) -> bool) -> usize {
        self.mutations.iter().filter(|m| f(m)).count()
    }
}

/// Diffs the current route against the persisted one.
///
/// Deletions come first, in removal order. Every surviving stop is then sent
/// with `order` set to its 1-based position in `current`; persisted stops that
/// match their snapshot at that position are left alone.
pub fn plan_reconciliation(
    original: &[Waypoint],
    current: &[Waypoint],
    pending_deletions: &[ServerId],
) -> SavePlan {
    let snapshot: HashMap<&ServerId, &Waypoint> = original
        .iter()
        .filter_map(|wp| wp.id.server_id().map(|id| (id, wp)))
        .collect();

    let surviving: HashSet<&ServerId> = current.iter().filter_map(|wp| wp.id.server_id()).collect();

    let mut mutations = Vec::new();
    let mut seen = HashSet::new();

    for id in pending_deletions {
        if surviving.contains(id) {
            tracing::warn!(%id, "stop is both pending deletion and in the route, keeping it");
            continue;
        }
        if seen.insert(id) {
            mutations.push(StopMutation::Delete(id.clone()));
        }
    }

    for (index, waypoint) in current.iter().enumerate() {
        let input = StopInput::from_waypoint(waypoint, index as u32 + 1);

        match &waypoint.id {
            WaypointRef::Unsaved(local) => mutations.push(StopMutation::Create {
                local: *local,
                input,
            }),
            WaypointRef::Saved(id) => {
                let unchanged = snapshot
                    .get(id)
                    .map(|persisted| matches_snapshot(persisted, &input))
                    .unwrap_or(false);

                if !unchanged {
                    mutations.push(StopMutation::Update {
                        id: id.clone(),
                        input,
                    });
                }
            }
        }
    }

    SavePlan { mutations }
}

fn matches_snapshot(persisted: &Waypoint, input: &StopInput) -> bool {
    persisted.title == input.title
        && persisted.description == input.description
        && persisted.coordinates() == input.coordinates
        && persisted.order == input.order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Coordinates;

    fn saved(id: &str, order: u32) -> Waypoint {
        Waypoint::new(
            WaypointRef::Saved(id.into()),
            Coordinates::new(order as f64, order as f64).unwrap(),
            format!("Stop {}", order),
            "".into(),
            order,
        )
    }

    #[test]
    fn untouched_route_needs_no_calls() {
        let original = vec![saved("srv-1", 1), saved("srv-2", 2)];

        assert!(plan_reconciliation(&original, &original, &[]).is_empty());
    }

    #[test]
    fn shifted_stops_are_renumbered_by_position() {
        let original = vec![saved("srv-1", 1), saved("srv-2", 2)];
        let current = vec![original[1].clone()];

        let plan = plan_reconciliation(&original, &current, &["srv-1".into()]);

        assert_eq!(plan.mutations[0], StopMutation::Delete("srv-1".into()));
        match &plan.mutations[1] {
            StopMutation::Update { id, input } => {
                assert_eq!(id, &ServerId::from("srv-2"));
                assert_eq!(input.order, 1);
            }
            other => panic!("unexpected mutation {:?}", other),
        }
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn text_edits_trigger_an_update() {
        let original = vec![saved("srv-1", 1)];
        let mut current = original.clone();
        current[0].description = "Meet at the fountain".into();

        let plan = plan_reconciliation(&original, &current, &[]);

        assert_eq!(plan.updates(), 1);
        assert_eq!(plan.creates() + plan.deletes(), 0);
    }

    #[test]
    fn duplicate_deletions_are_sent_once() {
        let original = vec![saved("srv-1", 1)];

        let plan = plan_reconciliation(&original, &[], &["srv-1".into(), "srv-1".into()]);

        assert_eq!(plan.mutations, vec![StopMutation::Delete("srv-1".into())]);
    }

    #[test]
    fn surviving_stops_are_never_deleted() {
        let original = vec![saved("srv-1", 1)];

        let plan = plan_reconciliation(&original, &original, &["srv-1".into()]);

        assert!(plan.is_empty());
    }
}
