use std::collections::HashSet;

use proptest::prelude::*;

use tourline::editor::{RouteEditor, StopMutation};
use tourline::entities::{TourStop, WaypointRef};
use tourline::fake::FakeAPI;

#[derive(Clone, Debug)]
enum Op {
    Add(f64, f64),
    Remove(usize),
    UpdateText(usize, String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-90.0..=90.0f64, -180.0..=180.0f64).prop_map(|(lat, lng)| Op::Add(lat, lng)),
        (0..8usize).prop_map(Op::Remove),
        (0..8usize, "[a-z ]{0,12}").prop_map(|(i, t)| Op::UpdateText(i, t)),
    ]
}

fn seed(count: usize) -> Vec<TourStop> {
    (0..count)
        .map(|i| TourStop {
            id: format!("srv-{}", i + 1).as_str().into(),
            title: format!("Stop {}", i + 1),
            description: String::new(),
            latitude: i as f64,
            longitude: i as f64,
            order: i as u32 + 1,
        })
        .collect()
}

fn run(editor: &mut RouteEditor, ops: &[Op]) {
    for op in ops {
        match op {
            Op::Add(lat, lng) => {
                let before: HashSet<WaypointRef> =
                    editor.waypoints().iter().map(|wp| wp.id.clone()).collect();
                let id = editor.add_at(*lat, *lng).unwrap();
                assert!(!before.contains(&id));
                assert!(!id.is_saved());
            }
            Op::Remove(i) => {
                if let Some(id) = editor.ref_at(*i % editor.len().max(1)).cloned() {
                    let pending = editor.pending_deletions().len();
                    editor.remove(&id).unwrap();
                    let expected = if id.is_saved() { pending + 1 } else { pending };
                    assert_eq!(editor.pending_deletions().len(), expected);
                }
            }
            Op::UpdateText(i, title) => {
                if let Some(id) = editor.ref_at(*i % editor.len().max(1)).cloned() {
                    editor.update_text(&id, title.clone(), "edited").unwrap();
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn plans_cover_every_stop_once_with_dense_orders(
        seeded in 0..5usize,
        ops in proptest::collection::vec(op(), 0..20),
    ) {
        let mut editor = RouteEditor::load(seed(seeded)).unwrap();
        run(&mut editor, &ops);

        let plan = editor.plan();
        let deleted: HashSet<_> = plan
            .iter()
            .filter_map(|m| match m {
                StopMutation::Delete(id) => Some(id.clone()),
                _ => None,
            })
            .collect();

        prop_assert_eq!(plan.deletes(), editor.pending_deletions().len());
        prop_assert_eq!(
            plan.creates(),
            editor.waypoints().iter().filter(|wp| !wp.id.is_saved()).count()
        );
        prop_assert!(plan.creates() + plan.updates() <= editor.len());

        for mutation in plan.iter() {
            match mutation {
                StopMutation::Delete(_) => {}
                StopMutation::Create { input, .. } => {
                    let index = input.order as usize - 1;
                    prop_assert!(!editor.waypoints()[index].id.is_saved());
                }
                StopMutation::Update { id, input } => {
                    prop_assert!(!deleted.contains(id));
                    let index = input.order as usize - 1;
                    prop_assert_eq!(editor.waypoints()[index].id.server_id(), Some(id));
                }
            }
        }
    }

    #[test]
    fn saving_leaves_the_server_matching_the_route(
        seeded in 0..5usize,
        ops in proptest::collection::vec(op(), 0..20),
    ) {
        let api = FakeAPI::new();
        api.seed_stops("tour-1", seed(seeded));
        let mut editor = RouteEditor::load(api.stops("tour-1")).unwrap();
        run(&mut editor, &ops);

        tokio_test::block_on(editor.save(&api, "tour-1")).unwrap();

        let stops = api.stops("tour-1");
        prop_assert_eq!(stops.len(), editor.len());
        for (index, (stop, waypoint)) in stops.iter().zip(editor.waypoints()).enumerate() {
            prop_assert_eq!(stop.order as usize, index + 1);
            prop_assert_eq!(waypoint.order as usize, index + 1);
            prop_assert_eq!(Some(&stop.id), waypoint.id.server_id());
            prop_assert_eq!(&stop.title, &waypoint.title);
        }
        prop_assert!(editor.pending_deletions().is_empty());
        prop_assert!(editor.plan().is_empty());
    }
}
