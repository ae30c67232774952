//! Property tests over arbitrary arenas and input sequences

use petri_colony::command::{InputEvent, InputFrame, ScreenProjection};
use petri_colony::core::config::{EatingConfig, SimulationConfig};
use petri_colony::core::types::{Faction, Vec2};
use petri_colony::entity::cell::CellTemplate;
use petri_colony::render::camera::Camera;
use petri_colony::simulation::eating::can_eat;
use petri_colony::simulation::Simulation;
use proptest::prelude::*;

fn faction_strategy() -> impl Strategy<Value = Faction> {
    prop_oneof![Just(Faction::Player), Just(Faction::Rival), Just(Faction::Viral)]
}

fn template(faction: Faction) -> CellTemplate {
    match faction {
        Faction::Player => CellTemplate::player(),
        Faction::Rival => CellTemplate::rival(),
        Faction::Viral => CellTemplate::viral(),
    }
}

fn quiet_config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig { seed, ..SimulationConfig::default() };
    config.spawners.nutrient.rate = 0.0;
    config.spawners.rival.rate = 0.0;
    config.spawners.viral.rate = 0.0;
    config
}

proptest! {
    #[test]
    fn proptest_eating_is_never_mutual(
        fa in faction_strategy(),
        fb in faction_strategy(),
        sa in 0.5f32..15.0,
        sb in 0.5f32..15.0,
        dx in -3.0f32..3.0,
    ) {
        let rules = EatingConfig::default();
        let mut a = template(fa).instantiate(Vec2::ZERO);
        let mut b = template(fb).instantiate(Vec2::new(dx, 0.0));
        a.set_size(sa);
        b.set_size(sb);

        prop_assert!(!(can_eat(&a, &b, &rules) && can_eat(&b, &a, &rules)));
        if fa == fb || fa == Faction::Viral {
            prop_assert!(!can_eat(&a, &b, &rules));
        }
    }

    #[test]
    fn proptest_sizes_stay_in_bounds_and_selection_stays_valid(
        seed in 0u64..1000,
        cells in proptest::collection::vec(
            (faction_strategy(), 0.5f32..15.0, -6.0f32..6.0, -6.0f32..6.0),
            1..12,
        ),
        clicks in proptest::collection::vec((-6.0f32..6.0, -6.0f32..6.0, any::<bool>()), 0..6),
    ) {
        let mut sim = Simulation::empty(quiet_config(seed)).unwrap();
        let camera = Camera::new(800.0, 600.0);
        for (faction, size, x, y) in &cells {
            let id = sim.world.spawn_from_template(&template(*faction), Vec2::new(*x, *y));
            sim.world.cell_mut(id).unwrap().set_size(*size);
        }

        let mut frame = InputFrame::new();
        for (x, y, additive) in &clicks {
            let at = camera.world_to_screen(Vec2::new(*x, *y));
            frame
                .push(InputEvent::PointerDown { at, additive: *additive })
                .push(InputEvent::PointerUp { at });
        }
        frame
            .push(InputEvent::CommandDown { at: camera.world_to_screen(Vec2::new(2.0, 2.0)) })
            .push(InputEvent::CommandUp);

        for tick in 0..30 {
            let input = if tick == 0 { frame.clone() } else { InputFrame::new() };
            sim.step(&input, &camera);

            for (_, cell) in sim.world.cells() {
                prop_assert!(cell.size >= cell.min_size && cell.size <= cell.max_size);
                prop_assert!(cell.position.is_finite());
            }

            let members = sim.dispatcher.selection.members();
            for (i, id) in members.iter().enumerate() {
                prop_assert!(!members[i + 1..].contains(id));
                let cell = sim.world.cell(*id);
                prop_assert!(cell.is_some_and(|c| c.faction == Faction::Player && c.selected));
            }
        }
    }
}
