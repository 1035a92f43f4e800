//! End-to-end scenarios for the tick simulation.
//!
//! Each scenario builds a small map, joins players through the public API
//! and checks the observable outcome of whole ticks.

#![cfg(test)]

use tickshot_common::{PlayerId, Point, SimError, Side};

use crate::bullet::Bullet;
use crate::collider::{Archetype, PlayerCollider};
use crate::events::SimEvent;
use crate::geometry::{BoxShape, Floor, Wall};
use crate::hit::HitTarget;
use crate::item::Knife;
use crate::map::MapDef;
use crate::movement::{self, CanMove, Mover, MovementState, Stance};
use crate::rng::ScriptedRandom;
use crate::sound::SoundKind;
use crate::world::World;

fn world_with(walls: Vec<Wall>, boxes: Vec<BoxShape>) -> World {
    let mut world = World::default();
    world.load_map(&MapDef {
        name: "scenario".to_string(),
        floors: vec![Floor::new(Point::new(0, 0, 0), 2000, 2000)],
        walls,
        boxes,
        spawn_attacker: vec![
            Point::new(100, 0, 100),
            Point::new(300, 0, 100),
            Point::new(500, 0, 100),
        ],
        spawn_defender: vec![Point::new(100, 0, 1900)],
        ..MapDef::default()
    });
    world
}

fn join(world: &mut World, id: u32, position: Point) -> PlayerId {
    let id = PlayerId::new(id);
    world.add_player_collider(PlayerCollider::new(id, Archetype::default(), 100));
    world
        .set_player_position(id, position)
        .expect("joined player");
    id
}

fn position(world: &World, id: PlayerId) -> Point {
    world.collider(id).expect("joined player").position
}

fn tick(world: &mut World, state: &mut MovementState, id: PlayerId, stance: Stance) -> Point {
    movement::resolve_tick(world, state, id, stance, 0.0, &Knife::default())
        .expect("movement resolves")
        .to
}

fn step_sounds(world: &World) -> usize {
    world
        .drain_events()
        .iter()
        .filter(|event| matches!(event, SimEvent::Sound(sound) if sound.kind == SoundKind::Step))
        .count()
}

mod geometry_scenarios {
    use super::*;

    #[test]
    fn scenario_negative_edges_are_walls() {
        let world = world_with(Vec::new(), Vec::new());
        for point in [
            Point::new(-1, 0, 0),
            Point::new(0, 0, -1),
            Point::new(-500, 50, 700),
            Point::new(700, 50, -500),
        ] {
            let wall = world.is_wall_at(point).expect("edge is solid");
            assert!(wall.is_boundary(), "{point} should hit the world edge");
        }
    }

    #[test]
    fn scenario_queries_are_pure() {
        let mut world = world_with(
            vec![Wall::new(Point::new(0, 0, 300), true, 2000, 100)],
            vec![BoxShape::new(Point::new(400, 0, 400), 100, 50, 100)],
        );
        let point = Point::new(450, 50, 450);
        let floor = world.find_floor(point, 10).expect("query");
        let wall = world.is_wall_at(Point::new(50, 50, 300));

        // Unrelated player activity does not change geometry answers
        let id = join(&mut world, 1, Point::new(1000, 0, 1000));
        let mut state = MovementState::default();
        state.move_forward();
        tick(&mut world, &mut state, id, Stance::default());

        for _ in 0..3 {
            assert_eq!(world.find_floor(point, 10).expect("query"), floor);
            assert_eq!(world.is_wall_at(Point::new(50, 50, 300)), wall);
        }
        assert!(floor.is_some());
        assert!(wall.is_some());
    }
}

mod movement_scenarios {
    use super::*;

    #[test]
    fn scenario_counter_strafe_stops_dead() {
        let mut world = world_with(Vec::new(), Vec::new());
        let id = join(&mut world, 1, Point::new(1000, 0, 1000));
        let mut state = MovementState::default();

        state.move_right();
        let after_right = tick(&mut world, &mut state, id, Stance::default());
        assert_eq!(after_right, Point::new(1016, 0, 1000));

        state.move_left();
        let after_left = tick(&mut world, &mut state, id, Stance::default());
        assert_eq!(after_left, after_right, "reversing a strafe must not move");

        // The next tick in the same direction moves again
        state.move_left();
        assert_eq!(
            tick(&mut world, &mut state, id, Stance::default()),
            Point::new(1000, 0, 1000)
        );
    }

    #[test]
    fn scenario_step_over_low_box() {
        let mut world = world_with(
            Vec::new(),
            vec![BoxShape::new(Point::new(400, 0, 600), 400, 20, 400)],
        );
        let id = join(&mut world, 1, Point::new(600, 0, 500));
        let mut state = MovementState::default();

        let mut resolved = Point::default();
        for _ in 0..4 {
            state.move_forward();
            resolved = tick(&mut world, &mut state, id, Stance::default());
        }

        assert_eq!(resolved, Point::new(600, 20, 564), "should climb onto the box");
        let floor = world
            .collider(id)
            .expect("joined player")
            .active_floor
            .expect("standing on the box");
        assert_eq!(floor.y(), 20);
    }

    #[test]
    fn scenario_tall_wall_blocks_aligned_move() {
        let mut world = world_with(
            vec![
                Wall::new(Point::new(0, 0, 545), true, 2000, 300),
                Wall::new(Point::new(545, 0, 0), false, 2000, 300),
            ],
            Vec::new(),
        );
        let id = join(&mut world, 1, Point::new(500, 0, 500));

        let mut mover = Mover::new(&world, id, Stance::default()).expect("mover");
        let start = Point::new(500, 0, 500);
        let mut candidate = Point::new(501, 0, 501);
        for angle in [0, 90] {
            assert_eq!(
                mover.can_move_to(start, &mut candidate, angle),
                Ok(CanMove::Blocked)
            );
            assert_eq!(candidate, Point::new(501, 0, 501));
        }

        let mut state = MovementState::default();
        state.move_forward();
        assert_eq!(tick(&mut world, &mut state, id, Stance::default()), start);
        state.move_right();
        assert_eq!(tick(&mut world, &mut state, id, Stance::default()), start);
        assert_eq!(position(&world, id), start);
    }

    #[test]
    fn scenario_diagonal_into_wall_slides_one_unit() {
        let mut world = world_with(
            vec![Wall::new(Point::new(0, 0, 545), true, 2000, 300)],
            Vec::new(),
        );
        let id = join(&mut world, 1, Point::new(500, 0, 500));
        let mut state = MovementState::default();
        state.move_forward();
        state.move_right();

        let resolved = tick(&mut world, &mut state, id, Stance::default());
        assert_eq!(resolved, Point::new(501, 0, 500));
    }

    #[test]
    fn scenario_footstep_needs_running_grounded_movement() {
        let base = Stance::default();
        let cases = [
            (base, Point::new(1000, 0, 1000), 1),
            (
                Stance {
                    walking: true,
                    ..base
                },
                Point::new(1000, 0, 1000),
                0,
            ),
            (
                Stance {
                    crouching: true,
                    ..base
                },
                Point::new(1000, 0, 1000),
                0,
            ),
            (
                Stance {
                    flying: true,
                    ..base
                },
                Point::new(1000, 0, 1000),
                0,
            ),
            // Facing a tall wall: nothing moves
            (base, Point::new(1000, 0, 1500), 0),
        ];

        for (stance, start, expected) in cases {
            let mut world = world_with(
                vec![Wall::new(Point::new(0, 0, 1545), true, 2000, 300)],
                Vec::new(),
            );
            let id = join(&mut world, 1, start);
            world.drain_events();

            let mut state = MovementState::default();
            state.move_forward();
            let resolved = tick(&mut world, &mut state, id, stance);

            assert_eq!(
                step_sounds(&world),
                expected,
                "stance {stance:?} from {start} resolved to {resolved}"
            );
            if expected == 0 && stance == base {
                assert_eq!(resolved, start);
            }
        }
    }
}

mod fall_scenarios {
    use super::*;
    use crate::movement::FallOutcome;

    fn ledge_world(ledge_height: i32) -> World {
        let mut world = World::default();
        world.load_map(&MapDef {
            name: "ledge".to_string(),
            floors: vec![
                Floor::new(Point::new(0, ledge_height, 0), 1000, 500),
                Floor::new(Point::new(0, 0, 0), 1000, 2000),
            ],
            ..MapDef::default()
        });
        world
    }

    fn walk_off_and_fall(ledge_height: i32) -> (World, PlayerId, FallOutcome) {
        let mut world = ledge_world(ledge_height);
        let id = join(&mut world, 1, Point::new(500, ledge_height, 540));
        let mut state = MovementState::default();
        let mut stance = Stance::default();

        state.move_forward();
        movement::resolve_tick(&mut world, &mut state, id, stance, 0.0, &Knife::default())
            .expect("movement resolves");

        let mut outcome = FallOutcome::Falling;
        for _ in 0..100 {
            outcome = movement::apply_gravity(&mut world, &mut state, id, &mut stance)
                .expect("gravity");
            if outcome != FallOutcome::Falling {
                break;
            }
        }
        (world, id, outcome)
    }

    #[test]
    fn scenario_walking_off_lethal_ledge_kills() {
        // 430 exceeds the default lethal height of 420 only when the ledge
        // drop of the walking tick is counted
        let (world, id, outcome) = walk_off_and_fall(430);
        assert_eq!(outcome, FallOutcome::Died);
        assert!(!world.collider(id).expect("joined player").alive);
        assert!(world
            .drain_events()
            .iter()
            .any(|event| matches!(event, SimEvent::FallDamageKill { killed } if *killed == id)));
    }

    #[test]
    fn scenario_walking_off_safe_ledge_lands() {
        let (world, id, outcome) = walk_off_and_fall(400);
        assert_eq!(outcome, FallOutcome::Landed { height: 400 });
        assert!(world.collider(id).expect("joined player").alive);
    }
}

mod hit_scenarios {
    use super::*;
    use crate::attack;

    #[test]
    fn scenario_floor_hides_wall_at_same_point() {
        let mut world = world_with(
            vec![Wall::new(Point::new(0, 0, 300), true, 2000, 100)],
            Vec::new(),
        );
        let shooter = join(&mut world, 1, Point::new(1500, 0, 1500));

        let mut bullet = Bullet::new(shooter, Point::new(500, 1, 300), 0.0, -90.0, 10);
        bullet.advance();
        assert_eq!(bullet.position(), Point::new(500, 0, 300));
        assert!(world.is_wall_at(bullet.position()).is_some());

        let hits = world.calculate_hits(&mut bullet).expect("hits");
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0], HitTarget::Floor { .. }));
    }

    #[test]
    fn scenario_shot_into_floor_stops_before_wall_behind() {
        let mut world = world_with(
            vec![Wall::new(Point::new(0, 0, 310), true, 2000, 100)],
            Vec::new(),
        );
        let shooter = join(&mut world, 1, Point::new(1500, 0, 1500));

        let mut bullet = Bullet::new(shooter, Point::new(500, 100, 200), 0.0, -45.0, 10);
        let hits = attack::trace_bullet(&mut world, &mut bullet, 1000).expect("trace");
        assert_eq!(hits.len(), 1, "nothing beyond the floor: {hits:?}");
        assert!(matches!(hits[0], HitTarget::Floor { position, .. } if position.y == 0 && position.z < 310));
    }
}

mod spawn_scenarios {
    use super::*;

    #[test]
    fn scenario_spawn_exhaustion_and_round_reset() {
        let mut world = world_with(Vec::new(), Vec::new());
        let mut rng = ScriptedRandom::default();

        for round in 0..2 {
            for _ in 0..3 {
                assert!(
                    world
                        .get_player_spawn_position(Side::Attacker, false, &mut rng)
                        .is_ok(),
                    "round {round} should have three attacker spawns"
                );
            }
            assert_eq!(
                world.get_player_spawn_position(Side::Attacker, false, &mut rng),
                Err(SimError::NoFreeSpawn {
                    side: Side::Attacker
                })
            );
            world.round_reset();
        }
    }

    #[test]
    fn scenario_round_reset_keeps_geometry() {
        let mut world = world_with(
            Vec::new(),
            vec![BoxShape::new(Point::new(400, 0, 400), 100, 50, 100)],
        );
        let walls = world.walls();
        let floors = world.floors();
        world.round_reset();
        assert_eq!(world.walls(), walls);
        assert_eq!(world.floors(), floors);
    }
}
