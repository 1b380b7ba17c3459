use std::time::Duration;

use cgmath::*;
use rand::{rngs::StdRng, SeedableRng};

use star_catcher::{
    config::GameConfig,
    entities::CharacterSet,
    event_dispatch::Message,
    input::Key,
    state::{
        app_state::AppState,
        events::{Callback, Event},
        game_state::GameSession,
        scene::Scene,
    },
};

type App = AppState<GameSession<StdRng>>;

const DT: Duration = Duration::from_millis(16);

fn app_with(character: CharacterSet, seed: u64) -> App {
    let config = GameConfig {
        character,
        ..Default::default()
    };
    let session = GameSession::new(&config, StdRng::seed_from_u64(seed));
    AppState::new(&config, session, None).unwrap()
}

fn app() -> App {
    app_with(CharacterSet::Bones, 1)
}

fn player(app: &App) -> u32 {
    app.scene.handles().unwrap().player
}

fn star_ids(app: &App) -> Vec<u32> {
    app.scene
        .handles()
        .unwrap()
        .star_columns
        .iter()
        .map(|(id, _)| *id)
        .collect()
}

fn collect(app: &mut App, star: u32) {
    let player = player(app);
    app.scene
        .on_star_overlap(&mut app.world, player, star)
        .unwrap();
}

fn bomb_count(app: &App) -> usize {
    let bombs = app.scene.handles().unwrap().bombs;
    app.world.group_members(bombs).len()
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update(DT).unwrap();
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[test]
fn score_is_ten_per_star() {
    let mut app = app();
    let stars = star_ids(&app);
    for (i, star) in stars.iter().take(7).enumerate() {
        collect(&mut app, *star);
        assert_eq!(app.scene.state().score, 10 * (i as u32 + 1));
    }
    assert_eq!(bomb_count(&app), 0);
    assert_eq!(
        app.world
            .text(app.scene.handles().unwrap().score_text)
            .unwrap()
            .content,
        "Score: 70"
    );
}

#[test]
fn collecting_every_star_replenishes_once_and_spawns_one_bomb() {
    let mut app = app();
    let handles = app.scene.handles().unwrap().clone();

    // let the stars fall and scatter first
    run_frames(&mut app, 30);

    for (star, _) in handles.star_columns.iter() {
        let message = Message {
            sender_entity_id: Some(handles.player),
            recipient_entity_id: Some(*star),
            event: Event::Overlap {
                callback: Callback::CollectStar,
                a: handles.player,
                b: *star,
            },
        };
        app.scene.handle_message(&mut app.world, &message).unwrap();
    }

    assert_eq!(app.scene.state().score, 120);
    assert_eq!(bomb_count(&app), 1);
    assert_eq!(app.world.count_active(handles.stars), 12);
    for (i, (star, x)) in handles.star_columns.iter().enumerate() {
        let sprite = app.world.sprite(*star).unwrap();
        assert_eq!(*x, 12.0 + 70.0 * i as f32);
        assert_eq!(sprite.position, point2(*x, 0.0));
        assert!(sprite.visible);
        assert_eq!(sprite.velocity(), vec2(0.0, 0.0));
    }

    let notifications = app.scene.drain_notifications();
    let replenishes = notifications
        .iter()
        .filter(|m| matches!(m.event, Event::StarsReplenished { count: 12 }))
        .count();
    let spawns = notifications
        .iter()
        .filter(|m| matches!(m.event, Event::HazardSpawned { .. }))
        .count();
    assert_eq!(replenishes, 1);
    assert_eq!(spawns, 1);
}

#[test]
fn stars_collected_in_one_physics_step_replenish_once() {
    let mut app = app();
    let handles = app.scene.handles().unwrap().clone();
    run_frames(&mut app, 120);

    let active: Vec<u32> = star_ids(&app)
        .into_iter()
        .filter(|id| app.world.is_active(*id))
        .collect();
    assert!(active.len() >= 3);
    let (direct, touching) = active.split_at(active.len() - 3);
    for star in direct {
        collect(&mut app, *star);
    }
    app.scene.drain_notifications();

    // the last three stars all overlap the player during the next step
    let player_position = app.world.sprite(handles.player).unwrap().position;
    for star in touching {
        app.world.set_position(*star, player_position);
        app.world.set_velocity(*star, vec2(0.0, 0.0));
    }
    app.update(DT).unwrap();

    assert_eq!(app.scene.state().score, 120);
    assert_eq!(bomb_count(&app), 1);
    assert_eq!(app.world.count_active(handles.stars), 12);
    assert!(!app.scene.state().game_over);

    let notifications = app.scene.drain_notifications();
    let scores = notifications
        .iter()
        .filter(|m| matches!(m.event, Event::ScoreChanged { .. }))
        .count();
    let replenishes = notifications
        .iter()
        .filter(|m| matches!(m.event, Event::StarsReplenished { .. }))
        .count();
    let spawns = notifications
        .iter()
        .filter(|m| matches!(m.event, Event::HazardSpawned { .. }))
        .count();
    assert_eq!(scores, 3);
    assert_eq!(replenishes, 1);
    assert_eq!(spawns, 1);
}

#[test]
fn second_exhaustion_adds_a_second_bomb() {
    let mut app = app();
    let stars = star_ids(&app);
    for _ in 0..2 {
        for star in stars.iter() {
            collect(&mut app, *star);
        }
    }
    assert_eq!(app.scene.state().score, 240);
    assert_eq!(bomb_count(&app), 2);
    assert_eq!(app.scene.state().bombs_spawned, 2);
}

#[test]
fn bombs_spawn_on_the_far_side_of_the_player() {
    for seed in 0..20 {
        for (player_x, range) in [(100.0, 400.0..800.0), (400.0, 0.0..400.0), (700.0, 0.0..400.0)]
            .iter()
            .cloned()
        {
            let mut app = app_with(CharacterSet::Dude, seed);
            let player = player(&app);
            app.world.set_position(player, point2(player_x, 450.0));
            for star in star_ids(&app) {
                collect(&mut app, star);
            }

            let bombs = app.scene.handles().unwrap().bombs;
            let bomb = app.world.group_members(bombs)[0];
            let sprite = app.world.sprite(bomb).unwrap();
            assert!(
                range.contains(&sprite.position.x),
                "seed {} player at {} spawned bomb at {}",
                seed,
                player_x,
                sprite.position.x
            );
            assert_eq!(sprite.position.y, 16.0);
            assert_eq!(sprite.velocity().y, 20.0);
            assert!(sprite.velocity().x.abs() <= 200.0);
            let body = app.world.body(bomb).unwrap();
            assert_eq!(body.bounce, vec2(1.0, 1.0));
            assert!(body.collide_world_bounds);
        }
    }
}

#[test]
fn same_seed_same_session() {
    let spawn = |seed| {
        let mut app = app_with(CharacterSet::Bones, seed);
        for star in star_ids(&app) {
            collect(&mut app, star);
        }
        let bombs = app.scene.handles().unwrap().bombs;
        let bomb = app.world.group_members(bombs)[0];
        let sprite = app.world.sprite(bomb).unwrap();
        (sprite.position, sprite.velocity())
    };
    assert_eq!(spawn(99), spawn(99));
}

#[test]
fn player_lands_then_jumps() {
    let mut app = app();
    let player = player(&app);

    // airborne at start: up does nothing to vertical velocity beyond gravity
    app.input.hold(Key::Up, true);
    app.update(DT).unwrap();
    assert!(app.world.sprite(player).unwrap().velocity().y > 0.0);
    app.input.hold(Key::Up, false);

    run_frames(&mut app, 120);
    assert!(app.world.body(player).unwrap().on_ground());
    let bottom = app.world.sprite(player).unwrap().bounds().bottom();
    assert!((bottom - 536.0).abs() < 0.5, "player bottom at {}", bottom);

    app.input.hold(Key::Up, true);
    app.update(DT).unwrap();
    assert_eq!(app.world.sprite(player).unwrap().velocity().y, -330.0);
}

#[test]
fn held_left_and_right_moves_left() {
    let mut app = app_with(CharacterSet::Dude, 5);
    let player = player(&app);
    app.input.hold(Key::Left, true);
    app.input.hold(Key::Right, true);
    app.update(DT).unwrap();

    let sprite = app.world.sprite(player).unwrap();
    assert_eq!(sprite.velocity().x, -160.0);
    assert_eq!(sprite.anims.current_key(), Some("left"));
}

#[test]
fn touching_a_bomb_freezes_the_session() {
    let mut app = app();
    let player = player(&app);
    run_frames(&mut app, 120);

    for star in star_ids(&app) {
        collect(&mut app, star);
    }
    assert_eq!(bomb_count(&app), 1);

    let bombs = app.scene.handles().unwrap().bombs;
    let bomb = app.world.group_members(bombs)[0];
    let player_position = app.world.sprite(player).unwrap().position;
    app.world.set_position(bomb, player_position);
    app.update(DT).unwrap();

    assert!(app.scene.state().game_over);
    assert!(app.world.is_paused());
    assert_eq!(app.world.sprite(player).unwrap().tint, Some(0xff0000));
    assert_eq!(
        app.world.sprite(player).unwrap().anims.current_key(),
        Some("idle")
    );

    let frozen_position = app.world.sprite(player).unwrap().position;
    let frozen_velocity = app.world.sprite(player).unwrap().velocity();
    let score = app.scene.state().score;

    app.input.hold(Key::Right, true);
    app.input.hold(Key::Up, true);
    run_frames(&mut app, 30);

    let sprite = app.world.sprite(player).unwrap();
    assert_eq!(sprite.position, frozen_position);
    assert_eq!(sprite.velocity(), frozen_velocity);
    assert_eq!(app.scene.state().score, score);
    assert!(app.scene.state().game_over);
}
