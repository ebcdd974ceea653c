use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use traffic_game::{
    config::{FrameLoopConfig, PlayfieldConfig, SimulationConfig},
    runtime::{frame_loop, lock_world, share_world, FrameLoop, FrameTimer, LoopEvent, ManualClock, NullRenderer},
    simulation::{Car, Direction, FrameSnapshot, LaneSpawner, Point, Rgb, UpdateOutcome, World},
};

fn car_at(direction: Direction, x: f32, y: f32) -> Car {
    let mut car = Car::new(2.0, direction, Rgb::new(60, 60, 60), 0.5, &PlayfieldConfig::default());
    car.set_position(Point::new(x, y));
    car
}

fn seeded_world() -> World {
    let mut config = SimulationConfig::default();
    config.random.seed = Some(1);
    World::new(&config, 0)
}

#[test]
fn test_sleep_fills_the_rest_of_the_interval() {
    let target = Duration::from_micros(16_667);
    let min_sleep = Duration::from_millis(5);

    assert_eq!(
        frame_loop::sleep_duration(Duration::from_millis(2), target, min_sleep),
        Duration::from_micros(14_667)
    );
    assert_eq!(frame_loop::sleep_duration(Duration::from_millis(15), target, min_sleep), min_sleep);
    assert_eq!(frame_loop::sleep_duration(Duration::from_millis(40), target, min_sleep), min_sleep);
}

#[test]
fn test_default_interval_targets_sixty_hertz() {
    let settings = FrameLoopConfig::default();
    let interval = settings.target_interval();
    assert!(interval > Duration::from_micros(16_600) && interval < Duration::from_micros(16_700));
    assert_eq!(settings.min_sleep(), Duration::from_millis(5));
}

#[test]
fn test_tick_updates_then_renders_snapshot() {
    let world = share_world(seeded_world());
    lock_world(&world).push_car(car_at(Direction::NorthBound, 330.0, 500.0));

    let mut frames: Vec<FrameSnapshot> = Vec::new();
    let report = {
        let mut renderer = |frame: &FrameSnapshot| frames.push(frame.clone());
        frame_loop::tick(&world, &mut renderer, 16, 3, 9)
    };

    assert_eq!(report.outcome, Some(UpdateOutcome::Advanced { exited: 0 }));
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].frame, 3);
    assert_eq!(frames[0].generation, 9);
    assert_eq!(frames[0].cars[0].bounds.y, 498.0);
}

#[test]
fn test_paused_tick_still_renders() {
    let world = share_world(seeded_world());
    lock_world(&world).push_car(car_at(Direction::EastBound, 100.0, 430.0));
    lock_world(&world).pause();

    let mut rendered = 0;
    let report = {
        let mut renderer = |frame: &FrameSnapshot| {
            assert!(frame.paused);
            rendered += 1;
        };
        frame_loop::tick(&world, &mut renderer, 16, 0, 0)
    };

    assert_eq!(report.outcome, None);
    assert_eq!(rendered, 1);
    assert_eq!(lock_world(&world).cars()[0].position(), Point::new(100.0, 430.0));
}

#[test]
fn test_tick_after_crash_suspends_spawning() {
    let world = share_world(seeded_world());
    lock_world(&world).push_car(car_at(Direction::NorthBound, 100.0, 100.0));
    lock_world(&world).push_car(car_at(Direction::NorthBound, 100.0, 100.0));

    let first = frame_loop::tick(&world, &mut NullRenderer, 0, 0, 0);
    assert!(first.game_over);
    assert!(lock_world(&world).is_spawning());

    let second = frame_loop::tick(&world, &mut NullRenderer, 16, 1, 0);
    assert!(second.game_over);
    assert_eq!(second.outcome, None);
    assert!(!lock_world(&world).is_spawning());
    assert!(lock_world(&world).spawners().iter().all(LaneSpawner::is_suspended));
}

#[test]
fn test_tick_spawns_and_prunes() {
    let world = share_world(seeded_world());
    lock_world(&world).push_car(car_at(Direction::EastBound, 659.0, 430.0));

    let report = frame_loop::tick(&world, &mut NullRenderer, 3_900, 0, 0);

    assert_eq!(report.spawned, 4);
    assert_eq!(report.pruned, 1);
    assert_eq!(report.score, 1);
    assert_eq!(lock_world(&world).cars().len(), 4);
}

#[test]
fn test_frame_timer_averages_samples() {
    let mut timer = FrameTimer::new(4);
    assert_eq!(timer.average_frame_time(), Duration::ZERO);
    assert_eq!(timer.fps(), 0.0);

    for _ in 0..6 {
        timer.start_frame();
        timer.record_update(Duration::from_millis(2));
        timer.end_frame();
    }

    assert_eq!(timer.average_update_time(), Duration::from_millis(2));
    assert_eq!(timer.end_frame(), Duration::ZERO);
}

#[test]
fn test_running_loop_reports_game_over_once() {
    let world = share_world(seeded_world());
    lock_world(&world).push_car(car_at(Direction::NorthBound, 100.0, 100.0));
    lock_world(&world).push_car(car_at(Direction::NorthBound, 100.0, 100.0));

    let (tx, rx) = mpsc::channel();
    let clock = Arc::new(ManualClock::new(500));
    let driver = FrameLoop::start(
        world.clone(),
        2,
        clock,
        Box::new(NullRenderer),
        &FrameLoopConfig::default(),
        tx,
    )
    .expect("frame loop should start");

    let event = rx.recv_timeout(Duration::from_secs(5)).expect("game over event");
    assert_eq!(event, LoopEvent::GameOver { generation: 2, at_ms: 500, score: 0 });

    // Several more frames pass without a second notification
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    assert!(driver.is_running());

    driver.stop().expect("frame loop should stop cleanly");
    assert!(lock_world(&world).is_game_over());
    assert!(!lock_world(&world).is_spawning());
}
