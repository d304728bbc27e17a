use brickout::persistence;
use brickout::sim::*;
use brickout::{HighScores, Settings};
use glam::Vec2;

fn play(round: &mut Round, ticks: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        let command = autopilot_command(round);
        apply_command(round, command);
        tick(round);
        events.extend(round.drain_events());
    }
    events
}

fn skip_countdown(round: &mut Round) {
    while round.phase == RoundPhase::Countdown {
        tick(round);
    }
    round.drain_events();
}

#[test]
fn test_same_seed_same_game() {
    let mut a = Round::new(Settings::default(), 99).unwrap();
    let mut b = Round::new(Settings::default(), 99).unwrap();

    let events_a = play(&mut a, 2000);
    let events_b = play(&mut b, 2000);

    assert_eq!(events_a, events_b);
    assert_eq!(a.score, b.score);
    assert_eq!(a.ball, b.ball);
    assert_eq!(a.bricks, b.bricks);
}

#[test]
fn test_frame_reflects_round() {
    let mut round = Round::new(Settings::default(), 4).unwrap();
    {
        let frame = round.frame();
        assert_eq!(frame.phase, RoundPhase::Countdown);
        assert_eq!(frame.countdown, Some(3));
        assert_eq!(frame.bricks.len(), 40);
        assert_eq!(frame.lives, 3);
    }

    skip_countdown(&mut round);
    let frame = round.frame();
    assert_eq!(frame.phase, RoundPhase::Running);
    assert_eq!(frame.countdown, None);
    assert_eq!(frame.ball.body.center, Vec2::new(400.0, 250.0));
}

#[test]
fn test_first_serve_hits_paddle_and_rises() {
    let mut round = Round::new(Settings::default(), 8).unwrap();
    skip_countdown(&mut round);

    // Straight down from 200px above the paddle at 8px per tick
    for _ in 0..25 {
        tick(&mut round);
    }
    assert!(round.ball.vel.y < 0.0);
    assert!((round.ball.vel.length() - round.ball.speed).abs() < 1e-3);
    assert_eq!(round.ball.bounces_until_speed_up, 2);
}

#[test]
fn test_clearing_every_brick_advances_level() {
    let mut round = Round::new(Settings::default(), 21).unwrap();
    skip_countdown(&mut round);
    round.bricks.truncate(1);
    let last = round.bricks[0].rect;

    // Send the ball up into the last brick from below
    round.ball.body.center = Vec2::new(last.center_x(), last.bottom + 12.0);
    round.ball.vel = Vec2::new(0.0, -8.0);
    tick(&mut round);

    assert_eq!(round.level, 2);
    assert_eq!(round.score, 40);
    assert_eq!(round.bricks.len(), 40);
    assert_eq!(round.phase, RoundPhase::Countdown);
    assert!((round.ball.speed - 9.6).abs() < 1e-4);

    let events = round.drain_events();
    assert!(events.contains(&GameEvent::BricksDestroyed { count: 1, score: 40 }));
    assert!(events.contains(&GameEvent::LevelCleared { level: 2 }));
}

#[test]
fn test_losing_every_life() {
    let mut round = Round::new(Settings::default(), 5).unwrap();
    let mut events = Vec::new();

    for _ in 0..3 {
        skip_countdown(&mut round);
        // Park the paddle in the corner so the ball drops past it
        round.paddle.rect = Rect::new(0.0, 450.0, 150.0, 460.0);
        while round.phase == RoundPhase::Running {
            tick(&mut round);
        }
        events.extend(round.drain_events());
    }

    assert!(round.is_over());
    assert_eq!(round.lives, 0);
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver { final_score: 0 })
    );

    let bricks = round.bricks.clone();
    play(&mut round, 100);
    assert_eq!(round.bricks, bricks);
    assert_eq!(round.score, 0);
}

#[test]
fn test_pause_and_resume_restarts_countdown() {
    let mut round = Round::new(Settings::default(), 6).unwrap();
    skip_countdown(&mut round);
    play(&mut round, 30);

    apply_command(&mut round, Command::TogglePause);
    let snapshot = round.ball.clone();
    for _ in 0..500 {
        tick(&mut round);
    }
    assert_eq!(round.ball, snapshot);

    apply_command(&mut round, Command::TogglePause);
    assert_eq!(round.frame().countdown, Some(3));
    skip_countdown(&mut round);
    assert_eq!(round.phase, RoundPhase::Running);
}

#[test]
fn test_save_round_trip_mid_game() {
    let mut round = Round::new(Settings::default(), 31).unwrap();
    play(&mut round, 600);

    let json = persistence::to_json(&round).unwrap();
    let restored = persistence::from_json(&json, Settings::default(), 31).unwrap();

    assert_eq!(
        (restored.lives, restored.score, restored.level),
        (round.lives, round.score, round.level)
    );
    assert_eq!(restored.paddle.rect, round.paddle.rect);
    assert_eq!(restored.bricks, round.bricks);
    assert_eq!(restored.ball.speed, round.ball.speed);
}

#[test]
fn test_leaderboard_records_final_scores() {
    let mut scores = HighScores::new();
    for (label, score) in [("ann", 300), ("bob", 500), ("cy", 300)] {
        scores.add_score(label, score, 1, 0.0);
    }
    let labels: Vec<&str> = scores.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["BO", "CY", "AN"]);
}
