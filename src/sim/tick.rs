//! Round controller: commands and the fixed-cadence tick
//!
//! One tick advances the paddle, then the ball, and applies the outcome to
//! the round (score, lives, level) and its phase.

use super::countdown::CountdownStatus;
use super::geom::{Field, Rect};
use super::state::{Brick, GameEvent, MoveDirection, Round, RoundPhase};
use crate::settings::Settings;

/// Player commands; each is applied immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Stop,
    TogglePause,
    /// Put the ball back to the base speed, keeping its direction
    ResetBallSpeedToDefault,
    /// Overwrite the remaining lives (0 ends the round)
    SetLives(u32),
}

/// Apply a command to the round
pub fn apply_command(round: &mut Round, command: Command) {
    if round.phase == RoundPhase::GameOver {
        return;
    }

    match command {
        // Paddle input is disabled outside of active play
        Command::MoveLeft | Command::MoveRight if round.phase != RoundPhase::Running => {}
        Command::MoveLeft => round.paddle.set_velocity(MoveDirection::Left),
        Command::MoveRight => round.paddle.set_velocity(MoveDirection::Right),
        Command::Stop => round.paddle.set_velocity(MoveDirection::Stop),
        Command::TogglePause => toggle_pause(round),
        Command::ResetBallSpeedToDefault => {
            let speed = round.settings.ball_speed;
            round.ball.set_speed_keep_direction(speed);
            log::info!("Ball speed reset to {speed}");
        }
        Command::SetLives(lives) => {
            round.lives = lives;
            log::info!("Lives set to {lives}");
            if lives == 0 {
                enter_game_over(round);
            }
        }
    }
}

fn toggle_pause(round: &mut Round) {
    match round.phase {
        RoundPhase::Running | RoundPhase::Countdown => {
            round.countdown.cancel();
            round.paddle.set_velocity(MoveDirection::Stop);
            round.phase = RoundPhase::Paused;
            round.push_event(GameEvent::Paused);
            log::info!("Paused");
        }
        RoundPhase::Paused => {
            round.push_event(GameEvent::Resumed);
            enter_countdown(round);
        }
        RoundPhase::GameOver => {}
    }
}

/// Advance the round by one tick
pub fn tick(round: &mut Round) {
    match round.phase {
        RoundPhase::Paused | RoundPhase::GameOver => return,
        RoundPhase::Countdown => {
            round.time_ticks += 1;
            match round.countdown.advance() {
                CountdownStatus::Stepped(step) => round.push_event(GameEvent::CountdownStep(step)),
                CountdownStatus::Expired | CountdownStatus::Idle => {
                    round.phase = RoundPhase::Running;
                    round.push_event(GameEvent::CountdownFinished);
                }
                CountdownStatus::Counting(_) => {}
            }
            return;
        }
        RoundPhase::Running => {}
    }

    round.time_ticks += 1;

    round.paddle.advance(&round.field);
    let step = round
        .ball
        .advance(&round.paddle, &mut round.bricks, &round.field, &mut round.rng);

    if step.bricks_destroyed > 0 {
        let gained = u64::from(round.level) * u64::from(step.score_gained);
        round.score += gained;
        round.push_event(GameEvent::BricksDestroyed {
            count: step.bricks_destroyed,
            score: gained,
        });
    }

    if step.lose_life {
        lose_life(round);
        if round.phase == RoundPhase::GameOver {
            return;
        }
    }

    if round.bricks.is_empty() {
        next_level(round);
    }
}

fn lose_life(round: &mut Round) {
    round.lives = round.lives.saturating_sub(1);
    round.push_event(GameEvent::LifeLost {
        lives_remaining: round.lives,
    });
    log::info!("Life lost, {} remaining", round.lives);

    round.respawn();
    if round.lives == 0 {
        enter_game_over(round);
    } else {
        enter_countdown(round);
    }
}

fn next_level(round: &mut Round) {
    round.level += 1;
    round.bricks = generate_bricks(&round.settings, &round.field);
    round.respawn();
    round.push_event(GameEvent::LevelCleared { level: round.level });
    log::info!(
        "Level {} (ball speed {:.2})",
        round.level,
        round.ball.speed
    );
    enter_countdown(round);
}

fn enter_countdown(round: &mut Round) {
    round.phase = RoundPhase::Countdown;
    round.countdown.start();
}

fn enter_game_over(round: &mut Round) {
    round.countdown.cancel();
    round.paddle.set_velocity(MoveDirection::Stop);
    round.phase = RoundPhase::GameOver;
    round.push_event(GameEvent::GameOver {
        final_score: round.score,
    });
    log::info!("Game over, final score {}", round.score);
}

/// Build a full brick field: one row per colour, top row worth the most
pub fn generate_bricks(settings: &Settings, field: &Field) -> Vec<Brick> {
    let per_row = settings.bricks_per_row;
    let rows = settings.brick_colours.len() as u32;
    let width = (field.width / per_row as f32).floor();
    let height = settings.brick_height;

    let mut bricks = Vec::with_capacity((per_row * rows) as usize);
    for (row, colour) in (0u32..).zip(&settings.brick_colours) {
        let top = (row + settings.row_gap_from_top) as f32 * height;
        let score = (rows - row) * settings.brick_score;
        for column in 0..per_row {
            let rect = Rect::from_origin_size(column as f32 * width, top, width, height);
            bricks.push(Brick::new(rect, score, colour.as_str()));
        }
    }
    bricks
}

/// Attract-mode steering: keep the paddle under the ball
pub fn autopilot_command(round: &Round) -> Command {
    let ball = &round.ball;
    let paddle = &round.paddle;

    // Aim where the ball will be when it reaches the paddle, if it is falling
    let target = if ball.vel.y > 0.0 {
        let ticks = ((paddle.rect.top - ball.body.bottom()) / ball.vel.y).max(0.0);
        reflect_into(ball.body.center.x + ball.vel.x * ticks, ball.body.radius, round.field.width)
    } else {
        ball.body.center.x
    };

    let offset = target - paddle.rect.center_x();
    let dead_zone = paddle.move_speed.min(paddle.width / 4.0);
    if offset > dead_zone {
        Command::MoveRight
    } else if offset < -dead_zone {
        Command::MoveLeft
    } else {
        Command::Stop
    }
}

/// Fold a projected x back into the field as the side walls would
fn reflect_into(x: f32, radius: f32, width: f32) -> f32 {
    let lo = radius;
    let span = (width - 2.0 * radius).max(1.0);
    let t = (x - lo).rem_euclid(2.0 * span);
    lo + if t > span { 2.0 * span - t } else { t }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn running_round() -> Round {
        let mut round = Round::new(Settings::default(), 12345).unwrap();
        round.countdown.cancel();
        round.phase = RoundPhase::Running;
        round
    }

    #[test]
    fn test_generate_bricks_layout() {
        let settings = Settings::default();
        let bricks = generate_bricks(&settings, &settings.field());
        assert_eq!(bricks.len(), 40);

        let first = &bricks[0];
        assert_eq!(first.rect, Rect::new(0.0, 80.0, 80.0, 100.0));
        assert_eq!(first.score, 40);
        assert_eq!(first.colour, "#FF0000");

        let last = &bricks[39];
        assert_eq!(last.rect, Rect::new(720.0, 140.0, 800.0, 160.0));
        assert_eq!(last.score, 10);
        assert_eq!(last.colour, "#008000");
    }

    #[test]
    fn test_countdown_then_running() {
        let mut round = Round::new(Settings::default(), 1).unwrap();
        let ball_before = round.ball.clone();

        for _ in 0..89 {
            tick(&mut round);
            assert_eq!(round.phase, RoundPhase::Countdown);
        }
        assert_eq!(round.ball, ball_before);

        tick(&mut round);
        assert_eq!(round.phase, RoundPhase::Running);
        let events = round.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::CountdownStep(2),
                GameEvent::CountdownStep(1),
                GameEvent::CountdownFinished,
            ]
        );

        tick(&mut round);
        assert_ne!(round.ball.body.center, ball_before.body.center);
    }

    #[test]
    fn test_moves_ignored_during_countdown() {
        let mut round = Round::new(Settings::default(), 1).unwrap();
        apply_command(&mut round, Command::MoveLeft);
        assert_eq!(round.paddle.speed, 0.0);

        let mut round = running_round();
        apply_command(&mut round, Command::MoveLeft);
        assert_eq!(round.paddle.speed, -15.0);
        apply_command(&mut round, Command::Stop);
        assert_eq!(round.paddle.speed, 0.0);
    }

    #[test]
    fn test_pause_suspends_everything() {
        let mut round = running_round();
        apply_command(&mut round, Command::MoveRight);
        apply_command(&mut round, Command::TogglePause);
        assert_eq!(round.phase, RoundPhase::Paused);
        assert_eq!(round.paddle.speed, 0.0);

        let ball = round.ball.clone();
        let ticks = round.time_ticks;
        for _ in 0..10 {
            tick(&mut round);
        }
        assert_eq!(round.ball, ball);
        assert_eq!(round.time_ticks, ticks);

        apply_command(&mut round, Command::TogglePause);
        assert_eq!(round.phase, RoundPhase::Countdown);
        assert_eq!(round.countdown.display(), Some(3));
        assert_eq!(
            round.drain_events(),
            vec![GameEvent::Paused, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_pause_cancels_countdown() {
        let mut round = Round::new(Settings::default(), 1).unwrap();
        tick(&mut round);
        apply_command(&mut round, Command::TogglePause);
        assert!(!round.countdown.is_pending());
        assert_eq!(round.phase, RoundPhase::Paused);
    }

    #[test]
    fn test_score_multiplied_by_level() {
        let mut round = running_round();
        round.level = 2;
        // Rising straight into the bottom-left brick
        round.ball.body.center = Vec2::new(40.0, 172.0);
        round.ball.vel = Vec2::new(0.0, -8.0);

        tick(&mut round);
        assert_eq!(round.score, 2 * 10);
        assert_eq!(round.bricks.len(), 39);
        assert_eq!(round.ball.vel, Vec2::new(0.0, 8.0));
    }

    #[test]
    fn test_life_lost_respawns_and_counts_down() {
        let mut round = running_round();
        round.ball.body.center = Vec2::new(100.0, 497.0);
        round.ball.vel = Vec2::new(0.0, 8.0);
        round.paddle.rect.translate(Vec2::new(-100.0, 0.0));

        tick(&mut round);
        assert_eq!(round.lives, 2);
        assert_eq!(round.phase, RoundPhase::Countdown);
        assert_eq!(round.ball.body.center, Vec2::new(400.0, 250.0));
        assert_eq!(round.paddle.rect.left, 325.0);
        assert!(
            round
                .drain_events()
                .contains(&GameEvent::LifeLost { lives_remaining: 2 })
        );
    }

    #[test]
    fn test_last_life_ends_round() {
        let mut round = running_round();
        round.lives = 1;
        round.score = 70;
        round.ball.body.center = Vec2::new(100.0, 497.0);

        tick(&mut round);
        assert_eq!(round.lives, 0);
        assert_eq!(round.phase, RoundPhase::GameOver);

        let bricks = round.bricks.len();
        for _ in 0..100 {
            tick(&mut round);
        }
        apply_command(&mut round, Command::SetLives(5));
        assert_eq!(round.score, 70);
        assert_eq!(round.lives, 0);
        assert_eq!(round.bricks.len(), bricks);

        let game_overs = round
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_level_transition() {
        let mut round = running_round();
        round.bricks.clear();
        round.score = 500;

        tick(&mut round);
        assert_eq!(round.level, 2);
        assert_eq!(round.bricks.len(), 40);
        assert_eq!(round.phase, RoundPhase::Countdown);
        assert_eq!(round.score, 500);
        assert!((round.ball.speed - 8.0 * 1.2).abs() < 1e-4);
        assert_eq!(round.ball.original_bounces_until_speed_up, 2);
        assert_eq!(round.ball.vel, Vec2::new(0.0, round.ball.speed));
        assert!(
            round
                .drain_events()
                .contains(&GameEvent::LevelCleared { level: 2 })
        );
    }

    #[test]
    fn test_reset_ball_speed() {
        let mut round = running_round();
        round.ball.speed = 12.0;
        round.ball.vel = Vec2::new(0.0, -12.0);
        apply_command(&mut round, Command::ResetBallSpeedToDefault);
        assert_eq!(round.ball.speed, 8.0);
        assert!((round.ball.vel.y + 8.0).abs() < 1e-4);
        assert!(round.ball.vel.x.abs() < 1e-4);
    }

    #[test]
    fn test_set_lives() {
        let mut round = running_round();
        apply_command(&mut round, Command::SetLives(10));
        assert_eq!(round.lives, 10);

        apply_command(&mut round, Command::SetLives(0));
        assert_eq!(round.phase, RoundPhase::GameOver);
    }

    #[test]
    fn test_autopilot_tracks_ball() {
        let mut round = running_round();
        round.ball.body.center = Vec2::new(700.0, 300.0);
        round.ball.vel = Vec2::new(0.0, 8.0);
        assert_eq!(autopilot_command(&round), Command::MoveRight);

        round.ball.body.center = Vec2::new(50.0, 300.0);
        assert_eq!(autopilot_command(&round), Command::MoveLeft);

        round.ball.body.center = Vec2::new(400.0, 300.0);
        assert_eq!(autopilot_command(&round), Command::Stop);
    }

    #[test]
    fn test_reflect_into_field() {
        assert_eq!(reflect_into(100.0, 8.0, 800.0), 100.0);
        assert_eq!(reflect_into(-12.0, 8.0, 800.0), 28.0);
        assert_eq!(reflect_into(812.0, 8.0, 800.0), 772.0);
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut round = Round::new(Settings::default(), 2024).unwrap();
        for _ in 0..60 * 60 {
            let command = autopilot_command(&round);
            apply_command(&mut round, command);
            tick(&mut round);
        }
        assert!(round.score > 0);
    }
}
