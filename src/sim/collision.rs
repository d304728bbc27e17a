//! Ball motion and collision response
//!
//! The heart of the game: how the ball bounces off the field walls, the
//! paddle and the bricks. Every test is a plain bounding-box overlap against
//! the live entities; paddle-top hits go through the randomized rebound that
//! gives the game its feel.

use glam::Vec2;
use rand::Rng;

use super::geom::{Field, Rect};
use super::state::{Ball, Brick, Paddle};
use crate::consts::{MAX_REBOUND_ANGLE, MAX_REJECTION_SAMPLES, MIN_REBOUND_ANGLE};

/// Outcome of one ball advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallStep {
    /// Ball left through the bottom of the field
    pub lose_life: bool,
    /// Summed score of the bricks destroyed (before any level multiplier)
    pub score_gained: u32,
    /// Number of bricks destroyed
    pub bricks_destroyed: usize,
}

/// Which part of the paddle the ball struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleContact {
    None,
    Side,
    Top,
    Bottom,
}

/// Brick edge the ball approached from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// True for the vertical edges (a hit reverses the x velocity)
    fn is_vertical(self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }
}

/// A brick overlapped this tick with the depth of every edge penetrated
#[derive(Debug, Clone, PartialEq)]
pub struct BrickHit {
    pub index: usize,
    /// Edge penetration depths, in left/right/top/bottom order
    pub depths: Vec<(Edge, f32)>,
}

impl BrickHit {
    /// Edge with the smallest penetration; the first one wins ties
    pub fn shallowest(&self) -> Option<Edge> {
        let mut best: Option<(Edge, f32)> = None;
        for &(edge, depth) in &self.depths {
            match best {
                Some((_, lowest)) if depth >= lowest => {}
                _ => best = Some((edge, depth)),
            }
        }
        best.map(|(edge, _)| edge)
    }
}

impl Ball {
    /// Advance one tick: move, then resolve walls, paddle and bricks.
    ///
    /// Destroyed bricks are removed from `bricks`. The ball is left where it
    /// is when it falls out of the field; replacing it is up to the caller.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        paddle: &Paddle,
        bricks: &mut Vec<Brick>,
        field: &Field,
        rng: &mut R,
    ) -> BallStep {
        self.body.center += self.vel;

        let lose_life = self.resolve_walls(field);
        self.resolve_paddle(paddle, rng);
        let (bricks_destroyed, score_gained) = self.resolve_bricks(bricks);

        BallStep {
            lose_life,
            score_gained,
            bricks_destroyed,
        }
    }

    /// Bounce off the left, right and top walls; returns true when the ball
    /// is past the bottom edge.
    pub fn resolve_walls(&mut self, field: &Field) -> bool {
        if self.body.left() < 0.0 {
            self.vel.x = -self.vel.x;
            self.body.set_left(0.0);
        }
        if self.body.right() > field.width {
            self.vel.x = -self.vel.x;
            self.body.set_right(field.width);
        }
        if self.body.top() < 0.0 {
            self.vel.y = -self.vel.y;
            self.body.set_top(0.0);
        }
        self.body.bottom() > field.height
    }

    /// Resolve contact with the paddle. Side, top and bottom are checked in
    /// that order and only the first match applies.
    pub fn resolve_paddle<R: Rng + ?Sized>(&mut self, paddle: &Paddle, rng: &mut R) -> PaddleContact {
        let ball = self.bounds();
        let pad = &paddle.rect;
        if !ball.overlaps(pad) {
            return PaddleContact::None;
        }

        if (ball.left < pad.left && self.vel.x > 0.0) || (ball.right > pad.right && self.vel.x < 0.0)
        {
            self.vel.x = -self.vel.x;
            PaddleContact::Side
        } else if ball.top < pad.top && self.vel.y > 0.0 {
            self.rebound_off_paddle(paddle, rng);
            PaddleContact::Top
        } else if ball.bottom > pad.bottom && self.vel.y < 0.0 {
            // Only reachable if the ball gets underneath the paddle
            self.vel.y = -self.vel.y;
            PaddleContact::Bottom
        } else {
            PaddleContact::None
        }
    }

    /// Randomized rebound off the paddle top
    pub fn rebound_off_paddle<R: Rng + ?Sized>(&mut self, paddle: &Paddle, rng: &mut R) {
        let half_width = paddle.width / 2.0;
        let dist_from_center = (paddle.rect.center_x() - self.body.center.x)
            .abs()
            .min(half_width);

        // Incoming angle, counter-clockwise from +x as if leaving rightward
        let incoming = self.vel.y.atan2(-self.vel.x).to_degrees();

        // Offsets grow up to 1.5x towards the paddle edges
        let offset = rebound_offset(incoming, rng) * ((dist_from_center / half_width) * 0.5 + 1.0);
        let angle = rebound_angle(incoming, offset);

        if self.register_paddle_bounce() {
            log::debug!("Ball sped up to {:.2}", self.speed);
        }

        let rad = angle.to_radians();
        self.vel = Vec2::new(self.speed * rad.cos(), -(self.speed * rad.sin()));

        // Sit exactly on top of the paddle
        self.body.set_bottom(paddle.rect.top);
    }

    /// Count a paddle-top hit; returns true when it triggered a speed-up
    pub fn register_paddle_bounce(&mut self) -> bool {
        self.bounces_until_speed_up = self.bounces_until_speed_up.saturating_sub(1);
        if self.bounces_until_speed_up == 0 {
            self.speed += self.speed_up_amount;
            self.bounces_until_speed_up = self.original_bounces_until_speed_up;
            true
        } else {
            false
        }
    }

    /// Bricks overlapping the ball, each with its penetrated edges
    pub fn brick_hits(&self, bricks: &[Brick]) -> Vec<BrickHit> {
        let ball = self.bounds();
        bricks
            .iter()
            .enumerate()
            .filter(|(_, brick)| ball.overlaps(&brick.rect))
            .map(|(index, brick)| BrickHit {
                index,
                depths: self.penetration(&ball, &brick.rect),
            })
            .collect()
    }

    /// Depth into each brick edge the ball is moving into
    fn penetration(&self, ball: &Rect, brick: &Rect) -> Vec<(Edge, f32)> {
        let mut depths = Vec::with_capacity(4);
        if ball.left < brick.left && self.vel.x > 0.0 {
            depths.push((Edge::Left, ball.right - brick.left));
        }
        if ball.right > brick.right && self.vel.x < 0.0 {
            depths.push((Edge::Right, brick.right - ball.left));
        }
        if ball.top < brick.top && self.vel.y > 0.0 {
            depths.push((Edge::Top, ball.bottom - brick.top));
        }
        if ball.bottom > brick.bottom && self.vel.y < 0.0 {
            depths.push((Edge::Bottom, brick.bottom - ball.top));
        }
        depths
    }

    /// Bounce off every brick hit this tick and remove them.
    ///
    /// Returns `(bricks destroyed, summed score)`.
    pub fn resolve_bricks(&mut self, bricks: &mut Vec<Brick>) -> (usize, u32) {
        let hits = self.brick_hits(bricks);

        match hits.as_slice() {
            [] => return (0, 0),
            [hit] => match hit.shallowest() {
                Some(edge) if edge.is_vertical() => self.vel.x = -self.vel.x,
                Some(_) => self.vel.y = -self.vel.y,
                // Overlapping without moving into any edge
                None => {}
            },
            [a, b] => {
                let (a, b) = (&bricks[a.index].rect, &bricks[b.index].rect);
                if a.left == b.left {
                    // Same column: the ball struck their shared side
                    self.vel.x = -self.vel.x;
                } else if a.top == b.top {
                    self.vel.y = -self.vel.y;
                } else {
                    // Diagonal pair: the ball hit the corner joining them
                    self.vel = -self.vel;
                }
            }
            _ => self.vel = -self.vel,
        }

        let score = hits.iter().map(|hit| bricks[hit.index].score).sum();
        let count = hits.len();
        log::debug!("Ball destroyed {count} brick(s) for {score}");

        // Indices are ascending; remove from the back so the rest stay valid
        for hit in hits.iter().rev() {
            bricks.remove(hit.index);
        }

        (count, score)
    }
}

/// Random angular offset (degrees) for a rebound given the incoming angle
pub fn rebound_offset<R: Rng + ?Sized>(incoming: f32, rng: &mut R) -> f32 {
    if (0.0..=20.0).contains(&incoming) {
        // Shallow: steepen it
        rng.random_range(-45.0..=-20.0)
    } else if (160.0..=180.0).contains(&incoming) {
        rng.random_range(20.0..=45.0)
    } else if (80.0..=100.0).contains(&incoming) {
        // Near vertical: force a real deflection
        steep_offset(rng)
    } else if incoming >= 90.0 {
        // Bias towards keeping the current direction
        rng.random_range(-30.0..=10.0)
    } else {
        rng.random_range(-10.0..=30.0)
    }
}

/// Offset in [-45, 45] outside (-20, 20), rejection sampled
fn steep_offset<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let mut offset: f32 = 0.0;
    for _ in 0..MAX_REJECTION_SAMPLES {
        offset = rng.random_range(-45.0..=45.0);
        if offset.abs() >= 20.0 {
            return offset;
        }
    }
    // Out of draws: push the last one out of the dead zone, keeping its sign
    log::warn!("Rebound offset sampling hit its cap");
    let sign = if offset < 0.0 { -1.0 } else { 1.0 };
    sign * (20.0 + offset.abs() * 1.25)
}

/// Outgoing angle: the mirrored incoming angle plus offset, clamped
pub fn rebound_angle(incoming: f32, offset: f32) -> f32 {
    (180.0 - incoming + offset).clamp(MIN_REBOUND_ANGLE, MAX_REBOUND_ANGLE)
}
