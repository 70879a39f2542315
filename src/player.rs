use crate::world::{Tile, WorldGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// The goal was collected and the player now stands on its cell
    CollectedGoal,
    Blocked,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Radians, unbounded
    pub angle: f32,
    pub has_won: bool,
}

impl Player {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self {
            x,
            y,
            angle,
            has_won: false,
        }
    }

    /// Rotation is never normalized; trig periodicity takes care of wrap.
    #[inline]
    pub fn rotate(&mut self, delta: f32) {
        self.angle += delta;
    }

    /// Move `speed` world units along (or against) the facing direction.
    ///
    /// A goal tile on the destination cell is cleared and the win flag set
    /// before the walkability check, so picking it up and stepping onto the
    /// freed cell happen in the same call. Anything other than an empty
    /// in-bounds cell leaves the position untouched.
    pub fn try_move(&mut self, grid: &mut WorldGrid, step: Step, speed: f32) -> MoveOutcome {
        let (s, c) = self.angle.sin_cos();
        let sign = match step {
            Step::Forward => 1.0,
            Step::Backward => -1.0,
        };
        let nx = self.x + sign * c * speed;
        let ny = self.y + sign * s * speed;

        let (col, row) = grid.cell_at(nx, ny);
        if !grid.in_bounds(col, row) {
            return MoveOutcome::Blocked;
        }

        let mut collected = false;
        if grid.tile_at(col, row) == Tile::Goal {
            grid.set_tile(col, row, Tile::Empty);
            self.has_won = true;
            collected = true;
        }

        if !grid.tile_at(col, row).is_walkable() {
            return MoveOutcome::Blocked;
        }

        self.x = nx;
        self.y = ny;
        if collected {
            MoveOutcome::CollectedGoal
        } else {
            MoveOutcome::Moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::GridTemplate;
    use std::f32::consts::TAU;

    const TS: f32 = 64.0;

    fn grid() -> WorldGrid {
        let t = GridTemplate::walled(5, 5)
            .with_tile(2, 1, Tile::DecorWallA)
            .with_tile(1, 2, Tile::DecorWallB)
            .with_tile(3, 3, Tile::Goal);
        WorldGrid::from_template(&t, TS)
    }

    #[test]
    fn walls_never_let_the_player_through() {
        let mut g = grid();
        // Every non-empty neighbour of (1,1) is solid; probe from all angles
        for i in 0..360 {
            let angle = TAU * i as f32 / 360.0;
            let mut p = Player::new(1.5 * TS, 1.5 * TS, angle);
            let out = p.try_move(&mut g, Step::Forward, TS);
            let (col, row) = g.cell_at(p.x, p.y);
            if out == MoveOutcome::Blocked {
                assert_eq!((p.x, p.y), (1.5 * TS, 1.5 * TS));
            } else {
                assert_eq!(g.tile_at(col, row), Tile::Empty);
            }
            assert_ne!(g.tile_at(col, row), Tile::Wall);
            assert_ne!(g.tile_at(col, row), Tile::DecorWallA);
            assert_ne!(g.tile_at(col, row), Tile::DecorWallB);
        }
    }

    #[test]
    fn blocked_by_each_solid_kind() {
        let mut g = grid();
        for (angle, kind) in [
            (-std::f32::consts::FRAC_PI_2, Tile::Wall),
            (0.0, Tile::DecorWallA),
            (std::f32::consts::FRAC_PI_2, Tile::DecorWallB),
        ] {
            let mut p = Player::new(1.5 * TS, 1.5 * TS, angle);
            assert_eq!(p.try_move(&mut g, Step::Forward, TS), MoveOutcome::Blocked, "{kind:?}");
            assert_eq!((p.x, p.y), (1.5 * TS, 1.5 * TS));
        }
    }

    #[test]
    fn backward_moves_against_facing() {
        let mut g = grid();
        let mut p = Player::new(2.5 * TS, 2.5 * TS, std::f32::consts::PI);
        assert_eq!(p.try_move(&mut g, Step::Backward, 10.0), MoveOutcome::Moved);
        assert!((p.x - (2.5 * TS + 10.0)).abs() < 1e-3);
        assert!((p.y - 2.5 * TS).abs() < 1e-3);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let t = GridTemplate::new(2, 1, vec![Tile::Empty; 2]).unwrap();
        let mut g = WorldGrid::from_template(&t, TS);
        let mut p = Player::new(10.0, 10.0, std::f32::consts::PI);
        assert_eq!(p.try_move(&mut g, Step::Forward, 20.0), MoveOutcome::Blocked);
        assert_eq!(p.x, 10.0);
    }

    #[test]
    fn goal_pickup_clears_tile_and_moves() {
        let mut g = grid();
        let mut p = Player::new(3.5 * TS, 2.9 * TS, std::f32::consts::FRAC_PI_2);
        assert!(!p.has_won);
        assert_eq!(p.try_move(&mut g, Step::Forward, 10.0), MoveOutcome::CollectedGoal);
        assert!(p.has_won);
        assert_eq!(g.tile_at(3, 3), Tile::Empty);
        assert_eq!(g.cell_at(p.x, p.y), (3, 3));
    }

    #[test]
    fn rotate_is_unbounded() {
        let mut p = Player::new(0.0, 0.0, 0.0);
        for _ in 0..1000 {
            p.rotate(0.05);
        }
        assert!(p.angle > TAU);
        p.rotate(-100.0);
        assert!(p.angle < 0.0);
    }
}
