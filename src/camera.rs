use crate::player::Player;

/// View derived from the player pose each frame.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pos: [f32; 2], // (x, y) position in world space
    pub yaw: f32,      // radians, 0 looks down +X, positive turns towards +Y
    pub fov: f32,      // horizontal field of view, radians
    pub fx: f32,       // horizontal focal factor
}

impl Camera {
    pub fn from_player(player: &Player, fov: f32, screen_width: f32) -> Self {
        let mut cam = Camera {
            pos: [player.x, player.y],
            yaw: player.angle,
            fov,
            fx: 0.0,
        };
        cam.set_fov_from_horizontal(screen_width, fov);
        cam
    }

    /// Returns `[right, forward]`: lateral offset and depth along the view
    /// direction.
    #[inline]
    pub fn world_to_camera(&self, p: [f32; 2]) -> [f32; 2] {
        // Translate
        let dx = p[0] - self.pos[0];
        let dy = p[1] - self.pos[1];
        // Rotate by -yaw
        let (s, c) = self.yaw.sin_cos();
        let cx = -dx * s + dy * c;
        let cy = dx * c + dy * s;
        [cx, cy]
    }

    #[inline]
    pub fn project_x(&self, cx: f32, cy: f32, screen_width: f32) -> f32 {
        // center X is half the window width
        let cx0 = 0.5 * screen_width;
        self.fx * (cx / cy) + cx0
    }

    pub fn set_fov_from_horizontal(&mut self, width: f32, fov_x: f32) {
        self.fov = fov_x;
        self.fx = 0.5 * width / (0.5 * fov_x).tan();
    }

    /// Angle of the ray through screen column `x` of `columns`.
    #[inline]
    pub fn column_angle(&self, x: usize, columns: usize) -> f32 {
        self.yaw - self.fov / 2.0 + self.fov * (x as f32 / columns as f32)
    }
}
