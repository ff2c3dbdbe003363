use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

pub const PITCH_LIMIT: f32 = 89.0;

/// Keys the camera reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKey {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person free-look camera.
///
/// Yaw and pitch are kept in degrees. The basis vectors are derived from them
/// and are orthonormal as long as pitch stays inside `±PITCH_LIMIT`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    movement_speed: f32,
    turn_speed: f32,
}

impl Camera {
    pub fn new(
        position: Vec3,
        world_up: Vec3,
        yaw: f32,
        pitch: f32,
        movement_speed: f32,
        turn_speed: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            // -Z is forward in a right-handed view space.
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: world_up,
            world_up,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            movement_speed,
            turn_speed,
        };
        camera.update_vectors();
        camera
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            config.position,
            config.world_up,
            config.yaw,
            config.pitch,
            config.movement_speed,
            config.turn_speed,
        )
    }

    /// Moves along the front and right axes. Orientation is left untouched.
    pub fn apply_keys<I>(&mut self, pressed: I, dt: f32)
    where
        I: IntoIterator<Item = MovementKey>,
    {
        let distance = self.movement_speed * dt;
        for key in pressed {
            match key {
                MovementKey::Forward => self.position += self.front * distance,
                MovementKey::Backward => self.position -= self.front * distance,
                MovementKey::Right => self.position += self.right * distance,
                MovementKey::Left => self.position -= self.right * distance,
            }
        }
    }

    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.turn_speed;
        self.pitch = (self.pitch + dy * self.turn_speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
