use std::path::PathBuf;

use glam::{vec3, Vec3};

pub const WINDOW_WIDTH: u32 = 1024;
pub const WINDOW_HEIGHT: u32 = 768;
pub const WINDOW_TITLE: &str = "Insanity";

pub const VERTEX_SHADER_PATH: &str = "resources/shaders/shader.vert";
pub const FRAGMENT_SHADER_PATH: &str = "resources/shaders/shader.frag";

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Vertical field of view in degrees.
pub const FIELD_OF_VIEW: f32 = 45.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Units per second.
pub const MOVEMENT_SPEED: f32 = 5.0;
/// Degrees per pixel of cursor travel.
pub const TURN_SPEED: f32 = 0.5;

/// Initial pose and tuning of the first-person camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub turn_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: MOVEMENT_SPEED,
            turn_speed: TURN_SPEED,
        }
    }
}

/// Where a mesh is placed in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    /// Index into the application's mesh list.
    pub mesh: usize,
    pub translation: Vec3,
    pub scale: Vec3,
}

impl SceneObject {
    pub fn model_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_translation(self.translation) * glam::Mat4::from_scale(self.scale)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub clear_color: [f32; 4],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera: CameraConfig,
    pub objects: Vec<SceneObject>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            title: WINDOW_TITLE.to_string(),
            vertex_shader: PathBuf::from(VERTEX_SHADER_PATH),
            fragment_shader: PathBuf::from(FRAGMENT_SHADER_PATH),
            clear_color: CLEAR_COLOR,
            fov_degrees: FIELD_OF_VIEW,
            near: NEAR_PLANE,
            far: FAR_PLANE,
            camera: CameraConfig::default(),
            objects: vec![
                SceneObject {
                    mesh: 0,
                    translation: vec3(0.0, 0.0, -2.5),
                    scale: vec3(0.4, 0.4, 1.0),
                },
                SceneObject {
                    mesh: 1,
                    translation: vec3(0.0, 1.0, -2.5),
                    scale: vec3(0.4, 0.4, 1.0),
                },
            ],
        }
    }
}

impl AppConfig {
    /// Perspective projection for a Vulkan clip space (depth in [0, 1], y down).
    pub fn projection(&self, width: u32, height: u32) -> glam::Mat4 {
        let aspect_ratio = width as f32 / height.max(1) as f32;
        let flip_y = glam::Mat4::from_scale(vec3(1.0, -1.0, 1.0));
        flip_y
            * glam::Mat4::perspective_rh(
                self.fov_degrees.to_radians(),
                aspect_ratio,
                self.near,
                self.far,
            )
    }
}
