use std::time::Instant;

use glam::Mat4;
use vulkano::{
    buffer::CpuBufferPool,
    command_buffer::{RenderPassBeginInfo, SubpassContents},
    descriptor_set::{PersistentDescriptorSet, WriteDescriptorSet},
    pipeline::{Pipeline, PipelineBindPoint},
};
use winit::{
    event::{Event, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
};

use crate::camera::Camera;
use crate::config::AppConfig;
use crate::error::{FrameError, InitError, ShaderError};
use crate::input::InputState;
use crate::mesh::{Mesh, PYRAMID_INDICES, PYRAMID_VERTICES};
use crate::setup::RenderBase;
use crate::shader::{ShaderProgram, ShaderSources};
use crate::uniforms::{Transforms, UniformLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Uninitialized,
    Running,
    ShuttingDown,
}

struct TransformLocations {
    model: UniformLocation,
    view: UniformLocation,
    projection: UniformLocation,
}

impl TransformLocations {
    fn resolve(shader: &ShaderProgram) -> Result<Self, ShaderError> {
        let find = |name: &str| {
            shader
                .uniform_location(name)
                .ok_or_else(|| ShaderError::Validate(format!("uniform `{}` not found", name)))
        };
        Ok(Self {
            model: find("model")?,
            view: find("view")?,
            projection: find("projection")?,
        })
    }
}

/// GPU-side state that only exists while running.
struct Gpu {
    base: RenderBase,
    shader: ShaderProgram,
    locations: TransformLocations,
    meshes: Vec<Mesh>,
    uniform_pool: CpuBufferPool<Transforms>,
    projection: Mat4,
}

pub struct App {
    config: AppConfig,
    state: AppState,
    input: InputState,
    camera: Camera,
    gpu: Option<Gpu>,
    close_requested: bool,
    last_frame: Option<Instant>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let camera = Camera::from_config(&config.camera);
        Self {
            config,
            state: AppState::Uninitialized,
            input: InputState::new(),
            camera,
            gpu: None,
            close_requested: false,
            last_frame: None,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Creates the window, GPU context, shader program and meshes.
    ///
    /// The app only becomes `Running` if every step succeeds; on error it is
    /// left `Uninitialized` and nothing created so far is kept.
    pub fn init(&mut self, event_loop: &EventLoop<()>) -> Result<(), InitError> {
        if self.state != AppState::Uninitialized {
            log::warn!("init called while {:?}, ignoring", self.state);
            return Ok(());
        }

        let base = RenderBase::new(
            event_loop,
            self.config.width,
            self.config.height,
            &self.config.title,
        )?;

        let sources =
            ShaderSources::from_files(&self.config.vertex_shader, &self.config.fragment_shader)?;
        let shader = ShaderProgram::build(base.device(), base.subpass()?, &sources)?;
        let locations = TransformLocations::resolve(&shader)?;

        let allocator = base.memory_allocator();
        let mesh_count = self
            .config
            .objects
            .iter()
            .map(|object| object.mesh + 1)
            .max()
            .unwrap_or(0);
        let mut meshes = Vec::with_capacity(mesh_count);
        for _ in 0..mesh_count {
            let mut mesh = Mesh::new();
            mesh.upload(&allocator, &PYRAMID_VERTICES, &PYRAMID_INDICES)?;
            meshes.push(mesh);
        }

        let [width, height] = base.surface_extent();
        let projection = self.config.projection(width, height);
        let uniform_pool = CpuBufferPool::uniform_buffer(allocator);

        self.gpu = Some(Gpu {
            base,
            shader,
            locations,
            meshes,
            uniform_pool,
            projection,
        });
        self.state = AppState::Running;
        log::info!(
            "initialized {}x{} window with {} meshes",
            width,
            height,
            mesh_count
        );
        Ok(())
    }

    /// Feeds a window event to the input state.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(_) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    if let Err(e) = gpu.base.recreate_swapchain() {
                        log::warn!("{}", e);
                    }
                }
            }
            _ => {}
        }
        self.input.process_event(event);
    }

    pub fn should_close(&self) -> bool {
        self.close_requested || self.input.key_down(VirtualKeyCode::Escape)
    }

    /// Seconds since the previous call. The first call returns zero.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame = Some(now);
        dt
    }

    /// Drains this frame's input into the camera.
    pub fn update(&mut self, dt: f32) {
        let (dx, dy) = self.input.take_mouse_delta();
        self.camera.apply_mouse_delta(dx, dy);
        self.camera.apply_keys(self.input.held_movement(), dt);
    }

    /// Records and presents one frame. Does nothing unless running.
    pub fn render_frame(&mut self) -> Result<(), FrameError> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        gpu.base.frame_cleanup_finished();

        let Some((image_index, acquire_future)) = gpu.base.acquire_next_image()? else {
            return Ok(());
        };
        let framebuffer = gpu.base.framebuffer(image_index).ok_or_else(|| {
            FrameError::Acquire(format!("no framebuffer for image {}", image_index))
        })?;

        let mut commands = gpu.base.alloc_cmd_buf_builder()?;
        commands
            .begin_render_pass(
                RenderPassBeginInfo {
                    clear_values: vec![Some(self.config.clear_color.into()), Some(1.0.into())],
                    ..RenderPassBeginInfo::framebuffer(framebuffer)
                },
                SubpassContents::Inline,
            )
            .map_err(|e| FrameError::Record(format!("{:?}", e)))?
            .set_viewport(0, [gpu.base.full_viewport()]);

        gpu.shader.bind(&mut commands)?;
        let pipeline_layout = gpu.shader.pipeline()?.layout().clone();
        let set_layout = gpu.shader.transforms_layout()?;

        let mut transforms = Transforms::new();
        transforms.set(gpu.locations.projection, &gpu.projection);
        transforms.set(gpu.locations.view, &self.camera.view_matrix());

        for object in &self.config.objects {
            let Some(mesh) = gpu.meshes.get(object.mesh) else {
                log::warn!("scene object refers to missing mesh {}", object.mesh);
                continue;
            };
            transforms.set(gpu.locations.model, &object.model_matrix());

            let uniforms = gpu
                .uniform_pool
                .from_data(transforms)
                .map_err(|e| FrameError::Uniform(format!("{:?}", e)))?;
            let set = PersistentDescriptorSet::new(
                gpu.base.descriptor_set_allocator(),
                set_layout.clone(),
                [WriteDescriptorSet::buffer(Transforms::BINDING, uniforms)],
            )
            .map_err(|e| FrameError::Uniform(format!("{:?}", e)))?;

            commands.bind_descriptor_sets(
                PipelineBindPoint::Graphics,
                pipeline_layout.clone(),
                Transforms::SET,
                set,
            );
            mesh.draw(&mut commands)?;
        }

        commands
            .end_render_pass()
            .map_err(|e| FrameError::Record(format!("{:?}", e)))?;
        let command_buffer = commands
            .build()
            .map_err(|e| FrameError::Record(format!("{:?}", e)))?;

        gpu.base
            .execute_cmd_buffer(acquire_future, image_index, command_buffer)
    }

    /// Releases meshes, the shader program and the GPU context.
    pub fn shutdown(&mut self) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.base.wait_idle();
            for mesh in &mut gpu.meshes {
                mesh.release();
            }
            gpu.shader.release();
            log::info!("gpu resources released");
        }
        self.state = AppState::ShuttingDown;
    }

    /// Runs the frame loop until the window closes or Escape is pressed.
    pub fn run(mut self, event_loop: EventLoop<()>) -> ! {
        event_loop.run(move |event, _, control_flow| match event {
            Event::WindowEvent { event, .. } => {
                self.handle_window_event(&event);
                if self.should_close() {
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::RedrawEventsCleared => {
                if self.state != AppState::Running {
                    return;
                }
                let dt = self.tick();
                self.update(dt);
                if let Err(e) = self.render_frame() {
                    log::warn!("frame dropped: {}", e);
                }
            }
            Event::LoopDestroyed => self.shutdown(),
            _ => {}
        })
    }
}
