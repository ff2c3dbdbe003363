use std::fmt;
use std::path::Path;
use std::sync::Arc;

use vulkano::{
    command_buffer::{AutoCommandBufferBuilder, PrimaryAutoCommandBuffer},
    descriptor_set::layout::{DescriptorSetLayout, DescriptorType},
    device::Device,
    pipeline::{
        graphics::{
            depth_stencil::DepthStencilState, input_assembly::InputAssemblyState,
            vertex_input::BuffersDefinition, viewport::ViewportState,
        },
        GraphicsPipeline, Pipeline,
    },
    render_pass::Subpass,
    shader::{
        spirv::{self, Decoration, Id, Instruction, StorageClass},
        ShaderModule,
    },
};

use crate::error::ShaderError;
use crate::uniforms::{Transforms, UniformLocation, UniformLocations};
use crate::vertex::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn kind(self) -> shaderc::ShaderKind {
        match self {
            ShaderStage::Vertex => shaderc::ShaderKind::Vertex,
            ShaderStage::Fragment => shaderc::ShaderKind::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// GLSL source of both stages, plus the names used in compiler messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
    pub vertex_name: String,
    pub fragment_name: String,
}

impl ShaderSources {
    pub fn from_strings(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
            vertex_name: "shader.vert".to_string(),
            fragment_name: "shader.frag".to_string(),
        }
    }

    /// Reads both files whole.
    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let (vertex_path, fragment_path) = (vertex_path.as_ref(), fragment_path.as_ref());
        Ok(Self {
            vertex: read_source(vertex_path)?,
            fragment: read_source(fragment_path)?,
            vertex_name: vertex_path.display().to_string(),
            fragment_name: fragment_path.display().to_string(),
        })
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// SPIR-V words of both stages.
#[derive(Debug, Clone)]
pub struct Spirv {
    pub vertex: Vec<u32>,
    pub fragment: Vec<u32>,
}

/// Compiles both stages. The fragment stage is not attempted if the vertex
/// stage fails.
pub fn compile(sources: &ShaderSources) -> Result<Spirv, ShaderError> {
    let mut compiler = shaderc::Compiler::new().ok_or(ShaderError::CompilerUnavailable)?;
    let vertex = compile_stage(
        &mut compiler,
        ShaderStage::Vertex,
        &sources.vertex,
        &sources.vertex_name,
    )?;
    let fragment = compile_stage(
        &mut compiler,
        ShaderStage::Fragment,
        &sources.fragment,
        &sources.fragment_name,
    )?;
    Ok(Spirv { vertex, fragment })
}

fn compile_stage(
    compiler: &mut shaderc::Compiler,
    stage: ShaderStage,
    source: &str,
    name: &str,
) -> Result<Vec<u32>, ShaderError> {
    let artifact = compiler
        .compile_into_spirv(source, stage.kind(), name, "main", None)
        .map_err(|err| {
            let log = match err {
                shaderc::Error::CompilationError(_, log) => log,
                other => other.to_string(),
            };
            ShaderError::Compile { stage, log }
        })?;

    if artifact.get_num_warnings() > 0 {
        log::warn!("{} shader: {}", stage, artifact.get_warning_messages());
    }
    Ok(artifact.as_binary().to_vec())
}

/// A linked graphics pipeline and the uniform locations resolved for it.
pub struct ShaderProgram {
    pipeline: Option<Arc<GraphicsPipeline>>,
    locations: UniformLocations,
}

impl ShaderProgram {
    /// Compiles, links and validates a program for `subpass`.
    ///
    /// Any failure is returned and no program is created.
    pub fn build(
        device: Arc<Device>,
        subpass: Subpass,
        sources: &ShaderSources,
    ) -> Result<Self, ShaderError> {
        let spirv = compile(sources)?;

        let vs = load_module(device.clone(), ShaderStage::Vertex, &spirv.vertex)?;
        let fs = load_module(device.clone(), ShaderStage::Fragment, &spirv.fragment)?;
        let vs_main = vs
            .entry_point("main")
            .ok_or(ShaderError::MissingEntryPoint(ShaderStage::Vertex))?;
        let fs_main = fs
            .entry_point("main")
            .ok_or(ShaderError::MissingEntryPoint(ShaderStage::Fragment))?;

        let pipeline = GraphicsPipeline::start()
            .vertex_input_state(BuffersDefinition::new().vertex::<Vertex>())
            .vertex_shader(vs_main, ())
            .input_assembly_state(InputAssemblyState::new())
            .viewport_state(ViewportState::viewport_dynamic_scissor_irrelevant())
            .fragment_shader(fs_main, ())
            .depth_stencil_state(DepthStencilState::simple_depth_test())
            .render_pass(subpass)
            .build(device)
            .map_err(|e| ShaderError::Link(format!("{:?}", e)))?;

        validate(&pipeline)?;
        let locations = reflect_transforms(&spirv.vertex)?;
        log::debug!(
            "linked shader program from {} and {}",
            sources.vertex_name,
            sources.fragment_name
        );

        Ok(Self {
            pipeline: Some(pipeline),
            locations,
        })
    }

    /// Binds the program for the draws that follow.
    pub fn bind(
        &self,
        commands: &mut AutoCommandBufferBuilder<PrimaryAutoCommandBuffer>,
    ) -> Result<(), ShaderError> {
        let pipeline = self.pipeline()?;
        commands.bind_pipeline_graphics(pipeline.clone());
        Ok(())
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.locations.get(name)
    }

    pub fn pipeline(&self) -> Result<&Arc<GraphicsPipeline>, ShaderError> {
        self.pipeline
            .as_ref()
            .ok_or_else(|| ShaderError::Validate("program was released".to_string()))
    }

    /// Layout of the descriptor set holding the transform block.
    pub fn transforms_layout(&self) -> Result<Arc<DescriptorSetLayout>, ShaderError> {
        transforms_layout(self.pipeline()?)
    }

    /// Drops the pipeline and forgets cached locations. Safe to call twice.
    pub fn release(&mut self) {
        if self.pipeline.take().is_some() {
            log::trace!("shader program released");
        }
        self.locations.clear();
    }
}

fn load_module(
    device: Arc<Device>,
    stage: ShaderStage,
    words: &[u32],
) -> Result<Arc<ShaderModule>, ShaderError> {
    // SAFETY: the words come straight from shaderc, which only emits valid SPIR-V.
    unsafe { ShaderModule::from_words(device, words) }.map_err(|e| ShaderError::Module {
        stage,
        reason: format!("{:?}", e),
    })
}

fn transforms_layout(pipeline: &GraphicsPipeline) -> Result<Arc<DescriptorSetLayout>, ShaderError> {
    pipeline
        .layout()
        .set_layouts()
        .get(Transforms::SET as usize)
        .cloned()
        .ok_or_else(|| {
            ShaderError::Validate(format!("no descriptor set {} in layout", Transforms::SET))
        })
}

/// The program must read the transform block as a uniform buffer.
fn validate(pipeline: &GraphicsPipeline) -> Result<(), ShaderError> {
    let layout = transforms_layout(pipeline)?;
    match layout.bindings().get(&Transforms::BINDING) {
        Some(binding) if binding.descriptor_type == DescriptorType::UniformBuffer => Ok(()),
        Some(binding) => Err(ShaderError::Validate(format!(
            "binding {} is {:?}, expected a uniform buffer",
            Transforms::BINDING,
            binding.descriptor_type
        ))),
        None => Err(ShaderError::Validate(format!(
            "no uniform block at set {}, binding {}",
            Transforms::SET,
            Transforms::BINDING
        ))),
    }
}

/// Resolves every [`Transforms`] member from the vertex stage's uniform block
/// at `Transforms::SET`/`Transforms::BINDING`.
///
/// Each member must be a `mat4` whose `Offset` leaves it inside the CPU-side
/// block, otherwise the program is rejected.
pub fn reflect_transforms(vertex: &[u32]) -> Result<UniformLocations, ShaderError> {
    let module = spirv::Spirv::new(vertex)
        .map_err(|e| ShaderError::Validate(format!("unreadable vertex SPIR-V: {}", e)))?;
    let block = transforms_block(&module).ok_or_else(|| {
        ShaderError::Validate(format!(
            "vertex shader has no uniform block at set {}, binding {}",
            Transforms::SET,
            Transforms::BINDING
        ))
    })?;

    let block_info = module.id(block);
    let member_types = match block_info.instruction() {
        Instruction::TypeStruct { member_types, .. } => member_types,
        _ => return Err(ShaderError::Validate("uniform is not a block".to_string())),
    };

    let mut locations = UniformLocations::default();
    for name in Transforms::MEMBERS {
        let (index, member) = block_info
            .iter_members()
            .enumerate()
            .find(|(_, member)| {
                member.iter_name().any(|instruction| match instruction {
                    Instruction::MemberName {
                        name: member_name, ..
                    } => member_name == name,
                    _ => false,
                })
            })
            .ok_or_else(|| ShaderError::Validate(format!("uniform `{}` not found", name)))?;

        let matrix = member_types
            .get(index)
            .map_or(false, |&ty| is_mat4(&module, ty));
        if !matrix {
            return Err(ShaderError::Validate(format!("uniform `{}` is not a mat4", name)));
        }

        let offset = member
            .iter_decoration()
            .find_map(|instruction| match *instruction {
                Instruction::MemberDecorate {
                    decoration: Decoration::Offset { byte_offset },
                    ..
                } => Some(byte_offset),
                _ => None,
            })
            .ok_or_else(|| ShaderError::Validate(format!("uniform `{}` has no offset", name)))?;

        let location = UniformLocation::new(Transforms::SET, Transforms::BINDING, offset)
            .ok_or_else(|| {
                ShaderError::Validate(format!(
                    "uniform `{}` at offset {} lies outside the {}-byte transform block",
                    name,
                    offset,
                    std::mem::size_of::<Transforms>()
                ))
            })?;
        locations.insert(name, location);
    }

    Ok(locations)
}

/// Struct type behind the uniform variable bound at the transform slot.
fn transforms_block(module: &spirv::Spirv) -> Option<Id> {
    module.iter_global().find_map(|instruction| match *instruction {
        Instruction::Variable {
            result_type_id,
            result_id,
            storage_class: StorageClass::Uniform,
            ..
        } => {
            let variable = module.id(result_id);
            let set = variable.iter_decoration().find_map(|d| match *d {
                Instruction::Decorate {
                    decoration: Decoration::DescriptorSet { descriptor_set },
                    ..
                } => Some(descriptor_set),
                _ => None,
            });
            let binding = variable.iter_decoration().find_map(|d| match *d {
                Instruction::Decorate {
                    decoration: Decoration::Binding { binding_point },
                    ..
                } => Some(binding_point),
                _ => None,
            });
            if set != Some(Transforms::SET) || binding != Some(Transforms::BINDING) {
                return None;
            }
            match *module.id(result_type_id).instruction() {
                Instruction::TypePointer { ty, .. } => Some(ty),
                _ => None,
            }
        }
        _ => None,
    })
}

fn is_mat4(module: &spirv::Spirv, ty: Id) -> bool {
    let Instruction::TypeMatrix {
        column_type,
        column_count: 4,
        ..
    } = *module.id(ty).instruction()
    else {
        return false;
    };
    let Instruction::TypeVector {
        component_type,
        component_count: 4,
        ..
    } = *module.id(column_type).instruction()
    else {
        return false;
    };
    matches!(
        *module.id(component_type).instruction(),
        Instruction::TypeFloat { width: 32, .. }
    )
}
