use std::path::{Path, PathBuf};

use insanity::error::ShaderError;
use insanity::shader::{compile, reflect_transforms, ShaderSources, ShaderStage};
use insanity::uniforms::UniformLocations;

const SPIRV_MAGIC: u32 = 0x0723_0203;

const BROKEN_GLSL: &str = "
    #version 450
    void main() {
        gl_Position = undeclared_value;
    }
";

fn vertex_with_block(block: &str) -> String {
    format!(
        "#version 450
        layout(location = 0) in vec3 position;
        layout(set = 0, binding = 0) uniform Transforms {{
            {}
        }} transforms;
        void main() {{
            gl_Position = transforms.view * vec4(position, 1.0);
        }}",
        block
    )
}

fn reflect_vertex(vertex: &str) -> Result<UniformLocations, ShaderError> {
    let sources = ShaderSources::from_strings(vertex, bundled_sources().fragment);
    let spirv = compile(&sources).expect("test shader compiles");
    reflect_transforms(&spirv.vertex)
}

fn expect_validate_error(result: Result<UniformLocations, ShaderError>, needle: &str) {
    match result {
        Err(ShaderError::Validate(message)) => {
            assert!(message.contains(needle), "message was: {}", message)
        }
        Err(other) => panic!("expected validate error, got {:?}", other),
        Ok(locations) => panic!("expected validate error, got {:?}", locations),
    }
}

fn shader_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/shaders")
}

fn bundled_sources() -> ShaderSources {
    let dir = shader_dir();
    ShaderSources::from_files(dir.join("shader.vert"), dir.join("shader.frag"))
        .expect("bundled shaders are readable")
}

#[cfg(test)]
mod shader_source_tests {
    use super::*;

    #[test]
    fn test_reads_bundled_sources() {
        let sources = bundled_sources();
        assert!(sources.vertex.contains("uniform Transforms"));
        assert!(sources.fragment.contains("f_color"));
        assert!(sources.vertex_name.ends_with("shader.vert"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let missing = shader_dir().join("does_not_exist.vert");
        let err = ShaderSources::from_files(&missing, shader_dir().join("shader.frag"))
            .unwrap_err();
        match err {
            ShaderError::Io { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}

#[cfg(test)]
mod shader_compile_tests {
    use super::*;

    #[test]
    fn test_bundled_shaders_compile_to_spirv() {
        let spirv = compile(&bundled_sources()).expect("bundled shaders compile");
        assert_eq!(spirv.vertex.first(), Some(&SPIRV_MAGIC));
        assert_eq!(spirv.fragment.first(), Some(&SPIRV_MAGIC));
    }

    #[test]
    fn test_vertex_compile_error_reports_stage_and_log() {
        let fragment = bundled_sources().fragment;
        let err = compile(&ShaderSources::from_strings(BROKEN_GLSL, fragment)).unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(log.contains("undeclared_value"), "log was: {}", log);
            }
            other => panic!("expected compile error, got {:?}", other),
        }
    }

    #[test]
    fn test_fragment_compile_error_reports_fragment_stage() {
        let vertex = bundled_sources().vertex;
        let sources = ShaderSources::from_strings(vertex, "#version 450\nvoid main( {");
        let err = compile(&sources).unwrap_err();
        assert!(
            matches!(
                err,
                ShaderError::Compile {
                    stage: ShaderStage::Fragment,
                    ..
                }
            ),
            "got {:?}",
            err
        );
    }
}

#[cfg(test)]
mod uniform_reflection_tests {
    use super::*;

    #[test]
    fn test_offsets_follow_declaration_order() {
        let vertex = vertex_with_block("mat4 projection; mat4 view; mat4 model;");
        let locations = reflect_vertex(&vertex).unwrap();
        assert_eq!(locations.get("projection").unwrap().offset(), 0);
        assert_eq!(locations.get("view").unwrap().offset(), 64);
        assert_eq!(locations.get("model").unwrap().offset(), 128);
    }

    #[test]
    fn test_missing_member_rejects_the_program() {
        let vertex = vertex_with_block("mat4 view; mat4 projection;");
        expect_validate_error(reflect_vertex(&vertex), "`model` not found");
    }

    #[test]
    fn test_member_past_the_block_end_is_rejected() {
        let vertex = vertex_with_block("mat4 normal; mat4 model; mat4 view; mat4 projection;");
        expect_validate_error(reflect_vertex(&vertex), "outside");
    }

    #[test]
    fn test_member_of_the_wrong_type_is_rejected() {
        let vertex = vertex_with_block("vec4 model; mat4 view; mat4 projection;");
        expect_validate_error(reflect_vertex(&vertex), "`model` is not a mat4");
    }

    #[test]
    fn test_block_on_another_binding_is_not_found() {
        let vertex = vertex_with_block("mat4 model; mat4 view; mat4 projection;")
            .replace("binding = 0", "binding = 1");
        expect_validate_error(reflect_vertex(&vertex), "no uniform block");
    }

    #[test]
    fn test_garbage_words_are_rejected() {
        expect_validate_error(reflect_transforms(&[0xdead_beef, 1, 2]), "SPIR-V");
    }
}
