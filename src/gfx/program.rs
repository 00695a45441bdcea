use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::WebGlRenderingContext as Gl;
use web_sys::{WebGlProgram, WebGlShader, WebGlUniformLocation};

pub(crate) fn compile_shader(
    gl: &Gl,
    shader_type: u32,
    source: &str,
) -> Result<WebGlShader, String> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| "unable to create shader object".to_owned())?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown error creating shader".to_owned()))
    }
}

pub(crate) fn link_program<'a, T: IntoIterator<Item = &'a WebGlShader>>(
    gl: &Gl,
    shaders: T,
) -> Result<WebGlProgram, String> {
    let program = gl
        .create_program()
        .ok_or_else(|| "unable to create program object".to_owned())?;
    for shader in shaders {
        gl.attach_shader(&program, shader);
    }
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown error linking program".to_owned()))
    }
}

/// A linked shader program with its active attributes and uniforms
/// discovered up front, so draw code looks them up by name.
pub(crate) struct Program {
    program: WebGlProgram,
    attribs: HashMap<String, u32>,
    uniforms: HashMap<String, WebGlUniformLocation>,
}

impl Program {
    pub(crate) fn from_sources(gl: &Gl, vertex: &str, fragment: &str) -> Result<Self, JsValue> {
        let vertex = compile_shader(gl, Gl::VERTEX_SHADER, vertex)
            .map_err(|e| JsValue::from_str(&format!("vertex shader: {e}")))?;
        let fragment = compile_shader(gl, Gl::FRAGMENT_SHADER, fragment)
            .map_err(|e| JsValue::from_str(&format!("fragment shader: {e}")))?;
        let program = link_program(gl, [&vertex, &fragment])
            .map_err(|e| JsValue::from_str(&format!("program link: {e}")))?;
        gl.delete_shader(Some(&vertex));
        gl.delete_shader(Some(&fragment));

        let mut attribs = HashMap::new();
        let attrib_count = gl
            .get_program_parameter(&program, Gl::ACTIVE_ATTRIBUTES)
            .as_f64()
            .unwrap_or(0.0) as u32;
        for index in 0..attrib_count {
            if let Some(info) = gl.get_active_attrib(&program, index) {
                let location = gl.get_attrib_location(&program, &info.name());
                if location >= 0 {
                    attribs.insert(info.name(), location as u32);
                }
            }
        }

        let mut uniforms = HashMap::new();
        let uniform_count = gl
            .get_program_parameter(&program, Gl::ACTIVE_UNIFORMS)
            .as_f64()
            .unwrap_or(0.0) as u32;
        for index in 0..uniform_count {
            if let Some(info) = gl.get_active_uniform(&program, index) {
                // array uniforms report as "name[0]"
                let name = info.name();
                let name = name.strip_suffix("[0]").unwrap_or(&name).to_owned();
                if let Some(location) = gl.get_uniform_location(&program, &info.name()) {
                    uniforms.insert(name, location);
                }
            }
        }

        Ok(Self {
            program,
            attribs,
            uniforms,
        })
    }

    pub(crate) fn handle(&self) -> &WebGlProgram {
        &self.program
    }

    pub(crate) fn attrib(&self, name: &str) -> Option<u32> {
        self.attribs.get(name).copied()
    }

    pub(crate) fn uniform(&self, name: &str) -> Option<&WebGlUniformLocation> {
        self.uniforms.get(name)
    }

    pub(crate) fn delete(&self, gl: &Gl) {
        gl.delete_program(Some(&self.program));
    }
}
