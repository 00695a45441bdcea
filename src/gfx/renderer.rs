use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use wasm_bindgen::JsValue;
use web_sys::WebGlRenderingContext as Gl;
use web_sys::{console, WebGlBuffer, WebGlTexture};

use crate::app::Renderer;
use crate::keys::{Key, KeyState};
use crate::math::Pose;
use crate::opts::InstallOptions;

use super::ball::{Ball, Mesh, VERTEX_STRIDE};
use super::camera::CameraRig;
use super::env::PALETTES;
use super::program::Program;
use super::{frustum, shaders, texture, XorShift32};

/// Camera-space position of the light.
const LIGHT_POS: Vec3 = Vec3::new(40.0, 0.0, 20.0);

/// Interleaved attribute layout shared by all three passes:
/// (name, component count, byte offset).
const ATTRIBS: [(&str, i32, i32); 4] = [
    ("a_position", 3, 0),
    ("a_normal", 3, 12),
    ("a_color", 3, 24),
    ("a_tex_coord", 2, 36),
];

/// Draws the mirror ball: the tiles, the dark occluder sphere inside
/// them, and the light spots the tiles throw onto the back plane.
pub(crate) struct DiscoballRenderer {
    keys: Rc<RefCell<KeyState>>,
    scene: Option<Program>,
    reflection: Option<Program>,
    occluder: Option<Program>,
    ball_buffer: Option<WebGlBuffer>,
    ball_vertices: i32,
    occluder_buffer: Option<WebGlBuffer>,
    occluder_vertices: i32,
    spot_texture: Option<WebGlTexture>,
    env_texture: Option<WebGlTexture>,
    env_index: usize,
    projection: [f32; 16],
    rig: CameraRig,
    radius: f32,
    bands: u32,
    tint: [f32; 3],
}

impl DiscoballRenderer {
    pub(crate) fn new(keys: Rc<RefCell<KeyState>>, options: &InstallOptions) -> Self {
        Self {
            keys,
            scene: None,
            reflection: None,
            occluder: None,
            ball_buffer: None,
            ball_vertices: 0,
            occluder_buffer: None,
            occluder_vertices: 0,
            spot_texture: None,
            env_texture: None,
            env_index: options.environment % PALETTES.len(),
            projection: [0.0; 16],
            rig: CameraRig::new(options.rotate),
            radius: options.radius,
            bands: options.bands,
            tint: options.tint,
        }
    }

    fn upload_mesh(gl: &Gl, mesh: &Mesh) -> Result<WebGlBuffer, JsValue> {
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("unable to create buffer"))?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        let data = js_sys::Float32Array::from(&mesh.data[..]);
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &data, Gl::STATIC_DRAW);
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
        Ok(buffer)
    }

    fn handle_keys(&mut self, gl: &Gl) {
        let cycle = {
            let keys = self.keys.borrow();
            self.rig.steer(&keys);
            if keys.just_pressed(Key::N) {
                1
            } else if keys.just_pressed(Key::P) {
                PALETTES.len() - 1
            } else {
                0
            }
        };

        if cycle != 0 {
            self.env_index = (self.env_index + cycle) % PALETTES.len();
            if let Some(old) = self.env_texture.take() {
                gl.delete_texture(Some(&old));
            }
            match texture::upload_environment(gl, &PALETTES[self.env_index]) {
                Ok(uploaded) => self.env_texture = Some(uploaded),
                Err(e) => console::error_2(
                    &JsValue::from_str("discoball: environment upload failed:"),
                    &e,
                ),
            }
        }
    }

    /// Binds the interleaved buffer to a program's attributes and draws.
    fn draw(gl: &Gl, program: &Program, buffer: &WebGlBuffer, vertices: i32) {
        gl.use_program(Some(program.handle()));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        for (name, size, offset) in &ATTRIBS {
            if let Some(location) = program.attrib(name) {
                gl.vertex_attrib_pointer_with_i32(
                    location,
                    *size,
                    Gl::FLOAT,
                    false,
                    VERTEX_STRIDE,
                    *offset,
                );
                gl.enable_vertex_attrib_array(location);
            }
        }
        gl.draw_arrays(Gl::TRIANGLES, 0, vertices);
        for (name, _, _) in &ATTRIBS {
            if let Some(location) = program.attrib(name) {
                gl.disable_vertex_attrib_array(location);
            }
        }
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
    }

    fn scene_pass(&self, gl: &Gl) {
        let (Some(scene), Some(occluder)) = (&self.scene, &self.occluder) else {
            return;
        };
        gl.cull_face(Gl::BACK);

        let camera = Pose::single(self.rig.camera).palette();
        let transform = Pose::single(self.rig.camera * self.rig.spinning).palette();
        let light = self.rig.camera.transform_point(LIGHT_POS);

        gl.use_program(Some(scene.handle()));
        gl.uniform_matrix4fv_with_f32_array(
            scene.uniform("u_projection"),
            false,
            &self.projection,
        );
        gl.uniform4fv_with_f32_array(scene.uniform("u_camera"), &camera);
        gl.uniform4fv_with_f32_array(scene.uniform("u_transform"), &transform);
        gl.uniform3f(scene.uniform("u_light_pos"), light.x, light.y, light.z);
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_CUBE_MAP, self.env_texture.as_ref());
        gl.uniform1i(scene.uniform("u_texture"), 0);

        if let Some(buffer) = &self.ball_buffer {
            Self::draw(gl, scene, buffer, self.ball_vertices);
        }

        gl.use_program(Some(occluder.handle()));
        gl.uniform_matrix4fv_with_f32_array(
            occluder.uniform("u_projection"),
            false,
            &self.projection,
        );
        gl.uniform4fv_with_f32_array(occluder.uniform("u_transform"), &transform);
        gl.uniform3f(occluder.uniform("u_light_pos"), light.x, light.y, light.z);
        if let Some(buffer) = &self.occluder_buffer {
            Self::draw(gl, occluder, buffer, self.occluder_vertices);
        }
    }

    fn reflection_pass(&self, gl: &Gl) {
        let Some(reflection) = &self.reflection else {
            return;
        };
        // spots land on the far plane behind the ball, seen from inside
        gl.cull_face(Gl::FRONT);

        let transform = Pose::single(self.rig.camera * self.rig.spinning).palette();
        let light = self.rig.camera.transform_point(LIGHT_POS);

        gl.use_program(Some(reflection.handle()));
        gl.uniform_matrix4fv_with_f32_array(
            reflection.uniform("u_projection"),
            false,
            &self.projection,
        );
        gl.uniform4fv_with_f32_array(reflection.uniform("u_transform"), &transform);
        gl.uniform3f(reflection.uniform("u_light_pos"), light.x, light.y, light.z);
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, self.spot_texture.as_ref());
        gl.uniform1i(reflection.uniform("u_texture"), 0);

        if let Some(buffer) = &self.ball_buffer {
            Self::draw(gl, reflection, buffer, self.ball_vertices);
        }
    }
}

impl Renderer for DiscoballRenderer {
    fn on_create(&mut self, gl: &Gl) -> Result<(), JsValue> {
        let scene_vertex = [shaders::QUAT_LIB, shaders::SCENE_VERTEX].concat();
        self.scene = Some(Program::from_sources(
            gl,
            &scene_vertex,
            shaders::SCENE_FRAGMENT,
        )?);
        let reflection_vertex = [shaders::QUAT_LIB, shaders::REFLECTION_VERTEX].concat();
        self.reflection = Some(Program::from_sources(
            gl,
            &reflection_vertex,
            shaders::REFLECTION_FRAGMENT,
        )?);
        let occluder_vertex = [shaders::QUAT_LIB, shaders::OCCLUDER_VERTEX].concat();
        self.occluder = Some(Program::from_sources(
            gl,
            &occluder_vertex,
            shaders::OCCLUDER_FRAGMENT,
        )?);

        gl.enable(Gl::DEPTH_TEST);
        gl.enable(Gl::CULL_FACE);
        gl.clear_color(0.1, 0.1, 0.1, 1.0);

        let ball = Ball::new(self.radius, self.bands, self.tint);
        let mut rng = XorShift32::new(0x5EED_BA11);
        let tiles = ball.build_tiles(&mut rng);
        self.ball_vertices = tiles.vertex_count();
        self.ball_buffer = Some(Self::upload_mesh(gl, &tiles)?);
        let occluder = ball.build_occluder();
        self.occluder_vertices = occluder.vertex_count();
        self.occluder_buffer = Some(Self::upload_mesh(gl, &occluder)?);

        self.spot_texture = Some(texture::upload_spot_texture(gl)?);
        self.env_texture = Some(texture::upload_environment(gl, &PALETTES[self.env_index])?);

        self.rig = CameraRig::new(self.rig.rotate);
        Ok(())
    }

    fn on_change(&mut self, gl: &Gl, width: u32, height: u32) {
        gl.viewport(0, 0, width as i32, height as i32);
        let aspect = width as f32 / height as f32;
        self.projection = frustum(-aspect / 10.0, aspect / 10.0, -0.1, 0.1, 0.1, 300.0);
    }

    fn on_draw(&mut self, gl: &Gl) {
        self.rig.spin();
        self.handle_keys(gl);

        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        self.scene_pass(gl);
        self.reflection_pass(gl);
        gl.flush();
    }

    fn on_destroy(&mut self, gl: &Gl) {
        for program in [
            self.scene.take(),
            self.reflection.take(),
            self.occluder.take(),
        ]
        .into_iter()
        .flatten()
        {
            program.delete(gl);
        }
        for buffer in [self.ball_buffer.take(), self.occluder_buffer.take()]
            .into_iter()
            .flatten()
        {
            gl.delete_buffer(Some(&buffer));
        }
        for texture in [self.spot_texture.take(), self.env_texture.take()]
            .into_iter()
            .flatten()
        {
            gl.delete_texture(Some(&texture));
        }
    }
}
