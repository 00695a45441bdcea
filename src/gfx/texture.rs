use wasm_bindgen::JsValue;
use web_sys::WebGlRenderingContext as Gl;
use web_sys::WebGlTexture;

use super::env::{self, Palette, FACE_SIZE, SPOT_SIZE};

/// Uploads the radial light-spot texture used by the reflection pass.
pub(crate) fn upload_spot_texture(gl: &Gl) -> Result<WebGlTexture, JsValue> {
    let texture = gl
        .create_texture()
        .ok_or_else(|| JsValue::from_str("unable to create texture"))?;
    gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(
        Gl::TEXTURE_2D,
        Gl::TEXTURE_MIN_FILTER,
        Gl::LINEAR_MIPMAP_LINEAR as i32,
    );
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, Gl::LINEAR as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);

    let pixels = env::light_spot_pixels(SPOT_SIZE);
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        Gl::TEXTURE_2D,
        0,
        Gl::RGBA as i32,
        SPOT_SIZE as i32,
        SPOT_SIZE as i32,
        0,
        Gl::RGBA,
        Gl::UNSIGNED_BYTE,
        Some(&pixels),
    )?;
    gl.generate_mipmap(Gl::TEXTURE_2D);
    gl.bind_texture(Gl::TEXTURE_2D, None);
    Ok(texture)
}

/// Uploads one environment palette as a cube map.
pub(crate) fn upload_environment(gl: &Gl, palette: &Palette) -> Result<WebGlTexture, JsValue> {
    let texture = gl
        .create_texture()
        .ok_or_else(|| JsValue::from_str("unable to create texture"))?;
    gl.bind_texture(Gl::TEXTURE_CUBE_MAP, Some(&texture));
    gl.tex_parameteri(
        Gl::TEXTURE_CUBE_MAP,
        Gl::TEXTURE_MIN_FILTER,
        Gl::LINEAR as i32,
    );
    gl.tex_parameteri(
        Gl::TEXTURE_CUBE_MAP,
        Gl::TEXTURE_MAG_FILTER,
        Gl::LINEAR as i32,
    );
    gl.tex_parameteri(
        Gl::TEXTURE_CUBE_MAP,
        Gl::TEXTURE_WRAP_S,
        Gl::CLAMP_TO_EDGE as i32,
    );
    gl.tex_parameteri(
        Gl::TEXTURE_CUBE_MAP,
        Gl::TEXTURE_WRAP_T,
        Gl::CLAMP_TO_EDGE as i32,
    );

    for face in 0..6 {
        let pixels = env::face_pixels(palette, face);
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            Gl::TEXTURE_CUBE_MAP_POSITIVE_X + face as u32,
            0,
            Gl::RGBA as i32,
            FACE_SIZE as i32,
            FACE_SIZE as i32,
            0,
            Gl::RGBA,
            Gl::UNSIGNED_BYTE,
            Some(&pixels),
        )?;
    }
    gl.bind_texture(Gl::TEXTURE_CUBE_MAP, None);
    Ok(texture)
}
