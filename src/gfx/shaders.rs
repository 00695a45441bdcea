//! GLSL ES 1.00 sources for the three render passes.
//!
//! All vertex shaders share the quaternion prelude and the same
//! dual-quaternion skinning: `u_transform` and `u_camera` are bone
//! palettes of two `vec4`s (real then dual part), normalized in the
//! shader so the CPU side never has to renormalize after long products.

/// `quat_rotate(q, v)` rotates `v` by the unit quaternion `q`;
/// `quat_inverse(q)` is the quaternion reciprocal.
pub(crate) const QUAT_LIB: &str = "
vec3 quat_rotate(vec4 q, vec3 v) {
    vec3 r = q.xyz;
    float a = q.w;
    return v + cross(2.0 * r, cross(r, v) + a * v);
}

vec4 quat_inverse(vec4 q) {
    return vec4(vec3(-1.0), 1.0) * q / dot(q, q);
}
";

/// Mirror-tile pass: skins the ball, looks the facet reflection up in the
/// environment cube map (in camera space), and lights it with a simple
/// diffuse + specular model.
pub(crate) const SCENE_VERTEX: &str = "
uniform mat4 u_projection;
uniform vec4 u_transform[2];
uniform vec4 u_camera[2];

attribute vec3 a_position;
attribute vec3 a_normal;
attribute vec3 a_color;

varying vec3 v_position;
varying vec3 v_normal;
varying vec3 v_tex_coord;
varying vec3 v_color;

void main() {
    float len = length(u_transform[0]);
    vec4 transform[2];
    transform[0] = u_transform[0] / len;
    transform[1] = u_transform[1] / len;
    vec3 position = quat_rotate(transform[0], a_position);
    vec3 translation = 2.0 * (transform[0].w * transform[1].xyz
        - transform[1].w * transform[0].xyz
        + cross(transform[0].xyz, transform[1].xyz));
    position += translation;

    vec4 camera = u_camera[0] / length(u_camera[0]);

    v_normal = quat_rotate(transform[0], a_normal);
    v_tex_coord = quat_rotate(quat_inverse(camera), reflect(position, v_normal));
    v_color = a_color;
    gl_Position = u_projection * vec4(position, 1.0);
    v_position = position;
}
";

pub(crate) const SCENE_FRAGMENT: &str = "
uniform highp vec3 u_light_pos;
uniform samplerCube u_texture;

varying highp vec3 v_position;
varying highp vec3 v_normal;
varying highp vec3 v_tex_coord;
varying lowp vec3 v_color;

const highp float AMBIENT = 0.25;

void main() {
    highp vec3 light = u_light_pos - v_position;
    highp float specular = pow(
        clamp(-dot(normalize(v_position), normalize(reflect(-light, v_normal))), 0.0, 1.0),
        99.0);
    highp float lambert = dot(normalize(light), v_normal);
    highp vec3 diffuse = vec3(max(lambert, AMBIENT));
    highp vec3 color = textureCube(u_texture, normalize(v_tex_coord)).xyz * v_color;
    gl_FragColor = vec4(diffuse * color + vec3(specular), 1.0);
}
";

/// Sparkle pass: reflects the light ray off each facet, intersects it
/// with the back plane z = -100, and splats the spot texture there.
/// Rays that never reach the plane collapse to the origin.
pub(crate) const REFLECTION_VERTEX: &str = "
uniform mat4 u_projection;
uniform highp vec3 u_light_pos;
uniform vec4 u_transform[2];

attribute vec3 a_position;
attribute vec3 a_normal;
attribute vec2 a_tex_coord;

varying vec2 v_tex_coord;
varying vec3 v_color;

void main() {
    float len = length(u_transform[0]);
    vec4 transform[2];
    transform[0] = u_transform[0] / len;
    transform[1] = u_transform[1] / len;
    vec3 position = quat_rotate(transform[0], a_position);
    vec3 translation = 2.0 * (transform[0].w * transform[1].xyz
        - transform[1].w * transform[0].xyz
        + cross(transform[0].xyz, transform[1].xyz));
    position += translation;

    vec3 normal = quat_rotate(transform[0], a_normal);

    vec4 plane = vec4(0.0, 0.0, 1.0, -100.0);
    vec3 ray = reflect(position - u_light_pos, normal);
    float t = (plane.w - dot(plane.xyz, position)) / dot(plane.xyz, ray);
    vec3 q = position + t * ray;

    if (t <= 0.0) {
        q = vec3(0.0);
    }

    v_tex_coord = a_tex_coord;
    v_color = ray;
    gl_Position = u_projection * vec4(q, 1.0);
}
";

pub(crate) const REFLECTION_FRAGMENT: &str = "
uniform sampler2D u_texture;

varying highp vec2 v_tex_coord;
varying highp vec3 v_color;

void main() {
    highp vec3 diffuse = vec3(-dot(normalize(v_color), vec3(0.0, 0.0, 1.0)));
    diffuse *= texture2D(u_texture, v_tex_coord).rgb;
    diffuse = max(vec3(0.1), diffuse);
    gl_FragColor = vec4(diffuse, 1.0);
}
";

/// Occluder pass: the dark inner sphere, lit only by a thin specular rim
/// so the gaps between mirror tiles still catch the light.
pub(crate) const OCCLUDER_VERTEX: &str = "
uniform mat4 u_projection;
uniform vec4 u_transform[2];

attribute vec3 a_position;

varying vec3 v_position;

void main() {
    float len = length(u_transform[0]);
    vec4 transform[2];
    transform[0] = u_transform[0] / len;
    transform[1] = u_transform[1] / len;
    vec3 position = quat_rotate(transform[0], a_position);
    vec3 translation = 2.0 * (transform[0].w * transform[1].xyz
        - transform[1].w * transform[0].xyz
        + cross(transform[0].xyz, transform[1].xyz));
    position += translation;

    v_position = position;
    gl_Position = u_projection * vec4(position, 1.0);
}
";

pub(crate) const OCCLUDER_FRAGMENT: &str = "
uniform highp vec3 u_light_pos;

varying highp vec3 v_position;

void main() {
    highp vec3 light = normalize(u_light_pos - v_position);
    highp float rim = pow(
        clamp(length(cross(normalize(v_position), light)), 0.0, 1.0),
        99.0);
    gl_FragColor = vec4(vec3(rim), 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_shaders_use_the_quaternion_prelude() {
        for source in [SCENE_VERTEX, REFLECTION_VERTEX, OCCLUDER_VERTEX] {
            assert!(source.contains("quat_rotate"));
            assert!(source.contains("u_transform[2]"));
            assert!(source.contains("void main()"));
        }
        assert!(QUAT_LIB.contains("quat_rotate"));
        assert!(QUAT_LIB.contains("quat_inverse"));
    }

    #[test]
    fn fragment_shaders_qualify_precision() {
        // GLSL ES 1.00 fragment shaders have no default float precision
        for source in [SCENE_FRAGMENT, REFLECTION_FRAGMENT, OCCLUDER_FRAGMENT] {
            for line in source.lines() {
                let line = line.trim();
                if let Some(declaration) = line
                    .strip_prefix("uniform ")
                    .or_else(|| line.strip_prefix("varying "))
                {
                    let is_sampler = declaration.starts_with("sampler");
                    let is_qualified = declaration.starts_with("highp")
                        || declaration.starts_with("mediump")
                        || declaration.starts_with("lowp");
                    assert!(
                        is_sampler || is_qualified,
                        "unqualified declaration: {line}"
                    );
                }
            }
        }
    }
}
