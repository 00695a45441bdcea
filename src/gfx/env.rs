use glam::Vec3;

use super::XorShift32;

/// Edge length of a generated cube-map face, in texels.
pub(crate) const FACE_SIZE: usize = 64;

/// Edge length of the reflected-light spot texture, in texels.
pub(crate) const SPOT_SIZE: usize = 64;

const BLOBS_PER_FACE: usize = 14;

/// One environment the ball can reflect: a vertical color gradient with
/// bright light blobs scattered over each face. Stands in for the
/// photographic cube maps the effect was originally shipped with, and
/// keeps the crate free of binary assets.
pub(crate) struct Palette {
    pub name: &'static str,
    pub zenith: [u8; 3],
    pub horizon: [u8; 3],
    pub lights: [[u8; 3]; 3],
}

pub(crate) const PALETTES: [Palette; 6] = [
    Palette {
        name: "ballroom",
        zenith: [24, 16, 48],
        horizon: [96, 48, 120],
        lights: [[255, 220, 180], [255, 160, 220], [180, 220, 255]],
    },
    Palette {
        name: "sunset",
        zenith: [32, 16, 64],
        horizon: [224, 96, 48],
        lights: [[255, 200, 120], [255, 240, 200], [255, 120, 80]],
    },
    Palette {
        name: "neon",
        zenith: [8, 8, 16],
        horizon: [16, 32, 48],
        lights: [[0, 255, 200], [255, 0, 180], [120, 120, 255]],
    },
    Palette {
        name: "ocean",
        zenith: [8, 24, 64],
        horizon: [24, 96, 128],
        lights: [[200, 255, 255], [120, 200, 255], [255, 255, 200]],
    },
    Palette {
        name: "forest",
        zenith: [8, 24, 16],
        horizon: [48, 96, 40],
        lights: [[220, 255, 180], [255, 240, 160], [160, 255, 200]],
    },
    Palette {
        name: "mono",
        zenith: [12, 12, 12],
        horizon: [64, 64, 64],
        lights: [[255, 255, 255], [200, 200, 200], [230, 230, 230]],
    },
];

/// World-space direction of a cube-map texel, by face index in the GL
/// order +X, -X, +Y, -Y, +Z, -Z. `u` and `v` are in `[-1, 1]`.
fn face_direction(face: usize, u: f32, v: f32) -> Vec3 {
    match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    }
}

fn seed_for(palette: &Palette, face: usize) -> u32 {
    let mut seed = 0x9E37_79B9u32.wrapping_mul(face as u32 + 1);
    for byte in palette.name.bytes() {
        seed = seed.rotate_left(7) ^ u32::from(byte);
    }
    seed
}

/// Generates one RGBA cube-map face for a palette.
pub(crate) fn face_pixels(palette: &Palette, face: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; FACE_SIZE * FACE_SIZE * 4];

    for y in 0..FACE_SIZE {
        for x in 0..FACE_SIZE {
            let u = 2.0 * (x as f32 + 0.5) / FACE_SIZE as f32 - 1.0;
            let v = 2.0 * (y as f32 + 0.5) / FACE_SIZE as f32 - 1.0;
            let dir = face_direction(face, u, v).normalize();
            let t = 0.5 * (dir.y + 1.0);
            let offset = (y * FACE_SIZE + x) * 4;
            for channel in 0..3 {
                let horizon = palette.horizon[channel] as f32;
                let zenith = palette.zenith[channel] as f32;
                pixels[offset + channel] = (horizon + (zenith - horizon) * t) as u8;
            }
            pixels[offset + 3] = 255;
        }
    }

    let mut rng = XorShift32::new(seed_for(palette, face));
    for _ in 0..BLOBS_PER_FACE {
        let cx = rng.next_f32() * FACE_SIZE as f32;
        let cy = rng.next_f32() * FACE_SIZE as f32;
        let radius = 1.5 + rng.next_f32() * 4.0;
        let color = palette.lights[rng.below(palette.lights.len() as u32) as usize];
        stamp_blob(&mut pixels, cx, cy, radius, color);
    }

    pixels
}

/// Additively stamps a soft-edged disc of light into a face.
fn stamp_blob(pixels: &mut [u8], cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
    let min_x = ((cx - radius).floor().max(0.0)) as usize;
    let max_x = ((cx + radius).ceil().min(FACE_SIZE as f32 - 1.0)) as usize;
    let min_y = ((cy - radius).floor().max(0.0)) as usize;
    let max_y = ((cy + radius).ceil().min(FACE_SIZE as f32 - 1.0)) as usize;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d >= radius {
                continue;
            }
            let weight = 1.0 - d / radius;
            let offset = (y * FACE_SIZE + x) * 4;
            for channel in 0..3 {
                let add = (color[channel] as f32 * weight) as u16;
                let sum = pixels[offset + channel] as u16 + add;
                pixels[offset + channel] = sum.min(255) as u8;
            }
        }
    }
}

/// Generates the RGBA spot texture the reflection pass projects onto the
/// back plane: a white radial falloff, opaque black at the rim.
pub(crate) fn light_spot_pixels(size: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; size * size * 4];
    let center = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32 + 0.5 - center) / center;
            let dy = (y as f32 + 0.5 - center) / center;
            let r = (dx * dx + dy * dy).sqrt();
            let intensity = (1.0 - r).clamp(0.0, 1.0).powi(2);
            let value = (intensity * 255.0) as u8;
            let offset = (y * size + x) * 4;
            pixels[offset] = value;
            pixels[offset + 1] = value;
            pixels[offset + 2] = value;
            pixels[offset + 3] = 255;
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_have_the_right_size_and_are_opaque() {
        for face in 0..6 {
            let pixels = face_pixels(&PALETTES[0], face);
            assert_eq!(pixels.len(), FACE_SIZE * FACE_SIZE * 4);
            for alpha in pixels.iter().skip(3).step_by(4) {
                assert_eq!(*alpha, 255);
            }
        }
    }

    #[test]
    fn faces_are_deterministic() {
        assert_eq!(face_pixels(&PALETTES[2], 4), face_pixels(&PALETTES[2], 4));
    }

    #[test]
    fn palettes_produce_distinct_environments() {
        assert!(PALETTES.len() > 1);
        assert_ne!(face_pixels(&PALETTES[0], 0), face_pixels(&PALETTES[1], 0));
    }

    #[test]
    fn top_face_is_closer_to_the_zenith_color() {
        let palette = &PALETTES[5];
        let top = face_pixels(palette, 2);
        let bottom = face_pixels(palette, 3);
        // compare the gradient at matching texels; blobs may brighten either
        let avg = |pixels: &[u8]| {
            pixels
                .chunks_exact(4)
                .map(|p| p[0] as u64)
                .sum::<u64>()
                / (pixels.len() as u64 / 4)
        };
        assert!(avg(&top) < avg(&bottom), "zenith is darker than horizon in this palette");
    }

    #[test]
    fn spot_texture_peaks_in_the_center() {
        let size = 32;
        let pixels = light_spot_pixels(size);
        assert_eq!(pixels.len(), size * size * 4);
        let center = ((size / 2) * size + size / 2) * 4;
        assert!(pixels[center] > 200);
        assert_eq!(pixels[3], 255, "alpha stays opaque");
        assert!(pixels[0] < 10, "corner is dark");
    }

    #[test]
    fn face_directions_point_through_their_faces() {
        assert_eq!(face_direction(0, 0.0, 0.0), Vec3::X);
        assert_eq!(face_direction(1, 0.0, 0.0), -Vec3::X);
        assert_eq!(face_direction(2, 0.0, 0.0), Vec3::Y);
        assert_eq!(face_direction(3, 0.0, 0.0), -Vec3::Y);
        assert_eq!(face_direction(4, 0.0, 0.0), Vec3::Z);
        assert_eq!(face_direction(5, 0.0, 0.0), -Vec3::Z);
    }
}
