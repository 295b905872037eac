use nalgebra_glm::{cross, length, normalize, vec3, TVec3};

use super::vertex::Vert;

///
/// Control point indices of the ten base patches (rim, body, lid, bottom,
/// handle, spout). Each is a 4x4 grid into `CONTROL_POINTS`.
///
const PATCHES: [[usize; 16]; 10] = [
    // rim
    [102, 103, 104, 105, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    // body
    [12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27],
    [24, 25, 26, 27, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40],
    // lid
    [96, 96, 96, 96, 97, 98, 99, 100, 101, 101, 101, 101, 0, 1, 2, 3],
    [0, 1, 2, 3, 106, 107, 108, 109, 110, 111, 112, 113, 114, 115, 116, 117],
    // bottom
    [118, 118, 118, 118, 124, 122, 119, 121, 123, 126, 125, 120, 40, 39, 38, 37],
    // handle
    [41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55, 56],
    [53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63, 64, 28, 65, 66, 67],
    // spout
    [68, 69, 70, 71, 72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 83],
    [80, 81, 82, 83, 84, 85, 86, 87, 88, 89, 90, 91, 92, 93, 94, 95],
];

/// The first six patches are mirrored into all four quadrants, the rest only across y.
const FOUR_WAY_PATCHES: usize = 6;

pub const PATCH_COUNT: usize = FOUR_WAY_PATCHES * 4 + (PATCHES.len() - FOUR_WAY_PATCHES) * 2;

/// Control points in z-up patch space.
#[rustfmt::skip]
const CONTROL_POINTS: [[f32; 3]; 127] = [
    [0.2, 0.0, 2.7], [0.2, -0.112, 2.7], [0.112, -0.2, 2.7], [0.0, -0.2, 2.7],
    [1.3375, 0.0, 2.53125], [1.3375, -0.749, 2.53125], [0.749, -1.3375, 2.53125], [0.0, -1.3375, 2.53125],
    [1.4375, 0.0, 2.53125], [1.4375, -0.805, 2.53125], [0.805, -1.4375, 2.53125], [0.0, -1.4375, 2.53125],
    [1.5, 0.0, 2.4], [1.5, -0.84, 2.4], [0.84, -1.5, 2.4], [0.0, -1.5, 2.4],
    [1.75, 0.0, 1.875], [1.75, -0.98, 1.875], [0.98, -1.75, 1.875], [0.0, -1.75, 1.875],
    [2.0, 0.0, 1.35], [2.0, -1.12, 1.35], [1.12, -2.0, 1.35], [0.0, -2.0, 1.35],
    [2.0, 0.0, 0.9], [2.0, -1.12, 0.9], [1.12, -2.0, 0.9], [0.0, -2.0, 0.9],
    [-2.0, 0.0, 0.9], [2.0, 0.0, 0.45], [2.0, -1.12, 0.45], [1.12, -2.0, 0.45],
    [0.0, -2.0, 0.45], [1.5, 0.0, 0.225], [1.5, -0.84, 0.225], [0.84, -1.5, 0.225],
    [0.0, -1.5, 0.225], [1.5, 0.0, 0.15], [1.5, -0.84, 0.15], [0.84, -1.5, 0.15],
    [0.0, -1.5, 0.15], [-1.6, 0.0, 2.025], [-1.6, -0.3, 2.025], [-1.5, -0.3, 2.25],
    [-1.5, 0.0, 2.25], [-2.3, 0.0, 2.025], [-2.3, -0.3, 2.025], [-2.5, -0.3, 2.25],
    [-2.5, 0.0, 2.25], [-2.7, 0.0, 2.025], [-2.7, -0.3, 2.025], [-3.0, -0.3, 2.25],
    [-3.0, 0.0, 2.25], [-2.7, 0.0, 1.8], [-2.7, -0.3, 1.8], [-3.0, -0.3, 1.8],
    [-3.0, 0.0, 1.8], [-2.7, 0.0, 1.575], [-2.7, -0.3, 1.575], [-3.0, -0.3, 1.35],
    [-3.0, 0.0, 1.35], [-2.5, 0.0, 1.125], [-2.5, -0.3, 1.125], [-2.65, -0.3, 0.9375],
    [-2.65, 0.0, 0.9375], [-2.0, -0.3, 0.9], [-1.9, -0.3, 0.6], [-1.9, 0.0, 0.6],
    [1.7, 0.0, 1.425], [1.7, -0.66, 1.425], [1.7, -0.66, 0.6], [1.7, 0.0, 0.6],
    [2.6, 0.0, 1.425], [2.6, -0.66, 1.425], [3.1, -0.66, 0.825], [3.1, 0.0, 0.825],
    [2.3, 0.0, 2.1], [2.3, -0.25, 2.1], [2.4, -0.25, 2.025], [2.4, 0.0, 2.025],
    [2.7, 0.0, 2.4], [2.7, -0.25, 2.4], [3.3, -0.25, 2.4], [3.3, 0.0, 2.4],
    [2.8, 0.0, 2.475], [2.8, -0.25, 2.475], [3.525, -0.25, 2.49375], [3.525, 0.0, 2.49375],
    [2.9, 0.0, 2.475], [2.9, -0.15, 2.475], [3.45, -0.15, 2.5125], [3.45, 0.0, 2.5125],
    [2.8, 0.0, 2.4], [2.8, -0.15, 2.4], [3.2, -0.15, 2.4], [3.2, 0.0, 2.4],
    [0.0, 0.0, 3.15], [0.8, 0.0, 3.15], [0.8, -0.45, 3.15], [0.45, -0.8, 3.15],
    [0.0, -0.8, 3.15], [0.0, 0.0, 2.85], [1.4, 0.0, 2.4], [1.4, -0.784, 2.4],
    [0.784, -1.4, 2.4], [0.0, -1.4, 2.4], [0.4, 0.0, 2.55], [0.4, -0.224, 2.55],
    [0.224, -0.4, 2.55], [0.0, -0.4, 2.55], [1.3, 0.0, 2.55], [1.3, -0.728, 2.55],
    [0.728, -1.3, 2.55], [0.0, -1.3, 2.55], [1.3, 0.0, 2.4], [1.3, -0.728, 2.4],
    [0.728, -1.3, 2.4], [0.0, -1.3, 2.4], [0.0, 0.0, 0.0], [1.425, -0.798, 0.0],
    [1.5, 0.0, 0.075], [1.425, 0.0, 0.0], [0.798, -1.425, 0.0], [0.0, -1.5, 0.075],
    [0.0, -1.425, 0.0], [1.5, -0.84, 0.075], [0.84, -1.5, 0.075],
];

/// Patch space is shifted down by this much so the teapot sits around the origin.
const VERTICAL_OFFSET: f32 = 1.5;

/// Parameter nudge used when a patch collapses to a point (lid knob, bottom center).
const POLE_NUDGE: f32 = 1.0e-3;

type Patch = [[TVec3<f32>; 4]; 4];

///
/// Build a solid teapot as a non-indexed triangle list.
///
/// `size` matches the classic GLUT scale (a size of 1.0 spans roughly 3.3 units
/// from spout to handle), `tessellation` is the number of quads per patch side.
///
pub fn teapot(size: f32, tessellation: usize) -> Vec<Vert> {
    let tessellation = tessellation.max(1);
    let scale = 0.5 * size;

    let mut vertices = Vec::with_capacity(PATCH_COUNT * tessellation * tessellation * 6);
    for patch in mirrored_patches() {
        tessellate(&patch, tessellation, scale, &mut vertices);
    }
    vertices
}

/// Expand the ten base patches into all 32 by reflection.
fn mirrored_patches() -> Vec<Patch> {
    let mut patches = Vec::with_capacity(PATCH_COUNT);

    for (index, indices) in PATCHES.iter().enumerate() {
        // Reflections reverse the column order to keep the surface orientation.
        let point = |row: usize, column: usize, reflect: bool, flip_x: bool, flip_y: bool| {
            let column = if reflect { 3 - column } else { column };
            let [x, y, z] = CONTROL_POINTS[indices[row * 4 + column]];
            vec3(
                if flip_x { -x } else { x },
                if flip_y { -y } else { y },
                z,
            )
        };
        let build = |reflect: bool, flip_x: bool, flip_y: bool| -> Patch {
            std::array::from_fn(|row| {
                std::array::from_fn(|column| point(row, column, reflect, flip_x, flip_y))
            })
        };

        patches.push(build(false, false, false));
        patches.push(build(true, false, true));
        if index < FOUR_WAY_PATCHES {
            patches.push(build(true, true, false));
            patches.push(build(false, true, true));
        }
    }

    patches
}

fn bernstein(t: f32) -> [f32; 4] {
    let s = 1.0 - t;
    [s * s * s, 3.0 * t * s * s, 3.0 * t * t * s, t * t * t]
}

fn bernstein_derivative(t: f32) -> [f32; 4] {
    let s = 1.0 - t;
    [
        -3.0 * s * s,
        3.0 * s * s - 6.0 * t * s,
        6.0 * t * s - 3.0 * t * t,
        3.0 * t * t,
    ]
}

fn evaluate(patch: &Patch, u: f32, v: f32) -> (TVec3<f32>, TVec3<f32>, TVec3<f32>) {
    let (bu, bv) = (bernstein(u), bernstein(v));
    let (du, dv) = (bernstein_derivative(u), bernstein_derivative(v));

    let mut position = vec3(0.0, 0.0, 0.0);
    let mut tangent_u = vec3(0.0, 0.0, 0.0);
    let mut tangent_v = vec3(0.0, 0.0, 0.0);
    for (row, points) in patch.iter().enumerate() {
        for (column, point) in points.iter().enumerate() {
            position += point * (bu[row] * bv[column]);
            tangent_u += point * (du[row] * bv[column]);
            tangent_v += point * (bu[row] * dv[column]);
        }
    }
    (position, tangent_u, tangent_v)
}

fn surface_normal(patch: &Patch, u: f32, v: f32) -> TVec3<f32> {
    let (_, tangent_u, tangent_v) = evaluate(patch, u, v);
    let normal = cross(&tangent_u, &tangent_v);
    if length(&normal) > f32::EPSILON {
        return normalize(&normal);
    }

    // Degenerate edge: sample just inside the patch instead.
    let inward = |t: f32| if t < 0.5 { t + POLE_NUDGE } else { t - POLE_NUDGE };
    let (_, tangent_u, tangent_v) = evaluate(patch, inward(u), inward(v));
    let normal = cross(&tangent_u, &tangent_v);
    if length(&normal) > f32::EPSILON {
        normalize(&normal)
    } else {
        vec3(0.0, 0.0, 1.0)
    }
}

/// Patch space is z-up; the scene is y-up.
fn to_scene(point: &TVec3<f32>, scale: f32) -> [f32; 3] {
    [
        point.x * scale,
        (point.z - VERTICAL_OFFSET) * scale,
        -point.y * scale,
    ]
}

fn to_scene_normal(normal: &TVec3<f32>) -> [f32; 3] {
    [normal.x, normal.z, -normal.y]
}

fn tessellate(patch: &Patch, tessellation: usize, scale: f32, out: &mut Vec<Vert>) {
    let steps = tessellation as f32;
    let vertex = |i: usize, j: usize| {
        let (u, v) = (i as f32 / steps, j as f32 / steps);
        let (position, _, _) = evaluate(patch, u, v);
        Vert {
            position: to_scene(&position, scale),
            normal: to_scene_normal(&surface_normal(patch, u, v)),
        }
    };

    for i in 0..tessellation {
        for j in 0..tessellation {
            let a = vertex(i, j);
            let b = vertex(i + 1, j);
            let c = vertex(i + 1, j + 1);
            let d = vertex(i, j + 1);
            out.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
}
