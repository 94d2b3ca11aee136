use crate::core::attributes::UniformAttributes;
use nalgebra::{Vector3, Vector4};

/// Calculates the color of a surface point lit by every point light in
/// `uniform`, using the Blinn-Phong model.
///
/// # Arguments
/// * `position`: Homogeneous surface position, in the same space as the lights and camera.
/// * `normal`: Surface normal. Normalized here; a zero normal receives ambient light only.
/// * `uniform`: Lights, material and camera of the current draw call.
///
/// # Returns
/// RGBA color. Each light's diffuse and specular terms fall off with the
/// squared distance to the light; the sum is not clamped, alpha is at most 1.
pub fn blinn_phong(
    position: &Vector4<f32>,
    normal: &Vector3<f32>,
    uniform: &UniformAttributes,
) -> Vector4<f32> {
    let ambient = uniform.ambient_color.component_mul(&uniform.color);

    let point = position.xyz();
    let normal = normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
    let view_dir = (uniform.camera_position.xyz() - point)
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::zeros);

    let mut lights_color = Vector3::zeros();
    for light in &uniform.light_positions {
        let to_light = light.xyz() - point;
        let distance_squared = to_light.norm_squared();
        if distance_squared < 1e-12 {
            // At the light source; skip rather than divide by zero
            continue;
        }
        let light_dir = to_light / distance_squared.sqrt();

        // Diffuse term (Lambertian)
        let n_dot_l = normal.dot(&light_dir).max(0.0);
        let diffuse = uniform.mat_diffuse.xyz() * n_dot_l;

        // Specular term (Blinn-Phong)
        let specular = match (light_dir + view_dir).try_normalize(1e-12) {
            Some(halfway_dir) => {
                let n_dot_h = normal.dot(&halfway_dir).max(0.0);
                uniform.mat_specular.xyz() * n_dot_h.powf(uniform.specular_exponent)
            }
            None => Vector3::zeros(),
        };

        lights_color +=
            (diffuse + specular).component_mul(&uniform.light_intensity.xyz()) / distance_squared;
    }

    let rgb = ambient.xyz() + lights_color;
    Vector4::new(rgb.x, rgb.y, rgb.z, uniform.color.w.min(1.0))
}

/// Distance from the camera to `position`, the depth proxy of the bundled shaders.
#[inline]
pub fn camera_distance(position: &Vector4<f32>, uniform: &UniformAttributes) -> f32 {
    (position.xyz() - uniform.camera_position.xyz()).norm()
}
