use crate::math::Vec3;

/// Surface description in the metallic workflow.
///
/// `reflectance` scales the dielectric base reflectance as in Filament:
/// dielectric F0 is `0.16 * reflectance^2`, while metals take F0 directly
/// from `albedo`. `metallic` interpolates between the two.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    /// Diffuse reflectance colour, each channel in [0, 1]
    pub albedo: Vec3,
    /// 0 is a perfect mirror lobe, 1 scatters like a diffuse surface
    pub roughness: f32,
    /// Dielectric base reflectance scale, in [0, 1]
    pub reflectance: f32,
    /// Dielectric (0) to metal (1) blend
    pub metallic: f32,
    /// Radiant intensity scale; 0 for non-emitters
    pub emission_power: f32,
    /// Emitted colour, each channel in [0, 1]
    pub emission_colour: Vec3,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            albedo: Vec3::broadcast(1.0),
            roughness: 1.0,
            reflectance: 0.5,
            metallic: 0.0,
            emission_power: 0.0,
            emission_colour: Vec3::zeros(),
        }
    }
}

impl Material {
    /// Base reflectance at normal incidence.
    pub fn f0(&self) -> Vec3 {
        let dielectric = Vec3::broadcast(0.16 * self.reflectance * self.reflectance);
        dielectric.lerp(&self.albedo, self.metallic)
    }

    pub fn is_emissive(&self) -> bool {
        self.emission_power > 0.0
    }

    /// Emitted radiance, `emission_colour * emission_power`.
    pub fn emitted(&self) -> Vec3 {
        self.emission_colour * self.emission_power
    }
}

/// Schlick's Fresnel approximation `F0 + (1 - F0)(1 - cos_theta)^5`.
///
/// `cos_theta` is clamped to [0, 1] so grazing-angle noise cannot push the
/// result outside the physically meaningful range.
pub fn fresnel_schlick(f0: Vec3, cos_theta: f32) -> Vec3 {
    let cos_theta = cos_theta.max(0.0).min(1.0);
    let one_minus = 1.0 - cos_theta;
    let weight = one_minus * one_minus * one_minus * one_minus * one_minus;
    f0 + (Vec3::broadcast(1.0) - f0) * weight
}
