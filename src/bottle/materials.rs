use bevy::prelude::*;

use super::parts::{BottlePart, BottleParts};

/// Glass: clear, glossy, see-through
fn tune_glass(material: &mut StandardMaterial) {
    material.reflectance = 1.0;
    material.perceptual_roughness = 0.05;
    material.specular_transmission = 1.0;
    material.ior = 1.0;
    material.clearcoat = 1.0;
    material.clearcoat_perceptual_roughness = 0.1;
    material.base_color = material.base_color.with_alpha(0.7);
    material.alpha_mode = AlphaMode::Blend;
}

fn tune_liquid(material: &mut StandardMaterial) {
    material.specular_transmission = 1.0;
    material.base_color = material.base_color.with_alpha(1.0);
}

fn tune_cap(material: &mut StandardMaterial) {
    material.metallic = 0.7;
    material.perceptual_roughness = 0.9;
}

pub fn tune_part(part: BottlePart, material: &mut StandardMaterial) {
    match part {
        BottlePart::Glass => tune_glass(material),
        BottlePart::Liquid => tune_liquid(material),
        BottlePart::Cap => tune_cap(material),
    }
}

/// Apply the per-part material tweaks through the resolved handles
pub fn apply_part_materials(parts: &BottleParts, materials: &mut Assets<StandardMaterial>) {
    for part in BottlePart::ALL {
        let handle = &parts.get(part).material;
        match materials.get_mut(handle) {
            Some(mut material) => tune_part(part, &mut material),
            None => warn!("Material for bottle part {} is not loaded", part),
        }
    }
}
