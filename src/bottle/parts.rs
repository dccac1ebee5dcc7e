use bevy::prelude::*;
use std::fmt;

use crate::liquid::LiquidError;

/// The named pieces of the bottle model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BottlePart {
    Glass,
    Liquid,
    Cap,
}

impl BottlePart {
    pub const ALL: [BottlePart; 3] = [BottlePart::Glass, BottlePart::Liquid, BottlePart::Cap];

    /// Node name used for this part in the glTF scene
    pub fn node_name(self) -> &'static str {
        match self {
            BottlePart::Glass => "Glass",
            BottlePart::Liquid => "Liquid",
            BottlePart::Cap => "Cap",
        }
    }

    /// Match a glTF node or primitive name ("Liquid", "Liquid.0") to a part
    pub fn from_node_name(name: &str) -> Option<Self> {
        let base = name.split('.').next().unwrap_or(name);
        Self::ALL.into_iter().find(|part| part.node_name() == base)
    }
}

impl fmt::Display for BottlePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node_name())
    }
}

/// Errors from resolving the bottle scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No mesh in the scene belongs to this part
    MissingPart(BottlePart),
    /// The part's mesh asset isn't loaded
    MissingMesh(BottlePart),
    /// The liquid mesh can't be animated
    Liquid(LiquidError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::MissingPart(part) => write!(f, "bottle scene has no \"{}\" mesh", part),
            SceneError::MissingMesh(part) => write!(f, "mesh for bottle part {} is not loaded", part),
            SceneError::Liquid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<LiquidError> for SceneError {
    fn from(e: LiquidError) -> Self {
        SceneError::Liquid(e)
    }
}

/// A resolved mesh entity with its asset handles
#[derive(Debug, Clone, PartialEq)]
pub struct PartHandle {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Typed handles to the bottle's parts, resolved once when the scene spawns
#[derive(Resource, Debug, Clone)]
pub struct BottleParts {
    pub glass: PartHandle,
    pub liquid: PartHandle,
    pub cap: PartHandle,
}

impl BottleParts {
    pub fn get(&self, part: BottlePart) -> &PartHandle {
        match part {
            BottlePart::Glass => &self.glass,
            BottlePart::Liquid => &self.liquid,
            BottlePart::Cap => &self.cap,
        }
    }

    /// Build the handle set from the meshes found in the scene.
    ///
    /// The first mesh found for a part wins; later duplicates are logged.
    pub fn resolve(
        candidates: impl IntoIterator<Item = (BottlePart, PartHandle)>,
    ) -> Result<Self, SceneError> {
        let mut glass = None;
        let mut liquid = None;
        let mut cap = None;

        for (part, handle) in candidates {
            let slot = match part {
                BottlePart::Glass => &mut glass,
                BottlePart::Liquid => &mut liquid,
                BottlePart::Cap => &mut cap,
            };
            if slot.is_some() {
                warn!("Bottle part {} has more than one mesh; using the first", part);
                continue;
            }
            *slot = Some(handle);
        }

        Ok(BottleParts {
            glass: glass.ok_or(SceneError::MissingPart(BottlePart::Glass))?,
            liquid: liquid.ok_or(SceneError::MissingPart(BottlePart::Liquid))?,
            cap: cap.ok_or(SceneError::MissingPart(BottlePart::Cap))?,
        })
    }
}
