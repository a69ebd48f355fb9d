//! Cube face identification and enumeration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identifies which face of the cube a chunk or grid belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFaceId {
    /// +X face (right)
    PosX = 0,
    /// -X face (left)
    NegX = 1,
    /// +Y face (top)
    PosY = 2,
    /// -Y face (bottom)
    NegY = 3,
    /// +Z face (front)
    PosZ = 4,
    /// -Z face (back)
    NegZ = 5,
}

impl CubeFaceId {
    /// Face used when an identifier cannot be resolved.
    pub const DEFAULT: CubeFaceId = CubeFaceId::PosZ;

    /// Returns all six cube faces in order.
    pub const fn all() -> [CubeFaceId; 6] {
        [
            CubeFaceId::PosX,
            CubeFaceId::NegX,
            CubeFaceId::PosY,
            CubeFaceId::NegY,
            CubeFaceId::PosZ,
            CubeFaceId::NegZ,
        ]
    }

    /// Returns the face index (0-5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Creates a face from an index (0-5).
    pub const fn from_index(index: usize) -> Option<CubeFaceId> {
        match index {
            0 => Some(CubeFaceId::PosX),
            1 => Some(CubeFaceId::NegX),
            2 => Some(CubeFaceId::PosY),
            3 => Some(CubeFaceId::NegY),
            4 => Some(CubeFaceId::PosZ),
            5 => Some(CubeFaceId::NegZ),
            _ => None,
        }
    }

    /// Returns the short face name ("px", "ny", ...).
    pub const fn short_name(self) -> &'static str {
        match self {
            CubeFaceId::PosX => "px",
            CubeFaceId::NegX => "nx",
            CubeFaceId::PosY => "py",
            CubeFaceId::NegY => "ny",
            CubeFaceId::PosZ => "pz",
            CubeFaceId::NegZ => "nz",
        }
    }

    /// Resolves a short face name.
    pub fn from_name(name: &str) -> Option<CubeFaceId> {
        CubeFaceId::all()
            .into_iter()
            .find(|face| face.short_name() == name)
    }

    /// Resolves a short face name, falling back to [`CubeFaceId::DEFAULT`]
    /// for anything unrecognised.
    pub fn parse_or_default(name: &str) -> CubeFaceId {
        match CubeFaceId::from_name(name) {
            Some(face) => face,
            None => {
                warn!(name, fallback = CubeFaceId::DEFAULT.short_name(), "unknown cube face, using default mapping");
                CubeFaceId::DEFAULT
            }
        }
    }
}

impl std::fmt::Display for CubeFaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_faces() {
        let faces = CubeFaceId::all();
        assert_eq!(faces.len(), 6);
        for (i, face) in faces.iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn test_from_index() {
        for i in 0..6 {
            let face = CubeFaceId::from_index(i).unwrap();
            assert_eq!(face.index(), i);
        }
        assert!(CubeFaceId::from_index(6).is_none());
    }

    #[test]
    fn test_short_names_roundtrip() {
        for face in CubeFaceId::all() {
            assert_eq!(CubeFaceId::from_name(face.short_name()), Some(face));
        }
        assert_eq!(CubeFaceId::PosX.to_string(), "px");
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(CubeFaceId::parse_or_default("top"), CubeFaceId::PosZ);
        assert_eq!(CubeFaceId::parse_or_default("ny"), CubeFaceId::NegY);
    }
}
