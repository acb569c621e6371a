use crate::morph::Kind;
use crate::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Encoding {
    Utf16 = 0,
    Utf8 = 1,
}

impl Encoding {
    pub fn from_u8(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Utf16),
            1 => Ok(Self::Utf8),
            _ => Err(Error::invalid_header(format!("encoding {value}"))),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IndexFamily {
    Vertex,
    Texture,
    Material,
    Bone,
    Morph,
    Rigid,
}

/// Byte width of an index field.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum IndexSize {
    Byte = 1,
    Short = 2,
    Int = 4,
}

impl IndexSize {
    /// Smallest width whose signed range holds every index below `count`.
    pub fn for_count(count: i32) -> Self {
        if count <= i8::MAX as i32 {
            Self::Byte
        } else if count <= i16::MAX as i32 {
            Self::Short
        } else {
            Self::Int
        }
    }

    pub fn from_declared(value: u8) -> Result<Self, Error> {
        match value {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Short),
            4 => Ok(Self::Int),
            _ => Err(Error::invalid_header(format!("index size {value}"))),
        }
    }

    #[inline]
    pub fn bytes(self) -> u64 {
        self as u64
    }
}

/// Number of entities declared per index family.
#[derive(Clone, Copy, Default, Debug)]
pub struct EntityCounts {
    pub vertices: i32,
    pub textures: i32,
    pub materials: i32,
    pub bones: i32,
    pub morphs: i32,
    pub rigids: i32,
}

impl EntityCounts {
    pub fn get(&self, family: IndexFamily) -> i32 {
        match family {
            IndexFamily::Vertex => self.vertices,
            IndexFamily::Texture => self.textures,
            IndexFamily::Material => self.materials,
            IndexFamily::Bone => self.bones,
            IndexFamily::Morph => self.morphs,
            IndexFamily::Rigid => self.rigids,
        }
    }
}

/// Per-file decoding context. Resolved once, read-only afterwards.
#[derive(Clone, Debug)]
pub struct Header {
    pub version: f32,
    pub encoding: Encoding,
    pub extended_uv: u8,
    pub vertex_index_size: IndexSize,
    pub texture_index_size: IndexSize,
    pub material_index_size: IndexSize,
    pub bone_index_size: IndexSize,
    pub morph_index_size: IndexSize,
    pub rigid_index_size: IndexSize,
}

impl Header {
    /// Builds a header context from entity counts, picking the narrowest
    /// width for each family. Versions below 2.0 (and NaN) are rejected.
    pub fn from_counts(
        version: f32,
        encoding: Encoding,
        counts: &EntityCounts,
    ) -> Result<Self, Error> {
        if !(version >= 2.0) {
            return Err(Error::UnsupportedVersion(version));
        }
        Ok(Self {
            version,
            encoding,
            extended_uv: 0,
            vertex_index_size: IndexSize::for_count(counts.vertices),
            texture_index_size: IndexSize::for_count(counts.textures),
            material_index_size: IndexSize::for_count(counts.materials),
            bone_index_size: IndexSize::for_count(counts.bones),
            morph_index_size: IndexSize::for_count(counts.morphs),
            rigid_index_size: IndexSize::for_count(counts.rigids),
        })
    }

    pub fn index_size(&self, family: IndexFamily) -> IndexSize {
        match family {
            IndexFamily::Vertex => self.vertex_index_size,
            IndexFamily::Texture => self.texture_index_size,
            IndexFamily::Material => self.material_index_size,
            IndexFamily::Bone => self.bone_index_size,
            IndexFamily::Morph => self.morph_index_size,
            IndexFamily::Rigid => self.rigid_index_size,
        }
    }

    /// Whether morphs of `kind` may appear in a file of this version.
    #[inline]
    pub fn supports(&self, kind: Kind) -> bool {
        self.version >= kind.required_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_thresholds() {
        assert!(IndexSize::for_count(0) == IndexSize::Byte);
        assert!(IndexSize::for_count(127) == IndexSize::Byte);
        assert!(IndexSize::for_count(128) == IndexSize::Short);
        assert!(IndexSize::for_count(32767) == IndexSize::Short);
        assert!(IndexSize::for_count(32768) == IndexSize::Int);
        assert!(IndexSize::for_count(i32::MAX) == IndexSize::Int);
    }

    #[test]
    fn from_counts() {
        let counts = EntityCounts {
            vertices: 40000,
            textures: 3,
            materials: 128,
            bones: 300,
            morphs: 127,
            rigids: 32768,
        };
        let header = Header::from_counts(2.1, Encoding::Utf8, &counts).unwrap();
        assert!(header.index_size(IndexFamily::Vertex) == IndexSize::Int);
        assert!(header.index_size(IndexFamily::Texture) == IndexSize::Byte);
        assert!(header.index_size(IndexFamily::Material) == IndexSize::Short);
        assert!(header.index_size(IndexFamily::Bone) == IndexSize::Short);
        assert!(header.index_size(IndexFamily::Morph) == IndexSize::Byte);
        assert!(header.index_size(IndexFamily::Rigid) == IndexSize::Int);
    }

    #[test]
    fn declared_sizes() {
        assert!(IndexSize::from_declared(2).unwrap() == IndexSize::Short);
        assert!(matches!(
            IndexSize::from_declared(3),
            Err(Error::InvalidHeader(_))
        ));
        assert!(matches!(Encoding::from_u8(2), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn version_capability() {
        let counts = EntityCounts::default();
        let v20 = Header::from_counts(2.0, Encoding::Utf16, &counts).unwrap();
        let v21 = Header::from_counts(2.1, Encoding::Utf16, &counts).unwrap();
        assert!(v20.supports(Kind::Material));
        assert!(!v20.supports(Kind::Flip));
        assert!(!v20.supports(Kind::Impulse));
        assert!(v21.supports(Kind::Flip));
        assert!(v21.supports(Kind::Impulse));
    }

    #[test]
    fn from_counts_rejects_old_version() {
        let counts = EntityCounts::default();
        assert!(matches!(
            Header::from_counts(1.0, Encoding::Utf16, &counts),
            Err(Error::UnsupportedVersion(v)) if v == 1.0
        ));
        assert!(matches!(
            Header::from_counts(f32::NAN, Encoding::Utf16, &counts),
            Err(Error::UnsupportedVersion(v)) if v.is_nan()
        ));
    }
}
