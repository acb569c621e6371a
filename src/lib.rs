mod cursor;
mod decode;
mod header;
mod reader;
mod validate;
#[cfg(test)]
mod writer;

pub use cursor::*;
pub use decode::*;
pub use header::*;
pub use reader::*;

/// Signed index into one of the model's entity tables.
///
/// `-1` is the "none / all" sentinel and is kept as-is; use [`Index::get`]
/// to obtain an array position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Index(pub i32);

impl Index {
    pub const NONE: Self = Self(-1);

    #[inline]
    pub fn get(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Panel {
    Reserved,
    Eyebrow,
    Eye,
    Mouth,
    Other,
}

impl Panel {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Reserved),
            1 => Some(Self::Eyebrow),
            2 => Some(Self::Eye),
            3 => Some(Self::Mouth),
            4 => Some(Self::Other),
            _ => None,
        }
    }
}

pub mod morph {
    use super::Index;

    /// Morph kind as tagged in the file.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub enum Kind {
        Group,
        Vertex,
        Bone,
        Uv,
        ExtendedUv1,
        ExtendedUv2,
        ExtendedUv3,
        ExtendedUv4,
        Material,
        Flip,
        Impulse,
    }

    impl Kind {
        pub fn from_tag(tag: u8) -> Option<Self> {
            Some(match tag {
                0 => Self::Group,
                1 => Self::Vertex,
                2 => Self::Bone,
                3 => Self::Uv,
                4 => Self::ExtendedUv1,
                5 => Self::ExtendedUv2,
                6 => Self::ExtendedUv3,
                7 => Self::ExtendedUv4,
                8 => Self::Material,
                9 => Self::Flip,
                10 => Self::Impulse,
                _ => return None,
            })
        }

        pub fn tag(self) -> u8 {
            match self {
                Self::Group => 0,
                Self::Vertex => 1,
                Self::Bone => 2,
                Self::Uv => 3,
                Self::ExtendedUv1 => 4,
                Self::ExtendedUv2 => 5,
                Self::ExtendedUv3 => 6,
                Self::ExtendedUv4 => 7,
                Self::Material => 8,
                Self::Flip => 9,
                Self::Impulse => 10,
            }
        }

        /// Lowest format version in which this kind may appear.
        pub fn required_version(self) -> f32 {
            match self {
                Self::Flip | Self::Impulse => 2.1,
                _ => 2.0,
            }
        }
    }

    #[derive(Clone, PartialEq, Debug)]
    pub struct Group {
        pub morph: Index,
        pub ratio: f32,
    }

    #[derive(Clone, PartialEq, Debug)]
    pub struct Vertex {
        pub vertex: Index,
        pub offset: [f32; 3],
    }

    #[derive(Clone, PartialEq, Debug)]
    pub struct Bone {
        pub bone: Index,
        pub offset: [f32; 3],
        pub rotation: [f32; 4],
    }

    #[derive(Clone, PartialEq, Debug)]
    pub struct Uv {
        pub vertex: Index,
        pub offset: [f32; 4],
    }

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub enum MaterialOp {
        Mul,
        Add,
        /// Any other byte, kept as read.
        Other(u8),
    }

    impl From<u8> for MaterialOp {
        fn from(value: u8) -> Self {
            match value {
                0 => Self::Mul,
                1 => Self::Add,
                v => Self::Other(v),
            }
        }
    }

    /// `material == Index::NONE` targets every material.
    #[derive(Clone, PartialEq, Debug)]
    pub struct Material {
        pub material: Index,
        pub op: MaterialOp,
        pub diffuse: [f32; 4],
        pub specular: [f32; 3],
        pub specular_power: f32,
        pub ambient: [f32; 3],
        pub edge_color: [f32; 4],
        pub edge_size: f32,
        pub texture: [f32; 4],
        pub sphere: [f32; 4],
        pub toon: [f32; 4],
    }

    #[derive(Clone, PartialEq, Debug)]
    pub struct Flip {
        pub morph: Index,
        pub ratio: f32,
    }

    #[derive(Clone, PartialEq, Debug)]
    pub struct Impulse {
        pub rigid: Index,
        pub local: bool,
        pub velocity: [f32; 3],
        pub torque: [f32; 3],
    }

    /// One of the four extended UV channels a vertex may carry.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub enum UvChannel {
        Ext1,
        Ext2,
        Ext3,
        Ext4,
    }

    impl UvChannel {
        /// Position in a vertex's extended UV list.
        pub fn index(self) -> usize {
            match self {
                Self::Ext1 => 0,
                Self::Ext2 => 1,
                Self::Ext3 => 2,
                Self::Ext4 => 3,
            }
        }
    }

    /// Offsets of one morph. Every element has the same shape, so the
    /// morph's kind is carried by the variant.
    #[derive(Clone, PartialEq, Debug)]
    pub enum Offsets {
        Group(Vec<Group>),
        Vertex(Vec<Vertex>),
        Bone(Vec<Bone>),
        Uv(Vec<Uv>),
        ExtendedUv(UvChannel, Vec<Uv>),
        Material(Vec<Material>),
        Flip(Vec<Flip>),
        Impulse(Vec<Impulse>),
    }

    impl Offsets {
        pub fn kind(&self) -> Kind {
            match self {
                Self::Group(_) => Kind::Group,
                Self::Vertex(_) => Kind::Vertex,
                Self::Bone(_) => Kind::Bone,
                Self::Uv(_) => Kind::Uv,
                Self::ExtendedUv(UvChannel::Ext1, _) => Kind::ExtendedUv1,
                Self::ExtendedUv(UvChannel::Ext2, _) => Kind::ExtendedUv2,
                Self::ExtendedUv(UvChannel::Ext3, _) => Kind::ExtendedUv3,
                Self::ExtendedUv(UvChannel::Ext4, _) => Kind::ExtendedUv4,
                Self::Material(_) => Kind::Material,
                Self::Flip(_) => Kind::Flip,
                Self::Impulse(_) => Kind::Impulse,
            }
        }

        pub fn len(&self) -> usize {
            match self {
                Self::Group(v) => v.len(),
                Self::Vertex(v) => v.len(),
                Self::Bone(v) => v.len(),
                Self::Uv(v) | Self::ExtendedUv(_, v) => v.len(),
                Self::Material(v) => v.len(),
                Self::Flip(v) => v.len(),
                Self::Impulse(v) => v.len(),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Morph {
    pub name: String,
    pub name_en: String,
    /// Raw panel byte; see [`Morph::panel_kind`].
    pub panel: u8,
    pub offsets: morph::Offsets,
}

impl Morph {
    #[inline]
    pub fn kind(&self) -> morph::Kind {
        self.offsets.kind()
    }

    pub fn panel_kind(&self) -> Option<Panel> {
        Panel::from_u8(self.panel)
    }
}

/// All morphs of a model in file order. Position in the table is the
/// morph's identity for group and flip offsets.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct MorphTable {
    morphs: Vec<Morph>,
}

impl MorphTable {
    pub fn new(morphs: Vec<Morph>) -> Self {
        Self { morphs }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.morphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.morphs.is_empty()
    }

    pub fn get(&self, index: Index) -> Option<&Morph> {
        self.morphs.get(index.get()?)
    }

    /// First morph named `name`. Names are not unique.
    pub fn find(&self, name: &str) -> Option<(Index, &Morph)> {
        self.morphs
            .iter()
            .enumerate()
            .find(|(_, m)| m.name == name)
            .map(|(i, m)| (Index(i as i32), m))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Morph> {
        self.morphs.iter()
    }

    pub fn into_vec(self) -> Vec<Morph> {
        self.morphs
    }
}

impl std::ops::Index<usize> for MorphTable {
    type Output = Morph;

    fn index(&self, index: usize) -> &Morph {
        &self.morphs[index]
    }
}

impl<'a> IntoIterator for &'a MorphTable {
    type Item = &'a Morph;
    type IntoIter = std::slice::Iter<'a, Morph>;

    fn into_iter(self) -> Self::IntoIter {
        self.morphs.iter()
    }
}

impl IntoIterator for MorphTable {
    type Item = Morph;
    type IntoIter = std::vec::IntoIter<Morph>;

    fn into_iter(self) -> Self::IntoIter {
        self.morphs.into_iter()
    }
}
