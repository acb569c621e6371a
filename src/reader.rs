use super::*;
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported version {0}")]
    UnsupportedVersion(f32),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("truncated stream reading {field} at offset {offset}")]
    TruncatedStream { field: &'static str, offset: u64 },
    #[error("unknown morph kind {tag} at offset {offset}")]
    UnknownMorphKind { tag: u8, offset: u64 },
    #[error("{kind:?} morph requires version {required}, file is {version} (offset {offset})")]
    UnsupportedInVersion {
        kind: morph::Kind,
        required: f32,
        version: f32,
        offset: u64,
    },
    #[error("invalid {encoding:?} text in {field} at offset {offset}")]
    InvalidEncoding {
        encoding: Encoding,
        field: &'static str,
        offset: u64,
    },
    #[error("negative length {value} for {field} at offset {offset}")]
    NegativeLength {
        field: &'static str,
        value: i32,
        offset: u64,
    },
    #[error("morph {morph}: {family:?} index {index} out of range ({count} entities)")]
    IndexOutOfRange {
        morph: usize,
        family: IndexFamily,
        index: i32,
        count: i32,
    },
    #[error("io error: {0}")]
    Io(std::io::Error),
}

impl Error {
    pub(crate) fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }

    pub(crate) fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Byte offsets at which each section of the file starts.
#[derive(Clone, Copy, Default, Debug)]
pub struct Sections {
    pub vertices: u64,
    pub faces: u64,
    pub textures: u64,
    pub materials: u64,
    pub bones: u64,
    pub morphs: u64,
    pub display_groups: u64,
    pub rigids: u64,
}

fn read_header<R: Read>(data: &mut DataCursor<R>) -> Result<Header, Error> {
    if data.read_bin::<4>("magic")? != *b"PMX " {
        return Err(Error::invalid_header("magic number"));
    }
    let version = data.read_f32("version")?;
    if version != 2.0 && version != 2.1 {
        return Err(Error::UnsupportedVersion(version));
    }
    let data_len = data.read_u8("globals length")?;
    if data_len < 8 {
        return Err(Error::invalid_header(format!("data length {data_len}")));
    }
    let encoding = Encoding::from_u8(data.read_u8("encoding")?)?;
    let extended_uv = data.read_u8("extended uv")?;
    if extended_uv > 4 {
        return Err(Error::invalid_header(format!("extended uv {extended_uv}")));
    }
    let mut sizes = [IndexSize::Byte; 6];
    for size in sizes.iter_mut() {
        *size = IndexSize::from_declared(data.read_u8("index size")?)?;
    }
    // globals added by later revisions
    data.skip(data_len as u64 - 8, "globals")?;
    Ok(Header {
        version,
        encoding,
        extended_uv,
        vertex_index_size: sizes[0],
        texture_index_size: sizes[1],
        material_index_size: sizes[2],
        bone_index_size: sizes[3],
        morph_index_size: sizes[4],
        rigid_index_size: sizes[5],
    })
}

fn skip_vertices<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
    len: usize,
) -> Result<(), Error> {
    let bone = header.bone_index_size.bytes();
    for _ in 0..len {
        data.skip(4 * 3 + 4 * 3 + 4 * 2 + 4 * 4 * header.extended_uv as u64, "vertex")?;
        let offset = data.position();
        let weight = match data.read_u8("vertex weight type")? {
            0 => bone,
            1 => bone * 2 + 4,
            2 => bone * 4 + 4 * 4,
            3 => bone * 2 + 4 + 4 * 3 * 3,
            4 if header.version >= 2.1 => bone * 4 + 4 * 4,
            v => {
                return Err(Error::invalid_data(format!(
                    "vertex weight type {v} at offset {offset}"
                )))
            }
        };
        data.skip(weight + 4, "vertex weight")?;
    }
    Ok(())
}

fn skip_materials<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
    len: usize,
) -> Result<(), Error> {
    let texture = header.texture_index_size.bytes();
    for _ in 0..len {
        data.skip_text("material name")?;
        data.skip_text("material name_en")?;
        data.skip(16 + 12 + 4 + 12 + 1 + 16 + 4 + texture * 2, "material")?;
        let offset = data.position();
        let sphere_mode = data.read_u8("material sphere mode")?;
        if sphere_mode > 3 {
            return Err(Error::invalid_data(format!(
                "material sphere mode {sphere_mode} at offset {offset}"
            )));
        }
        let offset = data.position();
        match data.read_u8("material toon flag")? {
            0 => data.skip(texture, "material toon")?,
            1 => data.skip(1, "material toon")?,
            v => {
                return Err(Error::invalid_data(format!(
                    "material toon flag {v} at offset {offset}"
                )))
            }
        }
        data.skip_text("material memo")?;
        data.skip(4, "material index count")?;
    }
    Ok(())
}

fn skip_bones<R: Read>(data: &mut DataCursor<R>, header: &Header, len: usize) -> Result<(), Error> {
    let bone = header.bone_index_size.bytes();
    for _ in 0..len {
        data.skip_text("bone name")?;
        data.skip_text("bone name_en")?;
        data.skip(12 + bone + 4, "bone")?;
        let flags = data.read_u16("bone flags")?;
        if flags & 0x0001 == 0 {
            data.skip(12, "bone tail")?;
        } else {
            data.skip(bone, "bone tail")?;
        }
        if flags & 0x0100 != 0 || flags & 0x0200 != 0 {
            data.skip(bone + 4, "bone addition")?;
        }
        if flags & 0x0400 != 0 {
            data.skip(12, "bone fixed pole")?;
        }
        if flags & 0x0800 != 0 {
            data.skip(12 + 12, "bone local pole")?;
        }
        if flags & 0x2000 != 0 {
            data.skip(4, "bone external parent")?;
        }
        if flags & 0x0020 != 0 {
            data.skip(bone + 4 + 4, "bone ik")?;
            let links = data.read_count("bone ik link count")?;
            for _ in 0..links {
                data.skip(bone, "bone ik link")?;
                if data.read_u8("bone ik angle limit")? == 1 {
                    data.skip(12 + 12, "bone ik angle limit")?;
                }
            }
        }
    }
    Ok(())
}

fn skip_display_groups<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
    len: usize,
) -> Result<(), Error> {
    for _ in 0..len {
        data.skip_text("display group name")?;
        data.skip_text("display group name_en")?;
        data.skip(1, "display group special")?;
        let elements = data.read_count("display group element count")?;
        for _ in 0..elements {
            let offset = data.position();
            let size = match data.read_u8("display group element")? {
                0 => header.bone_index_size,
                1 => header.morph_index_size,
                v => {
                    return Err(Error::invalid_data(format!(
                        "display group element {v} at offset {offset}"
                    )))
                }
            };
            data.skip(size.bytes(), "display group element")?;
        }
    }
    Ok(())
}

/// Reads a PMX file up to and including its morph table.
///
/// Sections before the morphs are stepped over, not decoded; the rigid body
/// count is read so that [`Reader::counts`] is complete.
pub struct Reader {
    header: Header,
    name: String,
    name_en: String,
    comment: String,
    comment_en: String,
    counts: EntityCounts,
    sections: Sections,
    morphs: MorphTable,
}

impl Reader {
    pub fn new<T: Read>(reader: T) -> Result<Self, Error> {
        let mut data = DataCursor::new(reader);
        let header = read_header(&mut data)?;
        log::debug!(
            "pmx {}: {:?}, extended uv {}, index sizes v{} t{} m{} b{} mo{} r{}",
            header.version,
            header.encoding,
            header.extended_uv,
            header.vertex_index_size.bytes(),
            header.texture_index_size.bytes(),
            header.material_index_size.bytes(),
            header.bone_index_size.bytes(),
            header.morph_index_size.bytes(),
            header.rigid_index_size.bytes(),
        );
        let name = data.read_text(header.encoding, "model name")?;
        let name_en = data.read_text(header.encoding, "model name_en")?;
        let comment = data.read_text(header.encoding, "comment")?;
        let comment_en = data.read_text(header.encoding, "comment_en")?;

        let mut sections = Sections::default();
        let mut counts = EntityCounts::default();
        sections.vertices = data.position();
        let len = data.read_count("vertex count")?;
        skip_vertices(&mut data, &header, len)?;
        counts.vertices = len as i32;

        sections.faces = data.position();
        let faces = data.read_count("face count")?;
        if faces % 3 != 0 {
            return Err(Error::invalid_data(format!("face count {faces}")));
        }
        data.skip(header.vertex_index_size.bytes() * faces as u64, "faces")?;

        sections.textures = data.position();
        let len = data.read_count("texture count")?;
        for _ in 0..len {
            data.skip_text("texture path")?;
        }
        counts.textures = len as i32;

        sections.materials = data.position();
        let len = data.read_count("material count")?;
        skip_materials(&mut data, &header, len)?;
        counts.materials = len as i32;

        sections.bones = data.position();
        let len = data.read_count("bone count")?;
        skip_bones(&mut data, &header, len)?;
        counts.bones = len as i32;

        sections.morphs = data.position();
        let morphs = decode_morph_table(&mut data, &header)?;
        counts.morphs = morphs.len() as i32;

        sections.display_groups = data.position();
        let len = data.read_count("display group count")?;
        skip_display_groups(&mut data, &header, len)?;

        sections.rigids = data.position();
        let len = data.read_count("rigid count")?;
        counts.rigids = len as i32;

        log::trace!("pmx sections: {sections:?}");
        log::trace!("pmx counts: {counts:?}");
        Ok(Self {
            header,
            name,
            name_en,
            comment,
            comment_en,
            counts,
            sections,
            morphs,
        })
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn name_en(&self) -> &str {
        &self.name_en
    }

    #[inline]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[inline]
    pub fn comment_en(&self) -> &str {
        &self.comment_en
    }

    #[inline]
    pub fn counts(&self) -> &EntityCounts {
        &self.counts
    }

    #[inline]
    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    #[inline]
    pub fn morphs(&self) -> &MorphTable {
        &self.morphs
    }

    pub fn into_morphs(self) -> MorphTable {
        self.morphs
    }
}
