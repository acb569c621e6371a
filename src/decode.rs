use super::*;
use std::io::Read;

pub fn decode_group<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
) -> Result<morph::Group, Error> {
    Ok(morph::Group {
        morph: data.read_index(header.morph_index_size, "group morph index")?,
        ratio: data.read_f32("group ratio")?,
    })
}

pub fn decode_vertex<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
) -> Result<morph::Vertex, Error> {
    Ok(morph::Vertex {
        vertex: data.read_index(header.vertex_index_size, "vertex morph index")?,
        offset: data.read_vec3("vertex offset")?,
    })
}

pub fn decode_bone<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
) -> Result<morph::Bone, Error> {
    Ok(morph::Bone {
        bone: data.read_index(header.bone_index_size, "bone morph index")?,
        offset: data.read_vec3("bone offset")?,
        rotation: data.read_vec4("bone rotation")?,
    })
}

/// Shared by the base UV channel and the four extended channels.
pub fn decode_uv<R: Read>(data: &mut DataCursor<R>, header: &Header) -> Result<morph::Uv, Error> {
    Ok(morph::Uv {
        vertex: data.read_index(header.vertex_index_size, "uv morph index")?,
        offset: data.read_vec4("uv offset")?,
    })
}

pub fn decode_material<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
) -> Result<morph::Material, Error> {
    Ok(morph::Material {
        material: data.read_index(header.material_index_size, "material morph index")?,
        op: data.read_u8("material op")?.into(),
        diffuse: data.read_vec4("material diffuse")?,
        specular: data.read_vec3("material specular")?,
        specular_power: data.read_f32("material specular power")?,
        ambient: data.read_vec3("material ambient")?,
        edge_color: data.read_vec4("material edge color")?,
        edge_size: data.read_f32("material edge size")?,
        texture: data.read_vec4("material texture")?,
        sphere: data.read_vec4("material sphere")?,
        toon: data.read_vec4("material toon")?,
    })
}

pub fn decode_flip<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
) -> Result<morph::Flip, Error> {
    Ok(morph::Flip {
        morph: data.read_index(header.morph_index_size, "flip morph index")?,
        ratio: data.read_f32("flip ratio")?,
    })
}

pub fn decode_impulse<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
) -> Result<morph::Impulse, Error> {
    Ok(morph::Impulse {
        rigid: data.read_index(header.rigid_index_size, "impulse rigid index")?,
        local: data.read_u8("impulse local flag")? != 0,
        velocity: data.read_vec3("impulse velocity")?,
        torque: data.read_vec3("impulse torque")?,
    })
}

fn read_n<R, T, F>(
    data: &mut DataCursor<R>,
    header: &Header,
    len: usize,
    f: F,
) -> Result<Vec<T>, Error>
where
    R: Read,
    F: Fn(&mut DataCursor<R>, &Header) -> Result<T, Error>,
{
    // Counts come from the stream, so the vector grows as records arrive.
    let mut v = vec![];
    for _ in 0..len {
        v.push(f(data, header)?);
    }
    Ok(v)
}

/// Reads one morph record: names, panel, kind tag, offset count, offsets.
///
/// The kind tag is checked against the header's version before the offset
/// count is read, so a rejected morph consumes nothing past its tag.
pub fn read_morph<R: Read>(data: &mut DataCursor<R>, header: &Header) -> Result<Morph, Error> {
    let name = data.read_text(header.encoding, "morph name")?;
    let name_en = data.read_text(header.encoding, "morph name_en")?;
    let panel = data.read_u8("morph panel")?;
    let offset = data.position();
    let tag = data.read_u8("morph kind")?;
    let kind = morph::Kind::from_tag(tag).ok_or(Error::UnknownMorphKind { tag, offset })?;
    if !header.supports(kind) {
        return Err(Error::UnsupportedInVersion {
            kind,
            required: kind.required_version(),
            version: header.version,
            offset,
        });
    }
    let len = data.read_count("morph offset count")?;
    let offsets = match kind {
        morph::Kind::Group => morph::Offsets::Group(read_n(data, header, len, decode_group)?),
        morph::Kind::Vertex => morph::Offsets::Vertex(read_n(data, header, len, decode_vertex)?),
        morph::Kind::Bone => morph::Offsets::Bone(read_n(data, header, len, decode_bone)?),
        morph::Kind::Uv => morph::Offsets::Uv(read_n(data, header, len, decode_uv)?),
        morph::Kind::ExtendedUv1 => {
            morph::Offsets::ExtendedUv(morph::UvChannel::Ext1, read_n(data, header, len, decode_uv)?)
        }
        morph::Kind::ExtendedUv2 => {
            morph::Offsets::ExtendedUv(morph::UvChannel::Ext2, read_n(data, header, len, decode_uv)?)
        }
        morph::Kind::ExtendedUv3 => {
            morph::Offsets::ExtendedUv(morph::UvChannel::Ext3, read_n(data, header, len, decode_uv)?)
        }
        morph::Kind::ExtendedUv4 => {
            morph::Offsets::ExtendedUv(morph::UvChannel::Ext4, read_n(data, header, len, decode_uv)?)
        }
        morph::Kind::Material => {
            morph::Offsets::Material(read_n(data, header, len, decode_material)?)
        }
        morph::Kind::Flip => morph::Offsets::Flip(read_n(data, header, len, decode_flip)?),
        morph::Kind::Impulse => {
            morph::Offsets::Impulse(read_n(data, header, len, decode_impulse)?)
        }
    };
    Ok(Morph {
        name,
        name_en,
        panel,
        offsets,
    })
}

/// Decodes the morph section: an `i32` count followed by that many morphs.
pub fn decode_morph_table<R: Read>(
    data: &mut DataCursor<R>,
    header: &Header,
) -> Result<MorphTable, Error> {
    let len = data.read_count("morph count")?;
    Ok(MorphTable::new(read_n(data, header, len, read_morph)?))
}
