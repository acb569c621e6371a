use super::*;

fn check(
    morph: usize,
    family: IndexFamily,
    index: Index,
    counts: &EntityCounts,
) -> Result<(), Error> {
    let count = counts.get(family);
    if index.is_none() || (index.0 >= 0 && index.0 < count) {
        return Ok(());
    }
    Err(Error::IndexOutOfRange {
        morph,
        family,
        index: index.0,
        count,
    })
}

impl MorphTable {
    /// Checks every offset index against the model's entity counts.
    ///
    /// Decoding never does this; call it when a loader wants to reject
    /// dangling references. The sentinel `-1` is always accepted.
    pub fn validate(&self, counts: &EntityCounts) -> Result<(), Error> {
        use crate::morph::Offsets;
        for (i, morph) in self.iter().enumerate() {
            match &morph.offsets {
                Offsets::Group(v) => v
                    .iter()
                    .try_for_each(|o| check(i, IndexFamily::Morph, o.morph, counts))?,
                Offsets::Vertex(v) => v
                    .iter()
                    .try_for_each(|o| check(i, IndexFamily::Vertex, o.vertex, counts))?,
                Offsets::Bone(v) => v
                    .iter()
                    .try_for_each(|o| check(i, IndexFamily::Bone, o.bone, counts))?,
                Offsets::Uv(v) | Offsets::ExtendedUv(_, v) => v
                    .iter()
                    .try_for_each(|o| check(i, IndexFamily::Vertex, o.vertex, counts))?,
                Offsets::Material(v) => v
                    .iter()
                    .try_for_each(|o| check(i, IndexFamily::Material, o.material, counts))?,
                Offsets::Flip(v) => v
                    .iter()
                    .try_for_each(|o| check(i, IndexFamily::Morph, o.morph, counts))?,
                Offsets::Impulse(v) => v
                    .iter()
                    .try_for_each(|o| check(i, IndexFamily::Rigid, o.rigid, counts))?,
            }
        }
        Ok(())
    }
}
