use std::fs::File;
use std::io::BufReader;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let path = std::env::args()
        .nth(1)
        .context("usage: morphs <model.pmx>")?;
    let file = File::open(&path).with_context(|| format!("unable to open {path}"))?;
    let reader = pmx_morph::Reader::new(BufReader::new(file))?;
    println!("[name] {}", reader.name());
    println!("[name EN] {}", reader.name_en());
    println!("[version] {}", reader.header().version);
    let morphs = reader.morphs();
    println!("[morphs : {}]", morphs.len());
    for morph in morphs {
        println!(
            "{} ({:?}, panel {}, {} offsets)",
            morph.name,
            morph.kind(),
            morph.panel,
            morph.offsets.len()
        );
    }
    if let Err(e) = morphs.validate(reader.counts()) {
        println!("[dangling] {e}");
    }
    Ok(())
}
