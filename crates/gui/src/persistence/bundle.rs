//! ZIP bundles: `system.json` plus the sprite images the system uses under
//! `sprites/`.

use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use std::path::Path;
use std::sync::Arc;

use shared::SystemFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::json::{from_json_str, to_json_string};
use super::PersistenceError;
use crate::sprites::{fetch_bytes, SpriteOrigin};

const SYSTEM_ENTRY: &str = "system.json";
const SPRITE_PREFIX: &str = "sprites/";

/// Contents of a loaded bundle
#[derive(Debug, Clone)]
pub struct Bundle {
    pub file: SystemFile,
    pub sprites: HashMap<String, Arc<[u8]>>,
}

impl Bundle {
    /// Sprite mapping for the resolver
    pub fn sprite_sources(&self) -> HashMap<String, SpriteOrigin> {
        self.sprites
            .iter()
            .map(|(name, bytes)| (name.clone(), SpriteOrigin::Bytes(bytes.clone())))
            .collect()
    }
}

pub fn read_bundle<R: Read + Seek>(reader: R) -> Result<Bundle, PersistenceError> {
    let mut archive = ZipArchive::new(reader)?;

    let json = {
        let mut entry = match archive.by_name(SYSTEM_ENTRY) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(PersistenceError::MissingSystemJson)
            }
            Err(e) => return Err(e.into()),
        };
        let mut json = String::new();
        entry.read_to_string(&mut json)?;
        json
    };
    let file = from_json_str(&json)?;

    let mut sprites = HashMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let Some(name) = entry.name().strip_prefix(SPRITE_PREFIX).map(str::to_string) else {
            continue;
        };
        if name.is_empty() || name.contains('/') {
            continue;
        }
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        sprites.insert(name, Arc::from(bytes));
    }

    tracing::info!(
        "Read bundle '{}' with {} sprites",
        file.system.name,
        sprites.len()
    );
    Ok(Bundle { file, sprites })
}

pub fn read_bundle_file(path: &Path) -> Result<Bundle, PersistenceError> {
    read_bundle(std::fs::File::open(path)?)
}

/// Write a bundle. Sprites that are used but have no source, or whose source
/// cannot be read, are left out; their names are returned.
pub fn write_bundle<W: Write + Seek>(
    writer: W,
    file: &SystemFile,
    sources: &HashMap<String, SpriteOrigin>,
) -> Result<Vec<String>, PersistenceError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);

    zip.start_file(SYSTEM_ENTRY, options)?;
    zip.write_all(to_json_string(file)?.as_bytes())?;

    let mut skipped = Vec::new();
    for name in file.used_sprites() {
        let bytes = match sources.get(&name).map(fetch_bytes) {
            Some(Ok(bytes)) => bytes,
            Some(Err(e)) => {
                tracing::warn!("Leaving sprite '{}' out of bundle: {}", name, e);
                skipped.push(name);
                continue;
            }
            None => {
                skipped.push(name);
                continue;
            }
        };
        zip.start_file(format!("{}{}", SPRITE_PREFIX, name), options)?;
        zip.write_all(&bytes)?;
    }

    zip.finish()?;
    Ok(skipped)
}

pub fn write_bundle_file(
    path: &Path,
    file: &SystemFile,
    sources: &HashMap<String, SpriteOrigin>,
) -> Result<Vec<String>, PersistenceError> {
    let skipped = write_bundle(std::fs::File::create(path)?, file, sources)?;
    tracing::info!("Saved bundle '{}' to {}", file.system.name, path.display());
    Ok(skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::defaults::{default_planet, default_star};
    use shared::SolarSystem;
    use std::io::Cursor;

    fn sample() -> SystemFile {
        let mut star = default_star("Sol", 0);
        star.sprite = "sun.png".into();
        let mut planet = default_planet("Sol", "Sol", 1, 45.0);
        planet.sprite = "earth.png".into();
        star.children.push(planet);
        SystemFile::new(
            SolarSystem {
                id: "sys-1".into(),
                name: "Sol".into(),
                bounds: Default::default(),
            },
            vec![star],
        )
    }

    #[test]
    fn test_bundle_round_trip_with_sprites() {
        let sources = HashMap::from([
            (
                "sun.png".to_string(),
                SpriteOrigin::Bytes(Arc::from(&b"sun-bytes"[..])),
            ),
            (
                "unused.png".to_string(),
                SpriteOrigin::Bytes(Arc::from(&b"x"[..])),
            ),
        ]);
        let mut buf = Cursor::new(Vec::new());
        let skipped = write_bundle(&mut buf, &sample(), &sources).unwrap();
        assert_eq!(skipped, vec!["earth.png".to_string()]);

        buf.set_position(0);
        let bundle = read_bundle(buf).unwrap();
        assert_eq!(bundle.file, sample());
        assert_eq!(bundle.sprites.len(), 1);
        assert_eq!(&*bundle.sprites["sun.png"], b"sun-bytes");
        assert!(matches!(
            bundle.sprite_sources().get("sun.png"),
            Some(SpriteOrigin::Bytes(_))
        ));
    }

    #[test]
    fn test_bundle_without_system_json() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            zip.start_file("readme.txt", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"hello").unwrap();
            zip.finish().unwrap();
        }
        buf.set_position(0);
        assert!(matches!(
            read_bundle(buf),
            Err(PersistenceError::MissingSystemJson)
        ));
    }

    #[test]
    fn test_not_a_zip() {
        let buf = Cursor::new(b"definitely not a zip".to_vec());
        assert!(matches!(read_bundle(buf), Err(PersistenceError::Zip(_))));
    }

    #[test]
    fn test_invalid_system_in_bundle() {
        let mut file = sample();
        file.root_bodies.clear();
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            zip.start_file(SYSTEM_ENTRY, SimpleFileOptions::default())
                .unwrap();
            zip.write_all(serde_json::to_string(&file).unwrap().as_bytes())
                .unwrap();
            zip.finish().unwrap();
        }
        buf.set_position(0);
        assert!(matches!(
            read_bundle(buf),
            Err(PersistenceError::Invalid(_))
        ));
    }

    #[test]
    fn test_bundle_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sol.zip");
        write_bundle_file(&path, &sample(), &HashMap::new()).unwrap();
        let bundle = read_bundle_file(&path).unwrap();
        assert_eq!(bundle.file.system.name, "Sol");
        assert!(bundle.sprites.is_empty());
    }
}
