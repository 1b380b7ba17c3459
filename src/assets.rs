use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use cgmath::*;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::arcade::anims::FrameRef;

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum AssetKind {
    /// A single image; one frame covering the whole texture
    Image,
    /// A fixed grid of equally sized frames, addressed by index
    Spritesheet { frame_width: u32, frame_height: u32 },
    /// A packed texture with a JSON frame table, frames addressed by name
    Atlas { json: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetDecl {
    pub key: String,
    pub path: PathBuf,
    pub kind: AssetKind,
    /// Nominal size of a single frame, used when no asset directory is available
    pub size_hint: Vector2<f32>,
}

/// The set of named resources a scene needs, collected during its asset stage.
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    decls: Vec<AssetDecl>,
}

impl AssetManifest {
    pub fn image(&mut self, key: &str, path: &str, size_hint: (u32, u32)) {
        self.decls.push(AssetDecl {
            key: key.to_string(),
            path: PathBuf::from(path),
            kind: AssetKind::Image,
            size_hint: vec2(size_hint.0 as f32, size_hint.1 as f32),
        });
    }

    pub fn spritesheet(&mut self, key: &str, path: &str, frame_width: u32, frame_height: u32) {
        self.decls.push(AssetDecl {
            key: key.to_string(),
            path: PathBuf::from(path),
            kind: AssetKind::Spritesheet {
                frame_width,
                frame_height,
            },
            size_hint: vec2(frame_width as f32, frame_height as f32),
        });
    }

    pub fn atlas(&mut self, key: &str, png: &str, json: &str, size_hint: (u32, u32)) {
        self.decls.push(AssetDecl {
            key: key.to_string(),
            path: PathBuf::from(png),
            kind: AssetKind::Atlas {
                json: PathBuf::from(json),
            },
            size_hint: vec2(size_hint.0 as f32, size_hint.1 as f32),
        });
    }

    pub fn decls(&self) -> &[AssetDecl] {
        &self.decls
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Frames {
    /// Frame table unknown; any frame reference is accepted
    Unchecked,
    Grid { count: u32 },
    Named(BTreeMap<String, Vector2<f32>>),
}

/// A loaded texture's frame table. Pixel data is never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub key: String,
    frame_size: Vector2<f32>,
    frames: Frames,
}

impl Texture {
    pub fn new(key: &str, frame_size: Vector2<f32>, frames: Frames) -> Self {
        Self {
            key: key.to_string(),
            frame_size,
            frames,
        }
    }

    pub fn has_frame(&self, frame: &FrameRef) -> bool {
        match (&self.frames, frame) {
            (Frames::Unchecked, _) => true,
            (Frames::Grid { count }, FrameRef::Index(i)) => i < count,
            (Frames::Named(names), FrameRef::Name(name)) => names.contains_key(name),
            _ => false,
        }
    }

    /// Size of the given frame, or of the default frame when None or unknown.
    pub fn frame_size(&self, frame: Option<&FrameRef>) -> Vector2<f32> {
        match (&self.frames, frame) {
            (Frames::Named(names), Some(FrameRef::Name(name))) => {
                names.get(name).copied().unwrap_or(self.frame_size)
            }
            _ => self.frame_size,
        }
    }

    /// Number of frames, if known
    pub fn frame_count(&self) -> Option<usize> {
        match &self.frames {
            Frames::Unchecked => None,
            Frames::Grid { count } => Some(*count as usize),
            Frames::Named(names) => Some(names.len()),
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset key \"{0}\" declared more than once")]
    DuplicateKey(String),
    #[error("asset \"{key}\" not found at {}", .path.display())]
    Missing { key: String, path: PathBuf },
    #[error("unable to read image for asset \"{key}\"")]
    Image {
        key: String,
        #[source]
        source: image::ImageError,
    },
    #[error("unable to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed atlas frame table for asset \"{key}\"")]
    Atlas {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("asset \"{key}\" has a {width}x{height} image which holds no {frame_width}x{frame_height} frames")]
    BadFrameSize {
        key: String,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },
    #[error("no asset with key \"{0}\"")]
    UnknownKey(String),
}

#[derive(Debug, Deserialize)]
struct AtlasRect {
    w: f32,
    h: f32,
}

#[derive(Debug, Deserialize)]
struct AtlasFrame {
    filename: Option<String>,
    frame: AtlasRect,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AtlasFrames {
    Hash(BTreeMap<String, AtlasFrame>),
    Array(Vec<AtlasFrame>),
}

#[derive(Debug, Deserialize)]
struct AtlasFile {
    frames: AtlasFrames,
}

fn parse_atlas(key: &str, json: &str) -> Result<BTreeMap<String, Vector2<f32>>, AssetError> {
    let file: AtlasFile = serde_json::from_str(json).map_err(|e| AssetError::Atlas {
        key: key.to_string(),
        source: e,
    })?;

    let frames = match file.frames {
        AtlasFrames::Hash(table) => table
            .into_iter()
            .map(|(name, f)| (name, vec2(f.frame.w, f.frame.h)))
            .collect(),
        AtlasFrames::Array(list) => list
            .into_iter()
            .filter_map(|f| {
                let size = vec2(f.frame.w, f.frame.h);
                f.filename.map(|name| (name, size))
            })
            .collect(),
    };
    Ok(frames)
}

// ---------------------------------------------------------------------------------------------------------------------

/// Textures resolved from an AssetManifest, keyed by asset key.
#[derive(Debug, Default)]
pub struct AssetCache {
    textures: HashMap<String, Texture>,
}

impl AssetCache {
    /// Builds textures from the manifest's size hints, without touching the filesystem.
    pub fn nominal(manifest: &AssetManifest) -> Result<Self, AssetError> {
        let mut cache = AssetCache::default();
        for decl in manifest.decls() {
            cache.insert(Texture::new(&decl.key, decl.size_hint, Frames::Unchecked))?;
        }
        Ok(cache)
    }

    /// Loads every declaration in the manifest relative to `root`. Images are probed for
    /// their dimensions only.
    pub fn load(manifest: &AssetManifest, root: &Path) -> Result<Self, AssetError> {
        let mut cache = AssetCache::default();
        for decl in manifest.decls() {
            let texture = Self::load_decl(decl, root)?;
            debug!(
                "Loaded asset \"{}\" with {:?} frames",
                decl.key,
                texture.frame_count()
            );
            cache.insert(texture)?;
        }
        info!("Loaded {} assets from {}", cache.len(), root.display());
        Ok(cache)
    }

    fn load_decl(decl: &AssetDecl, root: &Path) -> Result<Texture, AssetError> {
        let path = root.join(&decl.path);
        if !path.exists() {
            return Err(AssetError::Missing {
                key: decl.key.clone(),
                path,
            });
        }
        let (width, height) =
            image::image_dimensions(&path).map_err(|e| AssetError::Image {
                key: decl.key.clone(),
                source: e,
            })?;

        match &decl.kind {
            AssetKind::Image => Ok(Texture::new(
                &decl.key,
                vec2(width as f32, height as f32),
                Frames::Grid { count: 1 },
            )),
            AssetKind::Spritesheet {
                frame_width,
                frame_height,
            } => {
                let (fw, fh) = (*frame_width, *frame_height);
                let count = if fw == 0 || fh == 0 {
                    0
                } else {
                    (width / fw) * (height / fh)
                };
                if count == 0 {
                    return Err(AssetError::BadFrameSize {
                        key: decl.key.clone(),
                        width,
                        height,
                        frame_width: fw,
                        frame_height: fh,
                    });
                }
                Ok(Texture::new(
                    &decl.key,
                    vec2(fw as f32, fh as f32),
                    Frames::Grid { count },
                ))
            }
            AssetKind::Atlas { json } => {
                let json_path = root.join(json);
                if !json_path.exists() {
                    return Err(AssetError::Missing {
                        key: decl.key.clone(),
                        path: json_path,
                    });
                }
                let text = fs::read_to_string(&json_path).map_err(|e| AssetError::Io {
                    path: json_path.clone(),
                    source: e,
                })?;
                let frames = parse_atlas(&decl.key, &text)?;
                let frame_size = frames.values().next().copied().unwrap_or(decl.size_hint);
                Ok(Texture::new(&decl.key, frame_size, Frames::Named(frames)))
            }
        }
    }

    fn insert(&mut self, texture: Texture) -> Result<(), AssetError> {
        if self.textures.contains_key(&texture.key) {
            return Err(AssetError::DuplicateKey(texture.key));
        }
        self.textures.insert(texture.key.clone(), texture);
        Ok(())
    }

    pub fn texture(&self, key: &str) -> Result<&Texture, AssetError> {
        self.textures
            .get(key)
            .ok_or_else(|| AssetError::UnknownKey(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
