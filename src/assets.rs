//! Image assets
//!
//! The simulation never touches pixels. It asks an [`AssetProvider`] for an
//! [`ImageHandle`] per spawned tile and hands it to the renderer untouched.
//! Decoding and scaling belong to whatever renderer consumes the handles.

use std::any::Any;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::UVec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use crate::error::AssetError;

/// Something a renderer can draw
pub trait Drawable: Send + Sync {
    /// Size the image is drawn at, in pixels
    fn size(&self) -> UVec2;

    /// Downcast hook for renderers that know the concrete type
    fn as_any(&self) -> &dyn Any;
}

/// Shared, read-only image reference carried by tiles
#[derive(Clone)]
pub struct ImageHandle(Arc<dyn Drawable>);

impl ImageHandle {
    pub fn new(drawable: impl Drawable + 'static) -> Self {
        Self(Arc::new(drawable))
    }

    pub fn size(&self) -> UVec2 {
        self.0.size()
    }

    pub fn drawable(&self) -> &dyn Drawable {
        self.0.as_ref()
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        write!(f, "ImageHandle({}x{})", size.x, size.y)
    }
}

/// Source of tile images, keyed by type name
pub trait AssetProvider {
    /// A randomly chosen image of `type_name`
    fn get_random_image(&mut self, type_name: &str) -> Result<ImageHandle, AssetError>;

    /// A randomly chosen image of `type_name` resized for HUD display
    fn get_thumbnail(&mut self, type_name: &str, size: UVec2) -> Result<ImageHandle, AssetError>;
}

/// An image file on disk, stretched to `size` when drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub size: UVec2,
}

impl Drawable for ImageFile {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Sorted names of the sub-directories of `assets_root`
pub fn discover_types(assets_root: &Path) -> Result<Vec<String>, AssetError> {
    Ok(type_dirs(assets_root)?.into_iter().collect())
}

/// Every expected type has a directory, and nothing else does
pub fn validate_expected_type_dirs(
    assets_root: &Path,
    expected: &[String],
) -> Result<(), AssetError> {
    let actual = type_dirs(assets_root)?;
    let expected: BTreeSet<String> = expected.iter().cloned().collect();

    let missing: Vec<String> = expected.difference(&actual).cloned().collect();
    if !missing.is_empty() {
        return Err(AssetError::MissingTypeDirs(missing));
    }
    let extra: Vec<String> = actual.difference(&expected).cloned().collect();
    if !extra.is_empty() {
        return Err(AssetError::UnexpectedTypeDirs(extra));
    }
    Ok(())
}

/// Sorted image paths in `type_dir` whose extension is one of `supported_formats`
pub fn list_images_for_type(
    type_dir: &Path,
    supported_formats: &[String],
) -> Result<Vec<PathBuf>, AssetError> {
    let allowed: HashSet<String> = supported_formats.iter().map(|f| f.to_lowercase()).collect();
    let mut files = Vec::new();
    for entry in read_dir(type_dir)? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if allowed.contains(&ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn type_dirs(assets_root: &Path) -> Result<BTreeSet<String>, AssetError> {
    let mut names = BTreeSet::new();
    for entry in read_dir(assets_root)? {
        if entry.path().is_dir() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

fn read_dir(dir: &Path) -> Result<Vec<std::fs::DirEntry>, AssetError> {
    let io_err = |source: std::io::Error| AssetError::Io {
        path: dir.to_path_buf(),
        source,
    };
    std::fs::read_dir(dir)
        .map_err(io_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)
}

/// Filesystem-backed provider: one directory per type under `assets_root`
#[derive(Debug)]
pub struct AssetCatalog {
    assets_root: PathBuf,
    supported_formats: Vec<String>,
    tile_size: UVec2,
    images: HashMap<String, Vec<ImageHandle>>,
    rng: Pcg32,
}

impl AssetCatalog {
    pub fn new(
        assets_root: impl Into<PathBuf>,
        supported_formats: &[String],
        tile_size: UVec2,
        seed: u64,
    ) -> Self {
        Self {
            assets_root: assets_root.into(),
            supported_formats: supported_formats.iter().map(|f| f.to_lowercase()).collect(),
            tile_size,
            images: HashMap::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Index every image of each type. A type with no images is fatal.
    pub fn preload(&mut self, types: &[String]) -> Result<(), AssetError> {
        for type_name in types {
            let dir = self.assets_root.join(type_name);
            let paths = list_images_for_type(&dir, &self.supported_formats)?;
            if paths.is_empty() {
                return Err(AssetError::NoImages {
                    type_name: type_name.clone(),
                    dir,
                });
            }
            log::info!("Loaded {} images for type '{}'", paths.len(), type_name);
            let handles = paths
                .into_iter()
                .map(|path| {
                    ImageHandle::new(ImageFile {
                        path,
                        size: self.tile_size,
                    })
                })
                .collect();
            self.images.insert(type_name.clone(), handles);
        }
        Ok(())
    }

    /// Number of images indexed for a type
    pub fn image_count(&self, type_name: &str) -> usize {
        self.images.get(type_name).map_or(0, Vec::len)
    }

    fn pick(&mut self, type_name: &str) -> Result<&ImageHandle, AssetError> {
        self.images
            .get(type_name)
            .and_then(|images| images.choose(&mut self.rng))
            .ok_or_else(|| AssetError::NotLoaded(type_name.to_string()))
    }
}

impl AssetProvider for AssetCatalog {
    fn get_random_image(&mut self, type_name: &str) -> Result<ImageHandle, AssetError> {
        self.pick(type_name).cloned()
    }

    fn get_thumbnail(&mut self, type_name: &str, size: UVec2) -> Result<ImageHandle, AssetError> {
        let base = self.pick(type_name)?;
        let path = base
            .drawable()
            .as_any()
            .downcast_ref::<ImageFile>()
            .map(|file| file.path.clone())
            .ok_or_else(|| AssetError::NotLoaded(type_name.to_string()))?;
        Ok(ImageHandle::new(ImageFile { path, size }))
    }
}

/// Flat-color stand-in for an image, named after its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub type_name: String,
    pub size: UVec2,
}

impl Drawable for Placeholder {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// In-memory provider with one placeholder per type, for headless drivers
#[derive(Debug, Clone)]
pub struct MemoryAssets {
    tile_size: UVec2,
    types: HashSet<String>,
    /// Number of images handed out so far
    pub requests: usize,
}

impl MemoryAssets {
    pub fn new(types: &[String], tile_size: UVec2) -> Self {
        Self {
            tile_size,
            types: types.iter().cloned().collect(),
            requests: 0,
        }
    }

    fn placeholder(&mut self, type_name: &str, size: UVec2) -> Result<ImageHandle, AssetError> {
        if !self.types.contains(type_name) {
            return Err(AssetError::NotLoaded(type_name.to_string()));
        }
        self.requests += 1;
        Ok(ImageHandle::new(Placeholder {
            type_name: type_name.to_string(),
            size,
        }))
    }
}

impl AssetProvider for MemoryAssets {
    fn get_random_image(&mut self, type_name: &str) -> Result<ImageHandle, AssetError> {
        self.placeholder(type_name, self.tile_size)
    }

    fn get_thumbnail(&mut self, type_name: &str, size: UVec2) -> Result<ImageHandle, AssetError> {
        self.placeholder(type_name, size)
    }
}
