//! Texture loading, registration and tag lookup.
//!
//! Textures are decoded on the CPU, validated, and handed to a
//! [`TextureUpload`] implementation for GPU residency. The registry keeps
//! insertion order because the bound texture-unit index of an entry is its
//! insertion index; lookup is hash-indexed on the tag.

use std::{collections::HashMap, path::Path};

use anyhow::{Context as _, Result, bail};

/// Seam to the graphics context: uploads decoded pixels and binds handles
/// to sequential texture units.
pub trait TextureUpload {
    /// Opaque GPU resource id.
    type Handle;

    fn upload(&mut self, label: &str, image: &image::RgbaImage) -> Result<Self::Handle>;

    /// Bind `handle` so that draws selecting `unit` sample it.
    fn bind(&mut self, unit: usize, handle: &Self::Handle);
}

/// A registered texture: the backend handle and the tag it resolves by.
#[derive(Clone, Debug)]
pub struct TextureEntry<H> {
    pub handle: H,
    pub tag: String,
}

/// Ordered, capacity-bounded texture registry.
///
/// Insertion order is bind-slot order: entry `i` is bound to texture unit
/// `i` by [`bind_all`](Self::bind_all). Duplicate tags keep the first
/// entry; later inserts with the same tag are rejected with a warning so
/// that first-match lookup is intentional rather than an artifact.
#[derive(Debug)]
pub struct TextureRegistry<H> {
    entries: Vec<TextureEntry<H>>,
    units_by_tag: HashMap<String, usize>,
}

impl<H> Default for TextureRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> TextureRegistry<H> {
    /// Practical texture-unit bound; the common minimum guarantee.
    pub const MAX_SLOTS: usize = 16;

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            units_by_tag: HashMap::new(),
        }
    }

    /// Decode the image at `path`, upload it, and register it under `tag`.
    ///
    /// Only 3- and 4-channel images are supported; anything else is an
    /// error and leaves the registry unchanged, as does a decode failure.
    /// Exceeding [`MAX_SLOTS`](Self::MAX_SLOTS) is a hard error.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        tag: &str,
        uploader: &mut impl TextureUpload<Handle = H>,
    ) -> Result<()> {
        let path = path.as_ref();
        if self.entries.len() >= Self::MAX_SLOTS {
            bail!(
                "cannot load {}: all {} texture slots are in use",
                path.display(),
                Self::MAX_SLOTS
            );
        }
        if self.units_by_tag.contains_key(tag) {
            log::warn!("texture tag {tag:?} is already registered, keeping the first entry");
            return Ok(());
        }

        let img = image::open(path)
            .with_context(|| format!("could not load image {}", path.display()))?;
        let channels = img.color().channel_count();
        if channels != 3 && channels != 4 {
            bail!(
                "not implemented to handle image {} with {} channels",
                path.display(),
                channels
            );
        }
        log::info!(
            "loaded image {}, width: {}, height: {}, channels: {}",
            path.display(),
            img.width(),
            img.height(),
            channels
        );

        // Images are always flipped vertically on load.
        let rgba = img.flipv().to_rgba8();
        let handle = uploader
            .upload(tag, &rgba)
            .with_context(|| format!("could not upload texture {tag:?}"))?;

        self.units_by_tag.insert(tag.to_string(), self.entries.len());
        self.entries.push(TextureEntry {
            handle,
            tag: tag.to_string(),
        });
        Ok(())
    }

    /// Bind every registered texture to its unit (unit = insertion index).
    ///
    /// Call once after all [`load`](Self::load) calls and before any draw
    /// that resolves textures by unit.
    pub fn bind_all(&self, uploader: &mut impl TextureUpload<Handle = H>) {
        for (unit, entry) in self.entries.iter().enumerate() {
            uploader.bind(unit, &entry.handle);
        }
    }

    /// Bound texture-unit index for `tag`; what shader binding needs.
    pub fn find_unit(&self, tag: &str) -> Option<usize> {
        self.units_by_tag.get(tag).copied()
    }

    pub fn find_handle(&self, tag: &str) -> Option<&H> {
        self.find_unit(tag).map(|unit| &self.entries[unit].handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
