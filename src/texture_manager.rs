use std::collections::HashMap;
use egui::{Context, TextureHandle, TextureId, TextureOptions};

use crate::buffer::Image;

/// Uploads image buffers as textures, caching them by image id
pub struct TextureManager {
    /// Cache of textures by image id
    texture_cache: HashMap<usize, TextureHandle>,
    /// Tracks when each texture was last used
    last_used: HashMap<usize, u64>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    /// Maximum number of textures to cache
    max_cache_size: usize,
}

impl TextureManager {
    /// Creates a new texture manager with the specified cache size
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Gets or uploads the texture for `image`
    pub fn texture_for(&mut self, image: &Image, ctx: &Context) -> TextureId {
        let key = image.id();

        if let Some(handle) = self.texture_cache.get(&key) {
            self.last_used.insert(key, self.current_frame);
            return handle.id();
        }

        let name = format!("image_{}", key);
        let handle = ctx.load_texture(&name, image.to_color_image(), TextureOptions::LINEAR);
        log::debug!("Uploaded texture {} ({}x{})", name, image.width(), image.height());

        let id = handle.id();
        self.texture_cache.insert(key, handle);
        self.last_used.insert(key, self.current_frame);
        self.prune_cache_if_needed();
        id
    }

    /// Prunes the cache if it exceeds the maximum size
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        // Collect keys and their last-used frames
        let mut entries: Vec<(usize, u64)> = self.last_used
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect();

        // Oldest first; ties go to the older image
        entries.sort_by_key(|(id, frame)| (*frame, *id));

        let to_remove = entries.len() - self.max_cache_size;
        for (id, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(id);
            self.last_used.remove(id);
        }
    }

    /// Clears all textures from the cache
    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    /// Returns the number of textures currently in the cache
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    pub fn is_cached(&self, image: &Image) -> bool {
        self.texture_cache.contains_key(&image.id())
    }
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn blank_image() -> Image {
        Image::new(RgbImage::new(10, 10))
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let image = blank_image();

        let texture_id1 = manager.texture_for(&image, &ctx);
        let texture_id2 = manager.texture_for(&image.clone(), &ctx);

        assert_eq!(texture_id1, texture_id2);
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn test_new_buffer_gets_new_texture() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);

        let first = manager.texture_for(&blank_image(), &ctx);
        let second = manager.texture_for(&blank_image(), &ctx);

        assert_ne!(first, second);
        assert_eq!(manager.cache_size(), 2);
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let (a, b, c) = (blank_image(), blank_image(), blank_image());

        manager.texture_for(&a, &ctx);
        manager.begin_frame();
        manager.texture_for(&b, &ctx);
        manager.begin_frame();
        manager.texture_for(&c, &ctx);

        assert_eq!(manager.cache_size(), 2);
        assert!(!manager.is_cached(&a)); // This one should be evicted
        assert!(manager.is_cached(&b));
        assert!(manager.is_cached(&c));
    }

    #[test]
    fn test_clear() {
        let ctx = Context::default();
        let mut manager = TextureManager::default();
        manager.texture_for(&blank_image(), &ctx);
        manager.clear_cache();
        assert_eq!(manager.cache_size(), 0);
    }
}
