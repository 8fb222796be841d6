//! Sticker glyph images.
//!
//! A sticker is drawn as a pre-rasterized image of its symbol rather than
//! as live text. Rasterizing is comparatively expensive, so images are kept
//! in a [`GlyphCache`] keyed by symbol, cell size and pixel ratio.
//!
//! The cache is generic over the stored image so the headless pipeline
//! (PNG data URIs) and the browser shell (offscreen canvases) share it.

use std::collections::{hash_map::Entry, HashMap};

use sticker_core::{Rgba, Shadow};

/// Cache key for one rasterized glyph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// The symbol.
    pub symbol: String,
    /// Cell width in CSS pixels.
    pub width: u32,
    /// Cell height in CSS pixels.
    pub height: u32,
    /// Pixel ratio in thousandths.
    pub ratio_permille: u32,
}

impl GlyphKey {
    /// Build a key from a sticker cell and a device pixel ratio.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(symbol: &str, width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            symbol: symbol.to_string(),
            width: width.round().max(1.0) as u32,
            height: height.round().max(1.0) as u32,
            ratio_permille: (pixel_ratio.max(0.001) * 1000.0).round() as u32,
        }
    }

    /// Pixel ratio this glyph is rasterized at.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pixel_ratio(&self) -> f32 {
        self.ratio_permille as f32 / 1000.0
    }

    /// Size of the rasterized image in device pixels.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn pixel_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let w = (self.width as f32 * ratio).ceil().max(1.0) as u32;
        let h = (self.height as f32 * ratio).ceil().max(1.0) as u32;
        (w, h)
    }
}

/// How a glyph is drawn inside its cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphStyle {
    /// Font size as a fraction of the cell width.
    pub font_ratio: f32,
    /// CSS font family list.
    pub font_family: String,
    /// Shadow under the glyph.
    pub shadow: Shadow,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            font_ratio: 0.8,
            font_family: "Arial, 'Apple Color Emoji', 'Segoe UI Emoji', 'Noto Color Emoji', sans-serif"
                .to_string(),
            shadow: Shadow {
                color: Rgba::new(0, 0, 0, 0.2),
                blur: 4.0,
                offset_x: 2.0,
                offset_y: 2.0,
            },
        }
    }
}

impl GlyphStyle {
    /// Font size in CSS pixels for a cell of the given width.
    #[must_use]
    pub fn font_size(&self, cell_width: f32) -> f32 {
        cell_width * self.font_ratio
    }

    /// CSS `font` shorthand for a cell of the given width.
    #[must_use]
    pub fn css_font(&self, cell_width: f32) -> String {
        format!("{}px {}", self.font_size(cell_width), self.font_family)
    }
}

/// Configuration for the glyph cache.
#[derive(Debug, Clone)]
pub struct GlyphCacheConfig {
    /// Maximum number of cached glyphs.
    pub max_entries: usize,
}

impl Default for GlyphCacheConfig {
    fn default() -> Self {
        Self { max_entries: 64 }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphCacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of evictions.
    pub evictions: u64,
}

#[derive(Debug)]
struct CacheEntry<T> {
    image: T,
    last_used: u64,
}

/// Bounded least-recently-used cache of rasterized glyphs.
#[derive(Debug)]
pub struct GlyphCache<T> {
    entries: HashMap<GlyphKey, CacheEntry<T>>,
    config: GlyphCacheConfig,
    clock: u64,
    stats: GlyphCacheStats,
}

impl<T> GlyphCache<T> {
    /// Create a cache with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GlyphCacheConfig::default())
    }

    /// Create a cache with a custom configuration.
    #[must_use]
    pub fn with_config(config: GlyphCacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
            clock: 0,
            stats: GlyphCacheStats::default(),
        }
    }

    /// Look up a glyph, marking it as recently used.
    pub fn get(&mut self, key: &GlyphKey) -> Option<&T> {
        self.clock += 1;
        let clock = self.clock;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_used = clock;
            self.stats.hits += 1;
            Some(&entry.image)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Insert a glyph, evicting the least recently used one if full.
    pub fn insert(&mut self, key: GlyphKey, image: T) {
        if !self.entries.contains_key(&key) {
            self.make_room();
        }
        self.clock += 1;
        self.entries.insert(
            key,
            CacheEntry {
                image,
                last_used: self.clock,
            },
        );
    }

    /// Return the cached glyph, rasterizing it with `load` on a miss.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; nothing is cached in that case.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: &GlyphKey, load: F) -> Result<&T, E>
    where
        F: FnOnce(&GlyphKey) -> Result<T, E>,
    {
        if !self.entries.contains_key(key) {
            self.make_room();
        }
        self.clock += 1;
        let clock = self.clock;

        let entry = match self.entries.entry(key.clone()) {
            Entry::Occupied(slot) => {
                self.stats.hits += 1;
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                self.stats.misses += 1;
                let image = load(key)?;
                tracing::trace!("Cached glyph '{}' at {}x", key.symbol, key.pixel_ratio());
                slot.insert(CacheEntry {
                    image,
                    last_used: clock,
                })
            }
        };
        entry.last_used = clock;
        Ok(&entry.image)
    }

    /// Remove a glyph from the cache.
    pub fn remove(&mut self, key: &GlyphKey) -> Option<T> {
        self.entries.remove(key).map(|entry| entry.image)
    }

    /// Check if a glyph is cached.
    #[must_use]
    pub fn contains(&self, key: &GlyphKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop every cached glyph.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cache statistics.
    #[must_use]
    pub fn stats(&self) -> &GlyphCacheStats {
        &self.stats
    }

    fn make_room(&mut self) {
        let capacity = self.config.max_entries.max(1);
        while self.entries.len() >= capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            let Some(key) = oldest else { break };
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }
}

impl<T> Default for GlyphCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "export")]
pub use raster::GlyphRasterizer;

#[cfg(feature = "export")]
mod raster {
    use std::{fmt::Write, sync::Arc};

    use base64::Engine;

    use super::{GlyphKey, GlyphStyle};
    use crate::{
        svg::{escape_xml, write_shadow_filter},
        RenderError, RenderResult,
    };

    /// Rasterizes glyphs through usvg/resvg.
    #[derive(Clone)]
    pub struct GlyphRasterizer {
        style: GlyphStyle,
        fontdb: Arc<usvg::fontdb::Database>,
    }

    impl std::fmt::Debug for GlyphRasterizer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("GlyphRasterizer")
                .field("style", &self.style)
                .field("font_faces", &self.fontdb.len())
                .finish()
        }
    }

    impl GlyphRasterizer {
        /// Create a rasterizer that loads the system fonts.
        #[must_use]
        pub fn new(style: GlyphStyle) -> Self {
            let mut fontdb = usvg::fontdb::Database::new();
            fontdb.load_system_fonts();
            tracing::debug!("Loaded {} font faces for glyphs", fontdb.len());
            Self::with_fontdb(style, Arc::new(fontdb))
        }

        /// Create a rasterizer sharing an existing font database.
        #[must_use]
        pub fn with_fontdb(style: GlyphStyle, fontdb: Arc<usvg::fontdb::Database>) -> Self {
            Self { style, fontdb }
        }

        /// The glyph style.
        #[must_use]
        pub fn style(&self) -> &GlyphStyle {
            &self.style
        }

        /// The font database used for text.
        #[must_use]
        pub fn fontdb(&self) -> &Arc<usvg::fontdb::Database> {
            &self.fontdb
        }

        /// Parse options wired to this rasterizer's fonts.
        #[must_use]
        pub fn usvg_options(&self) -> usvg::Options<'static> {
            let mut opt = usvg::Options::default();
            opt.fontdb = Arc::clone(&self.fontdb);
            opt
        }

        /// SVG document drawing one glyph, centered in its cell.
        #[must_use]
        #[allow(clippy::cast_precision_loss)]
        pub fn glyph_svg(&self, key: &GlyphKey) -> String {
            let (px_w, px_h) = key.pixel_size();
            let (w, h) = (key.width as f32, key.height as f32);
            let font_size = self.style.font_size(w);

            let mut svg = String::with_capacity(512);
            let _ = write!(
                svg,
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{px_w}\" height=\"{px_h}\" viewBox=\"0 0 {w} {h}\"><defs>",
            );
            write_shadow_filter(&mut svg, "glyph-shadow", &self.style.shadow);
            let _ = write!(
                svg,
                "</defs><text x=\"{}\" y=\"{}\" font-size=\"{font_size}\" font-family=\"{}\" \
                 text-anchor=\"middle\" dominant-baseline=\"central\" filter=\"url(#glyph-shadow)\">{}</text></svg>",
                w / 2.0,
                h / 2.0,
                escape_xml(&self.style.font_family),
                escape_xml(&key.symbol),
            );
            svg
        }

        /// Rasterize a glyph into a pixmap of [`GlyphKey::pixel_size`].
        ///
        /// # Errors
        ///
        /// Returns an error if the glyph SVG cannot be parsed or the pixmap
        /// cannot be allocated.
        pub fn rasterize(&self, key: &GlyphKey) -> RenderResult<tiny_skia::Pixmap> {
            let svg = self.glyph_svg(key);
            let tree = usvg::Tree::from_str(&svg, &self.usvg_options())
                .map_err(|e| RenderError::Glyph(format!("'{}': {e}", key.symbol)))?;

            let (px_w, px_h) = key.pixel_size();
            let mut pixmap = tiny_skia::Pixmap::new(px_w, px_h)
                .ok_or_else(|| RenderError::Glyph(format!("bad glyph size {px_w}x{px_h}")))?;
            resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
            Ok(pixmap)
        }

        /// Rasterize a glyph and encode it as a PNG data URI.
        ///
        /// # Errors
        ///
        /// Returns an error if rasterization or PNG encoding fails.
        pub fn data_uri(&self, key: &GlyphKey) -> RenderResult<String> {
            let png = self
                .rasterize(key)?
                .encode_png()
                .map_err(|e| RenderError::Glyph(format!("PNG encoding failed: {e}")))?;
            let encoded = base64::engine::general_purpose::STANDARD.encode(png);
            Ok(format!("data:image/png;base64,{encoded}"))
        }
    }

    impl Default for GlyphRasterizer {
        fn default() -> Self {
            Self::new(GlyphStyle::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(symbol: &str) -> GlyphKey {
        GlyphKey::new(symbol, 60.0, 60.0, 2.0)
    }

    #[test]
    fn test_key_pixel_size() {
        let key = GlyphKey::new("🎨", 60.0, 60.0, 1.5);
        assert_eq!(key.ratio_permille, 1500);
        assert_eq!(key.pixel_size(), (90, 90));
        assert_ne!(key, GlyphKey::new("🎨", 60.0, 60.0, 2.0));
    }

    #[test]
    fn test_style_defaults() {
        let style = GlyphStyle::default();
        assert!((style.font_size(60.0) - 48.0).abs() < 1e-4);
        assert!(style.css_font(60.0).starts_with("48px Arial"));
        assert_eq!(style.shadow.color.to_css(), "rgba(0, 0, 0, 0.2)");
    }

    #[test]
    fn test_cache_insert_and_get() {
        let mut cache = GlyphCache::new();
        cache.insert(key("🌟"), 1_u32);

        assert!(cache.contains(&key("🌟")));
        assert_eq!(cache.get(&key("🌟")), Some(&1));
        assert!(cache.get(&key("⚡")).is_none());
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_get_or_try_insert_with_loads_once() {
        let mut cache: GlyphCache<String> = GlyphCache::new();
        let mut loads = 0;

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with(&key("❤️"), |k| {
                    loads += 1;
                    Ok::<_, ()>(format!("{}@{}", k.symbol, k.ratio_permille))
                })
                .expect("load");
            assert_eq!(value, "❤️@2000");
        }

        assert_eq!(loads, 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 2);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut cache: GlyphCache<u8> = GlyphCache::new();
        let result = cache.get_or_try_insert_with(&key("🎵"), |_| Err("no font"));
        assert_eq!(result, Err("no font"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = GlyphCache::with_config(GlyphCacheConfig { max_entries: 2 });
        cache.insert(key("a"), 1);
        cache.insert(key("b"), 2);
        let _ = cache.get(&key("a"));
        cache.insert(key("c"), 3);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&key("a")));
        assert!(!cache.contains(&key("b")));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cache = GlyphCache::new();
        cache.insert(key("a"), 1);
        cache.insert(key("b"), 2);
        assert_eq!(cache.remove(&key("a")), Some(1));
        assert_eq!(cache.remove(&key("a")), None);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[cfg(feature = "export")]
    #[test]
    fn test_glyph_svg_is_centered() {
        let rasterizer = GlyphRasterizer::with_fontdb(
            GlyphStyle::default(),
            std::sync::Arc::new(usvg::fontdb::Database::new()),
        );
        let svg = rasterizer.glyph_svg(&key("🌈"));
        assert!(svg.contains("width=\"120\""));
        assert!(svg.contains("viewBox=\"0 0 60 60\""));
        assert!(svg.contains("x=\"30\" y=\"30\""));
        assert!(svg.contains("font-size=\"48\""));
        assert!(svg.contains("🌈"));
    }

    #[cfg(feature = "export")]
    #[test]
    fn test_rasterize_glyph_size() {
        let rasterizer = GlyphRasterizer::with_fontdb(
            GlyphStyle::default(),
            std::sync::Arc::new(usvg::fontdb::Database::new()),
        );
        let pixmap = rasterizer.rasterize(&key("🎨")).expect("rasterize");
        assert_eq!((pixmap.width(), pixmap.height()), (120, 120));

        let uri = rasterizer.data_uri(&key("🎨")).expect("data uri");
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
