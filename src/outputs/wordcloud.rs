//! Word-cloud rasterizer.
//!
//! Words are laid out largest first. Each word's font size is derived from
//! the previous word's size and the ratio of their frequencies, so sizes
//! track frequency without letting the top word dwarf everything else:
//!
//! ```text
//! size = round((relative_scaling * freq / prev_freq + (1 - relative_scaling)) * prev_size)
//! ```
//!
//! A word is placed at a uniformly random free position. Free space is
//! tracked per pixel of actual glyph coverage and queried through a
//! summed-area table, so small words can nest inside the gaps of large ones.
//! When nothing fits, the other orientation is tried once, then the size
//! shrinks by `font_step`. Layout ends at the first word that does not fit
//! even at `min_font_size`.
//!
//! Layout is random by nature; set `seed` to make it repeatable.

use crate::error::{ConfigError, RenderError};
use crate::text::TokenCounter;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{GrayImage, Luma, Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Sampled from the viridis colormap, minus the yellows that vanish on white.
const PALETTE: [[u8; 3]; 8] = [
    [68, 1, 84],
    [72, 40, 120],
    [62, 73, 137],
    [49, 104, 142],
    [38, 130, 142],
    [31, 158, 137],
    [53, 183, 121],
    [109, 205, 89],
];

/// Largest accepted canvas width or height, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Canvas and layout parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// RGB background colour.
    pub background: [u8; 3],
    /// Cap on distinct words drawn.
    pub max_words: usize,
    pub max_font_size: f32,
    pub min_font_size: f32,
    pub font_step: f32,
    /// 0 sizes by rank only, 1 sizes strictly by frequency.
    pub relative_scaling: f32,
    /// Probability that a word starts horizontal.
    pub prefer_horizontal: f64,
    /// Padding in pixels around each word.
    pub margin: u32,
    pub seed: Option<u64>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: [255, 255, 255],
            max_words: 200,
            max_font_size: 150.0,
            min_font_size: 8.0,
            font_step: 2.0,
            relative_scaling: 0.5,
            prefer_horizontal: 0.9,
            margin: 2,
            seed: None,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            return Err(ConfigError::Invalid(format!(
                "canvas sides are capped at {MAX_CANVAS_SIDE}px, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_words == 0 {
            return Err(ConfigError::Invalid("max_words must be positive".into()));
        }
        if !(self.min_font_size > 0.0 && self.min_font_size <= self.max_font_size) {
            return Err(ConfigError::Invalid(format!(
                "font sizes must satisfy 0 < min ({}) <= max ({})",
                self.min_font_size, self.max_font_size
            )));
        }
        if !(self.font_step > 0.0) {
            return Err(ConfigError::Invalid("font_step must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.relative_scaling) {
            return Err(ConfigError::Invalid("relative_scaling must be within [0, 1]".into()));
        }
        if !(0.0..=1.0).contains(&self.prefer_horizontal) {
            return Err(ConfigError::Invalid("prefer_horizontal must be within [0, 1]".into()));
        }
        Ok(())
    }

    fn background(&self) -> Rgb<u8> {
        Rgb(self.background)
    }
}

/// One word after layout: where it goes, how big, and its coverage mask.
#[derive(Debug, Clone)]
pub struct PlacedWord {
    pub word: String,
    pub count: usize,
    pub font_size: f32,
    pub x: u32,
    pub y: u32,
    pub vertical: bool,
    pub color: Rgb<u8>,
    mask: GrayImage,
}

#[cfg(test)]
impl PlacedWord {
    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }
}

/// Count whitespace-separated words and keep the `max_words` most frequent,
/// ties in first-seen order.
///
/// # Errors
///
/// [`RenderError::EmptyText`] when `text` holds no words.
pub fn word_frequencies(text: &str, max_words: usize) -> Result<Vec<(String, usize)>, RenderError> {
    let counter: TokenCounter = text.split_whitespace().collect();
    if counter.is_empty() {
        return Err(RenderError::EmptyText);
    }
    Ok(counter.top(Some(max_words)))
}

/// Renders a space-joined token string into a word-cloud image.
pub struct WordCloudRenderer {
    font: FontArc,
    options: RenderOptions,
}

impl WordCloudRenderer {
    pub fn new(font: FontArc, options: RenderOptions) -> Self {
        Self { font, options }
    }

    /// Load the font file and build a renderer. The font must cover every
    /// script that will be drawn; missing glyphs render as boxes.
    #[instrument(level = "info", skip(options), fields(path = %path.display()))]
    pub fn from_font_file(path: &Path, options: RenderOptions) -> Result<Self, RenderError> {
        let data = std::fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.display().to_string(),
            source,
        })?;
        let font = FontArc::try_from_vec(data).map_err(|_| RenderError::InvalidFont {
            path: path.display().to_string(),
        })?;
        info!("Loaded word-cloud font");
        Ok(Self::new(font, options))
    }

    /// Render `text` and save it to `path`; the format follows the extension.
    ///
    /// # Returns
    ///
    /// The number of words drawn.
    ///
    /// # Errors
    ///
    /// [`RenderError::EmptyText`] for input without words (nothing is
    /// written), [`RenderError::NoSpace`] if not even the first word fits,
    /// [`RenderError::Image`] if the file cannot be encoded or written.
    #[instrument(level = "info", skip(self, text), fields(path = %path.display()))]
    pub fn render(&self, text: &str, path: &Path) -> Result<usize, RenderError> {
        let frequencies = word_frequencies(text, self.options.max_words)?;
        let placed = self.layout(&frequencies, &mut self.rng());
        if placed.is_empty() {
            return Err(RenderError::NoSpace {
                width: self.options.width,
                height: self.options.height,
            });
        }
        if placed.len() < frequencies.len() {
            warn!(
                placed = placed.len(),
                wanted = frequencies.len(),
                "Canvas full; dropped the least frequent words"
            );
        }
        debug!(
            word = %placed[0].word,
            count = placed[0].count,
            font_size = placed[0].font_size,
            vertical = placed[0].vertical,
            "Largest word"
        );
        let image = self.draw(&placed);
        image.save(path)?;
        info!(words = placed.len(), "Saved word cloud");
        Ok(placed.len())
    }

    fn rng(&self) -> StdRng {
        match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Place words, most frequent first. `frequencies` must already be ranked.
    pub fn layout<R: Rng>(&self, frequencies: &[(String, usize)], rng: &mut R) -> Vec<PlacedWord> {
        let opts = &self.options;
        let mut occupancy = Occupancy::new(opts.width, opts.height);
        let mut placed = Vec::new();
        let Some(&(_, first_count)) = frequencies.first() else {
            return placed;
        };

        let mut font_size = opts.max_font_size;
        let mut last_count = first_count as f32;
        let rs = opts.relative_scaling;

        for (word, count) in frequencies.iter().take(opts.max_words) {
            if *count == 0 {
                continue;
            }
            if rs != 0.0 {
                font_size = ((rs * (*count as f32 / last_count) + (1.0 - rs)) * font_size).round();
            }
            let mut vertical = rng.random::<f64>() >= opts.prefer_horizontal;
            let mut tried_other_orientation = false;

            let spot = loop {
                if font_size < opts.min_font_size {
                    break None;
                }
                let mask = self.rasterize(word, font_size, vertical);
                let found = occupancy.sample_free(
                    mask.width() + opts.margin,
                    mask.height() + opts.margin,
                    rng,
                );
                if let Some(pos) = found {
                    break Some((pos, mask));
                }
                if !tried_other_orientation && opts.prefer_horizontal < 1.0 {
                    vertical = !vertical;
                    tried_other_orientation = true;
                } else {
                    font_size -= opts.font_step;
                    vertical = false;
                }
            };

            let Some(((x, y), mask)) = spot else {
                debug!(%word, "No room left; stopping layout");
                break;
            };
            let (x, y) = (x + opts.margin / 2, y + opts.margin / 2);
            occupancy.mark(&mask, x, y);

            let color = Rgb(PALETTE[rng.random_range(0..PALETTE.len())]);
            placed.push(PlacedWord {
                word: word.clone(),
                count: *count,
                font_size,
                x,
                y,
                vertical,
                color,
                mask,
            });
            last_count = *count as f32;
        }

        debug!(placed = placed.len(), "Layout finished");
        placed
    }

    /// Paint placed words onto a fresh canvas.
    pub fn draw(&self, placed: &[PlacedWord]) -> RgbImage {
        let mut canvas =
            RgbImage::from_pixel(self.options.width, self.options.height, self.options.background());
        for word in placed {
            for (mx, my, Luma([alpha])) in word.mask.enumerate_pixels() {
                if *alpha == 0 {
                    continue;
                }
                let (cx, cy) = (word.x + mx, word.y + my);
                if cx >= canvas.width() || cy >= canvas.height() {
                    continue;
                }
                let px = canvas.get_pixel_mut(cx, cy);
                let a = *alpha as u32;
                for c in 0..3 {
                    px.0[c] = ((px.0[c] as u32 * (255 - a) + word.color.0[c] as u32 * a) / 255) as u8;
                }
            }
        }
        canvas
    }

    /// Coverage mask of `word` at `size`, rotated 90° counter-clockwise when
    /// vertical.
    fn rasterize(&self, word: &str, size: f32, vertical: bool) -> GrayImage {
        let scale = PxScale::from(size);
        let (w, _) = text_size(scale, &self.font, word);
        let h = self.font.as_scaled(scale).height().ceil() as u32;
        let mut mask = GrayImage::new(w + 1, h.max(1));
        draw_text_mut(&mut mask, Luma([255]), 0, 0, scale, &self.font, word);
        if vertical {
            imageops::rotate270(&mask)
        } else {
            mask
        }
    }
}

/// Per-pixel "taken" flags with a summed-area table for O(1) rectangle
/// queries.
struct Occupancy {
    width: u32,
    height: u32,
    taken: Vec<bool>,
    /// `(width + 1) * (height + 1)` prefix sums; row 0 and column 0 are zero.
    sums: Vec<u32>,
}

impl Occupancy {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            taken: vec![false; width as usize * height as usize],
            sums: vec![0; (width as usize + 1) * (height as usize + 1)],
        }
    }

    fn sum_at(&self, x: u32, y: u32) -> u32 {
        self.sums[y as usize * (self.width as usize + 1) + x as usize]
    }

    /// Taken pixels inside `[x, x + w) × [y, y + h)`.
    fn taken_in(&self, x: u32, y: u32, w: u32, h: u32) -> u32 {
        self.sum_at(x + w, y + h) + self.sum_at(x, y) - self.sum_at(x + w, y) - self.sum_at(x, y + h)
    }

    /// Pick a uniformly random top-left corner where a `w × h` box is free.
    fn sample_free<R: Rng>(&self, w: u32, h: u32, rng: &mut R) -> Option<(u32, u32)> {
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return None;
        }
        let free = |x: u32, y: u32| self.taken_in(x, y, w, h) == 0;
        let positions = || {
            (0..=self.height - h).flat_map(move |y| (0..=self.width - w).map(move |x| (x, y)))
        };

        let total = positions().filter(|&(x, y)| free(x, y)).count();
        if total == 0 {
            return None;
        }
        let pick = rng.random_range(0..total);
        positions().filter(|&(x, y)| free(x, y)).nth(pick)
    }

    /// Mark every covered pixel of `mask` drawn at `(x, y)` and refresh the
    /// prefix sums.
    fn mark(&mut self, mask: &GrayImage, x: u32, y: u32) {
        for (mx, my, Luma([alpha])) in mask.enumerate_pixels() {
            let (cx, cy) = (x + mx, y + my);
            if *alpha > 0 && cx < self.width && cy < self.height {
                self.taken[cy as usize * self.width as usize + cx as usize] = true;
            }
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let stride = self.width as usize + 1;
        for y in 0..self.height as usize {
            let mut row = 0u32;
            for x in 0..self.width as usize {
                row += self.taken[y * self.width as usize + x] as u32;
                self.sums[(y + 1) * stride + x + 1] = self.sums[y * stride + x + 1] + row;
            }
        }
    }
}
