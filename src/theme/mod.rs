//! Theme palette cycling
//!
//! The site accent color rotates through a fixed palette each time the avatar
//! is clicked. The current color is exposed to the page as a single CSS custom
//! property, so advancing it never forces a re-render of anything else.

use anyhow::{bail, Result};

/// Default accent palette used when site.yml does not configure one
pub const DEFAULT_PALETTE: [&str; 5] = ["#eca72c", "#e4572e", "#6b2d5c", "#2a9d8f", "#274690"];

/// Rotating index over a fixed, non-empty palette of colors
#[derive(Debug, Clone)]
pub struct ThemeCycler {
    palette: Vec<String>,
    index: usize,
}

impl ThemeCycler {
    /// Create a cycler starting at the first color.
    ///
    /// Fails on an empty palette; every other state is valid.
    pub fn new(palette: Vec<String>) -> Result<Self> {
        if palette.is_empty() {
            bail!("theme palette must contain at least one color");
        }
        Ok(Self { palette, index: 0 })
    }

    /// Advance to the next color, wrapping around at the end
    pub fn cycle(&mut self) {
        self.index = (self.index + 1) % self.palette.len();
    }

    /// The currently selected color
    pub fn current(&self) -> &str {
        &self.palette[self.index]
    }

    /// Current index into the palette
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of colors in the palette
    pub fn len(&self) -> usize {
        self.palette.len()
    }

    /// Always false: an empty palette is rejected at construction
    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }
}

impl Default for ThemeCycler {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            index: 0,
        }
    }
}
