use crate::error::CoreError;

/// Couleur RGB 8 bits par canal.
pub type Rgb = (u8, u8, u8);

/// Raster RGB immuable entre les étages du pipeline.
///
/// Stocke les pixels en RGB row-major, 3 bytes par pixel. Chaque étage
/// produit un nouveau `Raster` plutôt que de modifier son entrée.
///
/// # Example
/// ```
/// use ca_core::frame::Raster;
/// let raster = Raster::new(10, 10);
/// assert_eq!(raster.data.len(), 300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Pixels RGB, row-major, 3 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Raster {
    /// Crée un raster noir aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use ca_core::frame::Raster;
    /// let raster = Raster::new(100, 50);
    /// assert_eq!(raster.width, 100);
    /// assert_eq!(raster.height, 50);
    /// assert_eq!(raster.pixel(99, 49), (0, 0, 0));
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 3],
            width,
            height,
        }
    }

    /// Wrap an existing RGB buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::BufferSize`] if `data` is not exactly
    /// `width * height * 3` bytes long.
    ///
    /// # Example
    /// ```
    /// use ca_core::frame::Raster;
    /// let raster = Raster::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
    /// assert_eq!(raster.pixel(1, 0), (0, 0, 255));
    /// assert!(Raster::from_raw(2, 2, vec![0; 5]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        if data.len() != width as usize * height as usize * 3 {
            return Err(CoreError::BufferSize {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Raster uniforme, pratique pour les tests.
    ///
    /// # Example
    /// ```
    /// use ca_core::frame::Raster;
    /// let white = Raster::filled(2, 2, (255, 255, 255));
    /// assert!(white.pixels().all(|p| p == (255, 255, 255)));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&[color.0, color.1, color.2]);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Accès au pixel (x, y) → (r, g, b).
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        if idx + 2 >= self.data.len() {
            return (0, 0, 0);
        }
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Écrit le pixel (x, y). Hors limites : no-op.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.data[idx] = color.0;
        self.data[idx + 1] = color.1;
        self.data[idx + 2] = color.2;
    }

    /// Iterate pixels row-major.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.data.chunks_exact(3).map(|p| (p[0], p[1], p[2]))
    }

    /// `true` if either dimension is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Single cell in the art grid.
///
/// # Example
/// ```
/// use ca_core::frame::ArtCell;
/// let cell = ArtCell::default();
/// assert_eq!(cell.ch, ' ');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArtCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur du glyphe (RGB).
    pub fg: Rgb,
}

impl Default for ArtCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: (0, 0, 0),
        }
    }
}

/// Grille de sortie : `height` lignes de `width` cellules (glyphe, couleur).
///
/// # Example
/// ```
/// use ca_core::frame::{ArtGrid, ArtCell};
/// let mut grid = ArtGrid::new(80, 24);
/// grid.set(0, 0, ArtCell { ch: '@', fg: (255, 0, 0) });
/// assert_eq!(grid.get(0, 0).ch, '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<ArtCell>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl ArtGrid {
    /// Crée une grille remplie d'espaces noirs.
    ///
    /// # Example
    /// ```
    /// use ca_core::frame::ArtGrid;
    /// let grid = ArtGrid::new(80, 24);
    /// assert_eq!(grid.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![ArtCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, cell: ArtCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &ArtCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Iterate rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[ArtCell]> + '_ {
        self.cells.chunks_exact((self.width as usize).max(1))
    }

    /// Bloc de texte : une ligne par rangée, chacune terminée par `'\n'`.
    ///
    /// # Example
    /// ```
    /// use ca_core::frame::{ArtGrid, ArtCell};
    /// let mut grid = ArtGrid::new(2, 1);
    /// grid.set(1, 0, ArtCell { ch: '#', fg: (0, 0, 0) });
    /// assert_eq!(grid.text_block(), " #\n");
    /// ```
    #[must_use]
    pub fn text_block(&self) -> String {
        let mut text = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in self.rows() {
            text.extend(row.iter().map(|c| c.ch));
            text.push('\n');
        }
        text
    }

    /// Grille de couleurs parallèle au bloc de texte.
    #[must_use]
    pub fn color_grid(&self) -> Vec<Vec<Rgb>> {
        self.rows()
            .map(|row| row.iter().map(|c| c.fg).collect())
            .collect()
    }
}
