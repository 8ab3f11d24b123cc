use ca_core::charset::CharacterRamp;
use ca_core::frame::{ArtCell, ArtGrid, Raster};

/// Mappe chaque pixel sur la rampe, en ordre row-major.
///
/// La grille a exactement les dimensions du raster ; la couleur de chaque
/// cellule est celle de son pixel.
///
/// # Example
/// ```
/// use ca_core::charset::CharacterRamp;
/// use ca_core::frame::Raster;
/// use ca_ascii::luminance::process_luminance;
///
/// let raster = Raster::filled(4, 2, (255, 255, 255));
/// let grid = process_luminance(&raster, &CharacterRamp::default());
/// assert_eq!((grid.width, grid.height), (4, 2));
/// assert_eq!(grid.get(3, 1).ch, ' ');
/// ```
#[must_use]
pub fn process_luminance(raster: &Raster, ramp: &CharacterRamp) -> ArtGrid {
    let cells = raster
        .pixels()
        .map(|fg| ArtCell {
            ch: ramp.map_rgb(fg),
            fg,
        })
        .collect();
    ArtGrid {
        cells,
        width: raster.width,
        height: raster.height,
    }
}
