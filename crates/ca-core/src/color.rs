use crate::frame::Rgb;

/// Convertit RGB normalisé [0,1] → HSV. H ∈ [0.0, 1.0), S ∈ [0.0, 1.0], V ∈ [0.0, 1.0].
///
/// # Example
/// ```
/// use ca_core::color::rgb_to_hsv;
/// let (h, s, v) = rgb_to_hsv(1.0, 0.0, 0.0);
/// assert!((h - 0.0).abs() < 0.01);
/// assert!((s - 1.0).abs() < 0.01);
/// assert!((v - 1.0).abs() < 0.01);
/// ```
#[must_use]
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { delta / max };
    let h = if delta == 0.0 {
        0.0
    } else if (max - r).abs() < f32::EPSILON {
        (((g - b) / delta) % 6.0) / 6.0
    } else if (max - g).abs() < f32::EPSILON {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };
    let h = if h < 0.0 { h + 1.0 } else { h };

    (h, s, v)
}

/// Convertit HSV → RGB normalisé [0,1]. H ∈ [0.0, 1.0), S ∈ [0.0, 1.0], V ∈ [0.0, 1.0].
///
/// # Example
/// ```
/// use ca_core::color::hsv_to_rgb;
/// let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
/// assert_eq!((r, g, b), (1.0, 0.0, 0.0));
/// ```
#[must_use]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let h = h * 6.0;
    let i = h.floor() as u32;
    let f = h - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match i % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// [0,255] → [0,1].
#[inline]
#[must_use]
pub fn normalize(rgb: Rgb) -> (f32, f32, f32) {
    (
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
    )
}

/// [0,1] → [0,255], clampé puis arrondi.
#[inline]
#[must_use]
pub fn denormalize(r: f32, g: f32, b: f32) -> Rgb {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    (q(r), q(g), q(b))
}

/// Contraste autour du gris moyen : `clamp((c − 0.5) × k + 0.5, 0, 1)`.
///
/// # Example
/// ```
/// use ca_core::color::apply_contrast;
/// assert_eq!(apply_contrast(0.5, 1.5), 0.5);
/// assert_eq!(apply_contrast(0.0, 1.5), 0.0);
/// assert_eq!(apply_contrast(0.9, 1.5), 1.0);
/// ```
#[inline]
#[must_use]
pub fn apply_contrast(c: f32, k: f32) -> f32 {
    ((c - 0.5) * k + 0.5).clamp(0.0, 1.0)
}

/// Technique HSV Boost : multiplie S et V, clampés à [0,1]. Teinte inchangée.
///
/// Les gris (S = 0) restent achromatiques.
///
/// # Example
/// ```
/// use ca_core::color::apply_hsv_boost;
/// let (r, g, b) = apply_hsv_boost(0.5, 0.5, 0.5, 1.5, 1.2);
/// assert_eq!(r, g);
/// assert_eq!(g, b);
/// ```
#[must_use]
pub fn apply_hsv_boost(
    r: f32,
    g: f32,
    b: f32,
    saturation_boost: f32,
    value_boost: f32,
) -> (f32, f32, f32) {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    let s = (s * saturation_boost).clamp(0.0, 1.0);
    let v = (v * value_boost).clamp(0.0, 1.0);
    let (r, g, b) = hsv_to_rgb(h, s, v);
    (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_hsv_roundtrip() {
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(17) {
                    let rgb = (r as u8, g as u8, b as u8);
                    let (rf, gf, bf) = normalize(rgb);
                    let (h, s, v) = rgb_to_hsv(rf, gf, bf);
                    let (r2, g2, b2) = hsv_to_rgb(h, s, v);
                    let back = denormalize(r2, g2, b2);
                    assert!(
                        (i16::from(rgb.0) - i16::from(back.0)).abs() <= 1,
                        "R mismatch: {rgb:?} vs {back:?} (h={h}, s={s}, v={v})"
                    );
                    assert!((i16::from(rgb.1) - i16::from(back.1)).abs() <= 1);
                    assert!((i16::from(rgb.2) - i16::from(back.2)).abs() <= 1);
                }
            }
        }
    }

    #[test]
    fn hsv_boost_keeps_hue() {
        let (r, g, b) = normalize((200, 50, 50));
        let (h, _, _) = rgb_to_hsv(r, g, b);
        let (r2, g2, b2) = apply_hsv_boost(r, g, b, 1.5, 1.2);
        let (h2, s2, _) = rgb_to_hsv(r2, g2, b2);
        assert!((h - h2).abs() < 0.01, "Hue shifted: {h} vs {h2}");
        assert!(s2 <= 1.0);
    }

    #[test]
    fn hsv_boost_clamps_value() {
        let (r, g, b) = apply_hsv_boost(1.0, 1.0, 1.0, 1.5, 1.3);
        assert_eq!(denormalize(r, g, b), (255, 255, 255));
        let (r, g, b) = apply_hsv_boost(0.0, 0.0, 0.0, 1.5, 1.3);
        assert_eq!(denormalize(r, g, b), (0, 0, 0));
    }
}
