use crate::config::GameConfig;

/// What the sizer needs to know about the host window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub fullscreen: bool,
}

/// Pixel edge of one cell so the whole grid fits the viewport.
pub fn cell_size(vp: Viewport, cfg: &GameConfig) -> u32 {
    let reserved = if vp.fullscreen {
        cfg.reserved_px_fullscreen
    } else {
        cfg.reserved_px_windowed
    };
    let reserved = reserved as f64;
    let by_width = ((vp.width - cfg.layout_margin_px as f64) / cfg.cols as f64).floor();
    let by_height = ((vp.height - reserved) / cfg.rows as f64).floor();
    let size = by_width.min(by_height);
    // NaN (bogus viewport) lands on the minimum
    if size.is_nan() {
        return cfg.min_cell_px;
    }
    size.clamp(cfg.min_cell_px as f64, cfg.max_cell_px as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: f64, height: f64, fullscreen: bool) -> u32 {
        cell_size(Viewport { width, height, fullscreen }, &GameConfig::default())
    }

    #[test]
    fn large_window_caps_at_max() {
        assert_eq!(size(1920.0, 1080.0, false), 50);
    }

    #[test]
    fn width_bound() {
        // (640 - 40) / 12 = 50, (900 - 250) / 6 = 108
        assert_eq!(size(640.0, 900.0, false), 50);
        // (520 - 40) / 12 = 40
        assert_eq!(size(520.0, 900.0, false), 40);
    }

    #[test]
    fn height_bound_depends_on_fullscreen() {
        // (430 - 250) / 6 = 30 windowed, (430 - 150) / 6 = 46 fullscreen
        assert_eq!(size(1920.0, 430.0, false), 30);
        assert_eq!(size(1920.0, 430.0, true), 46);
    }

    #[test]
    fn tiny_window_clamps_to_min() {
        assert_eq!(size(100.0, 100.0, false), 15);
        assert_eq!(size(0.0, 0.0, true), 15);
        assert_eq!(size(f64::NAN, f64::NAN, false), 15);
    }
}
