// Browser smoke tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use reaction_grid::{BrowserScreen, GameConfig, Screen, cell_size};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn browser_viewport_is_measurable() {
    let vp = BrowserScreen.viewport();
    assert!(vp.width > 0.0);
    assert!(vp.height > 0.0);
    assert!(!vp.fullscreen);
    let px = cell_size(vp, &GameConfig::default());
    assert!((15..=50).contains(&px));
}

#[wasm_bindgen_test]
fn exiting_fullscreen_when_windowed_is_harmless() {
    assert!(BrowserScreen.exit_fullscreen(Box::new(|_| {})).is_ok());
}
