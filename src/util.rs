// Console helpers and small pure utilities shared by the draw core.

use crate::model::REFERENCE_VIEWPORT_WIDTH;

pub fn clog(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{msg}");
}

pub fn cwarn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("warning: {msg}");
}

pub fn cerror(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&wasm_bindgen::JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("error: {msg}");
}

/// Confetti size factor for the current viewport, clamped to `[0.5, 1.0]`.
pub fn confetti_scale(viewport_width: f64) -> f64 {
    (viewport_width / REFERENCE_VIEWPORT_WIDTH).clamp(0.5, 1.0)
}

/// Splits editor text into the name pool: one name per non-blank line, trimmed, order kept.
pub fn parse_name_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Maps a `[0, 1)` sample onto `0..len`.
pub fn pick_index(sample: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    ((sample * len as f64).floor() as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_clamped_against_reference_width() {
        assert_eq!(confetti_scale(300.0), 0.5);
        assert_eq!(confetti_scale(825.0), 0.75);
        assert_eq!(confetti_scale(1100.0), 1.0);
        assert_eq!(confetti_scale(2560.0), 1.0);
    }

    #[test]
    fn name_list_drops_blank_lines_and_trims() {
        let names = parse_name_list("  Alice \n\n\t\nBob\r\n   Carol\n");
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
        assert!(parse_name_list("").is_empty());
        assert!(parse_name_list(" \n \n").is_empty());
    }

    #[test]
    fn pick_index_stays_in_bounds() {
        assert_eq!(pick_index(0.0, 4), 0);
        assert_eq!(pick_index(0.99, 4), 3);
        assert_eq!(pick_index(1.0, 4), 3);
        assert_eq!(pick_index(0.5, 0), 0);
    }
}
