/// Side length of the square output canvas, in pixels.
pub const CANVAS_SIZE: u32 = 1000;
/// Smallest accepted box side.
pub const MIN_BOX_SIZE: u32 = 100;
/// Box side used when the form leaves a dimension blank or unparseable.
pub const DEFAULT_BOX_SIZE: i64 = 800;

/// Target box inside the canvas plus the padding that centres it.
///
/// Invariant: `width + pad_left + pad_right == CANVAS_SIZE` and
/// `height + pad_top + pad_bottom == CANVAS_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDimensions {
    pub width:      u32,
    pub height:     u32,
    pub pad_left:   u32,
    pub pad_right:  u32,
    pub pad_top:    u32,
    pub pad_bottom: u32,
}

impl NormalizedDimensions {
    /// Clamps both requested sides into `[MIN_BOX_SIZE, CANVAS_SIZE]` and
    /// splits the remaining space, leading side first (`floor(total / 2)`).
    pub fn new(requested_width: i64, requested_height: i64) -> Self {
        let width  = clamp_side(requested_width);
        let height = clamp_side(requested_height);
        let (pad_left, pad_right)  = split_padding(CANVAS_SIZE - width);
        let (pad_top, pad_bottom)  = split_padding(CANVAS_SIZE - height);
        NormalizedDimensions { width, height, pad_left, pad_right, pad_top, pad_bottom }
    }

    /// Convenience for raw form values; see [`parse_dimension`].
    pub fn from_form(raw_width: Option<&str>, raw_height: Option<&str>) -> Self {
        Self::new(parse_dimension(raw_width), parse_dimension(raw_height))
    }
}

impl Default for NormalizedDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_BOX_SIZE, DEFAULT_BOX_SIZE)
    }
}

fn clamp_side(value: i64) -> u32 {
    value.clamp(MIN_BOX_SIZE as i64, CANVAS_SIZE as i64) as u32
}

fn split_padding(total: u32) -> (u32, u32) {
    let leading = total / 2;
    (leading, total - leading)
}

/// Leniently reads an integer form field.
///
/// Leading whitespace and a sign are accepted and parsing stops at the first
/// non-digit, so `"640px"` reads as 640. Absent, empty, non-numeric and zero
/// values all fall back to [`DEFAULT_BOX_SIZE`].
pub fn parse_dimension(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else { return DEFAULT_BOX_SIZE };
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(d as i64);
    }

    if !seen_digit || value == 0 {
        return DEFAULT_BOX_SIZE;
    }
    if negative { -value } else { value }
}
