use eframe::egui::Color32;

/// Parses a palette constant such as `#0a84ff`, falling back to `fallback`
/// when the value is malformed.
pub fn hex_or(hex: &str, fallback: Color32) -> Color32 {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    match (digits.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => Color32::from_rgb(r, g, b),
        _ => fallback,
    }
}
