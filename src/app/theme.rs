use crate::settings::Theme;
use crate::utils::color::hex_or;
use eframe::egui::{self, Color32, Visuals};

pub const ACCENT: &str = "#0a84ff";
pub const SUCCESS: &str = "#30d158";
pub const DANGER: &str = "#ff453a";
pub const MUTED: &str = "#8e8e93";

pub fn accent() -> Color32 {
    hex_or(ACCENT, Color32::LIGHT_BLUE)
}

pub fn success() -> Color32 {
    hex_or(SUCCESS, Color32::GREEN)
}

pub fn danger() -> Color32 {
    hex_or(DANGER, Color32::RED)
}

pub fn muted() -> Color32 {
    hex_or(MUTED, Color32::GRAY)
}

pub fn visuals(theme: Theme) -> Visuals {
    let mut visuals = match theme {
        Theme::Dark => {
            let mut v = Visuals::dark();
            v.panel_fill = hex_or("#000000", Color32::BLACK);
            v.extreme_bg_color = hex_or("#1c1c1e", Color32::from_gray(28));
            v
        }
        Theme::Light => {
            let mut v = Visuals::light();
            v.panel_fill = hex_or("#f9fafb", Color32::from_gray(249));
            v.extreme_bg_color = hex_or("#ffffff", Color32::WHITE);
            v
        }
    };
    visuals.selection.bg_fill = accent();
    visuals.hyperlink_color = accent();
    visuals
}

pub fn apply(ctx: &egui::Context, theme: Theme) {
    ctx.set_visuals(visuals(theme));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_constants_parse() {
        assert_eq!(accent(), Color32::from_rgb(10, 132, 255));
        assert_eq!(danger(), Color32::from_rgb(255, 69, 58));
    }

    #[test]
    fn themes_differ_in_mode() {
        assert!(visuals(Theme::Dark).dark_mode);
        assert!(!visuals(Theme::Light).dark_mode);
    }
}
