//! Visual parameter resolution: per-body overrides, then type defaults.

use egui::Color32;
use shared::{BodyType, CelestialBody};

/// Resolved look of a body for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    /// Diameter in world units before scale/zoom
    pub base_size: f64,
    pub fill: Color32,
    pub ring_color: Color32,
    pub ring_width: f64,
    pub ring_only: bool,
}

/// Defaults keyed by body type
pub fn type_defaults(body_type: BodyType) -> Visual {
    match body_type {
        BodyType::Star => Visual {
            base_size: 64.0,
            fill: Color32::from_rgb(0xFF, 0xD7, 0x00),
            ring_color: Color32::TRANSPARENT,
            ring_width: 0.0,
            ring_only: false,
        },
        BodyType::Planet => planet_defaults(),
        BodyType::Moon => Visual {
            base_size: 24.0,
            fill: Color32::from_rgb(0x94, 0xA3, 0xB8),
            ring_color: rgba(100, 116, 139, 0.2),
            ring_width: 0.5,
            ring_only: false,
        },
        BodyType::Station => Visual {
            base_size: 20.0,
            fill: Color32::from_rgb(0xEA, 0xB3, 0x08),
            ring_color: rgba(234, 179, 8, 0.2),
            ring_width: 0.5,
            ring_only: false,
        },
        BodyType::Asteroid => Visual {
            base_size: 0.0,
            fill: rgba(156, 163, 175, 0.15),
            ring_color: rgba(156, 163, 175, 0.15),
            ring_width: 3.0,
            ring_only: true,
        },
    }
}

fn planet_defaults() -> Visual {
    Visual {
        base_size: 48.0,
        fill: Color32::from_rgb(0x63, 0x66, 0xF1),
        ring_color: rgba(100, 116, 139, 0.3),
        ring_width: 1.0,
        ring_only: false,
    }
}

/// Defaults for a type name; unknown names fall back to planet defaults
pub fn defaults_for_type_name(name: &str) -> Visual {
    BodyType::parse(name)
        .map(type_defaults)
        .unwrap_or_else(planet_defaults)
}

/// Overrides first, then type defaults. Unparsable colors count as absent.
pub fn resolve(body: &CelestialBody) -> Visual {
    let defaults = type_defaults(body.body_type());
    Visual {
        base_size: body
            .base_size
            .filter(|s| s.is_finite() && *s >= 0.0)
            .unwrap_or(defaults.base_size),
        fill: body
            .fallback_color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(defaults.fill),
        ring_color: body
            .orbit_ring_color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(defaults.ring_color),
        ring_width: body
            .orbit_ring_width
            .filter(|w| w.is_finite() && *w >= 0.0)
            .unwrap_or(defaults.ring_width),
        ring_only: body.is_ring_only.unwrap_or(defaults.ring_only),
    }
}

fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, (a.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Parse a color string into a render color. See [`parse_rgba`].
pub fn parse_color(s: &str) -> Option<Color32> {
    parse_rgba(s).map(|[r, g, b, a]| Color32::from_rgba_unmultiplied(r, g, b, a))
}

/// Parse `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)` and
/// `rgba(r, g, b, a)` with alpha in [0, 1] into unmultiplied sRGBA
pub fn parse_rgba(s: &str) -> Option<[u8; 4]> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    let (args, has_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest.strip_suffix(')')?, true)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest.strip_suffix(')')?, false)
    } else {
        return None;
    };

    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != if has_alpha { 4 } else { 3 } {
        return None;
    }
    let channel = |p: &str| -> Option<u8> {
        let v: f32 = p.parse().ok()?;
        Some(v.clamp(0.0, 255.0).round() as u8)
    };
    let (r, g, b) = (channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
    let a = if has_alpha {
        parts[3].parse::<f32>().ok()?
    } else {
        1.0
    };
    Some([r, g, b, (a.clamp(0.0, 1.0) * 255.0).round() as u8])
}

fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    match hex.len() {
        3 => Some([nibble(0)?, nibble(1)?, nibble(2)?, 255]),
        6 => Some([byte(0)?, byte(2)?, byte(4)?, 255]),
        8 => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
        _ => None,
    }
}

/// Unmultiplied color to edit: the override when it parses, else the
/// resolved default
pub fn editable_rgba(override_color: Option<&str>, resolved: Color32) -> [u8; 4] {
    override_color
        .and_then(parse_rgba)
        .unwrap_or_else(|| resolved.to_srgba_unmultiplied())
}

/// Format unmultiplied sRGBA as `#RRGGBB` / `#RRGGBBAA`
pub fn format_color([r, g, b, a]: [u8; 4]) -> String {
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::defaults::{default_asteroid_belt, default_planet, default_star};

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_color("#FFD700"), Some(Color32::from_rgb(255, 215, 0)));
        assert_eq!(parse_color("#fff"), Some(Color32::WHITE));
        assert_eq!(
            parse_color("#00000080"),
            Some(Color32::from_rgba_unmultiplied(0, 0, 0, 128))
        );
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#GGGGGG"), None);
    }

    #[test]
    fn test_parse_rgb_forms() {
        assert_eq!(
            parse_color("rgb(10, 20, 30)"),
            Some(Color32::from_rgb(10, 20, 30))
        );
        assert_eq!(
            parse_color("rgba(100, 116, 139, 0.3)"),
            Some(Color32::from_rgba_unmultiplied(100, 116, 139, 77))
        );
        assert_eq!(parse_color("rgba(1, 2, 3)"), None);
        assert_eq!(parse_color("hsl(0, 0%, 0%)"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn test_resolve_uses_overrides() {
        let mut planet = default_planet("Sol", "Sol", 1, 0.0);
        planet.base_size = Some(10.0);
        planet.fallback_color = Some("#FF0000".into());
        let v = resolve(&planet);
        assert_eq!(v.base_size, 10.0);
        assert_eq!(v.fill, Color32::from_rgb(255, 0, 0));
        assert!(!v.ring_only);
    }

    #[test]
    fn test_resolve_falls_back_to_type_defaults() {
        let mut star = default_star("Sol", 0);
        star.base_size = None;
        star.fallback_color = Some("not a color".into());
        let v = resolve(&star);
        assert_eq!(v, type_defaults(BodyType::Star));
    }

    #[test]
    fn test_belt_is_ring_only() {
        let belt = default_asteroid_belt("Sol", 1);
        let v = resolve(&belt);
        assert!(v.ring_only);
        assert_eq!(v.ring_width, 3.0);
    }

    #[test]
    fn test_unknown_type_name_uses_planet_defaults() {
        assert_eq!(defaults_for_type_name("comet"), planet_defaults());
        assert_eq!(defaults_for_type_name("moon"), type_defaults(BodyType::Moon));
    }

    #[test]
    fn test_format_color() {
        assert_eq!(format_color([255, 215, 0, 255]), "#FFD700");
        assert_eq!(format_color([1, 2, 3, 4]), "#01020304");
    }

    #[test]
    fn test_translucent_override_survives_editing() {
        for text in ["#01020304", "#FF800010", "#7F7F7F01"] {
            let rgba = editable_rgba(Some(text), Color32::BLACK);
            assert_eq!(format_color(rgba), text);
        }
        assert_eq!(parse_rgba("rgba(100, 116, 139, 0.3)"), Some([100, 116, 139, 77]));
        assert_eq!(editable_rgba(None, Color32::from_rgb(1, 2, 3)), [1, 2, 3, 255]);
        assert_eq!(editable_rgba(Some("bogus"), Color32::WHITE), [255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_ring_width_override_is_kept() {
        let mut planet = default_planet("Sol", "Sol", 1, 0.0);
        planet.orbit_ring_width = Some(0.0);
        assert_eq!(resolve(&planet).ring_width, 0.0);
        planet.orbit_ring_width = Some(-1.0);
        assert_eq!(resolve(&planet).ring_width, planet_defaults().ring_width);
    }
}
