//! Display colours for categories.
//!
//! A category may carry its own `#rrggbb` colour. Otherwise one is picked from
//! [`PALETTE`] by hashing the category id, so the same category always gets the
//! same colour.

use api_types::category::Category;

/// Fallback colours as `(r, g, b)`.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (231, 111, 81),
    (244, 162, 97),
    (233, 196, 106),
    (42, 157, 143),
    (38, 70, 83),
    (106, 76, 147),
    (25, 130, 196),
    (138, 201, 38),
    (255, 89, 94),
    (141, 153, 174),
];

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the little-endian bytes of `category_id`.
fn fnv1a(category_id: i64) -> u64 {
    category_id
        .to_le_bytes()
        .iter()
        .fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
        })
}

/// Palette colour assigned to a category id.
pub fn default_color(category_id: i64) -> (u8, u8, u8) {
    let index = (fnv1a(category_id) % PALETTE.len() as u64) as usize;
    PALETTE[index]
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(value: &str) -> Option<(u8, u8, u8)> {
    let value = value.trim();
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// The category's own colour when valid, the palette colour otherwise.
pub fn category_color(category: &Category) -> (u8, u8, u8) {
    category
        .color
        .as_deref()
        .and_then(parse_hex)
        .unwrap_or_else(|| default_color(category.category_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, color: Option<&str>) -> Category {
        Category {
            category_id: id,
            name: format!("c{id}"),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn default_color_is_stable() {
        for id in [-7, 0, 1, 2, 3, 42, i64::MAX] {
            assert_eq!(default_color(id), default_color(id));
            assert!(PALETTE.contains(&default_color(id)));
        }
    }

    #[test]
    fn ids_spread_over_the_palette() {
        let distinct: std::collections::HashSet<_> = (0..100).map(default_color).collect();
        assert!(distinct.len() > PALETTE.len() / 2);
    }

    #[test]
    fn explicit_color_wins_when_valid() {
        assert_eq!(category_color(&category(1, Some("#ff0080"))), (255, 0, 128));
        assert_eq!(category_color(&category(1, Some("00ff00"))), (0, 255, 0));
        assert_eq!(
            category_color(&category(1, Some("not-a-colour"))),
            default_color(1)
        );
        assert_eq!(category_color(&category(5, None)), default_color(5));
    }

    #[test]
    fn hex_needs_exactly_six_digits_after_one_hash() {
        assert_eq!(parse_hex(" #0A0b0C "), Some((10, 11, 12)));
        assert_eq!(parse_hex("#+f+f+f"), None);
        assert_eq!(parse_hex("##ff0000"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }
}
