//! Colour scales for shading table cells by magnitude.

use accident_dashboard_analytics_models::DataTable;

/// Viridis colour stops, low to high.
pub const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

/// Sequential blue colour stops, low to high.
const BLUES: &[(u8, u8, u8)] = &[
    (0xf7, 0xfb, 0xff),
    (0xde, 0xeb, 0xf7),
    (0xc6, 0xdb, 0xef),
    (0x9e, 0xca, 0xe1),
    (0x6b, 0xae, 0xd6),
    (0x42, 0x92, 0xc6),
    (0x21, 0x71, 0xb5),
    (0x08, 0x51, 0x9c),
    (0x08, 0x30, 0x6b),
];

/// Background and text colour for one shaded cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shade {
    /// Background colour as `#rrggbb`.
    pub background: String,
    /// Text colour that stays readable on `background`.
    pub text: &'static str,
}

impl Shade {
    /// Inline CSS for a table cell.
    #[must_use]
    pub fn style(&self) -> String {
        format!("background-color: {}; color: {}", self.background, self.text)
    }
}

/// Shade for a position in `[0, 1]` along the blue scale. Values outside
/// the range are clamped.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn blues(fraction: f64) -> Shade {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let scaled = fraction * (BLUES.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(BLUES.len() - 2);
    let t = scaled - lower as f64;

    let (r0, g0, b0) = BLUES[lower];
    let (r1, g1, b1) = BLUES[lower + 1];
    let (r, g, b) = (lerp(r0, r1, t), lerp(g0, g1, t), lerp(b0, b1, t));

    let luminance = 0.114f64.mul_add(
        f64::from(b),
        0.299f64.mul_add(f64::from(r), 0.587 * f64::from(g)),
    ) / 255.0;

    Shade {
        background: format!("#{r:02x}{g:02x}{b:02x}"),
        text: if luminance < 0.5 { "#f1f1f1" } else { "#000000" },
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp(a: u8, b: u8, t: f64) -> u8 {
    t.mul_add(f64::from(b) - f64::from(a), f64::from(a)).round() as u8
}

/// Shades a run of values relative to their own minimum and maximum.
#[must_use]
pub fn shade_values(values: &[f64]) -> Vec<Shade> {
    let (min, max) = min_max(values.iter().copied());
    values.iter().map(|v| blues(position(*v, min, max))).collect()
}

/// Shades every numeric cell of `table` relative to the other cells in its
/// column. Non-numeric cells get `None`.
#[must_use]
pub fn shade_columns(table: &DataTable) -> Vec<Vec<Option<Shade>>> {
    let ranges: Vec<(f64, f64)> = (0..table.headers.len())
        .map(|col| {
            min_max(
                table
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col).and_then(|cell| cell.value)),
            )
        })
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&ranges)
                .map(|(cell, (min, max))| cell.value.map(|v| blues(position(v, *min, *max))))
                .collect()
        })
        .collect()
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn position(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accident_dashboard_analytics_models::TableCell;

    #[test]
    fn scale_endpoints() {
        assert_eq!(blues(0.0).background, "#f7fbff");
        assert_eq!(blues(1.0).background, "#08306b");
        assert_eq!(blues(-3.0), blues(0.0));
        assert_eq!(blues(f64::NAN), blues(0.0));
    }

    #[test]
    fn dark_cells_get_light_text() {
        assert_eq!(blues(0.0).text, "#000000");
        assert_eq!(blues(1.0).text, "#f1f1f1");
    }

    #[test]
    fn equal_values_share_the_lightest_shade() {
        let shades = shade_values(&[4.0, 4.0]);
        assert_eq!(shades[0], shades[1]);
        assert_eq!(shades[0].background, "#f7fbff");
    }

    #[test]
    fn shades_per_column() {
        let cell = |text: &str, value: Option<f64>| TableCell {
            text: text.to_string(),
            value,
        };
        let table = DataTable {
            headers: vec!["barangay".to_string(), "victims".to_string()],
            rows: vec![
                vec![cell("A", None), cell("1", Some(1.0))],
                vec![cell("B", None), cell("5", Some(5.0))],
            ],
        };
        let shades = shade_columns(&table);
        assert!(shades[0][0].is_none());
        assert_eq!(shades[0][1].as_ref().unwrap().background, "#f7fbff");
        assert_eq!(shades[1][1].as_ref().unwrap().background, "#08306b");
    }
}
