use crate::config::DialConfig;

use super::draw::{Color, DrawCommand, Size};

/// Concentric shaded bands behind the dial, outermost first
///
/// Bands are `band_width * scale` wide and cover the surface out to its
/// corners. Each band further out is darker by `band_darkening`; the two
/// innermost bands are left as the surface background.
pub fn render_background(config: &DialConfig, size: Size) -> Vec<DrawCommand> {
    let width = config.scale * config.band_width;
    if width <= 0.0 {
        return Vec::new();
    }

    let center = size.center();
    let diagonal = center.distance(super::draw::Point::new(size.width, 0.0));
    let bands = (diagonal / width).floor() as usize;

    (2..=bands)
        .rev()
        .map(|band| {
            let darkness = band as f32 * config.band_darkening;
            DrawCommand::Disc {
                center,
                radius: band as f32 * width,
                color: Color::white(1.0 - darkness),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bands_cover_corners_outermost_first() {
        let config = DialConfig::default();
        // diagonal from centre = 150 * sqrt(2) = 212.1 -> 8 bands of 25
        let commands = render_background(&config, Size::new(300.0, 300.0));
        assert_eq!(commands.len(), 7);

        let radii: Vec<f32> = commands
            .iter()
            .map(|c| match c {
                DrawCommand::Disc { radius, .. } => *radius,
                other => panic!("unexpected command {:?}", other),
            })
            .collect();
        assert_abs_diff_eq!(radii[0], 200.0);
        assert_abs_diff_eq!(radii[6], 50.0);
        assert!(radii.windows(2).all(|w| w[0] > w[1]));

        match &commands[0] {
            DrawCommand::Disc { color, .. } => assert_abs_diff_eq!(color.r, 0.84, epsilon = 1e-5),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_tiny_surface_has_no_bands() {
        let commands = render_background(&DialConfig::default(), Size::new(40.0, 40.0));
        assert!(commands.is_empty());
    }
}
