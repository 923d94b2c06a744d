use crate::config::DialConfig;
use crate::constants::{FULL_TURN_DEGREES, NORTH_UP_OFFSET_DEGREES};
use crate::session::SmoothedReading;
use crate::units::{cardinal_index, cardinal_name};

use super::background::render_background;
use super::draw::{Color, DrawCommand, LabelSize, Point, Size};
use super::trail::{Sample, Trail};

const MARKER_GRAY: f32 = 0.3;
/// Alpha of a marker at the very end of a full trail
const MARKER_MAX_ALPHA: f32 = 0.5;

/// Round wind dial
///
/// Rendering is a pure function of its inputs: the same reading, trail and
/// rotation always give the same commands, and nothing is mutated.
pub struct CircularGauge {
    config: DialConfig,
    size: Size,
}

impl CircularGauge {
    pub fn new(config: &DialConfig, size: Size) -> Self {
        Self {
            config: config.clone(),
            size,
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Draw the dial
    ///
    /// # Arguments
    /// * `reading` - Current smoothed reading, shown as the speed readout
    /// * `trail` - Sample history, oldest first; the last one is highlighted
    /// * `rotation_degrees` - Dial rotation (device heading, or 0 when
    ///   locked to north)
    pub fn render(
        &self,
        reading: &SmoothedReading,
        trail: &Trail,
        rotation_degrees: f32,
    ) -> Vec<DrawCommand> {
        let mut commands = render_background(&self.config, self.size);
        commands.extend(self.compass_labels(rotation_degrees));
        commands.extend(self.trail_markers(trail, rotation_degrees));
        commands.push(DrawCommand::Label {
            text: self.config.speed_unit.format(reading.speed),
            position: self.size.center(),
            color: Color::BLACK,
            size: LabelSize::Large,
        });
        commands
    }

    fn compass_labels(&self, rotation_degrees: f32) -> Vec<DrawCommand> {
        let divisions = self.config.cardinal_directions;
        let step = FULL_TURN_DEGREES / divisions as f32;
        let inner_radius = self.size.width / 2.0 - self.config.label_inset;
        let origin = self.size.center();

        (0..divisions)
            .step_by(2)
            .map(|division| {
                let bearing = division as f32 * step;
                let position = origin.offset_polar(
                    inner_radius,
                    bearing - rotation_degrees - NORTH_UP_OFFSET_DEGREES,
                );
                // On a quarter turn: N, E, S or W
                let principal = (division * 4) % divisions == 0;
                let color = if division == 0 {
                    Color::RED
                } else if principal {
                    Color::BLACK
                } else {
                    Color::DARK_GRAY
                };
                DrawCommand::Label {
                    text: cardinal_name(cardinal_index(bearing)).to_string(),
                    position,
                    color,
                    size: if principal {
                        LabelSize::Large
                    } else {
                        LabelSize::Small
                    },
                }
            })
            .collect()
    }

    fn trail_markers(&self, trail: &Trail, rotation_degrees: f32) -> Vec<DrawCommand> {
        let visible = trail.capacity().max(1) as f32;
        let mut commands: Vec<DrawCommand> = trail
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                let alpha = MARKER_MAX_ALPHA * i as f32 / visible;
                DrawCommand::Disc {
                    center: self.project(sample, rotation_degrees),
                    radius: self.config.marker_radius,
                    color: Color::rgb(MARKER_GRAY, MARKER_GRAY, MARKER_GRAY).with_alpha(alpha),
                }
            })
            .collect();

        if let Some(latest) = trail.latest() {
            commands.push(DrawCommand::Disc {
                center: self.project(latest, rotation_degrees),
                radius: self.config.marker_radius,
                color: Color::RED,
            });
        }
        commands
    }

    /// Screen position of a trail sample under the given dial rotation
    pub fn project(&self, sample: &Sample, rotation_degrees: f32) -> Point {
        self.size.center().offset_polar(
            self.config.scale * self.config.radius_scale * sample.radius,
            sample.angle - rotation_degrees - NORTH_UP_OFFSET_DEGREES,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gauge() -> CircularGauge {
        CircularGauge::new(&DialConfig::default(), Size::new(300.0, 300.0))
    }

    fn labels(commands: &[DrawCommand]) -> Vec<(&str, Point, Color)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label {
                    text,
                    position,
                    color,
                    ..
                } => Some((text.as_str(), *position, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_eight_compass_labels() {
        let commands = gauge().render(&SmoothedReading::default(), &Trail::new(10), 0.0);
        let labels = labels(&commands);
        // 8 compass points plus the speed readout
        assert_eq!(labels.len(), 9);
        let names: Vec<&str> = labels.iter().take(8).map(|l| l.0).collect();
        assert_eq!(names, ["N", "NE", "E", "SE", "S", "SW", "W", "NW"]);
        assert_eq!(labels[0].2, Color::RED);
        assert_eq!(labels[2].2, Color::BLACK);
        assert_eq!(labels[1].2, Color::DARK_GRAY);
    }

    fn label_sizes(config: &DialConfig) -> Vec<LabelSize> {
        let g = CircularGauge::new(config, Size::new(300.0, 300.0));
        let commands = g.render(&SmoothedReading::default(), &Trail::new(10), 0.0);
        let mut sizes: Vec<LabelSize> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { size, .. } => Some(*size),
                _ => None,
            })
            .collect();
        // Speed readout
        sizes.pop();
        sizes
    }

    #[test]
    fn test_principal_labels_by_division() {
        let large = |sizes: &[LabelSize]| -> Vec<usize> {
            sizes
                .iter()
                .enumerate()
                .filter(|(_, s)| **s == LabelSize::Large)
                .map(|(i, _)| i)
                .collect()
        };

        let mut config = DialConfig::default();
        assert_eq!(large(&label_sizes(&config)), [0, 2, 4, 6]);

        config.cardinal_directions = 32;
        assert_eq!(large(&label_sizes(&config)), [0, 4, 8, 12]);

        config.cardinal_directions = 8;
        assert_eq!(large(&label_sizes(&config)), [0, 1, 2, 3]);

        // Only north sits on a quarter turn
        config.cardinal_directions = 7;
        assert_eq!(large(&label_sizes(&config)), [0]);
    }

    #[test]
    fn test_north_label_tracks_rotation() {
        let g = gauge();
        let commands = g.render(&SmoothedReading::default(), &Trail::new(10), 0.0);
        let north = labels(&commands)[0].1;
        assert_abs_diff_eq!(north.x, 150.0, epsilon = 1e-3);
        assert_abs_diff_eq!(north.y, 20.0, epsilon = 1e-3);

        // Device turned to face east: north moves to the left edge
        let commands = g.render(&SmoothedReading::default(), &Trail::new(10), 90.0);
        let north = labels(&commands)[0].1;
        assert_abs_diff_eq!(north.x, 20.0, epsilon = 1e-3);
        assert_abs_diff_eq!(north.y, 150.0, epsilon = 1e-3);
    }

    #[test]
    fn test_empty_trail_has_no_markers() {
        let g = gauge();
        let commands = g.render(&SmoothedReading::default(), &Trail::new(10), 0.0);
        let background = render_background(&DialConfig::default(), g.size()).len();
        let discs = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
            .count();
        assert_eq!(discs, background);
    }

    #[test]
    fn test_zero_radius_sample_at_center() {
        let g = gauge();
        let p = g.project(&Sample { radius: 0.0, angle: 123.0 }, 45.0);
        assert_abs_diff_eq!(p.x, 150.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 150.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sample_projection() {
        let g = gauge();
        // 5 m/s from the east with the dial unrotated: 50 points right of centre
        let p = g.project(&Sample { radius: 5.0, angle: 90.0 }, 0.0);
        assert_abs_diff_eq!(p.x, 200.0, epsilon = 1e-3);
        assert_abs_diff_eq!(p.y, 150.0, epsilon = 1e-3);
    }

    #[test]
    fn test_markers_fade_and_newest_highlighted() {
        let g = gauge();
        let mut trail = Trail::new(4);
        for i in 0..4 {
            trail.push(Sample {
                radius: 1.0 + i as f32,
                angle: 0.0,
            });
        }
        let commands = g.render(&SmoothedReading::default(), &trail, 0.0);
        let background = render_background(&DialConfig::default(), g.size()).len();
        let markers: Vec<Color> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Disc { color, .. } => Some(*color),
                _ => None,
            })
            .skip(background)
            .collect();

        assert_eq!(markers.len(), 5);
        assert_abs_diff_eq!(markers[0].a, 0.0);
        assert!(markers.windows(2).take(3).all(|w| w[0].a < w[1].a));
        assert_eq!(markers[4], Color::RED);
    }

    #[test]
    fn test_speed_readout_uses_unit() {
        let config = DialConfig {
            speed_unit: crate::units::SpeedUnit::KilometersPerHour,
            ..DialConfig::default()
        };
        let g = CircularGauge::new(&config, Size::new(300.0, 300.0));
        let reading = SmoothedReading {
            speed: 10.0,
            ..SmoothedReading::default()
        };
        let commands = g.render(&reading, &Trail::new(1), 0.0);
        assert!(matches!(
            commands.last(),
            Some(DrawCommand::Label { text, .. }) if text == "36.0"
        ));
    }
}
