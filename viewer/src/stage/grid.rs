use crate::AppState;
use crate::settings::SettingsResource;
use bevy::prelude::*;

pub const GRID_LINE_COLOR: Color = Color::srgb(0.53, 0.53, 0.53);
pub const GRID_CENTER_COLOR: Color = Color::srgb(0.27, 0.27, 0.27);

/// Flat square grid on the XZ plane, centred at the origin.
#[derive(Clone, Copy, Debug)]
pub struct StageGridConfig {
    pub size: f32,
    pub divisions: u32,
    pub y_offset: f32,
    pub color: Color,
    pub center_color: Color,
}

impl Default for StageGridConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            divisions: 10,
            y_offset: 0.0,
            color: GRID_LINE_COLOR,
            center_color: GRID_CENTER_COLOR,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GridLineSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
}

pub fn grid_line_count(divisions: u32) -> usize {
    if divisions == 0 {
        return 0;
    }
    (divisions as usize + 1) * 2
}

/// One full-length line per division boundary along each axis. The line
/// through the origin (only present for even divisions) gets the centre color.
pub fn build_grid_lines(config: StageGridConfig) -> Vec<GridLineSegment> {
    if config.size <= 0.0 || config.divisions == 0 {
        return Vec::new();
    }

    let half = config.size * 0.5;
    let step = config.size / config.divisions as f32;
    let center_index = (config.divisions % 2 == 0).then_some(config.divisions / 2);
    let y = config.y_offset;
    let mut lines = Vec::with_capacity(grid_line_count(config.divisions));

    for i in 0..=config.divisions {
        let offset = -half + i as f32 * step;
        let color = if Some(i) == center_index {
            config.center_color
        } else {
            config.color
        };

        lines.push(GridLineSegment {
            start: Vec3::new(-half, y, offset),
            end: Vec3::new(half, y, offset),
            color,
        });
        lines.push(GridLineSegment {
            start: Vec3::new(offset, y, -half),
            end: Vec3::new(offset, y, half),
            color,
        });
    }

    lines
}

pub fn stage_grid_config(settings: &SettingsResource) -> StageGridConfig {
    let stage = &settings.current.stage;
    StageGridConfig {
        size: stage.bounds().size(),
        divisions: stage.grid_divisions,
        ..default()
    }
}

fn draw_stage_grid(mut gizmos: Gizmos, settings: Res<SettingsResource>) {
    for line in build_grid_lines(stage_grid_config(&settings)) {
        gizmos.line(line.start, line.end, line.color);
    }
}

/// Draws the stage grid with gizmos. Kept apart from the stage scene so
/// headless apps without a gizmo pipeline can run the scene.
pub struct StageGridPlugin;

impl Plugin for StageGridPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_stage_grid.run_if(in_state(AppState::Stage)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_spans_the_stage() {
        let lines = build_grid_lines(StageGridConfig::default());
        assert_eq!(lines.len(), grid_line_count(10));
        assert_eq!(lines.len(), 22);

        for line in &lines {
            for point in [line.start, line.end] {
                assert!(point.x.abs() <= 5.0 + 1e-5);
                assert!(point.z.abs() <= 5.0 + 1e-5);
                assert_eq!(point.y, 0.0);
            }
        }

        let first = lines[0];
        assert_eq!(first.start, Vec3::new(-5.0, 0.0, -5.0));
        assert_eq!(first.end, Vec3::new(5.0, 0.0, -5.0));
    }

    #[test]
    fn only_the_axis_lines_use_the_center_color() {
        let lines = build_grid_lines(StageGridConfig::default());
        let centered: Vec<_> = lines
            .iter()
            .filter(|line| line.color == GRID_CENTER_COLOR)
            .collect();
        assert_eq!(centered.len(), 2);
        assert!(centered.iter().all(|line| {
            (line.start.x == 0.0 && line.end.x == 0.0) || (line.start.z == 0.0 && line.end.z == 0.0)
        }));
    }

    #[test]
    fn odd_divisions_have_no_center_line() {
        let lines = build_grid_lines(StageGridConfig {
            divisions: 3,
            ..default()
        });
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|line| line.color == GRID_LINE_COLOR));
    }

    #[test]
    fn degenerate_grids_are_empty() {
        assert!(
            build_grid_lines(StageGridConfig {
                divisions: 0,
                ..default()
            })
            .is_empty()
        );
        assert!(
            build_grid_lines(StageGridConfig {
                size: 0.0,
                ..default()
            })
            .is_empty()
        );
    }
}
