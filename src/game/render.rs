use super::{Field, Settings};
use crate::target::{Rect, TargetId};
use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};

const BACKGROUND_Z: f32 = 0.0;
const TARGET_Z: f32 = 1.0;

/// Target sprite image, absent when the file is missing.
#[derive(Resource, Default)]
pub struct TargetImage(pub Option<Handle<Image>>);

/// Marks the sprite drawn for a target.
#[derive(Component, Debug)]
pub struct TargetSprite(pub TargetId);

/// Maps a client-space rectangle (origin top-left, y down) to the world
/// position of its center (origin at the surface center, y up).
pub fn surface_to_world(bounds: Rect, surface_width: u32, surface_height: u32, z: f32) -> Vec3 {
    let center_x = bounds.x as f32 + bounds.width as f32 / 2.0;
    let center_y = bounds.y as f32 + bounds.height as f32 / 2.0;
    Vec3::new(
        center_x - surface_width as f32 / 2.0,
        surface_height as f32 / 2.0 - center_y,
        z,
    )
}

/// System: camera, crosshair cursor, background and target image.
pub fn setup_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<Settings>,
    mut target_image: ResMut<TargetImage>,
    windows: Query<Entity, With<PrimaryWindow>>,
) {
    commands.spawn(Camera2d);
    if let Ok(window) = windows.single() {
        commands
            .entity(window)
            .insert(CursorIcon::from(SystemCursorIcon::Crosshair));
    }

    let config = &settings.0;
    let assets = &config.assets;
    match assets.locate(&assets.background) {
        Ok(path) => {
            info!("[render] Background: {}", path.display());
            commands.spawn((
                Sprite {
                    image: asset_server.load(assets.background.clone()),
                    custom_size: Some(Vec2::new(
                        config.surface_width as f32,
                        config.surface_height as f32,
                    )),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, BACKGROUND_Z),
            ));
        }
        Err(e) => warn!("[render] {e}, background not drawn"),
    }

    target_image.0 = match assets.locate(&assets.target) {
        Ok(_) => Some(asset_server.load(assets.target.clone())),
        Err(e) => {
            warn!("[render] {e}, targets not drawn");
            None
        }
    };
}

/// System: repaint every target from scratch.
pub fn repaint_targets(
    mut commands: Commands,
    field: Res<Field>,
    settings: Res<Settings>,
    target_image: Res<TargetImage>,
    sprites: Query<Entity, With<TargetSprite>>,
) {
    for entity in &sprites {
        commands.entity(entity).despawn();
    }
    let Some(image) = &target_image.0 else {
        return;
    };
    let config = &settings.0;
    for target in field.0.targets() {
        let bounds = target.bounds;
        commands.spawn((
            TargetSprite(target.id),
            Sprite {
                image: image.clone(),
                custom_size: Some(Vec2::new(bounds.width as f32, bounds.height as f32)),
                ..default()
            },
            Transform::from_translation(surface_to_world(
                bounds,
                config.surface_width,
                config.surface_height,
                TARGET_Z,
            )),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_left_target() {
        let world = surface_to_world(Rect::new(0, 0, 80, 80), 553, 463, TARGET_Z);
        assert_eq!(world, Vec3::new(-236.5, 191.5, TARGET_Z));
    }

    #[test]
    fn test_centered_target() {
        let world = surface_to_world(Rect::new(236, 191, 80, 80), 552, 462, 0.0);
        assert_eq!(world, Vec3::ZERO);
    }

    #[test]
    fn test_bottom_right_target() {
        let world = surface_to_world(Rect::new(473, 383, 80, 80), 553, 463, 0.0);
        assert_eq!(world.x, 236.5);
        assert_eq!(world.y, -191.5);
    }
}
