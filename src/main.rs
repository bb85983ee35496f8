use bevy::{
    prelude::*,
    window::{PresentMode, WindowResolution},
};

use hornet_blaster::prelude::{CONFIG_FILE, GameConfig, HornetPlugin};

fn main() {
    // Loaded before the log plugin exists; problems are reported once it does.
    let (mut config, config_error) = match GameConfig::load(CONFIG_FILE) {
        Ok(config) => (config, None),
        Err(e) => (GameConfig::default(), Some(e)),
    };
    let assets_error = config.assets.resolve_dir().err();

    let window = Window {
        title: "Hornet Blaster".to_string(),
        resolution: WindowResolution::new(config.surface_width, config.surface_height)
            .with_scale_factor_override(1.0),
        resizable: false,
        present_mode: PresentMode::AutoVsync,
        ..default()
    };

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window),
                ..default()
            })
            .set(AssetPlugin {
                file_path: config.assets.dir.to_string_lossy().into_owned(),
                ..default()
            }),
    );
    if let Some(e) = config_error {
        warn!("[config] {e}, using defaults");
    }
    if let Some(e) = assets_error {
        warn!("[config] Asset directory not resolved: {e}");
    }
    app.add_plugins(HornetPlugin::new(config)).run();
}
