//! # Game Module
//!
//! Bevy front-end for the [`Controller`]:
//! - mouse presses become [`Controller::click`] calls
//! - the frame clock drives [`Controller::advance`]
//! - target sprites are repainted whenever the controller asks for a redraw
//! - link watcher events are drained and logged
//! - an optional egui status window (see [`hud`])

pub mod hud;
pub mod render;

use crate::config::GameConfig;
use crate::controller::Controller;
use crate::link::{LinkEvent, SerialLink, spawn_watcher};
use crate::target::Point;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// The game state, shared by every system.
#[derive(Resource)]
pub struct Field(pub Controller<SerialLink>);

/// Configuration the game was started with.
#[derive(Resource, Clone)]
pub struct Settings(pub GameConfig);

/// Receiver of link watcher events, absent when no link was opened.
#[derive(Resource, Default)]
pub struct LinkEvents(pub Option<broadcast::Receiver<LinkEvent>>);

/// Plugin for the hornet game.
pub struct HornetPlugin {
    config: GameConfig,
}

impl HornetPlugin {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }
}

impl Plugin for HornetPlugin {
    fn build(&self, app: &mut App) {
        let link = SerialLink::connect(&self.config);
        let events = link.port_name().map(|name| {
            spawn_watcher(
                name.to_string(),
                Duration::from_millis(self.config.link.watch_interval_ms),
            )
        });
        let controller = Controller::new(&self.config, link);

        app.insert_resource(ClearColor(Color::BLACK))
            .insert_resource(Settings(self.config.clone()))
            .insert_resource(Field(controller))
            .insert_resource(LinkEvents(events))
            .init_resource::<render::TargetImage>()
            .add_systems(Startup, render::setup_scene)
            .add_systems(
                Update,
                (
                    handle_clicks,
                    drive_timers,
                    render::repaint_targets.run_if(resource_changed::<Field>),
                )
                    .chain(),
            )
            .add_systems(Update, log_link_events);

        if self.config.show_hud {
            app.add_plugins(EguiPlugin::default())
                .add_systems(EguiPrimaryContextPass, hud::status_hud);
        }
    }
}

/// System: forward left and right button presses to the controller.
fn handle_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    mut field: ResMut<Field>,
) {
    let presses = buttons
        .get_just_pressed()
        .filter(|button| matches!(button, MouseButton::Left | MouseButton::Right))
        .count();
    if presses == 0 {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let point = Point::new(cursor.x as i32, cursor.y as i32);

    let mut redraw = false;
    for _ in 0..presses {
        redraw |= field.bypass_change_detection().0.click(point, time.elapsed());
    }
    if redraw {
        field.set_changed();
    }
}

/// System: run spawn, expiry and Y-send tasks that are due.
fn drive_timers(time: Res<Time>, mut field: ResMut<Field>) {
    if field.bypass_change_detection().0.advance(time.elapsed()) {
        field.set_changed();
    }
}

/// System: log asynchronous link notifications. The link itself is left as is.
fn log_link_events(mut events: ResMut<LinkEvents>) {
    let Some(rx) = events.0.as_mut() else {
        return;
    };
    let mut closed = false;
    loop {
        match rx.try_recv() {
            Ok(event) => warn!("[link] Serial port error: {event}"),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("[link] {skipped} link notifications dropped");
            }
            Err(TryRecvError::Closed) => {
                closed = true;
                break;
            }
        }
    }
    if closed {
        info!("[link] Port watcher stopped");
        events.0 = None;
    }
}
