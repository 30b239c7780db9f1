//! Bevy plugin for grid_spread: the engine as a resource, driven by the frame clock.
#![forbid(unsafe_code)]

#[cfg(feature = "ron")]
pub use assets::{
    ActiveSpreadPreset, SpreadPresetAsset, SpreadPresetAssetLoader, SpreadPresetPlugin,
};
use bevy::prelude::*;
pub use events::{GridUpdated, MessageBuffer, SpreadCommand, SpreadMessage};
use grid_spread::prelude::*;

#[cfg(feature = "ron")]
mod assets;
mod events;

/// Convenient re-exports for common types. Import with `use bevy_grid_spread::prelude::*;`.
pub mod prelude {
    pub use grid_spread::prelude::*;

    #[cfg(feature = "ron")]
    pub use crate::assets::{
        ActiveSpreadPreset, SpreadPresetAsset, SpreadPresetAssetLoader, SpreadPresetPlugin,
    };
    pub use crate::events::{GridUpdated, MessageBuffer, SpreadCommand, SpreadMessage};
    pub use crate::{GridSpread, GridSpreadPlugin, GridSpreadSystems};
}

/// Bevy plugin owning a [`SpreadEngine`] and driving its channels every `Update`.
#[derive(Clone, Debug, Default)]
pub struct GridSpreadPlugin {
    /// Configuration the engine resource is created from.
    pub config: EngineConfig,
    /// Start every enabled channel as soon as the app starts.
    pub autostart: bool,
}

impl GridSpreadPlugin {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            autostart: false,
        }
    }

    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }
}

/// The engine owned by the app. Read `grid()` from it to render.
#[derive(Resource)]
pub struct GridSpread(pub SpreadEngine);

impl GridSpread {
    pub fn engine(&self) -> &SpreadEngine {
        &self.0
    }

    pub fn engine_mut(&mut self) -> &mut SpreadEngine {
        &mut self.0
    }
}

/// Ordering labels for the plugin's systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GridSpreadSystems {
    /// Applies queued [`SpreadCommand`]s.
    Commands,
    /// Runs the frame and writes [`SpreadMessage`]s and [`GridUpdated`].
    Drive,
}

impl Plugin for GridSpreadPlugin {
    fn build(&self, app: &mut App) {
        let engine = match SpreadEngine::try_new(self.config.clone()) {
            Ok(engine) => engine,
            Err(err) => {
                warn!("invalid grid_spread config ({err}), falling back to defaults");
                SpreadEngine::new(EngineConfig::default().with_seed(self.config.seed))
            }
        };
        let mut engine = GridSpread(engine);
        if self.autostart {
            engine.0.start_all_enabled();
        }

        app.add_message::<SpreadCommand>()
            .add_message::<SpreadMessage>()
            .add_message::<GridUpdated>()
            .insert_resource(engine)
            .configure_sets(
                Update,
                (GridSpreadSystems::Commands, GridSpreadSystems::Drive).chain(),
            )
            .add_systems(
                Update,
                apply_spread_commands.in_set(GridSpreadSystems::Commands),
            )
            .add_systems(Update, drive_spread_engine.in_set(GridSpreadSystems::Drive));
    }
}

fn apply_spread_commands(
    mut commands: MessageReader<SpreadCommand>,
    mut spread: ResMut<GridSpread>,
) {
    let engine = spread.engine_mut();
    for command in commands.read() {
        match command {
            SpreadCommand::Start(channel) => {
                engine.start(*channel);
            }
            SpreadCommand::Stop(channel) => {
                engine.stop(*channel);
            }
            SpreadCommand::StartAllEnabled => {
                engine.start_all_enabled();
            }
            SpreadCommand::StopAllRunning => {
                engine.stop_all_running();
            }
            SpreadCommand::SetRate(channel, rate) => engine.set_rate(*channel, *rate),
            SpreadCommand::SetEnabled(channel, enabled) => engine.set_enabled(*channel, *enabled),
            SpreadCommand::SetPattern(pattern) => engine.set_pattern(*pattern),
            SpreadCommand::Step(channel) => engine.fire(*channel, &mut ()),
            SpreadCommand::ReplaceGrid(grid) => {
                engine.replace_grid(grid.clone());
            }
            SpreadCommand::Resize { rows, cols } => engine.resize(*rows, *cols),
        }
    }
}

fn drive_spread_engine(
    time: Res<Time>,
    mut spread: ResMut<GridSpread>,
    mut messages: MessageWriter<SpreadMessage>,
    mut updates: MessageWriter<GridUpdated>,
) {
    let mut buffer = MessageBuffer::default();
    let fired = spread.0.frame_with_events(time.elapsed(), &mut buffer);
    for message in buffer.events {
        messages.write(message);
    }
    if !fired.is_empty() {
        updates.write(GridUpdated {
            channels: fired,
            colored_cells: spread.0.grid().colored_count(),
        });
    }
}
