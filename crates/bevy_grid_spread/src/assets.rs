use core::result::Result;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::tasks::ConditionalSendFuture;
use grid_spread::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{GridSpread, GridSpreadSystems};

/// A named look: pattern, full parameter bag and optional channel rates.
#[derive(Asset, TypePath, Clone, Debug, Serialize, Deserialize)]
pub struct SpreadPresetAsset {
    pub pattern: Pattern,
    #[serde(default)]
    pub params: SpreadParams,
    #[serde(default)]
    pub spread_speed: Option<f64>,
    #[serde(default)]
    pub dots_rate: Option<f64>,
    #[serde(default)]
    pub shapes_rate: Option<f64>,
}

impl SpreadPresetAsset {
    /// Installs the preset on `engine`. Invalid parameters leave the engine untouched.
    pub fn apply(&self, engine: &mut SpreadEngine) -> grid_spread::error::Result<()> {
        engine.set_params(self.params.clone())?;
        engine.set_pattern(self.pattern);
        let rates = [
            (ChannelKind::Spread, self.spread_speed),
            (ChannelKind::Dots, self.dots_rate),
            (ChannelKind::Shapes, self.shapes_rate),
        ];
        for (channel, rate) in rates {
            if let Some(rate) = rate {
                engine.set_rate(channel, rate);
            }
        }
        Ok(())
    }
}

/// Parses a preset from RON text.
pub fn parse_preset(bytes: &[u8]) -> anyhow::Result<SpreadPresetAsset> {
    ron::de::from_bytes(bytes).map_err(|e| anyhow::anyhow!(e))
}

/// Asset loader for [`SpreadPresetAsset`] using RON files with `.spread` extension.
#[derive(TypePath)]
pub struct SpreadPresetAssetLoader;

impl AssetLoader for SpreadPresetAssetLoader {
    type Asset = SpreadPresetAsset;
    type Settings = ();
    type Error = anyhow::Error;

    fn extensions(&self) -> &[&str] {
        &["spread"]
    }

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            parse_preset(&bytes)
        })
    }
}

impl FromWorld for SpreadPresetAssetLoader {
    fn from_world(_: &mut World) -> Self {
        SpreadPresetAssetLoader
    }
}

/// The preset to apply whenever it finishes loading or is hot-reloaded.
#[derive(Resource, Default, Clone)]
pub struct ActiveSpreadPreset(pub Option<Handle<SpreadPresetAsset>>);

/// Registers [`SpreadPresetAsset`] and applies the [`ActiveSpreadPreset`] to the
/// engine (requires [`crate::GridSpreadPlugin`] and the asset plugin).
pub struct SpreadPresetPlugin;

impl Plugin for SpreadPresetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<SpreadPresetAsset>()
            .init_asset_loader::<SpreadPresetAssetLoader>()
            .init_resource::<ActiveSpreadPreset>()
            .add_systems(
                Update,
                apply_active_preset.before(GridSpreadSystems::Commands),
            );
    }
}

fn apply_active_preset(
    mut asset_events: MessageReader<AssetEvent<SpreadPresetAsset>>,
    active: Res<ActiveSpreadPreset>,
    presets: Res<Assets<SpreadPresetAsset>>,
    mut spread: ResMut<GridSpread>,
) {
    let Some(handle) = active.0.as_ref() else {
        asset_events.clear();
        return;
    };
    let target = handle.id();
    let mut ready = false;
    for event in asset_events.read() {
        ready |= matches!(
            event,
            AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id } if *id == target
        );
    }
    if !ready {
        return;
    }
    let Some(preset) = presets.get(target) else {
        return;
    };
    match preset.apply(spread.engine_mut()) {
        Ok(()) => info!("applied spread preset {:?} ({})", target, preset.pattern),
        Err(err) => warn!("spread preset {:?} rejected: {}", target, err),
    }
}
