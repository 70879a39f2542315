use std::path::PathBuf;

use argh::FromArgs;

/// First-person raycaster over a tile grid
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// path to a TOML config file
    #[argh(option)]
    pub config: Option<PathBuf>,
    /// path to a TOML level catalog, replaces the built-in levels
    #[argh(option)]
    pub levels: Option<PathBuf>,
    /// start this level straight away instead of showing the menu
    #[argh(option)]
    pub level: Option<u32>,
    /// ray march step in world units, overrides the config file
    #[argh(option)]
    pub ray_step: Option<f32>,
}
