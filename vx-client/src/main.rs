use std::path::PathBuf;

use bevy::app::AppExit;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vx_render::{LightingQualityPreset, VoxelRenderPlugin};
use vx_utils::{PackedVertex, VertexFields};

mod config;
mod inspect;

use config::{ClientConfig, DEFAULT_CONFIG_PATH};

const DEFAULT_LOG_FILTER: &str = "info,wgpu=error,naga=warn";

#[derive(Parser)]
#[command(name = "vx-client", about = "Voxel chunk renderer and packed-vertex tools")]
struct Cli {
    /// TOML config file (defaults to ./vx-client.toml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log filter directives, overridden by RUST_LOG
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILTER)]
    log: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the renderer on generated terrain (default)
    Run,
    /// Print the fields of a packed vertex word
    Decode {
        /// Packed word as decimal, 0x hex or 0b binary
        #[arg(value_parser = inspect::parse_packed)]
        word: u32,
    },
    /// Pack vertex fields into a word
    Encode {
        x: u32,
        y: u32,
        z: u32,
        #[arg(long, default_value_t = 0)]
        ao: u32,
        #[arg(long, default_value_t = 0)]
        normal: u32,
        #[arg(long, default_value_t = 0)]
        block: u32,
    },
    /// Shade a packed vertex on the CPU and print every intermediate value
    Shade {
        #[arg(value_parser = inspect::parse_packed)]
        word: u32,
        /// World-space origin of the chunk the vertex belongs to
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true, default_values_t = [0.0, 0.0, 0.0])]
        origin: Vec<f32>,
        /// Camera position, defaults to the configured start position
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true)]
        camera: Option<Vec<f32>>,
        /// Lighting preset, defaults to the configured one
        #[arg(long)]
        preset: Option<String>,
    },
}

fn init_cli_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_env_filter(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig, config::ConfigError> {
    match &cli.config {
        Some(path) => ClientConfig::load(path, true),
        None => ClientConfig::load(&PathBuf::from(DEFAULT_CONFIG_PATH), false),
    }
}

fn vec3_arg(values: &[f32]) -> Vec3 {
    match values {
        [x, y, z] => Vec3::new(*x, *y, *z),
        _ => Vec3::ZERO,
    }
}

fn run(config: ClientConfig, log: String) -> Result<(), Box<dyn std::error::Error>> {
    let plugin = VoxelRenderPlugin {
        world: config.world_settings()?,
        movement: config.camera,
        debug: config.debug_settings(),
    };

    let exit = App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "vx-client".into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: vx_utils::assets_root().to_string_lossy().into_owned(),
                    ..default()
                })
                .set(LogPlugin {
                    filter: log,
                    ..default()
                }),
        )
        .add_plugins(plugin)
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(format!("renderer exited with code {code}").into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let command = cli.command.as_ref().unwrap_or(&Command::Run);
    if let Command::Run = command {
        // Bevy's LogPlugin owns the global subscriber in this mode.
        let config = load_config(&cli)?;
        return run(config, cli.log.clone());
    }

    init_cli_logging(&cli.log);
    match command {
        Command::Run => unreachable!("handled above"),
        Command::Decode { word } => {
            println!("{}", inspect::decode_report(PackedVertex(*word)));
        }
        Command::Encode {
            x,
            y,
            z,
            ao,
            normal,
            block,
        } => {
            let fields = VertexFields::new(*x, *y, *z, *ao, *normal, *block);
            let packed = inspect::encode(fields)?;
            println!("{}", inspect::describe_fields(packed));
        }
        Command::Shade {
            word,
            origin,
            camera,
            preset,
        } => {
            let config = load_config(&cli)?;
            let preset = match preset {
                Some(name) => LightingQualityPreset::from_options_value(name)
                    .ok_or_else(|| format!("unknown lighting preset `{name}`"))?,
                None => config.lighting.preset,
            };
            let camera = camera
                .as_deref()
                .map(vec3_arg)
                .unwrap_or(Vec3::from_array(config.world.camera_start));
            let request = inspect::ShadeRequest {
                packed: PackedVertex(*word),
                chunk_origin: vec3_arg(origin),
                camera,
                preset,
                material: config.chunk_material()?,
            };
            info!(preset = preset.label(), ?camera, "shading vertex");
            let report = inspect::shade(&request);
            println!("{}", inspect::shade_report(&request, &report));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["vx-client"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn shade_accepts_negative_origin() {
        let cli = Cli::try_parse_from([
            "vx-client", "shade", "0x8000", "--origin", "-32", "0", "64",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Shade { word, origin, .. }) => {
                assert_eq!(word, 0x8000);
                assert_eq!(vec3_arg(&origin), Vec3::new(-32.0, 0.0, 64.0));
            }
            _ => panic!("expected shade"),
        }
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Cli::try_parse_from(["vx-client", "decode", "nope"]).is_err());
    }
}
