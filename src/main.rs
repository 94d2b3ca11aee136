use clap::Parser;
use log::{LevelFilter, info};
use raster_pipeline::core::FrameBuffer;
use raster_pipeline::io::args::Args;
use raster_pipeline::io::config_loader::TomlConfigLoader;
use raster_pipeline::io::load_mesh;
use raster_pipeline::scene::render_mesh;
use raster_pipeline::utils::save_utils::{save_depth_map, save_frame_buffer};
use std::time::Instant;

/// `RUST_LOG` wins over the default `info` level.
fn init_logging() {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filter) => {
            builder.parse_filters(&filter);
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Info);
        }
    }
    // a logger installed by someone else is fine
    let _ = builder.try_init();
}

fn main() -> Result<(), String> {
    init_logging();
    let args = Args::parse();
    let settings = args.load_settings()?;

    if args.print_config {
        print!("{}", TomlConfigLoader::to_toml(&settings)?);
        return Ok(());
    }

    let start_time = Instant::now();

    let mesh_path = settings
        .mesh
        .as_deref()
        .ok_or("no input mesh, pass --mesh or set `mesh` in the [files] section")?;
    let mesh = load_mesh(mesh_path).map_err(|e| format!("{}: {}", mesh_path, e))?;

    let mut frame_buffer = FrameBuffer::new(settings.width, settings.height);
    render_mesh(&settings, &mesh, &mut frame_buffer)?;

    save_frame_buffer(&settings.output, &frame_buffer)?;
    if settings.save_depth {
        save_depth_map(settings.depth_output(), &frame_buffer)?;
    }

    info!("Finished in {:?}", start_time.elapsed());
    Ok(())
}
