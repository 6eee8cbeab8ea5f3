//! Interactive first-person viewer.
//!
//! ```bash
//! cargo run --release                      # built-in demo level
//! cargo run --release -- --map level.bmp --path-map level_path.bmp
//! ```
//!
//! WASD moves, arrow keys turn, PageUp/PageDown tune the shading exponent,
//! Home resets it, Escape quits. All device polling happens here; the
//! engine only ever sees a `MoveIntent`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use glam::{IVec2, Vec2};
use minifb::{Key, Window, WindowOptions};
use tracing::info;

use wolfcast_rs::assets;
use wolfcast_rs::renderer::{
    Frame, MaterialSet, RenderOptions, Scene, Shading, SoftwareRenderer,
};
use wolfcast_rs::sim::{MoveIntent, PlayerBody, SpawnSprites, TicRunner, integrate_player};
use wolfcast_rs::world::{GridMap, Texture, TextureBank, TextureId, cell_center, tile};

/*──────────────────────────── CLI ───────────────────────────*/

#[derive(Parser)]
#[command(about = "Wolfenstein-style raycasting viewer")]
struct Args {
    /// Wall-layer map raster (24-bit BMP, fixed palette)
    #[arg(long)]
    map: Option<PathBuf>,

    /// Path-layer map raster (avoidance zones + spawn markers)
    #[arg(long)]
    path_map: Option<PathBuf>,

    /// Directory holding material BMPs (greystone.bmp, redbrick.bmp, ...)
    #[arg(long)]
    textures: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    width: usize,

    #[arg(long, default_value_t = 400)]
    height: usize,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f32,
}

const MATERIAL_NAMES: [&str; 6] = [
    "greystone", "greystone", "redbrick", "woodfloor", "wood", "bluestone",
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    /*──────────── world: from files or the built-in demo ────────────*/
    let grid = match (&args.map, &args.path_map) {
        (Some(walls), Some(path)) => assets::load_grid(walls, path)?,
        _ => {
            info!("no map given, using the built-in demo level");
            demo_level()
        }
    };

    let mut bank = TextureBank::default_with_checker();
    match &args.textures {
        Some(dir) => {
            for name in MATERIAL_NAMES.iter().chain(["mossy"].iter()) {
                let file = dir.join(format!("{name}.bmp"));
                if bank.id(name).is_none() && file.is_file() {
                    assets::load_texture(&mut bank, name, &file)?;
                }
            }
        }
        None => synth_textures(&mut bank)?,
    }
    let materials = build_materials(&bank);

    let sprites = SpawnSprites {
        guard_frames: guard_frames(&mut bank)?,
        barrel: synth_disc(&mut bank, "barrel", 0xFF_8B5A2B)?,
    };
    let mut sim = TicRunner::new();
    sim.spawn_from_grid(&grid, &sprites);

    let mut player = PlayerBody::new(spawn_point(&grid), 0.0);
    let fov = args.fov.to_radians();

    /*──────────── renderer + window ────────────*/
    let mut renderer = SoftwareRenderer::new(&RenderOptions {
        width: args.width,
        height: args.height,
        shading: Shading::default(),
    });
    let mut frame = Frame::new(args.width, args.height);
    let mut present = vec![0u32; args.width * args.height];

    let mut window = Window::new(
        "wolfcast",
        args.width,
        args.height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    let start = Instant::now();
    let mut last = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = (now - last).as_secs_f32().min(0.1);
        last = now;

        /*──────── input -> intent ────────*/
        let mut intent = MoveIntent::default();
        if window.is_key_down(Key::W) {
            intent.forward += 1.0;
        }
        if window.is_key_down(Key::S) {
            intent.forward -= 1.0;
        }
        if window.is_key_down(Key::D) {
            intent.strafe += 1.0;
        }
        if window.is_key_down(Key::A) {
            intent.strafe -= 1.0;
        }
        if window.is_key_down(Key::Right) {
            intent.turn += 1.0;
        }
        if window.is_key_down(Key::Left) {
            intent.turn -= 1.0;
        }
        tune_shading(&window, &mut renderer, dt);

        /*──────── simulate ────────*/
        integrate_player(&grid, &mut player, intent, dt);
        sim.tick(&grid, player.pos, dt);

        /*──────── render + present ────────*/
        let billboards = sim.billboards(start.elapsed().as_secs_f32());
        let scene = Scene {
            grid: &grid,
            textures: &bank,
            materials: &materials,
            billboards: &billboards,
        };
        renderer.render(&scene, &player.camera(fov), &mut frame);
        frame.copy_row_major(&mut present);
        window.update_with_buffer(&present, args.width, args.height)?;
    }

    Ok(())
}

/// PageUp/PageDown sweep the shading exponent, Home resets; every change
/// rebuilds the shade LUT before the next frame.
fn tune_shading(window: &Window, renderer: &mut SoftwareRenderer, dt: f32) {
    let mut shading = renderer.shading();
    if window.is_key_down(Key::PageUp) {
        shading.exponent += 10.0 * dt;
    }
    if window.is_key_down(Key::PageDown) {
        shading.exponent = (shading.exponent - 10.0 * dt).max(0.01);
    }
    if window.is_key_down(Key::Home) {
        shading.exponent = 5.0;
    }
    renderer.set_shading(shading);
}

fn build_materials(bank: &TextureBank) -> MaterialSet {
    let mut by_code = [0; 6];
    for (code, name) in MATERIAL_NAMES.iter().enumerate() {
        by_code[code] = bank.id_or_missing(name);
    }
    MaterialSet {
        by_code,
        ceiling: bank.id_or_missing("mossy"),
    }
}

/// First open interior cell, used when a custom map has no explicit start.
fn spawn_point(grid: &GridMap) -> Vec2 {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = IVec2::new(x, y);
            if grid.get(cell) == tile::OPEN {
                return cell_center(cell);
            }
        }
    }
    Vec2::new(1.5, 1.5)
}

/*──────────────────── built-in demo content ────────────────────*/

fn demo_level() -> GridMap {
    let mut grid = GridMap::open(24, 24).with_border(tile::SOLID);
    // a few rooms and pillars
    for y in 4..20 {
        grid.set(IVec2::new(12, y), 2);
    }
    for x in 4..11 {
        grid.set(IVec2::new(x, 10), 4);
    }
    grid.set(IVec2::new(7, 10), tile::OPEN); // doorway
    for &(x, y) in &[(5, 5), (18, 5), (5, 18), (18, 18)] {
        grid.set(IVec2::new(x, y), 5);
    }
    // decorative floor strip in front of the doorway
    for x in 6..9 {
        grid.set(IVec2::new(x, 11), tile::DECOR_FLOOR);
    }
    // spawns and an avoidance zone on the path layer
    grid.set_path(IVec2::new(18, 12), tile::SPAWN_GUARD);
    grid.set_path(IVec2::new(9, 15), tile::SPAWN_BARREL);
    grid.set_path(IVec2::new(15, 6), tile::SPAWN_BARREL);
    for x in 6..9 {
        grid.set_path(IVec2::new(x, 11), tile::AVOID);
    }
    grid
}

/// Procedural stand-in materials so the demo runs without asset files.
fn synth_textures(bank: &mut TextureBank) -> Result<()> {
    synth_brick(bank, "greystone", 0xFF_707078, 0xFF_505058)?;
    synth_brick(bank, "redbrick", 0xFF_A04030, 0xFF_702820)?;
    synth_brick(bank, "wood", 0xFF_8B6A3A, 0xFF_6B4A26)?;
    synth_brick(bank, "woodfloor", 0xFF_9A7A48, 0xFF_7A5A34)?;
    synth_brick(bank, "bluestone", 0xFF_3F48CC, 0xFF_2A308A)?;
    synth_brick(bank, "mossy", 0xFF_4A6A4A, 0xFF_304A30)?;
    Ok(())
}

fn synth_brick(bank: &mut TextureBank, name: &str, face: u32, mortar: u32) -> Result<()> {
    const TS: usize = 64;
    let mut pixels = vec![face; TS * TS];
    for y in 0..TS {
        for x in 0..TS {
            let course = y / 16;
            let offset = if course % 2 == 0 { 0 } else { 16 };
            if y % 16 == 0 || (x + offset) % 32 == 0 {
                pixels[y * TS + x] = mortar;
            }
        }
    }
    bank.insert(name, Texture::from_pixels(pixels)?)?;
    Ok(())
}

/// Filled disc on a transparent (texel 0) background.
fn synth_disc(bank: &mut TextureBank, name: &str, color: u32) -> Result<TextureId> {
    const TS: usize = 64;
    let mut pixels = vec![0u32; TS * TS];
    let c = TS as f32 * 0.5 - 0.5;
    for y in 0..TS {
        for x in 0..TS {
            let dx = x as f32 - c;
            let dy = y as f32 - c;
            if (dx * dx + dy * dy).sqrt() < TS as f32 * 0.42 {
                pixels[y * TS + x] = color;
            }
        }
    }
    Ok(bank.insert(name, Texture::from_pixels(pixels)?)?)
}

/// Three tinted discs stand in for the guard walk cycle.
fn guard_frames(bank: &mut TextureBank) -> Result<Vec<TextureId>> {
    Ok(vec![
        synth_disc(bank, "guard0", 0xFF_C0C0D0)?,
        synth_disc(bank, "guard1", 0xFF_A0A0B8)?,
        synth_disc(bank, "guard2", 0xFF_8080A0)?,
    ])
}
