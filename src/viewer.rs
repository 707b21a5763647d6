use std::time::Instant;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::RenderConfig;
use crate::pixel_buffer::PixelBuffer;
use crate::render::render_into;

/// Animation speed step for the Up/Down keys (noise units per second)
const SPEED_STEP: f64 = 0.05;

/// Run the interactive viewer.
/// R: randomize, G: grayscale, S: shading, M: mask shape, N: mask on/off,
/// O: octaves, Up/Down: animation speed, Space: pause, Escape: exit.
pub fn run_viewer(mut config: RenderConfig, speed: f64) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let (width, height) = (config.width, config.height);

    let mut window = Window::new(
        "Terrain Canvas - R: Randomize, G/S/M/N/O: Toggles, Up/Down: Speed, Esc: Exit",
        width,
        height,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(60);

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.to_bits());
    let mut buffer = PixelBuffer::new(width, height);
    render_into(&config, &mut buffer)?;
    let mut frame = buffer.to_argb_u32();

    let mut speed = speed;
    let mut paused = false;
    let mut last_tick = Instant::now();

    println!("Viewer started. Controls:");
    println!("  R: Randomize palette and seed");
    println!("  G: Grayscale  S: Shading  O: Octaves");
    println!("  M: Cycle mask shape  N: Toggle mask");
    println!("  Up/Down: Animation speed  Space: Pause");
    println!("  Esc: Exit");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut needs_redraw = false;
        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f64();
        last_tick = now;

        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            config.randomize(&mut rng);
            println!("Randomized: seed {}, scale {:.1}, {} stops", config.seed, config.scale, config.palette.len());
            needs_redraw = true;
        }
        if window.is_key_pressed(Key::G, KeyRepeat::No) {
            config.grayscale = !config.grayscale;
            needs_redraw = true;
        }
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            config.shading = !config.shading;
            needs_redraw = true;
        }
        if window.is_key_pressed(Key::O, KeyRepeat::No) {
            config.fractal = !config.fractal;
            println!("Octaves: {}", config.octave_count());
            needs_redraw = true;
        }
        if window.is_key_pressed(Key::M, KeyRepeat::No) {
            config.mask.shape = config.mask.shape.next();
            println!("Mask: {}", config.mask.shape.label());
            needs_redraw = true;
        }
        if window.is_key_pressed(Key::N, KeyRepeat::No) {
            config.mask.enabled = !config.mask.enabled;
            needs_redraw = true;
        }
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            paused = !paused;
        }
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            speed += SPEED_STEP;
            println!("Speed: {:.2}", speed);
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            speed = (speed - SPEED_STEP).max(0.0);
            println!("Speed: {:.2}", speed);
        }

        // A stopped animation only redraws on input
        if !paused && speed > 0.0 {
            config.time_offset += speed * dt;
            needs_redraw = true;
        }

        if needs_redraw {
            render_into(&config, &mut buffer)?;
            frame = buffer.to_argb_u32();
        }

        window.update_with_buffer(&frame, width, height)?;
    }

    Ok(())
}
