use std::error::Error;
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::{GrayImage, RgbImage};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::config::GeneratorConfig;
use crate::error::ConfigError;
use crate::export;
use crate::plates::GrowthProgress;
use crate::seeds::GenerationSeeds;
use crate::surface::{ring_count_for, Projection};
use crate::world::{self, WorldData};

/// Messages from the generation worker to the window thread
enum WorkerMessage {
    Progress(GrowthProgress),
    Finished(Result<WorldData, ConfigError>),
}

/// Generated world plus the colors it is drawn with
struct DisplayData {
    world: WorldData,
    palette: Vec<[u8; 3]>,
}

/// Run a full generation on a background thread.
///
/// Progress and the finished world come back over the returned channel. If the
/// receiver is dropped, the worker stops after its current round.
fn spawn_generation(config: GeneratorConfig, seeds: GenerationSeeds) -> Receiver<WorkerMessage> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let progress_tx = tx.clone();
        let mut observer = move |progress: &GrowthProgress| {
            match progress_tx.send(WorkerMessage::Progress(*progress)) {
                Ok(()) => ControlFlow::Continue(()),
                Err(_) => ControlFlow::Break(()),
            }
        };
        let result = world::generate_world(&config, seeds, &mut observer);
        let _ = tx.send(WorkerMessage::Finished(result));
    });

    rx
}

/// Run the interactive viewer: plate map on top, heightmap below.
/// R regenerates with a new geometry seed, P toggles the projection, Escape exits.
pub fn run_viewer(
    config: GeneratorConfig,
    seeds: GenerationSeeds,
    projection: Projection,
) -> Result<(), Box<dyn Error>> {
    config.validate()?;

    let width = config.equator_length;
    let rings = ring_count_for(width);
    let target_size = 900;
    let scale = (target_size / width.max(rings * 2)).max(1);
    let window_width = width * scale;
    let window_height = rings * 2 * scale;

    let mut window = Window::new(
        "Sphere Plates - R: Regenerate, P: Projection, Esc: Exit",
        window_width,
        window_height,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(60);

    println!("Viewer started. Controls:");
    println!("  R: Regenerate");
    println!("  P: Toggle stretched/raw projection");
    println!("  Esc: Exit");

    let mut seeds = seeds;
    let mut projection = projection;
    let mut display: Option<DisplayData> = None;
    let mut buffer = vec![0u32; window_width * window_height];

    println!("Generating with seeds: {}", seeds);
    let mut pending = Some(spawn_generation(config.clone(), seeds));

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut needs_redraw = false;

        if let Some(rx) = &pending {
            let mut finished = false;
            loop {
                match rx.try_recv() {
                    Ok(WorkerMessage::Progress(p)) => {
                        println!(
                            "Round {}: {} free cells remaining ({}%)",
                            p.round,
                            p.free_cells,
                            p.percent_filled()
                        );
                    }
                    Ok(WorkerMessage::Finished(Ok(world))) => {
                        println!(
                            "Done after {} rounds ({:?})",
                            world.growth.rounds, world.growth.termination
                        );
                        let palette =
                            export::plate_palette(&world.plates, &mut seeds.presentation_rng());
                        display = Some(DisplayData { world, palette });
                        needs_redraw = true;
                        finished = true;
                        break;
                    }
                    Ok(WorkerMessage::Finished(Err(e))) => {
                        eprintln!("Generation failed: {}", e);
                        finished = true;
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
            if finished {
                pending = None;
            }
        }

        if pending.is_none() && window.is_key_pressed(Key::R, KeyRepeat::No) {
            seeds = GenerationSeeds::builder(rand::random())
                .presentation(seeds.presentation)
                .build();
            println!("Regenerating with seeds: {}", seeds);
            pending = Some(spawn_generation(config.clone(), seeds));
        }

        if window.is_key_pressed(Key::P, KeyRepeat::No) {
            projection = match projection {
                Projection::Stretched => Projection::Raw,
                Projection::Raw => Projection::Stretched,
            };
            println!("Projection: {}", projection);
            needs_redraw = true;
        }

        if needs_redraw {
            if let Some(data) = &display {
                let plates = export::render_plate_image(&data.world.plate_map, &data.palette, projection);
                let heights = export::render_height_image(&data.world.heightmap, projection);
                buffer = compose_buffer(&plates, &heights, scale);
            }
        }

        window.update_with_buffer(&buffer, window_width, window_height)?;
    }

    Ok(())
}

/// Stack the plate image over the height image, upscaled by `scale`, as 0RGB pixels.
fn compose_buffer(plates: &RgbImage, heights: &GrayImage, scale: usize) -> Vec<u32> {
    let (w, h) = (plates.width() as usize, plates.height() as usize);
    let out_w = w * scale;
    let out_h = h * 2 * scale;
    let mut buffer = vec![0u32; out_w * out_h];

    for py in 0..out_h {
        let sy = py / scale;
        for px in 0..out_w {
            let sx = (px / scale) as u32;
            let [r, g, b] = if sy < h {
                plates.get_pixel(sx, sy as u32).0
            } else {
                let v = heights.get_pixel(sx, (sy - h) as u32).0[0];
                [v, v, v]
            };
            buffer[py * out_w + px] = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
        }
    }

    buffer
}
