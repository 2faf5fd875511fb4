use std::path::{Path, PathBuf};

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::GenerateError;
use crate::heightmap::HeightMap;
use crate::plates::{Plate, PlateId, PlateType};
use crate::surface::{Projection, SurfaceGrid};

/// Color used for unassigned cells and raw-projection padding.
pub const BACKGROUND: [u8; 3] = [0, 0, 0];

/// One color per plate id; index 0 is the background.
///
/// Oceanic plates get blues and continental plates greens and browns. Colors come
/// from the presentation stream only.
pub fn plate_palette(plates: &[Plate], rng: &mut ChaCha8Rng) -> Vec<[u8; 3]> {
    let mut palette = vec![BACKGROUND; plates.len() + 1];

    for plate in plates {
        let color = match plate.plate_type {
            PlateType::Oceanic => [
                rng.gen_range(30..80),
                rng.gen_range(60..120),
                rng.gen_range(150..220),
            ],
            PlateType::Continental => [
                rng.gen_range(100..180),
                rng.gen_range(140..200),
                rng.gen_range(80..140),
            ],
        };
        palette[plate.id.0 as usize] = color;
    }

    palette
}

/// Render the plate map as RGB.
pub fn render_plate_image(
    plate_map: &SurfaceGrid<PlateId>,
    palette: &[[u8; 3]],
    projection: Projection,
) -> RgbImage {
    let rect = plate_map.project(projection);
    let mut img: RgbImage = ImageBuffer::new(rect.width as u32, rect.height as u32);

    for (x, y, id) in rect.iter() {
        let color = palette.get(id.0 as usize).copied().unwrap_or(BACKGROUND);
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }

    img
}

/// Render the heightmap as normalized grayscale.
pub fn render_height_image(heightmap: &HeightMap, projection: Projection) -> GrayImage {
    let data = heightmap.to_image_data(projection);
    let mut img: GrayImage = ImageBuffer::new(data.width as u32, data.height as u32);

    for (x, y, &v) in data.iter() {
        img.put_pixel(x as u32, y as u32, Luma([v]));
    }

    img
}

/// Export a plate map as a colored PNG.
pub fn export_plate_map(
    plate_map: &SurfaceGrid<PlateId>,
    palette: &[[u8; 3]],
    projection: Projection,
    path: &Path,
) -> Result<(), image::ImageError> {
    render_plate_image(plate_map, palette, projection).save(path)
}

/// Export a heightmap as a grayscale PNG.
pub fn export_heightmap(
    heightmap: &HeightMap,
    projection: Projection,
    path: &Path,
) -> Result<(), image::ImageError> {
    render_height_image(heightmap, projection).save(path)
}

/// Write stretched and raw images of both maps into `out_dir`.
pub fn export_all(
    out_dir: &Path,
    plate_map: &SurfaceGrid<PlateId>,
    palette: &[[u8; 3]],
    heightmap: &HeightMap,
) -> Result<Vec<PathBuf>, GenerateError> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(4);

    for projection in [Projection::Stretched, Projection::Raw] {
        let suffix = match projection {
            Projection::Stretched => "",
            Projection::Raw => "_raw",
        };

        let plates_path = out_dir.join(format!("plates{}.png", suffix));
        export_plate_map(plate_map, palette, projection, &plates_path)?;
        written.push(plates_path);

        let height_path = out_dir.join(format!("heightmap{}.png", suffix));
        export_heightmap(heightmap, projection, &height_path)?;
        written.push(height_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::{generate_heightmap, HeightParams};
    use crate::plates::PlateGrowthEngine;
    use rand::SeedableRng;
    use std::ops::ControlFlow;

    fn small_world() -> (SurfaceGrid<PlateId>, Vec<Plate>) {
        let plates = vec![
            Plate::new(PlateId(1), PlateType::Continental, (3, 6), 1),
            Plate::new(PlateId(2), PlateType::Oceanic, (7, 12), 2),
        ];
        let mut engine = PlateGrowthEngine::from_plates(20, plates).unwrap();
        engine.run(&mut |_: &crate::plates::GrowthProgress| ControlFlow::Continue(()));
        engine.into_parts()
    }

    #[test]
    fn test_palette_is_reproducible() {
        let (_, plates) = small_world();
        let a = plate_palette(&plates, &mut ChaCha8Rng::seed_from_u64(42));
        let b = plate_palette(&plates, &mut ChaCha8Rng::seed_from_u64(42));

        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(a[0], BACKGROUND);
        // Oceanic plates are blue-dominant
        assert!(a[2][2] > a[2][0]);
    }

    #[test]
    fn test_render_sizes_match_projection() {
        let (plate_map, plates) = small_world();
        let palette = plate_palette(&plates, &mut ChaCha8Rng::seed_from_u64(1));

        let stretched = render_plate_image(&plate_map, &palette, Projection::Stretched);
        assert_eq!(stretched.dimensions(), (20, 10));
        // Stretched rows have no padding
        assert!(stretched.pixels().all(|p| p.0 != BACKGROUND));

        let raw = render_plate_image(&plate_map, &palette, Projection::Raw);
        assert_eq!(raw.dimensions(), (20, 10));
        assert_eq!(raw.get_pixel(0, 0).0, BACKGROUND);
    }

    #[test]
    fn test_export_all_writes_four_pngs() {
        let (plate_map, plates) = small_world();
        let palette = plate_palette(&plates, &mut ChaCha8Rng::seed_from_u64(1));
        let heightmap = generate_heightmap(&plate_map, &plates, &HeightParams::default());

        let dir = std::env::temp_dir().join(format!("sphere_plates_export_{}", std::process::id()));
        let written = export_all(&dir, &plate_map, &palette, &heightmap).unwrap();

        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists(), "{} missing", path.display());
        }
        std::fs::remove_dir_all(&dir).ok();
    }
}
