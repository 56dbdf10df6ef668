//! Dominant-color palette derivation from the resolved logo.
//!
//! The logo bytes are decoded (or rasterized, for SVG), downsampled, and
//! quantized into a handful of swatches; swatches that account for a single
//! sampled pixel are treated as noise and dropped.

use color_quant::NeuQuant;
use image::{DynamicImage, RgbaImage};
use thiserror::Error;

use crate::fetch::assets::{AssetClient, AssetError};

/// Number of palette entries requested from the quantizer.
const PALETTE_COLORS: usize = 6;

/// NeuQuant sampling factor (1 = every pixel; 10 is the library's fast
/// default).
const SAMPLE_FACTOR: i32 = 10;

/// Rasters larger than this are thumbnailed before sampling.
const MAX_SAMPLE_DIM: u32 = 256;

/// Pixels more transparent than this are excluded from sampling, so a
/// mostly-transparent logo canvas does not dominate the palette.
const ALPHA_CUTOFF: u8 = 128;

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("could not decode logo image: {0}")]
    Decode(String),

    #[error("could not rasterize SVG logo: {0}")]
    Render(String),
}

/// One quantized palette entry and how many sampled pixels mapped to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub rgb: [u8; 3],
    pub population: u32,
}

impl Swatch {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.rgb[0], self.rgb[1], self.rgb[2])
    }
}

/// Derive the dominant colors of the logo at `logo_url`.
///
/// A missing logo yields an empty palette without touching the network.
pub async fn extract_colors<A>(
    assets: &A,
    logo_url: Option<&str>,
) -> Result<Vec<String>, PaletteError>
where
    A: AssetClient + Sync,
{
    let Some(url) = logo_url else {
        return Ok(Vec::new());
    };

    let body = assets.fetch_bytes(url).await?;
    let raster = if is_svg(&body.content_type) {
        rasterize_svg(&body.data)?
    } else {
        decode_raster(&body.data)?
    };

    Ok(dominant_hexes(swatches(raster)))
}

/// Drop single-pixel noise swatches and project the rest to hex.
fn dominant_hexes(swatches: Vec<Swatch>) -> Vec<String> {
    swatches
        .into_iter()
        .filter(|swatch| swatch.population > 1)
        .map(|swatch| swatch.hex())
        .collect()
}

fn is_svg(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .eq_ignore_ascii_case("image/svg+xml")
}

fn decode_raster(data: &[u8]) -> Result<RgbaImage, PaletteError> {
    image::load_from_memory(data)
        .map(|img| img.to_rgba8())
        .map_err(|e| PaletteError::Decode(e.to_string()))
}

fn rasterize_svg(data: &[u8]) -> Result<RgbaImage, PaletteError> {
    use resvg::{tiny_skia, usvg};

    let options = usvg::Options::default();
    let tree =
        usvg::Tree::from_data(data, &options).map_err(|e| PaletteError::Render(e.to_string()))?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| PaletteError::Render("zero-sized canvas".to_string()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let mut raster = RgbaImage::new(pixmap.width(), pixmap.height());
    for y in 0..pixmap.height() {
        for x in 0..pixmap.width() {
            if let Some(pixel) = pixmap.pixel(x, y) {
                let color = pixel.demultiply();
                raster.put_pixel(
                    x,
                    y,
                    image::Rgba([color.red(), color.green(), color.blue(), color.alpha()]),
                );
            }
        }
    }
    Ok(raster)
}

/// Quantize a raster into swatches ordered by descending population.
fn swatches(raster: RgbaImage) -> Vec<Swatch> {
    let raster = if raster.width() > MAX_SAMPLE_DIM || raster.height() > MAX_SAMPLE_DIM {
        DynamicImage::ImageRgba8(raster)
            .thumbnail(MAX_SAMPLE_DIM, MAX_SAMPLE_DIM)
            .to_rgba8()
    } else {
        raster
    };

    let mut samples = Vec::with_capacity(raster.as_raw().len());
    for pixel in raster.pixels() {
        if pixel.0[3] >= ALPHA_CUTOFF {
            samples.extend_from_slice(&pixel.0);
        }
    }
    if samples.len() < 4 {
        return Vec::new();
    }

    let quantizer = NeuQuant::new(SAMPLE_FACTOR, PALETTE_COLORS, &samples);
    let palette = quantizer.color_map_rgba();

    let mut populations = vec![0u32; PALETTE_COLORS];
    for pixel in samples.chunks_exact(4) {
        populations[quantizer.index_of(pixel)] += 1;
    }

    let mut swatches: Vec<Swatch> = palette
        .chunks_exact(4)
        .zip(populations)
        .filter(|(_, population)| *population > 0)
        .map(|(entry, population)| Swatch {
            rgb: [entry[0], entry[1], entry[2]],
            population,
        })
        .collect();
    swatches.sort_by(|a, b| b.population.cmp(&a.population));
    swatches
}
