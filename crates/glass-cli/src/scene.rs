//! JSON scene description and its rendering.

use anyhow::{anyhow, Context, Result};
use glass_core::preview::{border_preview, glass_preview, PreviewBuffer};
use glass_core::{Color, GlassConfig, GlassLayer, Region};
use glass_skia::{convert, Compositor, GlassElement, ShaderCache};
use serde::Deserialize;
use skia_safe::{
    images, surfaces, AlphaType, ColorType, Data, EncodedImageFormat, Image, ImageInfo,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    /// Solid fill behind everything (default black).
    #[serde(default)]
    pub background: Option<Color>,
    /// Image drawn at the origin, over `background`. Relative to the scene file.
    #[serde(default)]
    pub backdrop: Option<PathBuf>,
    pub elements: Vec<ElementSpec>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ElementSpec {
    pub region: Region,
    #[serde(default = "default_layers")]
    pub layers: Vec<GlassLayer>,
    #[serde(default)]
    pub config: GlassConfig,
    #[serde(default)]
    pub progress: f32,
}

fn default_layers() -> Vec<GlassLayer> {
    vec![GlassLayer::frost()]
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        let mut scene: Scene = serde_json::from_str(&text)
            .with_context(|| format!("parsing scene {}", path.display()))?;
        if let (Some(backdrop), Some(dir)) = (&scene.backdrop, path.parent()) {
            if backdrop.is_relative() {
                scene.backdrop = Some(dir.join(backdrop));
            }
        }
        Ok(scene)
    }
}

fn load_image(path: &Path) -> Result<Image> {
    let bytes = fs::read(path).with_context(|| format!("reading backdrop {}", path.display()))?;
    Image::from_encoded(Data::new_copy(&bytes))
        .ok_or_else(|| anyhow!("could not decode backdrop {}", path.display()))
}

/// Composites every element over the backdrop. Elements that fail to build
/// are logged and skipped; the rest of the scene still renders.
pub fn render(scene: &Scene) -> Result<Image> {
    let mut surface = surfaces::raster_n32_premul(dimensions(scene.width, scene.height)?)
        .ok_or_else(|| anyhow!("could not allocate {}x{} surface", scene.width, scene.height))?;
    let canvas = surface.canvas();
    canvas.clear(convert::color(scene.background.unwrap_or(Color::rgb(0.0, 0.0, 0.0))));
    if let Some(path) = &scene.backdrop {
        canvas.draw_image(&load_image(path)?, (0, 0), None);
    }

    let cache = ShaderCache::new();
    for (i, spec) in scene.elements.iter().enumerate() {
        let element = GlassElement::new(
            spec.region,
            spec.layers.clone(),
            spec.config.clone(),
            cache.clone(),
        );
        let result = element.and_then(|mut el| {
            el.set_progress(spec.progress);
            Compositor::draw(canvas, &mut el)
        });
        match result {
            Ok(()) => info!(element = i, "composited glass element"),
            Err(e) => error!(element = i, "skipping glass element: {}", e),
        }
    }
    info!(shaders = cache.compilations(), "scene rendered");
    Ok(surface.image_snapshot())
}

/// Skia sizes are `i32`; larger canvases are rejected rather than truncated.
fn dimensions(width: u32, height: u32) -> Result<(i32, i32)> {
    let w = i32::try_from(width).with_context(|| format!("width {} is too large", width))?;
    let h = i32::try_from(height).with_context(|| format!("height {} is too large", height))?;
    Ok((w, h))
}

fn preview_image(buf: &PreviewBuffer) -> Result<Image> {
    let info = ImageInfo::new(
        dimensions(buf.width, buf.height)?,
        ColorType::RGBA8888,
        AlphaType::Unpremul,
        None,
    );
    images::raster_from_data(&info, Data::new_copy(&buf.pixels), buf.width as usize * 4)
        .ok_or_else(|| anyhow!("could not wrap preview pixels"))
}

/// CPU renderings of each element's shader functions, in scene coordinates:
/// `(glass, border)` images per element.
pub fn previews(scene: &Scene) -> Result<Vec<(Image, Image)>> {
    scene
        .elements
        .iter()
        .map(|spec| {
            let glass = glass_preview(&spec.region, &spec.config, scene.width, scene.height);
            let border = border_preview(&spec.region, &spec.config, scene.width, scene.height);
            Ok((preview_image(&glass)?, preview_image(&border)?))
        })
        .collect()
}

pub fn write_png(image: &Image, path: &Path) -> Result<()> {
    let data = image
        .encode(None, EncodedImageFormat::PNG, 100)
        .ok_or_else(|| anyhow!("failed to encode {}", path.display()))?;
    fs::write(path, data.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}
