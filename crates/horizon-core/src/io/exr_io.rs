use std::collections::HashMap;
use std::path::Path;

use exr::meta::attribute::{AttributeValue, Text};
use exr::meta::MetaData;
use exr::prelude::*;
use ndarray::Array2;
use smallvec::smallvec;

use crate::error::{HorizonError, Result};
use crate::image::{ColorImage, Panorama};

/// Warping-stage attribute keys carried in the EXR headers.
pub const META_OFFSET_X: &str = "AliceVision:offsetX";
pub const META_OFFSET_Y: &str = "AliceVision:offsetY";
pub const META_PANORAMA_WIDTH: &str = "AliceVision:panoramaWidth";
pub const META_PANORAMA_HEIGHT: &str = "AliceVision:panoramaHeight";

type FlatLayer = Layer<AnyChannels<FlatSamples>>;

/// Custom EXR header attributes, merged from the image-level and
/// layer-level attribute maps.
#[derive(Clone, Debug, Default)]
pub struct ExrHeader {
    attributes: HashMap<Text, AttributeValue>,
}

impl ExrHeader {
    fn merged(
        shared: &HashMap<Text, AttributeValue>,
        own: &HashMap<Text, AttributeValue>,
    ) -> Self {
        let mut attributes = shared.clone();
        attributes.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { attributes }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.attributes.get(&Text::from(key))? {
            AttributeValue::I32(v) => Some(i64::from(*v)),
            AttributeValue::F32(v) => Some(*v as i64),
            AttributeValue::F64(v) => Some(*v as i64),
            AttributeValue::Text(t) => t.to_string().parse().ok(),
            _ => None,
        }
    }

    fn require_int(&self, key: &str, path: &Path) -> Result<i64> {
        self.get_int(key).ok_or_else(|| HorizonError::MetadataMissing {
            key: key.into(),
            path: path.into(),
        })
    }

    /// Placement of a warped view inside the panorama.
    pub fn offsets(&self, path: &Path) -> Result<(usize, usize)> {
        let x = self.require_int(META_OFFSET_X, path)?.max(0) as usize;
        let y = self.require_int(META_OFFSET_Y, path)?.max(0) as usize;
        Ok((x, y))
    }

    /// Full panorama dimensions recorded by the warping stage.
    pub fn panorama_size(&self, path: &Path) -> Result<(usize, usize)> {
        let w = self.require_int(META_PANORAMA_WIDTH, path)?.max(0) as usize;
        let h = self.require_int(META_PANORAMA_HEIGHT, path)?.max(0) as usize;
        Ok((w, h))
    }

    pub fn set_int(&mut self, key: &str, value: i32) {
        self.attributes
            .insert(Text::from(key), AttributeValue::I32(value));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(&Text::from(key))
    }

    /// Drop the warping placement keys before writing the panorama.
    pub fn strip_warping_keys(&mut self) {
        for key in [
            META_OFFSET_X,
            META_OFFSET_Y,
            META_PANORAMA_WIDTH,
            META_PANORAMA_HEIGHT,
        ] {
            self.attributes.remove(&Text::from(key));
        }
    }

    /// Key/value pairs rendered for display, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.to_string(), format!("{v:?}")))
            .collect();
        entries.sort();
        entries
    }
}

fn read_flat_image(path: &Path) -> Result<Image<FlatLayer>> {
    Ok(read_first_flat_layer_from_file(path)?)
}

fn header_of(image: &Image<FlatLayer>) -> ExrHeader {
    ExrHeader::merged(&image.attributes.other, &image.layer_data.attributes.other)
}

fn find_channel<'a>(layer: &'a FlatLayer, name: &str) -> Option<&'a AnyChannel<FlatSamples>> {
    layer
        .channel_data
        .list
        .iter()
        .find(|c| c.name.to_string() == name)
}

fn plane_from_channel(
    channel: &AnyChannel<FlatSamples>,
    height: usize,
    width: usize,
) -> Array2<f32> {
    Array2::from_shape_fn((height, width), |(i, j)| {
        channel.sample_data.value_by_flat_index(i * width + j).to_f32()
    })
}

/// Read a warped color view: RGB planes plus its header attributes.
pub fn read_color_exr(path: &Path) -> Result<(ColorImage, ExrHeader)> {
    let image = read_flat_image(path)?;
    let layer = &image.layer_data;
    let width = layer.size.width();
    let height = layer.size.height();

    let fallback = layer
        .channel_data
        .list
        .first()
        .ok_or_else(|| HorizonError::MissingChannel {
            name: "R".into(),
            path: path.into(),
        })?;
    let r = find_channel(layer, "R").unwrap_or(fallback);
    let g = find_channel(layer, "G").unwrap_or(r);
    let b = find_channel(layer, "B").unwrap_or(r);

    let color = ColorImage::from_planes(
        plane_from_channel(r, height, width),
        plane_from_channel(g, height, width),
        plane_from_channel(b, height, width),
    );
    Ok((color, header_of(&image)))
}

fn read_scalar_exr(path: &Path) -> Result<(Array2<f32>, ExrHeader)> {
    let image = read_flat_image(path)?;
    let layer = &image.layer_data;
    let channel = layer
        .channel_data
        .list
        .first()
        .ok_or_else(|| HorizonError::MissingChannel {
            name: "Y".into(),
            path: path.into(),
        })?;
    let plane = plane_from_channel(channel, layer.size.height(), layer.size.width());
    Ok((plane, header_of(&image)))
}

/// Read a validity mask; any nonzero sample counts as valid.
pub fn read_mask_exr(path: &Path) -> Result<(Array2<u8>, ExrHeader)> {
    let (plane, header) = read_scalar_exr(path)?;
    Ok((plane.mapv(|v| u8::from(v != 0.0)), header))
}

/// Read a soft weight map.
pub fn read_weight_exr(path: &Path) -> Result<(Array2<f32>, ExrHeader)> {
    read_scalar_exr(path)
}

/// Read dimensions and attributes without decoding pixel data.
pub fn read_header(path: &Path) -> Result<(usize, usize, ExrHeader)> {
    let meta = MetaData::read_from_file(path, false)?;
    let header = meta
        .headers
        .first()
        .ok_or_else(|| HorizonError::MissingChannel {
            name: "header".into(),
            path: path.into(),
        })?;
    Ok((
        header.layer_size.width(),
        header.layer_size.height(),
        ExrHeader::merged(&header.shared_attributes.other, &header.own_attributes.other),
    ))
}

/// Summary of one EXR file for display.
pub struct ExrInfo {
    pub width: usize,
    pub height: usize,
    pub channels: Vec<String>,
    pub header: ExrHeader,
}

pub fn read_exr_info(path: &Path) -> Result<ExrInfo> {
    let meta = MetaData::read_from_file(path, false)?;
    let header = meta
        .headers
        .first()
        .ok_or_else(|| HorizonError::MissingChannel {
            name: "header".into(),
            path: path.into(),
        })?;
    Ok(ExrInfo {
        width: header.layer_size.width(),
        height: header.layer_size.height(),
        channels: header
            .channels
            .list
            .iter()
            .map(|c| c.name.to_string())
            .collect(),
        header: ExrHeader::merged(&header.shared_attributes.other, &header.own_attributes.other),
    })
}

fn plane_samples(plane: &Array2<f32>) -> FlatSamples {
    FlatSamples::F32(plane.iter().copied().collect())
}

fn write_channels(
    path: &Path,
    width: usize,
    height: usize,
    channels: AnyChannels<FlatSamples>,
    header: &ExrHeader,
) -> Result<()> {
    let layer = Layer::new(
        Vec2(width, height),
        LayerAttributes::default(),
        Encoding::SMALL_LOSSLESS,
        channels,
    );
    let mut image = Image::from_layer(layer);
    image.layer_data.attributes.other = header.attributes.clone();
    image.write().to_file(path)?;
    Ok(())
}

/// Write an RGB float view with its header attributes.
pub fn write_color_exr(path: &Path, color: &ColorImage, header: &ExrHeader) -> Result<()> {
    let channels = AnyChannels::sort(smallvec![
        AnyChannel::new("R", plane_samples(&color.r)),
        AnyChannel::new("G", plane_samples(&color.g)),
        AnyChannel::new("B", plane_samples(&color.b)),
    ]);
    write_channels(path, color.width(), color.height(), channels, header)
}

/// Write a single-channel validity mask; valid pixels are 1.0.
pub fn write_mask_exr(path: &Path, mask: &Array2<u8>, header: &ExrHeader) -> Result<()> {
    let samples = FlatSamples::F32(mask.iter().map(|&v| f32::from(v.min(1))).collect());
    let channels = AnyChannels::sort(smallvec![AnyChannel::new("Y", samples)]);
    let (h, w) = mask.dim();
    write_channels(path, w, h, channels, header)
}

/// Write a single-channel weight map.
pub fn write_weight_exr(path: &Path, weight: &Array2<f32>, header: &ExrHeader) -> Result<()> {
    let channels = AnyChannels::sort(smallvec![AnyChannel::new("Y", plane_samples(weight))]);
    let (h, w) = weight.dim();
    write_channels(path, w, h, channels, header)
}

/// Write the RGBA panorama with the passthrough attributes.
pub fn write_panorama_exr(path: &Path, panorama: &Panorama, header: &ExrHeader) -> Result<()> {
    let channels = AnyChannels::sort(smallvec![
        AnyChannel::new("R", plane_samples(&panorama.color.r)),
        AnyChannel::new("G", plane_samples(&panorama.color.g)),
        AnyChannel::new("B", plane_samples(&panorama.color.b)),
        AnyChannel::new("A", plane_samples(&panorama.alpha)),
    ]);
    write_channels(path, panorama.width(), panorama.height(), channels, header)
}
