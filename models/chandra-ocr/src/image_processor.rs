use candle_core::{DType, Device, Result, Tensor};
use image::{imageops::FilterType, RgbImage};

/// How images are turned into encoder input.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessorConfig {
    /// Resize every image to `height` x `width` before normalizing
    pub do_resize: bool,
    /// Target height in pixels
    pub height: u32,
    /// Target width in pixels
    pub width: u32,
    /// Subtract `image_mean` and divide by `image_std` after rescaling to 0..1
    pub do_normalize: bool,
    /// Per-channel mean
    pub image_mean: Vec<f32>,
    /// Per-channel standard deviation
    pub image_std: Vec<f32>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            do_resize: true,
            height: 384,
            width: 384,
            do_normalize: true,
            image_mean: vec![0.5, 0.5, 0.5],
            image_std: vec![0.5, 0.5, 0.5],
        }
    }
}

/// Converts RGB images into the `(batch, 3, height, width)` pixel tensor a ViT encoder expects.
#[derive(Clone, Debug)]
pub struct ViTImageProcessor {
    config: ProcessorConfig,
}

impl ViTImageProcessor {
    /// Creates a new [`ViTImageProcessor`].
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Stack the images into one F32 batch tensor on `device`.
    pub fn preprocess(&self, images: &[&RgbImage], device: &Device) -> Result<Tensor> {
        let mut pixel_values = Vec::with_capacity(images.len());
        for image in images {
            let image = if self.config.do_resize {
                image::imageops::resize(
                    *image,
                    self.config.width,
                    self.config.height,
                    FilterType::Triangle,
                )
            } else {
                (*image).clone()
            };
            let (width, height) = image.dimensions();
            let data = Tensor::from_vec(
                image.into_raw(),
                (height as usize, width as usize, 3),
                device,
            )?
            .permute((2, 0, 1))?
            .to_dtype(DType::F32)?;
            let data = (data / 255.)?;
            let data = if self.config.do_normalize {
                let mean = Tensor::from_vec(self.config.image_mean.clone(), (3, 1, 1), device)?;
                let std = Tensor::from_vec(self.config.image_std.clone(), (3, 1, 1), device)?;
                data.broadcast_sub(&mean)?.broadcast_div(&std)?
            } else {
                data
            };
            pixel_values.push(data);
        }
        Tensor::stack(&pixel_values, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_image_normalizes_to_one() {
        let image = RgbImage::from_pixel(10, 10, image::Rgb([255, 255, 255]));
        let processor = ViTImageProcessor::new(&ProcessorConfig::default());
        let pixel_values = processor.preprocess(&[&image], &Device::Cpu).unwrap();

        assert_eq!(pixel_values.dims(), &[1, 3, 384, 384]);
        assert_eq!(pixel_values.dtype(), DType::F32);
        let values = pixel_values.flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert!(values.iter().all(|v| (v - 1.).abs() < 1e-6));
    }

    #[test]
    fn keeps_size_without_resize() {
        let image = RgbImage::from_pixel(12, 7, image::Rgb([0, 0, 0]));
        let config = ProcessorConfig {
            do_resize: false,
            do_normalize: false,
            ..Default::default()
        };
        let pixel_values = ViTImageProcessor::new(&config)
            .preprocess(&[&image, &image], &Device::Cpu)
            .unwrap();

        assert_eq!(pixel_values.dims(), &[2, 3, 7, 12]);
        let max = pixel_values
            .flatten_all()
            .unwrap()
            .max(0)
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();
        assert_eq!(max, 0.);
    }
}
