use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

/// Crops the largest centered square out of the image.
pub fn center_crop(image: &DynamicImage) -> DynamicImage {
    let side = image.width().min(image.height());
    let x_offset = (image.width() - side) / 2;
    let y_offset = (image.height() - side) / 2;
    image.crop_imm(x_offset, y_offset, side, side)
}

pub fn center_crop_and_resize(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    center_crop(image).resize_exact(width, height, imageops::FilterType::Triangle)
}

fn image_to_tensor(
    image: &DynamicImage,
    mean: [f32; 3],
    std: [f32; 3],
) -> Result<Tensor, Box<dyn std::error::Error + Send + Sync>> {
    let rgb = image.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    let array = tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        let pixel = rgb.get_pixel(x as u32, y as u32);
        (pixel[c] as f32 / 255.0 - mean[c]) / std[c]
    });

    Ok(array.into_tensor())
}

pub fn center_crop_to_tensor(
    image: &DynamicImage,
    width: u32,
    height: u32,
    mean: [f32; 3],
    std: [f32; 3],
) -> Result<Tensor, Box<dyn std::error::Error + Send + Sync>> {
    if image.width() == 0 || image.height() == 0 {
        return Err("image has no pixels".into());
    }
    let resized = center_crop_and_resize(image, width, height);
    image_to_tensor(&resized, mean, std)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    const NO_NORMALIZATION: ([f32; 3], [f32; 3]) = ([0.0; 3], [1.0; 3]);

    #[test]
    fn test_center_crop_rectangle() {
        // 200x100: left quarter red, middle half green, right quarter blue
        let mut img = ImageBuffer::new(200, 100);
        for (x, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = match x {
                0..=49 => Rgb([255u8, 0, 0]),
                50..=149 => Rgb([0, 255, 0]),
                _ => Rgb([0, 0, 255]),
            };
        }
        let image = DynamicImage::ImageRgb8(img);

        let cropped = center_crop(&image).to_rgb8();
        assert_eq!(cropped.dimensions(), (100, 100));
        assert!(cropped.pixels().all(|p| *p == Rgb([0, 255, 0])));
    }

    #[test]
    fn test_tensor_shape() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(300, 120, Rgb([255, 0, 0])));
        let (mean, std) = NO_NORMALIZATION;

        let tensor = center_crop_to_tensor(&image, 224, 224, mean, std).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[224 * 224], 0.0);
        assert_eq!(slice[2 * 224 * 224], 0.0);
    }

    #[test]
    fn test_tensor_normalization() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(64, 64, Rgb([128, 128, 128])));

        let tensor = center_crop_to_tensor(&image, 32, 32, [0.5; 3], [0.25; 3]).unwrap();
        let slice = tensor.as_slice::<f32>().unwrap();

        let expected = (128.0 / 255.0 - 0.5) / 0.25;
        assert!((slice[0] - expected).abs() < 0.0001);
        assert!((slice[32 * 32] - expected).abs() < 0.0001);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let image = DynamicImage::new_rgb8(0, 0);
        let (mean, std) = NO_NORMALIZATION;
        assert!(center_crop_to_tensor(&image, 32, 32, mean, std).is_err());
    }
}
