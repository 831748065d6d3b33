use exif::{In, Reader, Tag, Value};
use image::DynamicImage;
use std::path::Path;

/// Orientation of a picture as reported by the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageOrientation {
    Up,
    Down,
    Left,
    Right,
    UpMirrored,
    DownMirrored,
    LeftMirrored,
    RightMirrored,
}

impl ImageOrientation {
    pub const ALL: [ImageOrientation; 8] = [
        ImageOrientation::Up,
        ImageOrientation::Down,
        ImageOrientation::Left,
        ImageOrientation::Right,
        ImageOrientation::UpMirrored,
        ImageOrientation::DownMirrored,
        ImageOrientation::LeftMirrored,
        ImageOrientation::RightMirrored,
    ];
}

/// EXIF orientation tag values, the form the classification input pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExifOrientation {
    /// Normal orientation
    #[default]
    Up = 1,
    /// Horizontally flipped
    UpMirrored = 2,
    /// Rotated 180 degrees
    Down = 3,
    /// Vertically flipped
    DownMirrored = 4,
    /// Transposed
    LeftMirrored = 5,
    /// Stored rotated 90 degrees CCW, displayed by rotating 90 CW
    Right = 6,
    /// Transversed
    RightMirrored = 7,
    /// Stored rotated 90 degrees CW, displayed by rotating 90 CCW
    Left = 8,
}

impl ExifOrientation {
    pub fn exif_value(self) -> u16 {
        self as u16
    }

    pub fn from_exif(value: u16) -> Option<Self> {
        match value {
            1 => Some(ExifOrientation::Up),
            2 => Some(ExifOrientation::UpMirrored),
            3 => Some(ExifOrientation::Down),
            4 => Some(ExifOrientation::DownMirrored),
            5 => Some(ExifOrientation::LeftMirrored),
            6 => Some(ExifOrientation::Right),
            7 => Some(ExifOrientation::RightMirrored),
            8 => Some(ExifOrientation::Left),
            _ => None,
        }
    }

    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            ExifOrientation::UpMirrored
                | ExifOrientation::DownMirrored
                | ExifOrientation::LeftMirrored
                | ExifOrientation::RightMirrored
        )
    }

    /// Returns the stored pixels transformed so that the picture is upright.
    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            ExifOrientation::Up => image.clone(),
            ExifOrientation::UpMirrored => image.fliph(),
            ExifOrientation::Down => image.rotate180(),
            ExifOrientation::DownMirrored => image.flipv(),
            ExifOrientation::LeftMirrored => image.rotate90().fliph(),
            ExifOrientation::Right => image.rotate90(),
            ExifOrientation::RightMirrored => image.rotate270().fliph(),
            ExifOrientation::Left => image.rotate270(),
        }
    }
}

impl From<ImageOrientation> for ExifOrientation {
    fn from(orientation: ImageOrientation) -> Self {
        match orientation {
            ImageOrientation::Up => ExifOrientation::Up,
            ImageOrientation::UpMirrored => ExifOrientation::UpMirrored,
            ImageOrientation::Down => ExifOrientation::Down,
            ImageOrientation::DownMirrored => ExifOrientation::DownMirrored,
            ImageOrientation::Left => ExifOrientation::Left,
            ImageOrientation::LeftMirrored => ExifOrientation::LeftMirrored,
            ImageOrientation::Right => ExifOrientation::Right,
            ImageOrientation::RightMirrored => ExifOrientation::RightMirrored,
        }
    }
}

impl From<ExifOrientation> for ImageOrientation {
    fn from(orientation: ExifOrientation) -> Self {
        match orientation {
            ExifOrientation::Up => ImageOrientation::Up,
            ExifOrientation::UpMirrored => ImageOrientation::UpMirrored,
            ExifOrientation::Down => ImageOrientation::Down,
            ExifOrientation::DownMirrored => ImageOrientation::DownMirrored,
            ExifOrientation::Left => ImageOrientation::Left,
            ExifOrientation::LeftMirrored => ImageOrientation::LeftMirrored,
            ExifOrientation::Right => ImageOrientation::Right,
            ExifOrientation::RightMirrored => ImageOrientation::RightMirrored,
        }
    }
}

/// Reads the EXIF orientation tag of an image file, if it has one.
pub fn read_exif_orientation(image_path: &Path) -> Option<ExifOrientation> {
    let file = std::fs::File::open(image_path).ok()?;
    let mut buf_reader = std::io::BufReader::new(file);

    let exif = Reader::new().read_from_container(&mut buf_reader).ok()?;
    let field = exif.get_field(Tag::Orientation, In::PRIMARY)?;

    match &field.value {
        Value::Short(values) => values.first().copied().and_then(ExifOrientation::from_exif),
        _ => None,
    }
}
