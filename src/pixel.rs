//! Pixel geometry for pictures embedded in cells

use crate::config::MarshalConfig;
use crate::error::Result;
use crate::sheet::{PicturePlacement, Sheet};
use image::ImageReader;
use std::io::Cursor;

/// Pixels per column-width unit when the config leaves it unset
pub const FALLBACK_WIDTH_PIXELS_BASE: f64 = 8.0;

/// Resolution the row heights are rendered at
pub const SCREEN_DPI: f64 = 96.0;

/// Gap kept between a fitted picture and the cell border
const FIT_MARGIN: i32 = 2;

/// Column width in pixels
pub fn width_in_pixels(column_width: f64, config: &MarshalConfig) -> i32 {
    let base = if config.width_pixels_base() > 0.0 {
        config.width_pixels_base()
    } else {
        FALLBACK_WIDTH_PIXELS_BASE
    };
    (column_width * base) as i32
}

/// Row height (points) in pixels
pub fn height_in_pixels(row_height: f64, config: &MarshalConfig) -> i32 {
    (row_height / f64::from(config.default_dpi()) * SCREEN_DPI) as i32
}

/// Pixel size of an encoded picture, read from its header
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Scale a picture to fit a cell while keeping its aspect ratio
///
/// The longer side relative to the cell is pinned to the cell edge.
pub fn fit_to_cell(image: (u32, u32), cell: (i32, i32)) -> (i32, i32) {
    let (image_w, image_h) = (f64::from(image.0), f64::from(image.1));
    let (cell_w, cell_h) = (f64::from(cell.0), f64::from(cell.1));

    if image_w <= 0.0 || image_h <= 0.0 {
        return cell;
    }

    if image_h * cell_w > image_w * cell_h {
        let ratio = cell_h / image_h;
        ((image_w * ratio) as i32, cell.1)
    } else {
        let ratio = cell_w / image_w;
        (cell.0, (image_h * ratio) as i32)
    }
}

/// Embed a picture into the cell at (row, column)
///
/// With `autofit` the picture keeps its aspect ratio inside the cell and is
/// centred; otherwise it is stretched to the cell. Empty payloads are ignored.
pub fn insert_picture<S: Sheet + ?Sized>(
    sheet: &S,
    bytes: &[u8],
    row: u32,
    column: u32,
    autofit: bool,
    config: &MarshalConfig,
) -> Result<()> {
    if bytes.is_empty() {
        return Ok(());
    }

    let image_size = image_dimensions(bytes)?;
    let cell_w = width_in_pixels(sheet.column_width(column), config);
    let cell_h = height_in_pixels(sheet.row_height(row), config);

    let (width, height) = if autofit {
        let (w, h) = fit_to_cell(image_size, (cell_w, cell_h));
        ((w - FIT_MARGIN).max(0), (h - FIT_MARGIN).max(0))
    } else {
        (cell_w, cell_h)
    };

    let id = sheet.add_picture(bytes)?;
    let placement = PicturePlacement {
        row,
        column,
        offset_x: (cell_w - width) / 2,
        offset_y: (cell_h - height) / 2,
        width,
        height,
    };
    sheet.place_picture(id, &placement)?;

    #[cfg(feature = "tracing")]
    tracing::trace!(row, column, width, height, "embedded picture");

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sheet::MemorySheet;
    use image::{ImageFormat, RgbImage};

    /// Encode a blank PNG of the given size
    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_pixel_conversions() {
        let config = MarshalConfig::default();
        assert_eq!(width_in_pixels(20.0, &config), 160);
        assert_eq!(height_in_pixels(72.0, &config), 96);

        let config = MarshalConfig::builder()
            .width_pixels_base(7.0)
            .default_dpi(96)
            .build()
            .unwrap();
        assert_eq!(width_in_pixels(10.0, &config), 70);
        assert_eq!(height_in_pixels(50.0, &config), 50);
    }

    #[test]
    fn test_fit_to_cell_keeps_aspect() {
        // tall picture: height pinned
        assert_eq!(fit_to_cell((100, 400), (160, 66)), (16, 66));
        // wide picture: width pinned
        assert_eq!(fit_to_cell((400, 100), (160, 66)), (160, 40));
    }

    #[test]
    fn test_image_dimensions() {
        assert_eq!(image_dimensions(&png(12, 5)).unwrap(), (12, 5));
        assert!(image_dimensions(b"not a picture").is_err());
    }

    #[test]
    fn test_insert_picture_centres_in_cell() {
        let sheet = MemorySheet::new("Sheet1");
        sheet.set_column_width(1, 20.0);
        sheet.set_row_height(1, 50.0);
        let config = MarshalConfig::default();

        insert_picture(&sheet, &png(10, 10), 1, 1, true, &config).unwrap();

        let pictures = sheet.pictures();
        assert_eq!(pictures.len(), 1);
        let placement = pictures[0].placement.unwrap();
        // cell is 160 x 66 px; a square fits to 66 x 66 minus the margin
        assert_eq!((placement.width, placement.height), (64, 64));
        assert_eq!((placement.offset_x, placement.offset_y), (48, 1));
    }

    #[test]
    fn test_insert_picture_into_tiny_cell() {
        let sheet = MemorySheet::new("Sheet1");
        sheet.set_column_width(1, 0.1);
        sheet.set_row_height(1, 50.0);

        insert_picture(&sheet, &png(10, 10), 1, 1, true, &MarshalConfig::default()).unwrap();

        let placement = sheet.pictures()[0].placement.unwrap();
        assert_eq!((placement.width, placement.height), (0, 0));
        assert!(placement.offset_x >= 0 && placement.offset_y >= 0);
    }

    #[test]
    fn test_insert_picture_ignores_empty_payload() {
        let sheet = MemorySheet::new("Sheet1");
        insert_picture(&sheet, &[], 1, 1, true, &MarshalConfig::default()).unwrap();
        assert!(sheet.pictures().is_empty());
    }
}
