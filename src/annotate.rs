use image::{DynamicImage, Rgb};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::error::FaceCropError;
use crate::handle::ImageHandle;
use crate::region::Region;

/// Outline colors cycled per region index. Each region's index picks its
/// color, which is what labels it: region 0 is always green, region 1 red,
/// and so on around the palette.
const PALETTE: [[u8; 3]; 6] = [
    [0, 255, 0],
    [255, 0, 0],
    [0, 128, 255],
    [255, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
];

/// Outline thickness in pixels.
const OUTLINE_PX: u32 = 2;

/// Side length of the filled label tab at a region's top-left corner.
const TAB_PX: u32 = 6;

/// Render region outlines onto a copy of `image`.
///
/// The source handle is never mutated. Each region gets a two-pixel hollow
/// rectangle plus a filled tab at its top-left corner, colored by region
/// index from a fixed palette. Regions are drawn in input order, so later
/// regions may overlay earlier annotations. An empty region list produces
/// an unannotated copy.
///
/// Fails with [`FaceCropError::EmptyImage`] on an empty source.
pub fn draw_regions(image: &ImageHandle, regions: &[Region]) -> Result<ImageHandle, FaceCropError> {
    if image.is_empty() {
        return Err(FaceCropError::EmptyImage("annotate"));
    }

    let mut canvas = image.as_inner().to_rgb8();

    for (index, region) in regions.iter().enumerate() {
        let color = Rgb(PALETTE[index % PALETTE.len()]);

        for inset in 0..OUTLINE_PX {
            if region.width <= 2 * inset || region.height <= 2 * inset {
                break;
            }
            let rect = Rect::at((region.x + inset) as i32, (region.y + inset) as i32)
                .of_size(region.width - 2 * inset, region.height - 2 * inset);
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }

        let tab_w = TAB_PX.min(region.width);
        let tab_h = TAB_PX.min(region.height);
        let tab = Rect::at(region.x as i32, region.y as i32).of_size(tab_w, tab_h);
        draw_filled_rect_mut(&mut canvas, tab, color);
    }

    Ok(ImageHandle::from_dynamic(DynamicImage::ImageRgb8(canvas)))
}
