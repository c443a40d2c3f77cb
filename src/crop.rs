use crate::error::FaceCropError;
use crate::handle::ImageHandle;
use crate::region::Region;

/// Grow a region by `padding_ratio` of its own size on every side, clamped
/// edge-by-edge to the image bounds.
///
/// Padding is `floor(width * ratio)` horizontally and
/// `floor(height * ratio)` vertically. Each edge of the padded box is
/// clamped independently: a region already touching the image boundary
/// silently gets less padding on that side, and clamping one edge never
/// transfers its padding to the opposite edge. A ratio of `0.0` returns the
/// input region unchanged.
///
/// Fails with [`FaceCropError::Geometry`] if the ratio is negative or
/// non-finite, or if the clamped box is degenerate (the region lies
/// entirely outside the image).
pub fn padded_crop(
    image: &ImageHandle,
    region: &Region,
    padding_ratio: f32,
) -> Result<Region, FaceCropError> {
    let (img_w, img_h) = image.dimensions()?;

    if !padding_ratio.is_finite() || padding_ratio < 0.0 {
        return Err(FaceCropError::Geometry(format!(
            "padding ratio must be finite and non-negative, got {padding_ratio}"
        )));
    }

    let pad_x = (f64::from(region.width) * f64::from(padding_ratio)).floor() as i64;
    let pad_y = (f64::from(region.height) * f64::from(padding_ratio)).floor() as i64;

    let left = (i64::from(region.x) - pad_x).max(0);
    let top = (i64::from(region.y) - pad_y).max(0);
    let right = (i64::from(region.x) + i64::from(region.width) + pad_x).min(i64::from(img_w));
    let bottom = (i64::from(region.y) + i64::from(region.height) + pad_y).min(i64::from(img_h));

    if right <= left || bottom <= top {
        return Err(FaceCropError::Geometry(format!(
            "padded region {}x{}+{}+{} does not intersect a {img_w}x{img_h} image",
            region.width, region.height, region.x, region.y
        )));
    }

    Ok(Region {
        x: left as u32,
        y: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}

/// Copy the pixels inside `region` into a new, independently owned handle.
///
/// The result never aliases the source buffer. Fails with
/// [`FaceCropError::EmptyImage`] on an empty source and
/// [`FaceCropError::Geometry`] if the region does not fit inside the image.
pub fn crop(image: &ImageHandle, region: &Region) -> Result<ImageHandle, FaceCropError> {
    if image.is_empty() {
        return Err(FaceCropError::EmptyImage("crop"));
    }
    let (img_w, img_h) = image.dimensions()?;

    if !region.fits_within(img_w, img_h) {
        return Err(FaceCropError::Geometry(format!(
            "crop region {}x{}+{}+{} exceeds {img_w}x{img_h} image",
            region.width, region.height, region.x, region.y
        )));
    }

    let cropped = image
        .as_inner()
        .crop_imm(region.x, region.y, region.width, region.height);
    Ok(ImageHandle::from_dynamic(cropped))
}
