use crate::all::*;

// Vertices of the region of interest for a frame of the given height.
pub fn region_triangle(height: usize, p: &ParameterSet) -> [Pixel; 3] {
  let h = height as i32;
  [
    Pixel::new(p.roi_left_x, h),
    Pixel::new(p.roi_right_x, h),
    Pixel::new(p.roi_apex_x, p.roi_apex_y),
  ]
}

// Scanline polygon fill. Pixel (x, y) is set when its centre lies inside the
// polygon or on its boundary. Vertices outside the image are allowed.
pub fn fill_polygon(width: usize, height: usize, vertices: &[Pixel], value: u8) -> Image {
  let mut image = Image::new(width, height);
  if vertices.len() < 3 || width == 0 { return image }
  let mut crossings: Vec<f64> = vec![];
  for y in 0..height {
    let yf = y as f64;
    crossings.clear();
    for i in 0..vertices.len() {
      let a = vertices[i];
      let b = vertices[(i + 1) % vertices.len()];
      if a[1] == b[1] { continue }
      let (lo, hi) = if a[1] < b[1] { (a, b) } else { (b, a) };
      // Half-open in y so shared vertices are not counted twice. The top row
      // of the polygon is closed so that an apex still gets its pixel.
      if yf < lo[1] as f64 || yf >= hi[1] as f64 { continue }
      let t = (yf - lo[1] as f64) / (hi[1] - lo[1]) as f64;
      crossings.push(lo[0] as f64 + t * (hi[0] - lo[0]) as f64);
    }
    crossings.sort_by(|a, b| a.total_cmp(b));
    for pair in crossings.chunks_exact(2) {
      let x0 = pair[0].ceil().max(0.);
      let x1 = pair[1].floor().min(width as f64 - 1.);
      if x1 < x0 { continue }
      for x in (x0 as usize)..=(x1 as usize) {
        image.set_value(x, y, value);
      }
    }
  }
  image
}

pub fn apply_mask(image: &Image, mask: &Image) -> Image {
  assert_eq!((image.width, image.height), (mask.width, mask.height));
  let mut out = image.clone();
  for (v, m) in out.data.iter_mut().zip(&mask.data) {
    *v &= *m;
  }
  out
}

pub fn region_of_interest(edges: &Image, p: &ParameterSet) -> Image {
  let triangle = region_triangle(edges.height, p);
  let mask = fill_polygon(edges.width, edges.height, &triangle, 255);
  apply_mask(edges, &mask)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn triangle() -> [Pixel; 3] {
    [Pixel::new(0, 10), Pixel::new(10, 10), Pixel::new(5, 0)]
  }

  fn filled_columns(image: &Image, y: usize) -> Vec<usize> {
    (0..image.width).filter(|x| image.value(*x, y) != 0).collect()
  }

  #[test]
  fn test_fill_triangle() {
    let mask = fill_polygon(11, 10, &triangle(), 255);
    assert_eq!(filled_columns(&mask, 0), vec![5]);
    assert_eq!(filled_columns(&mask, 5), vec![3, 4, 5, 6, 7]);
    assert_eq!(filled_columns(&mask, 9), (1..=9).collect::<Vec<_>>());
  }

  #[test]
  fn test_fill_clips_outside_vertices() {
    let vertices = [Pixel::new(-5, -5), Pixel::new(20, -5), Pixel::new(20, 20), Pixel::new(-5, 20)];
    let mask = fill_polygon(4, 3, &vertices, 1);
    assert_eq!(mask.data, vec![1; 12]);
    assert_eq!(fill_polygon(4, 3, &vertices[..2], 1).count_nonzero(), 0);
  }

  #[test]
  fn test_apply_mask() {
    let image = Image::from_data(vec![255, 255, 0, 255], 2, 2).unwrap();
    let mask = Image::from_data(vec![255, 0, 255, 255], 2, 2).unwrap();
    assert_eq!(apply_mask(&image, &mask).data, vec![255, 0, 0, 255]);
  }

  #[test]
  fn test_region_of_interest_uses_frame_height() {
    let mut p = ParameterSet::default();
    p.roi_left_x = 0;
    p.roi_right_x = 10;
    p.roi_apex_x = 5;
    p.roi_apex_y = 0;
    let edges = Image::from_data(vec![255; 11 * 10], 11, 10).unwrap();
    let masked = region_of_interest(&edges, &p);
    assert_eq!(masked, fill_polygon(11, 10, &triangle(), 255));
    assert_eq!(masked.value(0, 0), 0);
    assert_eq!(masked.value(5, 0), 255);
  }
}
