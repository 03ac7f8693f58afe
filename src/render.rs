use crate::all::*;

pub const LANE_COLOR: Color = [0, 255, 127];

// Filled disc used as the brush for thick lines.
fn draw_disc(image: &mut ColorImage, center: Pixel, r: i32, color: Color) {
  for dy in -r..=r {
    for dx in -r..=r {
      if dx * dx + dy * dy > r * r { continue }
      image.set_pixel_i32(center[0] + dx, center[1] + dy, color);
    }
  }
}

// Steps one pixel at a time along the major axis. Only the part of the line
// whose major coordinate lies in `[lo, hi]` is generated.
pub fn line_pixels(mut p0: Pixel, mut p1: Pixel, lo: Pixel, hi: Pixel) -> Vec<Pixel> {
  let dx = p1[0] - p0[0];
  let dy = p1[1] - p0[1];
  let mut pixels = vec![];
  if dx == 0 && dy == 0 {
    pixels.push(p0);
  }
  else if dx.abs() < dy.abs() {
    if p0[1] > p1[1] { (p0, p1) = (p1, p0); }
    let k = dx as f64 / dy as f64;
    for y in p0[1].max(lo[1]) ..= p1[1].min(hi[1]) {
      let x = p0[0] + (k * (y - p0[1]) as f64).round() as i32;
      pixels.push(Pixel::new(x, y));
    }
  }
  else {
    if p0[0] > p1[0] { (p0, p1) = (p1, p0); }
    let k = dy as f64 / dx as f64;
    for x in p0[0].max(lo[0]) ..= p1[0].min(hi[0]) {
      let y = p0[1] + (k * (x - p0[0]) as f64).round() as i32;
      pixels.push(Pixel::new(x, y));
    }
  }
  pixels
}

pub fn draw_line(image: &mut ColorImage, segment: &Segment, color: Color, thickness: i32) {
  let r = (thickness - 1) / 2;
  let lo = Pixel::new(-r, -r);
  let hi = Pixel::new(image.width as i32 + r, image.height as i32 + r);
  for p in line_pixels(segment.start(), segment.end(), lo, hi) {
    if r == 0 {
      image.set_pixel_i32(p[0], p[1], color);
    }
    else {
      draw_disc(image, p, r, color);
    }
  }
}

// Lane lines on a black canvas of the frame size.
pub fn display_lines(width: usize, height: usize, lines: &LaneLines, thickness: i32) -> ColorImage {
  let mut image = ColorImage::new(width, height);
  for line in lines.iter() {
    draw_line(&mut image, line, LANE_COLOR, thickness);
  }
  image
}

// Per channel `saturate(a * alpha + b * beta + gamma)`.
pub fn add_weighted(a: &ColorImage, alpha: f64, b: &ColorImage, beta: f64, gamma: f64) -> ColorImage {
  assert_eq!((a.width, a.height), (b.width, b.height));
  let mut out = ColorImage::new(a.width, a.height);
  for ((o, x), y) in out.data.iter_mut().zip(&a.data).zip(&b.data) {
    let v = *x as f64 * alpha + *y as f64 * beta + gamma;
    *o = v.round().clamp(0., 255.) as u8;
  }
  out
}
