// Grayscale conversion, Gaussian blur and Canny edge detection.
//
// Canny follows the usual recipe: Sobel gradients, non-maximum suppression
// along the gradient direction, double threshold and hysteresis. The gradient
// magnitude is the L1 norm |gx| + |gy|.

use crate::all::*;

// tan(22.5°) and tan(67.5°), bounds of the quantized gradient directions.
const TAN_22_5: f64 = 0.414_213_562_373_095;
const TAN_67_5: f64 = 2.414_213_562_373_095;

pub fn to_grayscale(frame: &ColorImage) -> Image {
  let mut gray = Image::new(frame.width, frame.height);
  for (out, rgb) in gray.data.iter_mut().zip(frame.data.chunks_exact(3)) {
    let v = 0.299 * rgb[0] as f64 + 0.587 * rgb[1] as f64 + 0.114 * rgb[2] as f64;
    *out = v.round().min(255.) as u8;
  }
  gray
}

pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
  // Binomial kernels for the small sizes when sigma is not given.
  if sigma <= 0. {
    match size {
      1 => return vec![1.],
      3 => return vec![0.25, 0.5, 0.25],
      5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
      7 => return vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
      _ => {},
    }
  }
  let sigma = if sigma > 0. { sigma } else { 0.3 * ((size as f64 - 1.) * 0.5 - 1.) + 0.8 };
  let c = (size as f64 - 1.) / 2.;
  let mut kernel: Vec<f64> = (0..size)
    .map(|i| (-(i as f64 - c).powi(2) / (2. * sigma * sigma)).exp())
    .collect();
  let sum: f64 = kernel.iter().sum();
  for k in &mut kernel { *k /= sum }
  kernel
}

// Reflect-101 border handling: `gfedcb|abcdefgh|gfedcba`.
#[inline(always)]
fn reflect(i: i64, n: usize) -> usize {
  if n == 1 { return 0 }
  let n = n as i64;
  let mut i = i;
  loop {
    if i < 0 { i = -i }
    else if i >= n { i = 2 * (n - 1) - i }
    else { return i as usize }
  }
}

pub fn gaussian_blur(image: &Image, size: usize, sigma: f64) -> Image {
  let w = image.width;
  let h = image.height;
  if w == 0 || h == 0 { return image.clone() }
  let kernel = gaussian_kernel(size, sigma);
  let r = (size / 2) as i64;

  let mut tmp = vec![0f64; w * h];
  for y in 0..h {
    let row = &image[y];
    for x in 0..w {
      let mut s = 0.;
      for (k, weight) in kernel.iter().enumerate() {
        s += weight * row[reflect(x as i64 + k as i64 - r, w)] as f64;
      }
      tmp[y * w + x] = s;
    }
  }

  let mut out = Image::new(w, h);
  for y in 0..h {
    for x in 0..w {
      let mut s = 0.;
      for (k, weight) in kernel.iter().enumerate() {
        s += weight * tmp[reflect(y as i64 + k as i64 - r, h) * w + x];
      }
      out.set_value(x, y, s.round().clamp(0., 255.) as u8);
    }
  }
  out
}

pub struct Gradient {
  pub gx: Vec<i32>,
  pub gy: Vec<i32>,
}

// 3x3 Sobel with replicated borders.
pub fn sobel(image: &Image) -> Gradient {
  let w = image.width;
  let h = image.height;
  let mut gx = vec![0; w * h];
  let mut gy = vec![0; w * h];
  let at = |x: i64, y: i64| -> i32 {
    let x = x.clamp(0, w as i64 - 1) as usize;
    let y = y.clamp(0, h as i64 - 1) as usize;
    image.value(x, y) as i32
  };
  for y in 0..h as i64 {
    for x in 0..w as i64 {
      let i = y as usize * w + x as usize;
      gx[i] = at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1)
        - at(x - 1, y - 1) - 2 * at(x - 1, y) - at(x - 1, y + 1);
      gy[i] = at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1)
        - at(x - 1, y - 1) - 2 * at(x, y - 1) - at(x + 1, y - 1);
    }
  }
  Gradient { gx, gy }
}

#[derive(Clone, Copy, PartialEq)]
enum EdgeClass {
  None,
  Weak,
  Strong,
}

pub fn canny(image: &Image, low: f64, high: f64) -> Image {
  let w = image.width;
  let h = image.height;
  let mut edges = Image::new(w, h);
  if w < 3 || h < 3 { return edges }

  let g = sobel(image);
  let magnitude: Vec<f64> = g.gx.iter().zip(&g.gy)
    .map(|(dx, dy)| (dx.abs() + dy.abs()) as f64)
    .collect();

  let mut class = vec![EdgeClass::None; w * h];
  for y in 1..(h - 1) {
    for x in 1..(w - 1) {
      let i = y * w + x;
      let m = magnitude[i];
      if m <= low { continue }
      let dx = g.gx[i] as f64;
      let dy = g.gy[i] as f64;
      let ax = dx.abs();
      let ay = dy.abs();
      let is_max = if ay < ax * TAN_22_5 {
        m > magnitude[i - 1] && m >= magnitude[i + 1]
      }
      else if ay > ax * TAN_67_5 {
        m > magnitude[i - w] && m >= magnitude[i + w]
      }
      else {
        // Diagonal neighbours along the gradient, direction depends on whether
        // the gradient components share a sign.
        let s: i64 = if (dx < 0.) != (dy < 0.) { -1 } else { 1 };
        let prev = ((y - 1) * w) as i64 + x as i64 - s;
        let next = ((y + 1) * w) as i64 + x as i64 + s;
        m > magnitude[prev as usize] && m > magnitude[next as usize]
      };
      if !is_max { continue }
      class[i] = if m > high { EdgeClass::Strong } else { EdgeClass::Weak };
    }
  }

  // Hysteresis: grow strong pixels through 8-connected weak ones.
  let mut stack: Vec<usize> = vec![];
  for (i, c) in class.iter().enumerate() {
    if *c == EdgeClass::Strong { stack.push(i) }
  }
  while let Some(i) = stack.pop() {
    if edges.data[i] != 0 { continue }
    edges.data[i] = 255;
    let x = (i % w) as i64;
    let y = (i / w) as i64;
    for ny in (y - 1)..=(y + 1) {
      for nx in (x - 1)..=(x + 1) {
        if !edges.contains(nx as i32, ny as i32) { continue }
        let j = ny as usize * w + nx as usize;
        if class[j] != EdgeClass::None && edges.data[j] == 0 {
          stack.push(j);
        }
      }
    }
  }
  edges
}

pub fn edge_map(frame: &ColorImage, p: &ParameterSet) -> Image {
  let gray = to_grayscale(frame);
  let blurred = gaussian_blur(&gray, p.blur_kernel_size, p.blur_sigma);
  canny(&blurred, p.canny_low, p.canny_high)
}
