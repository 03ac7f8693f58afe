// Progressive probabilistic Hough transform:
// “Robust Detection of Lines Using the Progressive Probabilistic Hough Transform”
// by J. Matas, C. Galambos and J. Kittler.
//
// Edge points are visited in random order and vote one at a time. When a bin
// reaches the threshold the line is walked from the voting point and the
// pixels on it are consumed, so every edge pixel ends up in at most one
// segment.

use crate::all::*;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;

// Fixed point precision of the line walk along the minor axis.
const SHIFT: i64 = 16;

pub struct HoughParameters {
  pub rho: f64,
  // Radians.
  pub theta: f64,
  pub threshold: usize,
  pub min_line_length: i32,
  pub max_line_gap: i32,
  pub seed: u64,
}

impl HoughParameters {
  pub fn new(p: &ParameterSet) -> HoughParameters {
    HoughParameters {
      rho: p.hough_rho,
      theta: p.hough_theta.to_radians(),
      threshold: p.hough_threshold,
      min_line_length: p.hough_min_line_length,
      max_line_gap: p.hough_max_line_gap,
      seed: p.hough_seed,
    }
  }
}

pub struct Hough {
  params: HoughParameters,
  // Workspace, reused between frames of the same size.
  accumulator: Vec<i32>,
  available: Vec<bool>,
  points: Vec<[i32; 2]>,
}

// One step of the line walk, in both axes. The minor axis is in fixed point.
struct Walk {
  x: i64,
  y: i64,
  dx: i64,
  dy: i64,
  x_major: bool,
}

impl Walk {
  fn pixel(&self) -> [i32; 2] {
    if self.x_major { [self.x as i32, (self.y >> SHIFT) as i32] }
    else { [(self.x >> SHIFT) as i32, self.y as i32] }
  }

  fn advance(&mut self) {
    self.x += self.dx;
    self.y += self.dy;
  }
}

impl Hough {
  pub fn new(params: HoughParameters) -> Hough {
    Hough {
      params,
      accumulator: vec![],
      available: vec![],
      points: vec![],
    }
  }

  pub fn process(&mut self, edges: &Image, segments: &mut Vec<Segment>) {
    segments.clear();
    let w = edges.width;
    let h = edges.height;
    if w == 0 || h == 0 { return }

    let angle_count = ((std::f64::consts::PI / self.params.theta).round() as usize).max(1);
    let rho_count = ((((w + h) * 2 + 1) as f64 / self.params.rho).round() as usize).max(1);
    let rho_offset = (rho_count as i64 - 1) / 2;
    let trig: Vec<(f64, f64)> = (0..angle_count)
      .map(|n| {
        let angle = n as f64 * self.params.theta;
        (angle.cos() / self.params.rho, angle.sin() / self.params.rho)
      })
      .collect();
    let bin = |n: usize, x: i32, y: i32| -> usize {
      let r = (x as f64 * trig[n].0 + y as f64 * trig[n].1).round() as i64 + rho_offset;
      // Only reachable with a rho resolution coarser than the image.
      let r = r.clamp(0, rho_count as i64 - 1);
      n * rho_count + r as usize
    };

    self.accumulator.clear();
    self.accumulator.resize(angle_count * rho_count, 0);
    self.available.clear();
    self.available.extend(edges.data.iter().map(|v| *v != 0));
    self.points.clear();
    for y in 0..h {
      for x in 0..w {
        if edges.value(x, y) != 0 { self.points.push([x as i32, y as i32]) }
      }
    }
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.params.seed);
    self.points.shuffle(&mut rng);

    for point_ind in 0..self.points.len() {
      let [x, y] = self.points[point_ind];
      if !self.available[y as usize * w + x as usize] { continue }

      let mut max_votes = self.params.threshold as i32 - 1;
      let mut max_n = 0;
      for n in 0..angle_count {
        let i = bin(n, x, y);
        self.accumulator[i] += 1;
        if self.accumulator[i] > max_votes {
          max_votes = self.accumulator[i];
          max_n = n;
        }
      }
      if max_votes < self.params.threshold as i32 { continue }

      let walk = self.line_walk(x, y, trig[max_n]);
      let mut ends = [[x, y]; 2];
      for (k, end) in ends.iter_mut().enumerate() {
        let mut walk = walk.reversed(k > 0);
        let mut gap = 0;
        loop {
          let [px, py] = walk.pixel();
          if !edges.contains(px, py) { break }
          if self.available[py as usize * w + px as usize] {
            gap = 0;
            *end = [px, py];
          }
          else {
            gap += 1;
            if gap > self.params.max_line_gap { break }
          }
          walk.advance();
        }
      }

      let good_line = (ends[1][0] - ends[0][0]).abs() >= self.params.min_line_length
        || (ends[1][1] - ends[0][1]).abs() >= self.params.min_line_length;

      for (k, end) in ends.iter().enumerate() {
        let mut walk = walk.reversed(k > 0);
        loop {
          let [px, py] = walk.pixel();
          if !edges.contains(px, py) { break }
          let i = py as usize * w + px as usize;
          if self.available[i] {
            if good_line {
              for n in 0..angle_count {
                self.accumulator[bin(n, px, py)] -= 1;
              }
            }
            self.available[i] = false;
          }
          if [px, py] == *end { break }
          walk.advance();
        }
      }

      if good_line {
        segments.push(Segment::new(ends[0][0], ends[0][1], ends[1][0], ends[1][1]));
      }
    }
  }

  fn line_walk(&self, x: i32, y: i32, (cos, sin): (f64, f64)) -> Walk {
    // Direction along the line, perpendicular to the normal (cos, sin).
    let a = -sin;
    let b = cos;
    let half = 1 << (SHIFT - 1);
    if a.abs() > b.abs() {
      Walk {
        x: x as i64,
        y: ((y as i64) << SHIFT) + half,
        dx: if a > 0. { 1 } else { -1 },
        dy: (b * (1 << SHIFT) as f64 / a.abs()).round() as i64,
        x_major: true,
      }
    }
    else {
      Walk {
        x: ((x as i64) << SHIFT) + half,
        y: y as i64,
        dx: (a * (1 << SHIFT) as f64 / b.abs()).round() as i64,
        dy: if b > 0. { 1 } else { -1 },
        x_major: false,
      }
    }
  }
}

impl Walk {
  fn reversed(&self, reverse: bool) -> Walk {
    let sign = if reverse { -1 } else { 1 };
    Walk {
      x: self.x,
      y: self.y,
      dx: sign * self.dx,
      dy: sign * self.dy,
      x_major: self.x_major,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parameters(threshold: usize, min_line_length: i32) -> HoughParameters {
    HoughParameters {
      rho: 2.,
      theta: 1f64.to_radians(),
      threshold,
      min_line_length,
      max_line_gap: 5,
      seed: 0,
    }
  }

  fn horizontal_line(width: usize, height: usize, y: usize, x0: usize, x1: usize) -> Image {
    let mut image = Image::new(width, height);
    for x in x0..x1 { image.set_value(x, y, 255) }
    image
  }

  #[test]
  fn test_empty_image() {
    let mut hough = Hough::new(parameters(10, 20));
    let mut segments = vec![Segment::new(0, 0, 1, 1)];
    hough.process(&Image::new(50, 40), &mut segments);
    assert!(segments.is_empty());
  }

  #[test]
  fn test_horizontal_line() {
    let image = horizontal_line(120, 100, 50, 10, 110);
    let mut hough = Hough::new(parameters(10, 20));
    let mut segments = vec![];
    hough.process(&image, &mut segments);
    assert!(!segments.is_empty());
    for s in &segments {
      // End points are always edge pixels.
      assert_eq!((s.y1, s.y2), (50, 50));
      assert!(s.x1 >= 10 && s.x1 < 110 && s.x2 >= 10 && s.x2 < 110);
      assert!((s.x2 - s.x1).abs() >= 20);
    }
  }

  #[test]
  fn test_short_line_is_rejected() {
    let image = horizontal_line(120, 100, 50, 10, 25);
    let mut hough = Hough::new(parameters(5, 20));
    let mut segments = vec![];
    hough.process(&image, &mut segments);
    assert!(segments.is_empty());
  }

  #[test]
  fn test_below_threshold() {
    let image = horizontal_line(120, 100, 50, 10, 110);
    let mut hough = Hough::new(parameters(101, 20));
    let mut segments = vec![];
    hough.process(&image, &mut segments);
    assert!(segments.is_empty());
  }

  #[test]
  fn test_coarse_rho_keeps_one_bin() {
    let image = horizontal_line(120, 100, 50, 10, 110);
    for rho in [300., 1000., 20000.] {
      let mut p = parameters(10, 20);
      p.rho = rho;
      let mut hough = Hough::new(p);
      let mut segments = vec![];
      hough.process(&image, &mut segments);
      for s in &segments {
        assert_eq!((s.y1, s.y2), (50, 50));
      }
    }
  }

  #[test]
  fn test_seeded_order_is_deterministic() {
    let mut image = horizontal_line(120, 100, 50, 10, 110);
    for y in 10..90 { image.set_value(60, y, 255) }
    let mut a = vec![];
    let mut b = vec![];
    Hough::new(parameters(10, 20)).process(&image, &mut a);
    Hough::new(parameters(10, 20)).process(&image, &mut b);
    assert_eq!(a, b);
  }

  #[test]
  fn test_walk_direction() {
    let hough = Hough::new(parameters(10, 20));
    // Normal pointing along y: the line runs along x.
    let walk = hough.line_walk(5, 7, (0., 0.5));
    assert!(walk.x_major);
    assert_eq!(walk.dx, -1);
    assert_eq!(walk.dy, 0);
    assert_eq!(walk.pixel(), [5, 7]);
    let walk = hough.line_walk(5, 7, (0.5, 0.));
    assert!(!walk.x_major);
    assert_eq!((walk.dx, walk.dy), (0, 1));
    assert_eq!(walk.reversed(true).dy, -1);
  }
}
