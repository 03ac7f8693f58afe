use crate::all::*;

// Reconstructed end points further out than this come from nearly horizontal
// fits and are dropped.
const MAX_COORDINATE: f64 = (1 << 20) as f64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
  pub x1: i32,
  pub y1: i32,
  pub x2: i32,
  pub y2: i32,
}

impl Segment {
  pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Segment {
    Segment { x1, y1, x2, y2 }
  }

  pub fn start(&self) -> Pixel { Pixel::new(self.x1, self.y1) }
  pub fn end(&self) -> Pixel { Pixel::new(self.x2, self.y2) }
}

// Line `y = slope * x + intercept` in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineFit {
  pub slope: f64,
  pub intercept: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LaneLines {
  pub left: Option<Segment>,
  pub right: Option<Segment>,
}

impl LaneLines {
  pub fn iter(&self) -> impl Iterator<Item = &Segment> {
    self.left.iter().chain(self.right.iter())
  }
}

// Least-squares fit of a degree one polynomial through the points. Returns
// None if the points do not determine a non-vertical line.
pub fn fit_line(points: &[Vector2d]) -> Option<LineFit> {
  if points.is_empty() { return None }
  let mean = points.iter().sum::<Vector2d>() / points.len() as f64;
  let mut sxx = 0.;
  let mut sxy = 0.;
  for p in points {
    let d = p - mean;
    sxx += d[0] * d[0];
    sxy += d[0] * d[1];
  }
  if sxx == 0. { return None }
  let slope = sxy / sxx;
  let intercept = mean[1] - slope * mean[0];
  if !slope.is_finite() || !intercept.is_finite() { return None }
  Some(LineFit { slope, intercept })
}

impl LineFit {
  pub fn from_segment(s: &Segment) -> Option<LineFit> {
    // Vertical segments are skipped. A minimum-norm polyfit would instead give
    // them a small finite slope and count them on the right side.
    if s.x1 == s.x2 { return None }
    fit_line(&[
      Vector2d::new(s.x1 as f64, s.y1 as f64),
      Vector2d::new(s.x2 as f64, s.y2 as f64),
    ])
  }

  fn average(fits: &[LineFit]) -> Option<LineFit> {
    if fits.is_empty() { return None }
    let n = fits.len() as f64;
    Some(LineFit {
      slope: fits.iter().map(|f| f.slope).sum::<f64>() / n,
      intercept: fits.iter().map(|f| f.intercept).sum::<f64>() / n,
    })
  }
}

// Lane line spanning from the bottom row of the frame up to `top_ratio` of its
// height. Horizontal fits cannot be inverted to `x = (y - b) / m`.
pub fn make_coordinates(height: usize, fit: &LineFit, top_ratio: f64) -> Option<Segment> {
  if fit.slope == 0. || !fit.slope.is_finite() || !fit.intercept.is_finite() { return None }
  let y1 = height as f64;
  let y2 = (y1 * top_ratio).trunc();
  let x1 = ((y1 - fit.intercept) / fit.slope).trunc();
  let x2 = ((y2 - fit.intercept) / fit.slope).trunc();
  if x1.abs() > MAX_COORDINATE || x2.abs() > MAX_COORDINATE { return None }
  Some(Segment::new(x1 as i32, y1 as i32, x2 as i32, y2 as i32))
}

// Splits the segments into left (negative slope) and right lane candidates
// and averages each side into one line.
pub fn average_slope_intercept(height: usize, segments: &[Segment], top_ratio: f64) -> LaneLines {
  let mut left_fit = vec![];
  let mut right_fit = vec![];
  for segment in segments {
    let fit = match LineFit::from_segment(segment) {
      Some(fit) => fit,
      None => continue,
    };
    if fit.slope < 0. {
      left_fit.push(fit);
    }
    else {
      right_fit.push(fit);
    }
  }

  let side = |fits: &[LineFit], name: &str| -> Option<Segment> {
    let line = LineFit::average(fits).and_then(|fit| make_coordinates(height, &fit, top_ratio));
    if line.is_none() {
      debug!("No {} lane line from {} segment(s).", name, fits.len());
    }
    line
  };
  LaneLines {
    left: side(&left_fit, "left"),
    right: side(&right_fit, "right"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
  }

  #[test]
  fn test_fit_two_points() {
    let fit = LineFit::from_segment(&Segment::new(0, 10, 10, 30)).unwrap();
    assert_close(fit.slope, 2.);
    assert_close(fit.intercept, 10.);
    assert!(LineFit::from_segment(&Segment::new(4, 0, 4, 100)).is_none());
  }

  #[test]
  fn test_fit_many_points() {
    let points: Vec<Vector2d> = (0..10)
      .map(|x| Vector2d::new(x as f64, -0.5 * x as f64 + 3.))
      .collect();
    let fit = fit_line(&points).unwrap();
    assert_close(fit.slope, -0.5);
    assert_close(fit.intercept, 3.);
    assert!(fit_line(&points[..1]).is_none());
  }

  #[test]
  fn test_make_coordinates() {
    let fit = LineFit { slope: -1., intercept: 1000. };
    let s = make_coordinates(720, &fit, 0.6).unwrap();
    assert_eq!(s, Segment::new(280, 720, 568, 432));
    // Truncation toward zero.
    let fit = LineFit { slope: 3., intercept: 0. };
    assert_eq!(make_coordinates(10, &fit, 0.6).unwrap(), Segment::new(3, 10, 2, 6));
    assert!(make_coordinates(720, &LineFit { slope: 0., intercept: 5. }, 0.6).is_none());
    assert!(make_coordinates(720, &LineFit { slope: f64::NAN, intercept: 5. }, 0.6).is_none());
    assert!(make_coordinates(720, &LineFit { slope: 1e-9, intercept: 5. }, 0.6).is_none());
  }

  #[test]
  fn test_average_slope_intercept() {
    let segments = [
      // Left side: slopes -1 and -2, intercepts 700 and 900.
      Segment::new(100, 600, 200, 500),
      Segment::new(200, 500, 250, 400),
      // Right side: slope 1, intercept -300.
      Segment::new(700, 400, 800, 500),
      // Vertical, ignored.
      Segment::new(640, 300, 640, 700),
    ];
    let lanes = average_slope_intercept(720, &segments, 0.6);
    // Left average: slope -1.5, intercept 800.
    assert_eq!(lanes.left, Some(Segment::new(53, 720, 245, 432)));
    assert_eq!(lanes.right, Some(Segment::new(1020, 720, 732, 432)));
    assert_eq!(lanes.iter().count(), 2);
  }

  #[test]
  fn test_missing_side() {
    let segments = [Segment::new(700, 400, 800, 500)];
    let lanes = average_slope_intercept(720, &segments, 0.6);
    assert_eq!(lanes.left, None);
    assert!(lanes.right.is_some());
    assert_eq!(lanes.iter().count(), 1);

    assert_eq!(average_slope_intercept(720, &[], 0.6), LaneLines::default());
  }

  #[test]
  fn test_horizontal_segments_go_right_and_are_dropped() {
    // A zero slope is not negative, so it lands on the right side, where the
    // average cannot be turned back into coordinates.
    let segments = [Segment::new(100, 500, 300, 500)];
    let lanes = average_slope_intercept(720, &segments, 0.6);
    assert_eq!(lanes, LaneLines::default());
  }
}
