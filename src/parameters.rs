use crate::all::*;

lazy_static! {
  pub static ref PARAMETER_SET: Mutex<ParameterSet> = Mutex::new(ParameterSet::default());
}

#[derive(Clone, Debug)]
#[derive(clap::Parser)]
pub struct ParameterSet {
  // Edge map.
  #[clap(long, default_value = "5")]
  pub blur_kernel_size: usize,
  // Zero derives sigma from the kernel size.
  #[clap(long, default_value = "0")]
  pub blur_sigma: f64,
  #[clap(long, default_value = "50")]
  pub canny_low: f64,
  #[clap(long, default_value = "150")]
  pub canny_high: f64,

  // Region of interest triangle. The two bottom vertices sit on the bottom row.
  #[clap(long, default_value = "200")]
  pub roi_left_x: i32,
  #[clap(long, default_value = "1100")]
  pub roi_right_x: i32,
  #[clap(long, default_value = "550")]
  pub roi_apex_x: i32,
  #[clap(long, default_value = "250")]
  pub roi_apex_y: i32,

  // Probabilistic Hough transform.
  #[clap(long, default_value = "2")]
  pub hough_rho: f64,
  // Degrees.
  #[clap(long, default_value = "1")]
  pub hough_theta: f64,
  #[clap(long, default_value = "100")]
  pub hough_threshold: usize,
  #[clap(long, default_value = "40")]
  pub hough_min_line_length: i32,
  #[clap(long, default_value = "5")]
  pub hough_max_line_gap: i32,
  #[clap(long, default_value = "0")]
  pub hough_seed: u64,

  // Lane line reconstruction: the lines span from the bottom row up to
  // this fraction of the frame height.
  #[clap(long, default_value = "0.6")]
  pub lane_top_ratio: f64,

  // Rendering.
  #[clap(long, default_value = "5")]
  pub line_thickness: i32,
  #[clap(long, default_value = "0.65")]
  pub frame_weight: f64,
  #[clap(long, default_value = "1")]
  pub line_weight: f64,
  #[clap(long, default_value = "1")]
  pub blend_gamma: f64,

  // Visualizations.
  #[clap(long)]
  pub show_edges: bool,
  #[clap(long)]
  pub show_roi: bool,
  #[clap(long)]
  pub show_segments: bool,
}

impl Default for ParameterSet {
  fn default() -> ParameterSet {
    // Derived `Default` would zero everything, use the clap defaults instead.
    <ParameterSet as clap::Parser>::parse_from(["lanes"])
  }
}

impl ParameterSet {
  pub fn validate(&self) -> Result<()> {
    if self.blur_kernel_size % 2 != 1 {
      bail!("Blur kernel size must be an odd number.");
    }
    if self.canny_low > self.canny_high {
      bail!("Canny low threshold must not exceed the high threshold.");
    }
    if self.hough_rho <= 0. || self.hough_theta <= 0. {
      bail!("Hough resolutions must be positive.");
    }
    if self.hough_threshold == 0 {
      bail!("Hough threshold must be at least 1.");
    }
    if !(0. ..1.).contains(&self.lane_top_ratio) {
      bail!("Lane top ratio must be in [0, 1).");
    }
    if self.line_thickness < 1 {
      bail!("Line thickness must be at least 1.");
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_match_command_line_defaults() {
    let p = ParameterSet::default();
    assert_eq!(p.blur_kernel_size, 5);
    assert_eq!(p.canny_low, 50.);
    assert_eq!(p.canny_high, 150.);
    assert_eq!((p.roi_left_x, p.roi_right_x, p.roi_apex_x, p.roi_apex_y), (200, 1100, 550, 250));
    assert_eq!(p.hough_threshold, 100);
    assert_eq!(p.hough_min_line_length, 40);
    assert_eq!(p.hough_max_line_gap, 5);
    assert_eq!(p.frame_weight, 0.65);
    assert!(!p.show_edges);
    p.validate().unwrap();
  }

  #[test]
  fn test_validate() {
    let mut p = ParameterSet::default();
    p.blur_kernel_size = 4;
    assert!(p.validate().is_err());

    let mut p = ParameterSet::default();
    p.canny_low = 200.;
    assert!(p.validate().is_err());

    let mut p = ParameterSet::default();
    p.lane_top_ratio = 1.;
    assert!(p.validate().is_err());
  }
}
