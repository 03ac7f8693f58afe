use crate::all::*;

pub struct LaneDetector {
  p: ParameterSet,
  hough: Hough,
  segments: Vec<Segment>,
}

// Result of processing one frame.
pub struct Detection {
  pub composite: ColorImage,
  pub segments: Vec<Segment>,
  pub lanes: LaneLines,
}

impl LaneDetector {
  pub fn new() -> Result<LaneDetector> {
    let p = PARAMETER_SET.lock().unwrap().clone();
    LaneDetector::with_parameters(p)
  }

  pub fn with_parameters(p: ParameterSet) -> Result<LaneDetector> {
    p.validate()?;
    Ok(LaneDetector {
      hough: Hough::new(HoughParameters::new(&p)),
      segments: vec![],
      p,
    })
  }

  pub fn process(&mut self, frame: &ColorImage) -> Detection {
    let edges = edge_map(frame, &self.p);
    let masked_edges = region_of_interest(&edges, &self.p);
    self.hough.process(&masked_edges, &mut self.segments);
    let lanes = average_slope_intercept(frame.height, &self.segments, self.p.lane_top_ratio);
    let line_image = display_lines(frame.width, frame.height, &lanes, self.p.line_thickness);
    let composite = add_weighted(frame, self.p.frame_weight, &line_image, self.p.line_weight, self.p.blend_gamma);

    if self.p.show_edges || self.p.show_roi || self.p.show_segments {
      let mut d = DEBUG_DATA.lock().unwrap();
      d.masked_edges = if self.p.show_edges { Some(masked_edges) } else { None };
      d.region = region_triangle(frame.height, &self.p).to_vec();
      d.segments.clone_from(&self.segments);
    }

    Detection {
      composite,
      segments: self.segments.clone(),
      lanes,
    }
  }
}

// Frame source, detector and optional report driven one frame at a time,
// either by the window event loop or headless.
pub struct Session {
  pub input: VideoInput,
  pub detector: LaneDetector,
  pub report: Option<Report<BufWriter<File>>>,
  pub max_frames: Option<usize>,
}

impl Session {
  // End of input is signaled by `Result::Ok(Option::None)`.
  pub fn step(&mut self) -> Result<Option<Detection>> {
    if let Some(max_frames) = self.max_frames {
      if self.input.frame_number() >= max_frames { return Ok(None) }
    }
    let frame = match self.input.read()? {
      Some(frame) => frame,
      None => return Ok(None),
    };
    let detection = self.detector.process(frame);
    let frame_number = self.input.frame_number();
    debug!("Frame {}: {} segment(s), left {:?}, right {:?}.",
      frame_number, detection.segments.len(), detection.lanes.left, detection.lanes.right);
    if let Some(report) = &mut self.report {
      report.write(&FrameReport::new(frame_number, &detection))?;
    }
    Ok(Some(detection))
  }

  pub fn finish(self) -> Result<()> {
    info!("Processed {} frame(s).", self.input.frame_number());
    if let Some(report) = self.report {
      report.finish()?;
    }
    Ok(())
  }
}
