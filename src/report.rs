use crate::all::*;

use serde::Serialize;

#[derive(Serialize)]
pub struct FrameReport {
  pub frame: usize,
  pub segments: usize,
  pub left: Option<[i32; 4]>,
  pub right: Option<[i32; 4]>,
}

impl FrameReport {
  pub fn new(frame: usize, detection: &Detection) -> FrameReport {
    let coordinates = |s: &Segment| [s.x1, s.y1, s.x2, s.y2];
    FrameReport {
      frame,
      segments: detection.segments.len(),
      left: detection.lanes.left.as_ref().map(coordinates),
      right: detection.lanes.right.as_ref().map(coordinates),
    }
  }
}

// Writes one JSON object per line.
pub struct Report<W: Write> {
  writer: W,
}

impl Report<BufWriter<File>> {
  pub fn create(path: &Path) -> Result<Report<BufWriter<File>>> {
    let file = File::create(path)
      .context(format!("Failed to create report file {}.", path.display()))?;
    Ok(Report::new(BufWriter::new(file)))
  }
}

impl<W: Write> Report<W> {
  pub fn new(writer: W) -> Report<W> {
    Report { writer }
  }

  pub fn write(&mut self, report: &FrameReport) -> Result<()> {
    serde_json::to_writer(&mut self.writer, report)
      .context("Failed to serialize frame report.")?;
    self.writer.write_all(b"\n")?;
    Ok(())
  }

  pub fn finish(mut self) -> Result<W> {
    self.writer.flush().context("Failed to flush report.")?;
    Ok(self.writer)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_report_lines() {
    let detection = Detection {
      composite: ColorImage::new(1, 1),
      segments: vec![Segment::new(0, 0, 1, 1), Segment::new(5, 5, 9, 9)],
      lanes: LaneLines {
        left: Some(Segment::new(10, 720, 300, 432)),
        right: None,
      },
    };
    let mut report = Report::new(vec![]);
    report.write(&FrameReport::new(1, &detection)).unwrap();
    report.write(&FrameReport::new(2, &detection)).unwrap();
    let out = String::from_utf8(report.finish().unwrap()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], r#"{"frame":1,"segments":2,"left":[10,720,300,432],"right":null}"#);
    let value: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(value["frame"], 2);
  }
}
