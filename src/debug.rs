use crate::all::*;

lazy_static! {
  pub static ref DEBUG_DATA: Mutex<DebugData> = Mutex::new(DebugData::default());
}

// Intermediate results of the last processed frame, for visualization.
#[derive(Default)]
pub struct DebugData {
  pub masked_edges: Option<Image>,
  pub region: Vec<Pixel>,
  pub segments: Vec<Segment>,
}
