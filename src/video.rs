use crate::all::*;

use serde::Deserialize;
use std::process::{Child, Command, Stdio};

#[derive(Deserialize)]
struct ProbeStream {
  width: usize,
  height: usize,
}

#[derive(Deserialize)]
struct ProbeOutput {
  #[serde(default)]
  streams: Vec<ProbeStream>,
}

pub fn parse_probe_output(s: &str) -> Result<(usize, usize)> {
  let output: ProbeOutput = serde_json::from_str(s)
    .context("Failed to parse ffprobe output.")?;
  let stream = output.streams.first()
    .ok_or(anyhow!("Input has no video stream."))?;
  if stream.width == 0 || stream.height == 0 {
    bail!("Video stream has invalid dimensions {}x{}.", stream.width, stream.height);
  }
  Ok((stream.width, stream.height))
}

fn probe_dimensions(path: &str) -> Result<(usize, usize)> {
  let output = Command::new("ffprobe")
    .args([
      "-v", "error",
      "-select_streams", "v:0",
      "-show_entries", "stream=width,height",
      "-of", "json",
      path,
    ])
    .stderr(Stdio::inherit())
    .output()
    .context("Failed to run ffprobe. Is FFmpeg installed?")?;
  if !output.status.success() {
    bail!("ffprobe failed for {}.", path);
  }
  parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

// Fills `buf` unless the stream ends first. Returns the number of bytes read.
fn read_frame_bytes<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
  let mut n = 0;
  while n < buf.len() {
    match reader.read(&mut buf[n..]) {
      Ok(0) => break,
      Ok(k) => n += k,
      Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {},
      Err(err) => return Err(err).context("Reading bytes from video input failed."),
    }
  }
  Ok(n)
}

// Arguments decoding `path` to raw RGB frames on stdout. Autorotation is off
// so that frames keep the stored dimensions of the stream.
pub fn ffmpeg_args(path: &str) -> Vec<&str> {
  vec![
    "-v", "error",
    "-noautorotate",
    "-i", path,
    "-f", "rawvideo",
    "-vcodec", "rawvideo",
    "-vsync", "vfr",
    "-pix_fmt", "rgb24",
    "-",
  ]
}

// Decodes any input FFmpeg understands, including still images, into RGB
// frames read from the stdout of a child process.
pub struct VideoInput {
  // None when frames come from an in-memory reader.
  child: Option<Child>,
  reader: Box<dyn Read>,
  video_frame: ColorImage,
  frame_number: usize,
}

impl VideoInput {
  pub fn new(path: &Path) -> Result<VideoInput> {
    if !path.exists() {
      bail!("Input file {} does not exist.", path.display());
    }
    let path = path.to_str().ok_or(anyhow!("Failed to parse video path."))?;
    let (width, height) = probe_dimensions(path)?;
    info!("Input {} is {}x{}.", path, width, height);
    let mut child = Command::new("ffmpeg")
      .args(ffmpeg_args(path))
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .spawn()
      .context("Failed to run ffmpeg. Is FFmpeg installed?")?;
    let child_stdout = child.stdout.take()
      .ok_or(anyhow!("ffmpeg stdout is not captured."))?;
    let mut input = VideoInput::from_reader(Box::new(child_stdout), width, height);
    input.child = Some(child);
    Ok(input)
  }

  // Raw rgb24 frames of the given size, back to back.
  pub fn from_reader(reader: Box<dyn Read>, width: usize, height: usize) -> VideoInput {
    VideoInput {
      child: None,
      reader,
      video_frame: ColorImage::new(width, height),
      frame_number: 0,
    }
  }

  pub fn width(&self) -> usize { self.video_frame.width }
  pub fn height(&self) -> usize { self.video_frame.height }
  pub fn frame_number(&self) -> usize { self.frame_number }

  // End of data is signaled by `Result::Ok(Option::None)`.
  pub fn read(&mut self) -> Result<Option<&ColorImage>> {
    let n = read_frame_bytes(&mut self.reader, &mut self.video_frame.data)?;
    if n == 0 {
      return Ok(None);
    }
    if n < self.video_frame.data.len() {
      bail!("Video input ended in the middle of frame {} ({} of {} bytes).",
        self.frame_number, n, self.video_frame.data.len());
    }
    self.frame_number += 1;
    Ok(Some(&self.video_frame))
  }
}

impl Drop for VideoInput {
  fn drop(&mut self) {
    // ffmpeg may still be decoding if we quit early.
    if let Some(child) = &mut self.child {
      let _ = child.kill();
      let _ = child.wait();
    }
  }
}
