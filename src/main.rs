mod all;
mod debug;
mod edges;
mod event_loop;
mod hough;
mod image;
mod lane;
mod parameters;
mod pipeline;
mod region;
mod render;
mod report;
mod types;
mod util;
mod video;
mod visualize;

use all::*;

#[macro_use] extern crate lazy_static;
use clap::Parser;

use softbuffer::GraphicsContext;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit::platform::run_return::EventLoopExtRunReturn;

#[derive(Parser)]
#[clap(about = "Detect lane lines in road video.")]
struct Args {
  /// Video or image file, anything FFmpeg can decode.
  #[clap(short, long, default_value = "test2.mp4")]
  input: PathBuf,
  /// Process frames without opening a window.
  #[clap(long)]
  headless: bool,
  /// Keep the window open on the last frame when the input ends.
  #[clap(long)]
  hold: bool,
  /// Write per-frame lane lines as JSON lines.
  #[clap(long)]
  report: Option<PathBuf>,
  #[clap(long)]
  max_frames: Option<usize>,
  #[clap(long, default_value = "info")]
  log_level: LevelFilter,
  #[clap(flatten)]
  parameters: ParameterSet,
}

fn handle_error(err: &anyhow::Error) {
  for (i, e) in err.chain().enumerate() {
    eprintln!("  {}: {}", i + 1, e);
  }
}

fn main() {
  if let Err(err) = run() {
    handle_error(&err);
    std::process::exit(1);
  }
}

fn run() -> Result<()> {
  let args = Args::parse();
  env_logger::Builder::new()
    .filter_level(args.log_level)
    .format(util::format_log)
    .init();

  args.parameters.validate()?;
  *PARAMETER_SET.lock().unwrap() = args.parameters.clone();

  let report = match &args.report {
    Some(path) => Some(Report::create(path)?),
    None => None,
  };
  let mut session = Session {
    input: VideoInput::new(&args.input)
      .context(format!("Failed to open input {}.", args.input.display()))?,
    detector: LaneDetector::new()?,
    report,
    max_frames: args.max_frames,
  };

  if args.headless {
    while session.step()?.is_some() {}
  }
  else {
    run_window(&mut session, args.hold)?;
  }
  session.finish()
}

fn run_window(session: &mut Session, hold: bool) -> Result<()> {
  let size = winit::dpi::PhysicalSize::new(session.input.width() as u32, session.input.height() as u32);
  let mut event_loop = EventLoop::new();
  let window = WindowBuilder::new()
    .with_title("lanes")
    .with_resizable(false)
    .with_inner_size(size)
    .with_min_inner_size(size)
    .with_max_inner_size(size)
    .build(&event_loop)
    .context("Failed to create a window.")?;
  let mut graphics_context = unsafe { GraphicsContext::new(window) }
    .map_err(|_| anyhow!("Failed to create a graphics context for the window."))?;

  let mut buffer = vec![];
  let mut args = EventLoopArgs {
    session,
    buffer: &mut buffer,
    graphics_context: &mut graphics_context,
    hold,
    finished: false,
  };

  let mut result = Ok(());
  event_loop.run_return(|event, _, control_flow| {
    if let Err(err) = handle_event(event, control_flow, &mut args) {
      result = Err(err);
      *control_flow = ControlFlow::Exit;
    }
  });
  result
}
