// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  debug::*,
  edges::*,
  event_loop::*,
  hough::*,
  image::*,
  lane::*,
  parameters::*,
  pipeline::*,
  region::*,
  render::*,
  report::*,
  types::*,
  util::*,
  video::*,
  visualize::*,
};

pub use {
  std::{
    fmt,
    fs::File,
    io::{BufWriter, Read, Write},
    ops::Index,
    path::{Path, PathBuf},
    sync::Mutex,
  },
  log::{debug, info, LevelFilter},
  anyhow::{anyhow, bail, Context as AnyhowContext, Result},
};
