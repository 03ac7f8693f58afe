use crate::all::*;

const WHITE: u32 = 0xffffff;
const RED: u32 = 0xff0000;
const YELLOW: u32 = 0xffff00;

pub struct VisualizeArgs<'a> {
  pub buffer: &'a mut Vec<u32>,
  pub buffer_w: usize,
  pub buffer_h: usize,
}

pub fn to_rgb_u32(c: Color) -> u32 {
  (c[0] as u32) << 16 | (c[1] as u32) << 8 | c[2] as u32
}

#[inline(always)]
fn draw_pixel(args: &mut VisualizeArgs, p: &Pixel, v: u32) {
  if p[0] < 0 || p[0] >= args.buffer_w as i32 { return }
  if p[1] < 0 || p[1] >= args.buffer_h as i32 { return }
  args.buffer[p[1] as usize * args.buffer_w + p[0] as usize] = v;
}

fn draw_segment(args: &mut VisualizeArgs, s: &Segment, v: u32) {
  let lo = Pixel::new(0, 0);
  let hi = Pixel::new(args.buffer_w as i32 - 1, args.buffer_h as i32 - 1);
  for p in line_pixels(s.start(), s.end(), lo, hi) {
    draw_pixel(args, &p, v);
  }
}

fn draw_buffer(args: &mut VisualizeArgs, image: &ColorImage) {
  for y in 0..image.height {
    if y >= args.buffer_h { continue }
    for x in 0..image.width {
      if x >= args.buffer_w { continue }
      args.buffer[y * args.buffer_w + x] = to_rgb_u32(image.pixel(x, y));
    }
  }
}

pub fn visualize(args: &mut VisualizeArgs, composite: &ColorImage) {
  args.buffer.iter_mut().for_each(|v| *v = 0);
  draw_buffer(args, composite);

  let p = PARAMETER_SET.lock().unwrap();
  let d = DEBUG_DATA.lock().unwrap();
  if p.show_edges {
    if let Some(edges) = &d.masked_edges {
      for (i, v) in edges.data.iter().enumerate() {
        if *v == 0 { continue }
        let pixel = Pixel::new((i % edges.width) as i32, (i / edges.width) as i32);
        draw_pixel(args, &pixel, WHITE);
      }
    }
  }

  if p.show_roi {
    for i in 0..d.region.len() {
      let a = d.region[i];
      let b = d.region[(i + 1) % d.region.len()];
      draw_segment(args, &Segment::new(a[0], a[1], b[0], b[1]), YELLOW);
    }
  }

  if p.show_segments {
    for segment in &d.segments {
      draw_segment(args, segment, RED);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_visualize_copies_composite() {
    let mut composite = ColorImage::new(3, 2);
    composite.set_pixel(2, 1, [0x12, 0x34, 0x56]);
    let mut buffer = vec![7; 4 * 3];
    let mut args = VisualizeArgs {
      buffer: &mut buffer,
      buffer_w: 4,
      buffer_h: 3,
    };
    visualize(&mut args, &composite);
    assert_eq!(buffer[1 * 4 + 2], 0x123456);
    assert_eq!(buffer[3], 0);
    assert_eq!(buffer[2 * 4], 0);
  }

  #[test]
  fn test_draw_segment_clips() {
    let mut buffer = vec![0; 5 * 5];
    let mut args = VisualizeArgs {
      buffer: &mut buffer,
      buffer_w: 5,
      buffer_h: 5,
    };
    draw_segment(&mut args, &Segment::new(-10, 2, 10, 2), RED);
    assert!(buffer[2 * 5 .. 3 * 5].iter().all(|v| *v == RED));
    assert_eq!(buffer.iter().filter(|v| **v == RED).count(), 5);
  }
}
