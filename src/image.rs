use crate::all::*;

// Row-major grayscale image storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
  pub data: Vec<u8>,
  pub width: usize,
  pub height: usize,
}

// Row-major interleaved RGB image storage, three bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
  pub data: Vec<u8>,
  pub width: usize,
  pub height: usize,
}

impl Image {
  pub fn new(width: usize, height: usize) -> Image {
    Image {
      data: vec![0; width * height],
      width,
      height,
    }
  }

  #[allow(dead_code)]
  pub fn from_data(data: Vec<u8>, width: usize, height: usize) -> Result<Image> {
    if data.len() != width * height {
      bail!("Image data has {} bytes, expected {}x{}.", data.len(), width, height);
    }
    Ok(Image { data, width, height })
  }

  #[inline(always)]
  pub fn value(&self, x: usize, y: usize) -> u8 {
    self.data[y * self.width + x]
  }

  #[inline(always)]
  pub fn set_value(&mut self, x: usize, y: usize, value: u8) {
    self.data[y * self.width + x] = value;
  }

  pub fn contains(&self, x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
  }

  pub fn count_nonzero(&self) -> usize {
    self.data.iter().filter(|v| **v != 0).count()
  }
}

impl ColorImage {
  pub fn new(width: usize, height: usize) -> ColorImage {
    ColorImage {
      data: vec![0; 3 * width * height],
      width,
      height,
    }
  }

  #[inline(always)]
  pub fn pixel(&self, x: usize, y: usize) -> Color {
    let i = 3 * (y * self.width + x);
    [self.data[i], self.data[i + 1], self.data[i + 2]]
  }

  #[inline(always)]
  pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
    let i = 3 * (y * self.width + x);
    self.data[i..i + 3].copy_from_slice(&color);
  }

  pub fn set_pixel_i32(&mut self, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height { return }
    self.set_pixel(x as usize, y as usize, color);
  }
}

// Element access in the manner of `image[y][x]`.
impl Index<usize> for Image {
  type Output = [u8];
  fn index(&self, y: usize) -> &Self::Output {
    &self.data[y * self.width .. (y + 1) * self.width]
  }
}

// Printing small test images as a grid is handy when assertions fail.
impl fmt::Display for Image {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = String::new();
    for y in 0..self.height {
      for x in 0..self.width {
        s += &format!("{:>3},", self.value(x, y));
      }
      s += "\n";
    }
    write!(f, "{}", s)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_access() {
    let mut image = Image::new(3, 2);
    image.set_value(2, 1, 7);
    assert_eq!(image[1], [0, 0, 7]);
    assert_eq!(image.count_nonzero(), 1);
    assert!(image.contains(2, 1));
    assert!(!image.contains(3, 1));
    assert!(!image.contains(-1, 0));
    assert_eq!(format!("{}", image), "  0,  0,  0,\n  0,  0,  7,\n");
    assert!(Image::from_data(vec![0; 5], 3, 2).is_err());
  }

  #[test]
  fn test_color_access() {
    let mut image = ColorImage::new(2, 2);
    image.set_pixel(1, 0, [1, 2, 3]);
    image.set_pixel_i32(-1, 0, [9, 9, 9]);
    image.set_pixel_i32(2, 0, [9, 9, 9]);
    assert_eq!(image.pixel(1, 0), [1, 2, 3]);
    assert_eq!(image.data, vec![0, 0, 0, 1, 2, 3, 0, 0, 0, 0, 0, 0]);
  }
}
