// Eigen-like aliases.
pub type Vector2d = nalgebra::Vector2::<f64>;
pub type Pixel = nalgebra::Vector2::<i32>;

// RGB triplet.
pub type Color = [u8; 3];
