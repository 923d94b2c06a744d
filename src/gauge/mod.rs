pub mod background;
pub mod dial;
pub mod draw;
pub mod trail;

pub use background::render_background;
pub use dial::CircularGauge;
pub use draw::{Color, DrawCommand, LabelSize, Point, Size};
pub use trail::{Sample, Trail};
