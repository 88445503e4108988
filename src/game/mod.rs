//! Game-side logic shared by the host and player views.

pub mod bonus;
pub mod celebration;
pub mod countdown;
pub mod room;
pub mod scoreboard;
pub mod shuffle;
pub mod theme;

pub use celebration::Flash;
pub use room::{Effect, Role, RoomView, Status};
pub use shuffle::{ChoiceMark, ShuffledQuestion};
pub use theme::{Palette, Theme};
