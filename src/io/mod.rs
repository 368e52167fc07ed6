// Purpose - the input/clock boundary: key events in, frame ticks out

pub mod clock;
pub mod input;
pub mod keyboard;
pub mod terminal;

pub use clock::{Clock, FrameClock, ManualClock};
pub use input::{InputEvent, InputSource, ScriptedInput};
pub use terminal::TerminalInput;
