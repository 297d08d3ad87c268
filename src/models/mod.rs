pub mod booking;
pub mod room;

pub use booking::{Booking, BookingForm, BookingStatus};
pub use room::{Room, RoomSelection};
