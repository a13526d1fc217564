//! Domain entities for the roastery

mod inventory;
mod notification;
mod roasting;
mod sales;
mod user;

pub use inventory::*;
pub use notification::*;
pub use roasting::*;
pub use sales::*;
pub use user::*;
