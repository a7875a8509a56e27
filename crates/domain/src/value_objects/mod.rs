pub mod amount;
pub mod amounts;
pub mod percentage;
pub mod price;
pub mod tick_range;

pub use amount::Amount;
pub use amounts::{PositionAmounts, TokenAmounts};
pub use percentage::Percentage;
pub use price::Price;
pub use tick_range::TickRange;
