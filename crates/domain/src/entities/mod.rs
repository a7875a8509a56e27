pub mod pool;
pub mod position;

pub use pool::PoolSnapshot;
pub use position::LiquidityPosition;
