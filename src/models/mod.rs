mod product;
mod system;

pub use product::*;
pub use system::*;
