pub mod cart;
pub mod money;
pub mod notification;
pub mod order;
pub mod product;
pub mod store;

pub use cart::*;
pub use money::*;
pub use notification::*;
pub use order::*;
pub use product::*;
pub use store::*;
