pub mod model;

pub use model::{Mempool, Transaction};
