mod probe;
mod read;

pub use probe::probe;
pub use read::read;
