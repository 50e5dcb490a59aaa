#[cfg(test)]
mod fake;
mod process;

#[cfg(test)]
pub use self::fake::*;
pub use self::process::*;
