pub mod config;
pub mod error;

#[cfg(test)]
pub(crate) mod test_utils;
