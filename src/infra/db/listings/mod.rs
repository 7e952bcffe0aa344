pub(crate) mod filter;
mod read;
mod types;
mod write;
