pub mod builder;
pub mod column;
pub mod constant_list;
pub mod identity;
pub mod ops;
pub mod program;

#[cfg(test)]
mod test;
